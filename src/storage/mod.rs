// High score and play count, kept in one flash block. Every change rewrites
// the whole block: unlock, clear stale flags, erase, program, lock.

mod file;
mod flash;
mod record;

pub use file::FileFlash;
pub use flash::{Flash, FlashError, MemFlash, StorageRegion, ERASED_BYTE};
pub use record::{Record, MAGIC, RECORD_LEN, RECORD_WORDS};

use log::{debug, info};
use std::ops::{Deref, DerefMut};

pub struct PersistentStore<F: Flash> {
    flash: F,
    region: StorageRegion,
    cache: Option<Record>,
}

impl<F: Flash> PersistentStore<F> {
    pub fn new(flash: F, region: StorageRegion) -> Self {
        PersistentStore {
            flash,
            region,
            cache: None,
        }
    }

    pub fn init(&mut self) -> Record {
        let mut bytes = [0u8; RECORD_LEN];
        let stored = match self.flash.read_bytes(self.region.base, &mut bytes) {
            Ok(()) => Some(Record::from_bytes(&bytes)).filter(Record::is_valid),
            Err(e) => {
                debug!("Reading score record failed: {}", e);
                None
            }
        };

        let record = match stored {
            Some(record) => {
                info!(
                    "Loaded score record: high score {}, {} games played",
                    record.high_score, record.play_count
                );
                record
            }
            None => {
                info!("No valid score record, starting from zero");
                Record::blank()
            }
        };
        self.cache = Some(record);
        record
    }

    fn cached(&mut self) -> Record {
        match self.cache {
            Some(record) => record,
            None => self.init(),
        }
    }

    pub fn load_high_score(&mut self) -> u16 {
        self.cached().high_score
    }

    pub fn load_play_count(&mut self) -> u32 {
        self.cached().play_count
    }

    pub fn is_valid(&mut self) -> bool {
        self.cached().magic == MAGIC
    }

    // Lower scores are accepted and dropped
    pub fn save_high_score(&mut self, score: u16) -> Result<(), FlashError> {
        let current = self.cached();
        if score <= current.high_score {
            return Ok(());
        }
        let record = Record {
            high_score: score,
            ..current
        }
        .sealed();
        self.cache = Some(record);
        self.write(&record)?;
        info!("Saved high score {}", score);
        Ok(())
    }

    pub fn increment_play_count(&mut self) -> Result<(), FlashError> {
        let current = self.cached();
        let record = Record {
            play_count: current.play_count.saturating_add(1),
            ..current
        }
        .sealed();
        self.cache = Some(record);
        self.write(&record)?;
        debug!("Play count now {}", record.play_count);
        Ok(())
    }

    // Play count and a new best go out in one rewrite
    pub fn record_game(&mut self, score: u16) -> Result<(), FlashError> {
        let current = self.cached();
        let record = Record {
            high_score: current.high_score.max(score),
            play_count: current.play_count.saturating_add(1),
            ..current
        }
        .sealed();
        self.cache = Some(record);
        self.write(&record)?;
        if record.high_score > current.high_score {
            info!("Saved high score {}", score);
        }
        debug!("Play count now {}", record.play_count);
        Ok(())
    }

    // Cache goes even when the erase fails, so the next read hits the device
    pub fn erase_all(&mut self) -> Result<(), FlashError> {
        let result = self.erase_block();
        self.cache = None;
        if result.is_ok() {
            info!("Score storage erased");
        }
        result
    }

    fn erase_block(&mut self) -> Result<(), FlashError> {
        let mut flash = Unlocked::new(&mut self.flash)?;
        flash.clear_error_flags();
        flash.erase_block(self.region.block)
    }

    fn write(&mut self, record: &Record) -> Result<(), FlashError> {
        let mut flash = Unlocked::new(&mut self.flash)?;
        flash.clear_error_flags();
        flash.erase_block(self.region.block)?;
        let mut addr = self.region.base;
        for word in record.to_words() {
            flash.program_word(addr, word)?;
            addr += 4;
        }
        Ok(())
    }

    pub fn flash(&self) -> &F {
        &self.flash
    }

    pub fn flash_mut(&mut self) -> &mut F {
        &mut self.flash
    }

    pub fn into_flash(self) -> F {
        self.flash
    }
}

// Write access to the controller; locks it again when dropped
struct Unlocked<'a, F: Flash> {
    flash: &'a mut F,
}

impl<'a, F: Flash> Unlocked<'a, F> {
    fn new(flash: &'a mut F) -> Result<Self, FlashError> {
        flash.unlock()?;
        Ok(Unlocked { flash })
    }
}

impl<F: Flash> Deref for Unlocked<'_, F> {
    type Target = F;

    fn deref(&self) -> &F {
        self.flash
    }
}

impl<F: Flash> DerefMut for Unlocked<'_, F> {
    fn deref_mut(&mut self) -> &mut F {
        self.flash
    }
}

impl<F: Flash> Drop for Unlocked<'_, F> {
    fn drop(&mut self) {
        self.flash.lock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGION: StorageRegion = StorageRegion::LAST_SECTOR;

    fn blank_store() -> PersistentStore<MemFlash> {
        PersistentStore::new(MemFlash::new(REGION), REGION)
    }

    // Same chip, cold cache
    fn reboot(store: PersistentStore<MemFlash>) -> PersistentStore<MemFlash> {
        let mut store = PersistentStore::new(store.into_flash(), REGION);
        store.init();
        store
    }

    #[test]
    fn test_blank_chip_defaults_without_writing() {
        let mut store = blank_store();
        let record = store.init();
        assert_eq!(record, Record::blank());
        assert_eq!(store.load_high_score(), 0);
        assert_eq!(store.load_play_count(), 0);
        assert!(store.is_valid());
        assert_eq!(store.flash().erase_count, 0);
        assert_eq!(store.flash().program_count, 0);
    }

    #[test]
    fn test_loads_are_lazy() {
        let record = Record {
            high_score: 42,
            play_count: 3,
            ..Record::blank()
        }
        .sealed();
        let flash = MemFlash::with_image(REGION, &record.to_bytes());
        let mut store = PersistentStore::new(flash, REGION);
        assert_eq!(store.load_high_score(), 42);
        assert_eq!(store.load_play_count(), 3);
    }

    #[test]
    fn test_high_score_survives_reboot() {
        let mut store = blank_store();
        store.save_high_score(100).unwrap();
        let mut store = reboot(store);
        assert_eq!(store.load_high_score(), 100);
    }

    #[test]
    fn test_high_score_only_ratchets_up() {
        let mut store = blank_store();
        store.save_high_score(100).unwrap();
        let erases = store.flash().erase_count;

        store.save_high_score(50).unwrap();
        store.save_high_score(100).unwrap();
        assert_eq!(store.load_high_score(), 100);
        assert_eq!(store.flash().erase_count, erases);

        let mut store = reboot(store);
        assert_eq!(store.load_high_score(), 100);
    }

    #[test]
    fn test_play_count_and_score_share_the_record() {
        let mut store = blank_store();
        store.increment_play_count().unwrap();
        store.increment_play_count().unwrap();
        store.save_high_score(9).unwrap();
        store.increment_play_count().unwrap();

        let mut store = reboot(store);
        assert_eq!(store.load_play_count(), 3);
        assert_eq!(store.load_high_score(), 9);
    }

    #[test]
    fn test_record_game_is_one_rewrite() {
        let mut store = blank_store();
        store.record_game(12).unwrap();
        assert_eq!(store.flash().erase_count, 1);
        assert_eq!(store.flash().program_count, RECORD_WORDS);

        store.record_game(5).unwrap();
        assert_eq!(store.flash().erase_count, 2);
        assert_eq!(store.load_high_score(), 12);

        let mut store = reboot(store);
        assert_eq!(store.load_play_count(), 2);
        assert_eq!(store.load_high_score(), 12);
    }

    #[test]
    fn test_rewrite_protocol() {
        let mut store = blank_store();
        // A stray write while locked leaves the error flags up
        assert!(store.flash_mut().program_word(REGION.base, 0).is_err());
        assert!(store.flash().has_error_flags());
        store.save_high_score(7).unwrap();

        let flash = store.flash();
        assert_eq!(flash.erase_count, 1);
        assert_eq!(flash.program_count, RECORD_WORDS);
        assert_eq!(flash.unlock_count, 1);
        assert_eq!(flash.lock_count, 1);
        assert!(flash.is_locked());
        assert_eq!(&flash.image()[..RECORD_LEN], &store.cache.unwrap().to_bytes());
        assert!(flash.image()[RECORD_LEN..].iter().all(|&b| b == ERASED_BYTE));
    }

    #[test]
    fn test_corrupt_checksum_reads_as_blank() {
        let mut store = blank_store();
        store.save_high_score(100).unwrap();
        let mut flash = store.into_flash();
        flash.image_mut()[12] ^= 0x01;

        let mut store = PersistentStore::new(flash, REGION);
        store.init();
        assert_eq!(store.load_high_score(), 0);
        assert_eq!(store.load_play_count(), 0);
        assert!(store.is_valid());
    }

    #[test]
    fn test_erase_failure_is_reported_and_relocks() {
        let mut store = blank_store();
        store.flash_mut().fail_erase = true;

        assert!(matches!(
            store.save_high_score(10),
            Err(FlashError::EraseFailed(23))
        ));
        assert!(store.flash().is_locked());
        assert_eq!(store.flash().program_count, 0);
        // The session still knows the score
        assert_eq!(store.load_high_score(), 10);

        let mut store = reboot(store);
        assert_eq!(store.load_high_score(), 0);
    }

    #[test]
    fn test_program_failure_aborts_and_relocks() {
        let mut store = blank_store();
        store.flash_mut().fail_program_at = Some(1);

        assert!(matches!(
            store.increment_play_count(),
            Err(FlashError::ProgramFailed { .. })
        ));
        assert!(store.flash().is_locked());
        assert_eq!(store.flash().program_count, 2);

        // Half-written record does not validate
        let mut store = reboot(store);
        assert_eq!(store.load_play_count(), 0);
    }

    #[test]
    fn test_next_save_recovers_after_failure() {
        let mut store = blank_store();
        store.flash_mut().fail_program_at = Some(0);
        assert!(store.save_high_score(30).is_err());
        assert!(store.flash().has_error_flags());

        store.flash_mut().fail_program_at = None;
        store.save_high_score(40).unwrap();

        let mut store = reboot(store);
        assert_eq!(store.load_high_score(), 40);
    }

    #[test]
    fn test_erase_all_drops_cache() {
        let mut store = blank_store();
        store.save_high_score(100).unwrap();
        store.erase_all().unwrap();

        assert!(store.cache.is_none());
        assert_eq!(store.load_high_score(), 0);
        assert!(store.flash().image().iter().all(|&b| b == ERASED_BYTE));
    }

    #[test]
    fn test_erase_all_drops_cache_on_failure() {
        let mut store = blank_store();
        store.save_high_score(100).unwrap();
        store.flash_mut().fail_erase = true;

        assert!(store.erase_all().is_err());
        assert!(store.cache.is_none());
        assert!(store.flash().is_locked());
        // Block untouched, so the score reads back
        assert_eq!(store.load_high_score(), 100);
    }
}
