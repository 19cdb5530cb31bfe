use thiserror::Error;

pub const ERASED_BYTE: u8 = 0xFF;

#[derive(Debug, Error)]
pub enum FlashError {
    #[error("flash controller is locked")]
    Locked,
    #[error("address {addr:#010x} is outside the flash region")]
    OutOfRange { addr: u32 },
    #[error("block {0} does not exist on this device")]
    UnknownBlock(u32),
    #[error("word address {addr:#010x} is not 4-byte aligned")]
    Unaligned { addr: u32 },
    #[error("word at {addr:#010x} must be erased before programming")]
    NotErased { addr: u32 },
    #[error("erase of block {0} failed")]
    EraseFailed(u32),
    #[error("programming word at {addr:#010x} failed")]
    ProgramFailed { addr: u32 },
    #[error("error flags from an earlier operation are still set")]
    StaleFlags,
    #[error("flash image I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

// Writes need the controller unlocked first. Erase sets a whole block to
// ERASED_BYTE; programming can only clear bits, so a word has to be
// erased before it takes an arbitrary value.
pub trait Flash {
    fn unlock(&mut self) -> Result<(), FlashError>;
    fn lock(&mut self);
    // Drops error flags left over from an earlier failed operation.
    fn clear_error_flags(&mut self);
    fn erase_block(&mut self, block: u32) -> Result<(), FlashError>;
    // Programs a little-endian 32-bit word at a 4-byte aligned address.
    fn program_word(&mut self, addr: u32, value: u32) -> Result<(), FlashError>;
    fn read_bytes(&self, addr: u32, buf: &mut [u8]) -> Result<(), FlashError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StorageRegion {
    pub block: u32,
    pub base: u32,
    pub size: u32,
}

impl StorageRegion {
    // Last 128 KiB sector of a 2 MiB part.
    pub const LAST_SECTOR: StorageRegion = StorageRegion {
        block: 23,
        base: 0x081E_0000,
        size: 0x2_0000,
    };

    pub fn contains(&self, addr: u32, len: usize) -> bool {
        let Some(offset) = addr.checked_sub(self.base) else {
            return false;
        };
        (offset as u64 + len as u64) <= self.size as u64
    }
}

impl Default for StorageRegion {
    fn default() -> Self {
        StorageRegion::LAST_SECTOR
    }
}

// RAM-backed flash block with NOR programming rules and switchable faults.
#[derive(Debug, Clone)]
pub struct MemFlash {
    region: StorageRegion,
    data: Vec<u8>,
    locked: bool,
    error_flags: bool,
    pub fail_erase: bool,
    // Fail the n-th program call (0-based) after this is set.
    pub fail_program_at: Option<usize>,
    pub erase_count: usize,
    pub program_count: usize,
    pub unlock_count: usize,
    pub lock_count: usize,
}

impl MemFlash {
    pub fn new(region: StorageRegion) -> Self {
        MemFlash {
            region,
            data: vec![ERASED_BYTE; region.size as usize],
            locked: true,
            error_flags: false,
            fail_erase: false,
            fail_program_at: None,
            erase_count: 0,
            program_count: 0,
            unlock_count: 0,
            lock_count: 0,
        }
    }

    // Chip holding `image` at the start of the region, rest erased.
    pub fn with_image(region: StorageRegion, image: &[u8]) -> Self {
        let mut flash = MemFlash::new(region);
        let len = image.len().min(flash.data.len());
        flash.data[..len].copy_from_slice(&image[..len]);
        flash
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn has_error_flags(&self) -> bool {
        self.error_flags
    }

    pub fn image(&self) -> &[u8] {
        &self.data
    }

    pub fn image_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn offset(&self, addr: u32, len: usize) -> Result<usize, FlashError> {
        if !self.region.contains(addr, len) {
            return Err(FlashError::OutOfRange { addr });
        }
        Ok((addr - self.region.base) as usize)
    }
}

impl Flash for MemFlash {
    fn unlock(&mut self) -> Result<(), FlashError> {
        self.unlock_count += 1;
        self.locked = false;
        Ok(())
    }

    fn lock(&mut self) {
        self.lock_count += 1;
        self.locked = true;
    }

    fn clear_error_flags(&mut self) {
        self.error_flags = false;
    }

    fn erase_block(&mut self, block: u32) -> Result<(), FlashError> {
        if self.locked {
            self.error_flags = true;
            return Err(FlashError::Locked);
        }
        if self.error_flags {
            return Err(FlashError::StaleFlags);
        }
        if block != self.region.block {
            return Err(FlashError::UnknownBlock(block));
        }
        if self.fail_erase {
            self.error_flags = true;
            return Err(FlashError::EraseFailed(block));
        }
        self.erase_count += 1;
        self.data.fill(ERASED_BYTE);
        Ok(())
    }

    fn program_word(&mut self, addr: u32, value: u32) -> Result<(), FlashError> {
        if self.locked {
            self.error_flags = true;
            return Err(FlashError::Locked);
        }
        if self.error_flags {
            return Err(FlashError::StaleFlags);
        }
        if addr % 4 != 0 {
            return Err(FlashError::Unaligned { addr });
        }
        let offset = self.offset(addr, 4)?;
        let call = self.program_count;
        self.program_count += 1;
        if self.fail_program_at == Some(call) {
            self.error_flags = true;
            return Err(FlashError::ProgramFailed { addr });
        }

        let cell = &mut self.data[offset..offset + 4];
        let current = u32::from_le_bytes([cell[0], cell[1], cell[2], cell[3]]);
        if current & value != value {
            self.error_flags = true;
            return Err(FlashError::NotErased { addr });
        }
        cell.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn read_bytes(&self, addr: u32, buf: &mut [u8]) -> Result<(), FlashError> {
        let offset = self.offset(addr, buf.len())?;
        buf.copy_from_slice(&self.data[offset..offset + buf.len()]);
        Ok(())
    }
}
