// offset  0: magic       u32
// offset  4: high score  u16
// offset  6: reserved    u16
// offset  8: play count  u32
// offset 12: checksum    u32
// All fields little-endian, 16 bytes in total, programmed as four words.

// "SNAK"
pub const MAGIC: u32 = 0x534E_414B;
pub const RECORD_LEN: usize = 16;
pub const RECORD_WORDS: usize = RECORD_LEN / 4;
const CHECKSUM_MASK: u32 = 0xA5A5_A5A5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Record {
    pub magic: u32,
    pub high_score: u16,
    pub reserved: u16,
    pub play_count: u32,
    pub checksum: u32,
}

impl Record {
    pub fn blank() -> Self {
        Record {
            magic: MAGIC,
            ..Record::default()
        }
        .sealed()
    }

    pub fn compute_checksum(&self) -> u32 {
        self.magic
            .wrapping_add(self.high_score as u32)
            .wrapping_add(self.reserved as u32)
            .wrapping_add(self.play_count)
            ^ CHECKSUM_MASK
    }

    // Same record with the checksum brought up to date.
    pub fn sealed(mut self) -> Self {
        self.checksum = self.compute_checksum();
        self
    }

    pub fn is_valid(&self) -> bool {
        self.magic == MAGIC && self.checksum == self.compute_checksum()
    }

    pub fn to_words(&self) -> [u32; RECORD_WORDS] {
        [
            self.magic,
            self.high_score as u32 | (self.reserved as u32) << 16,
            self.play_count,
            self.checksum,
        ]
    }

    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        let mut bytes = [0u8; RECORD_LEN];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(self.to_words()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    pub fn from_bytes(bytes: &[u8; RECORD_LEN]) -> Self {
        let word = |i: usize| u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        let packed = word(4);
        Record {
            magic: word(0),
            high_score: packed as u16,
            reserved: (packed >> 16) as u16,
            play_count: word(8),
            checksum: word(12),
        }
    }
}
