use super::flash::{Flash, FlashError, MemFlash, StorageRegion};
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

// Flash block mirrored to a file. A missing file is a blank chip.
#[derive(Debug)]
pub struct FileFlash {
    path: PathBuf,
    chip: MemFlash,
}

impl FileFlash {
    pub fn open(path: impl AsRef<Path>, region: StorageRegion) -> Result<Self, FlashError> {
        let path = path.as_ref().to_path_buf();
        let chip = match fs::read(&path) {
            Ok(image) => MemFlash::with_image(region, &image),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No flash image at {}, starting blank", path.display());
                MemFlash::new(region)
            }
            Err(e) => return Err(e.into()),
        };
        Ok(FileFlash { path, chip })
    }

    fn persist(&self) -> Result<(), FlashError> {
        fs::write(&self.path, self.chip.image())?;
        Ok(())
    }
}

impl Flash for FileFlash {
    fn unlock(&mut self) -> Result<(), FlashError> {
        self.chip.unlock()
    }

    fn lock(&mut self) {
        self.chip.lock()
    }

    fn clear_error_flags(&mut self) {
        self.chip.clear_error_flags()
    }

    fn erase_block(&mut self, block: u32) -> Result<(), FlashError> {
        self.chip.erase_block(block)?;
        self.persist()
    }

    fn program_word(&mut self, addr: u32, value: u32) -> Result<(), FlashError> {
        self.chip.program_word(addr, value)?;
        self.persist()
    }

    fn read_bytes(&self, addr: u32, buf: &mut [u8]) -> Result<(), FlashError> {
        self.chip.read_bytes(addr, buf)
    }
}
