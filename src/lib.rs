pub mod clock;
pub mod difficulty;
pub mod game;
pub mod grid;
pub mod rng;
pub mod router;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use difficulty::Difficulty;
pub use game::{BonusFood, GameConfig, GameStatus, Snek, SnekGame, SoundEvent};
pub use grid::{Direction, Pos, Size};
pub use router::{ButtonLevels, Buttons, Buzzer, Screen, TickDriver, TickReport};
pub use storage::{FileFlash, Flash, FlashError, MemFlash, PersistentStore, StorageRegion};
