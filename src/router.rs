// A poller elsewhere writes raw button levels into Buttons. The driver samples
// them once per frame and moves the snake every tick_interval frames.

use crate::clock::Clock;
use crate::difficulty::Difficulty;
use crate::game::{SnekGame, SoundEvent};
use crate::grid::Direction;
use crate::storage::{Flash, FlashError, PersistentStore};
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Frames the finished board stays up before the results screen
pub const GAME_OVER_HOLD_TICKS: u32 = 60;

const BUTTON_ORDER: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonLevels {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl ButtonLevels {
    pub fn only(direction: Direction) -> Self {
        let mut levels = ButtonLevels::default();
        *levels.level_mut(direction) = true;
        levels
    }

    pub fn with(mut self, direction: Direction) -> Self {
        *self.level_mut(direction) = true;
        self
    }

    pub fn is_pressed(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    fn level_mut(&mut self, direction: Direction) -> &mut bool {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    pub fn rising_edges(self, previous: ButtonLevels) -> impl Iterator<Item = Direction> {
        BUTTON_ORDER
            .into_iter()
            .filter(move |&d| self.is_pressed(d) && !previous.is_pressed(d))
    }
}

// Each flag is read and written on its own; nothing ties the four together
#[derive(Debug, Default)]
pub struct Buttons {
    up: AtomicBool,
    down: AtomicBool,
    left: AtomicBool,
    right: AtomicBool,
}

impl Buttons {
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&self, direction: Direction) -> &AtomicBool {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    pub fn set(&self, direction: Direction, pressed: bool) {
        self.flag(direction).store(pressed, Ordering::Relaxed);
    }

    pub fn store(&self, levels: ButtonLevels) {
        for direction in BUTTON_ORDER {
            self.set(direction, levels.is_pressed(direction));
        }
    }

    pub fn sample(&self) -> ButtonLevels {
        ButtonLevels {
            up: self.up.load(Ordering::Relaxed),
            down: self.down.load(Ordering::Relaxed),
            left: self.left.load(Ordering::Relaxed),
            right: self.right.load(Ordering::Relaxed),
        }
    }
}

pub trait Buzzer {
    fn short_beep(&mut self);
    fn medium_beep(&mut self);
    fn long_beep(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing { ticks: u32, game_over_ticks: u32 },
    Results { last_score: u16 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub moved: bool,
    pub sound: SoundEvent,
}

pub struct TickDriver<C: Clock, F: Flash, B: Buzzer> {
    game: SnekGame<C>,
    store: PersistentStore<F>,
    buzzer: B,
    buttons: Arc<Buttons>,
    previous: ButtonLevels,
    screen: Screen,
    high_score: u16,
    last_score: u16,
}

impl<C: Clock, F: Flash, B: Buzzer> TickDriver<C, F, B> {
    pub fn new(
        game: SnekGame<C>,
        mut store: PersistentStore<F>,
        buzzer: B,
        buttons: Arc<Buttons>,
    ) -> Self {
        let high_score = store.load_high_score();
        info!("Driver ready, high score {}", high_score);
        TickDriver {
            game,
            store,
            buzzer,
            buttons,
            previous: ButtonLevels::default(),
            screen: Screen::Menu,
            high_score,
            last_score: 0,
        }
    }

    // Buttons, then maybe a move, then the sound it produced
    pub fn tick(&mut self) -> TickReport {
        let levels = self.buttons.sample();
        let previous = std::mem::replace(&mut self.previous, levels);
        let mut report = TickReport::default();

        let Screen::Playing {
            ticks,
            game_over_ticks,
        } = &mut self.screen
        else {
            return report;
        };

        if self.game.is_game_over() {
            *game_over_ticks += 1;
            if *game_over_ticks >= GAME_OVER_HOLD_TICKS {
                self.screen = Screen::Results {
                    last_score: self.last_score,
                };
            }
            return report;
        }

        for direction in levels.rising_edges(previous) {
            self.game.set_direction(direction);
        }

        *ticks += 1;
        if *ticks >= self.game.tick_interval() {
            *ticks = 0;
            report.moved = true;
            if !self.game.update() {
                self.finish_game();
            }
        }

        report.sound = self.game.take_sound_event();
        self.play(report.sound);
        report
    }

    fn play(&mut self, sound: SoundEvent) {
        match sound {
            SoundEvent::None => {}
            SoundEvent::AteFood => self.buzzer.short_beep(),
            SoundEvent::AteBonus => self.buzzer.medium_beep(),
            SoundEvent::GameOver => self.buzzer.long_beep(),
        }
    }

    fn finish_game(&mut self) {
        let score = self.game.score();
        self.last_score = score;

        self.high_score = self.high_score.max(score);
        // One block rewrite covers both the play count and a new best
        if let Err(e) = self.store.record_game(score) {
            warn!("Could not record finished game: {}", e);
        }
        info!("Round over: {} points, best {}", score, self.high_score);
    }

    pub fn start_game(&mut self) {
        self.game.reset();
        self.screen = Screen::Playing {
            ticks: 0,
            game_over_ticks: 0,
        };
        info!("Round started on {}", self.game.difficulty().name());
    }

    // Only takes effect on the menu
    pub fn cycle_difficulty(&mut self) -> Difficulty {
        if self.screen == Screen::Menu {
            self.game.cycle_difficulty();
        }
        self.game.difficulty()
    }

    pub fn return_to_menu(&mut self) {
        self.screen = Screen::Menu;
    }

    pub fn erase_records(&mut self) -> Result<(), FlashError> {
        let result = self.store.erase_all();
        if let Err(e) = &result {
            warn!("Erasing score storage failed: {}", e);
        }
        self.high_score = self.store.load_high_score();
        result
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn game(&self) -> &SnekGame<C> {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut SnekGame<C> {
        &mut self.game
    }

    pub fn high_score(&self) -> u16 {
        self.high_score
    }

    pub fn last_score(&self) -> u16 {
        self.last_score
    }

    pub fn play_count(&mut self) -> u32 {
        self.store.load_play_count()
    }

    pub fn store(&self) -> &PersistentStore<F> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PersistentStore<F> {
        &mut self.store
    }

    pub fn buzzer(&self) -> &B {
        &self.buzzer
    }

    pub fn buzzer_mut(&mut self) -> &mut B {
        &mut self.buzzer
    }
}
