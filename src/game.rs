use crate::clock::Clock;
use crate::difficulty::Difficulty;
use crate::grid::{Direction, Pos, Size};
use crate::rng::{Lcg, DEFAULT_SEED};
use log::{debug, info, trace, warn};
use std::collections::VecDeque;

pub const GRID_WIDTH: u16 = 24;
pub const GRID_HEIGHT: u16 = 28;
pub const MAX_SNEK_LENGTH: usize = 100;
pub const INITIAL_SNEK_LENGTH: u16 = 3;

pub const BONUS_APPEARS_AFTER: u8 = 5;
pub const BONUS_DURATION_MS: u32 = 5000;
pub const BONUS_MAX_SCORE: u32 = 500;
// Bonus food covers BONUS_SPAN x BONUS_SPAN cells from its top-left corner
pub const BONUS_SPAN: u16 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub size: Size,
    pub max_length: usize,
    pub bonus_appears_after: u8,
    pub bonus_duration_ms: u32,
    pub bonus_max_score: u32,
}

impl GameConfig {
    // Room for the starting snake and a bonus footprint; a full-length snake
    // still leaves free cells for food
    pub fn is_playable(&self) -> bool {
        let Size { width, height } = self.size;
        let cells = width as usize * height as usize;
        let reserved = (BONUS_SPAN * BONUS_SPAN) as usize + 1;
        width >= BONUS_SPAN
            && height >= 2 * INITIAL_SNEK_LENGTH - 1
            && self.max_length >= INITIAL_SNEK_LENGTH as usize
            && self.max_length + reserved <= cells
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            size: Size {
                width: GRID_WIDTH,
                height: GRID_HEIGHT,
            },
            max_length: MAX_SNEK_LENGTH,
            bonus_appears_after: BONUS_APPEARS_AFTER,
            bonus_duration_ms: BONUS_DURATION_MS,
            bonus_max_score: BONUS_MAX_SCORE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snek {
    segments: VecDeque<Pos>,
}

impl Snek {
    // Vertical, head on top, in the middle of the board
    pub fn new(size: Size) -> Self {
        let mid_x = size.width / 2;
        let mid_y = size.height / 2;
        Snek {
            segments: (0..INITIAL_SNEK_LENGTH)
                .map(|i| Pos {
                    x: mid_x,
                    y: mid_y + i,
                })
                .collect(),
        }
    }

    // Head first
    pub fn from_segments(segments: impl IntoIterator<Item = Pos>) -> Option<Self> {
        let segments: VecDeque<Pos> = segments.into_iter().collect();
        if segments.is_empty() {
            None
        } else {
            Some(Snek { segments })
        }
    }

    pub fn head(&self) -> Pos {
        self.segments[0]
    }

    pub fn tail(&self) -> Pos {
        self.segments[self.segments.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment(&self, index: usize) -> Option<Pos> {
        self.segments.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        self.segments.iter().copied()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.segments.contains(&pos)
    }

    fn slither(&mut self, direction: Direction, size: Size) {
        let new_head = self.head().wrapped_add(direction.into(), size);
        self.segments.push_front(new_head);
        self.segments.pop_back();
    }

    // New segment sits on the tail and unfolds on the next move
    fn grow(&mut self, max_length: usize) {
        if self.segments.len() < max_length {
            self.segments.push_back(self.tail());
        }
    }

    fn hit_itself(&self) -> bool {
        let head = self.head();
        self.segments.iter().skip(1).any(|&p| p == head)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BonusFood {
    // Top-left cell of the footprint
    pub pos: Pos,
    pub started_ms: u32,
}

impl BonusFood {
    pub fn covers(&self, pos: Pos) -> bool {
        pos.x >= self.pos.x
            && pos.x < self.pos.x + BONUS_SPAN
            && pos.y >= self.pos.y
            && pos.y < self.pos.y + BONUS_SPAN
    }

    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..BONUS_SPAN).flat_map(move |dy| {
            (0..BONUS_SPAN).map(move |dx| Pos {
                x: self.pos.x + dx,
                y: self.pos.y + dy,
            })
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SoundEvent {
    #[default]
    None,
    AteFood,
    AteBonus,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// Decays linearly from bonus_max_score to zero over bonus_duration_ms
pub fn bonus_score(elapsed_ms: u32, config: &GameConfig) -> u16 {
    let duration = config.bonus_duration_ms as u64;
    if duration == 0 {
        return 0;
    }
    let elapsed = (elapsed_ms as u64).min(duration);
    let score = config.bonus_max_score as u64 * (duration - elapsed) / duration;
    score.min(u16::MAX as u64) as u16
}

#[derive(Debug)]
pub struct SnekGame<C: Clock> {
    config: GameConfig,
    clock: C,
    rng: Lcg,
    snek: Snek,
    food: Pos,
    bonus: Option<BonusFood>,
    foods_eaten: u8,
    sound: SoundEvent,
    direction: Direction,
    next_direction: Direction,
    score: u16,
    status: GameStatus,
    difficulty: Difficulty,
}

impl<C: Clock> SnekGame<C> {
    pub fn new(clock: C) -> Self {
        Self::build(GameConfig::default(), clock, DEFAULT_SEED)
    }

    pub fn with_seed(clock: C, seed: u32) -> Self {
        Self::build(GameConfig::default(), clock, seed)
    }

    pub fn with_config(config: GameConfig, clock: C, seed: u32) -> Option<Self> {
        if !config.is_playable() {
            warn!("Rejecting unplayable config {:?}", config);
            return None;
        }
        Some(Self::build(config, clock, seed))
    }

    fn build(config: GameConfig, clock: C, seed: u32) -> Self {
        let mut game = SnekGame {
            config,
            clock,
            rng: Lcg::new(seed),
            snek: Snek::new(config.size),
            food: Pos::default(),
            bonus: None,
            foods_eaten: 0,
            sound: SoundEvent::None,
            direction: Direction::Up,
            next_direction: Direction::Up,
            score: 0,
            status: GameStatus::Playing,
            difficulty: Difficulty::default(),
        };
        game.reset();
        game
    }

    // Difficulty and generator state carry over between rounds
    pub fn reset(&mut self) {
        self.snek = Snek::new(self.config.size);
        self.direction = Direction::Up;
        self.next_direction = Direction::Up;
        self.score = 0;
        self.status = GameStatus::Playing;
        self.bonus = None;
        self.foods_eaten = 0;
        self.sound = SoundEvent::None;
        self.spawn_food();
        debug!("Round reset, food at {:?}", self.food);
    }

    // Reversing onto the neck is ignored
    pub fn set_direction(&mut self, direction: Direction) {
        if direction == self.direction.opposite() {
            trace!("Ignoring reversal {:?} -> {:?}", self.direction, direction);
            return;
        }
        self.next_direction = direction;
    }

    // Returns false once the game is over
    pub fn update(&mut self) -> bool {
        if self.status == GameStatus::GameOver {
            return false;
        }

        self.direction = self.next_direction;
        self.snek.slither(self.direction, self.config.size);
        self.expire_bonus();

        let head = self.snek.head();
        if let Some(bonus) = self.bonus.filter(|b| b.covers(head)) {
            let elapsed = self.clock.now_ms().wrapping_sub(bonus.started_ms);
            let reward = bonus_score(elapsed, &self.config);
            self.snek.grow(self.config.max_length);
            self.score = self.score.saturating_add(reward);
            self.bonus = None;
            self.sound = SoundEvent::AteBonus;
            debug!("Bonus eaten after {}ms for {} points", elapsed, reward);
        } else if head == self.food {
            self.snek.grow(self.config.max_length);
            self.score = self.score.saturating_add(self.difficulty.food_score());
            self.spawn_food();
            self.sound = SoundEvent::AteFood;

            self.foods_eaten = self.foods_eaten.saturating_add(1);
            if self.foods_eaten >= self.config.bonus_appears_after && self.bonus.is_none() {
                self.spawn_bonus();
                self.foods_eaten = 0;
            }
        }

        if self.snek.hit_itself() {
            self.status = GameStatus::GameOver;
            self.sound = SoundEvent::GameOver;
            info!(
                "Game over at {:?}: score {}, length {}",
                head,
                self.score,
                self.snek.len()
            );
            return false;
        }

        true
    }

    fn expire_bonus(&mut self) {
        if let Some(bonus) = self.bonus {
            let elapsed = self.clock.now_ms().wrapping_sub(bonus.started_ms);
            if elapsed >= self.config.bonus_duration_ms {
                debug!("Bonus at {:?} expired", bonus.pos);
                self.bonus = None;
            }
        }
    }

    fn bonus_covers(&self, pos: Pos) -> bool {
        self.bonus.is_some_and(|b| b.covers(pos))
    }

    fn spawn_food(&mut self) {
        let size = self.config.size;
        loop {
            let pos = Pos {
                x: self.rng.below(size.width),
                y: self.rng.below(size.height),
            };
            if !self.snek.contains(pos) && !self.bonus_covers(pos) {
                self.food = pos;
                return;
            }
        }
    }

    fn spawn_bonus(&mut self) {
        let size = self.config.size;
        loop {
            let candidate = BonusFood {
                pos: Pos {
                    x: self.rng.below(size.width - (BONUS_SPAN - 1)),
                    y: self.rng.below(size.height - (BONUS_SPAN - 1)),
                },
                started_ms: self.clock.now_ms(),
            };
            if candidate
                .cells()
                .all(|cell| cell != self.food && !self.snek.contains(cell))
            {
                debug!("Bonus appeared at {:?}", candidate.pos);
                self.bonus = Some(candidate);
                return;
            }
        }
    }

    // `direction` becomes both the current and the buffered heading
    pub fn set_snek(&mut self, snek: Snek, direction: Direction) {
        self.snek = snek;
        self.direction = direction;
        self.next_direction = direction;
    }

    pub fn place_food(&mut self, pos: Pos) -> bool {
        if self.snek.contains(pos) || self.bonus_covers(pos) {
            return false;
        }
        self.food = pos;
        true
    }

    pub fn take_sound_event(&mut self) -> SoundEvent {
        std::mem::take(&mut self.sound)
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn cycle_difficulty(&mut self) -> Difficulty {
        self.difficulty = self.difficulty.next();
        self.difficulty
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn tick_interval(&self) -> u32 {
        self.difficulty.tick_interval()
    }

    pub fn score(&self) -> u16 {
        self.score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn snek(&self) -> &Snek {
        &self.snek
    }

    pub fn snek_len(&self) -> usize {
        self.snek.len()
    }

    pub fn snek_head(&self) -> Pos {
        self.snek.head()
    }

    pub fn snek_tail(&self) -> Pos {
        self.snek.tail()
    }

    pub fn food(&self) -> Pos {
        self.food
    }

    pub fn bonus(&self) -> Option<BonusFood> {
        self.bonus
    }

    pub fn is_bonus_active(&self) -> bool {
        self.bonus.is_some()
    }

    pub fn bonus_time_left_ms(&self) -> u32 {
        match self.bonus {
            Some(bonus) => {
                let elapsed = self.clock.now_ms().wrapping_sub(bonus.started_ms);
                self.config.bonus_duration_ms.saturating_sub(elapsed)
            }
            None => 0,
        }
    }

    // Full duration when no bonus is showing
    pub fn bonus_elapsed_ms(&self) -> u32 {
        match self.bonus {
            Some(bonus) => self.clock.now_ms().wrapping_sub(bonus.started_ms),
            None => self.config.bonus_duration_ms,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    // From the step between a segment and the one behind it; the tail uses
    // the step into the segment ahead
    pub fn segment_direction(&self, index: usize) -> Direction {
        let len = self.snek.len();
        let (ahead, behind) = if index + 1 < len {
            (index, index + 1)
        } else if len >= 2 {
            (len - 2, len - 1)
        } else {
            return self.direction;
        };
        self.snek.segments[ahead]
            .step_from(self.snek.segments[behind], self.config.size)
            .direction()
            .unwrap_or(self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn game() -> (SnekGame<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (SnekGame::new(clock.clone()), clock)
    }

    fn small_config() -> GameConfig {
        GameConfig {
            size: Size {
                width: 10,
                height: 10,
            },
            max_length: 20,
            ..GameConfig::default()
        }
    }

    // Puts food on the cell the snake enters next
    fn feed(game: &mut SnekGame<ManualClock>) {
        let next = game
            .snek_head()
            .wrapped_add(game.next_direction.into(), game.config.size);
        assert!(game.place_food(next));
        game.update();
    }

    #[test]
    fn test_reset_layout() {
        let (game, _) = game();
        let segments: Vec<Pos> = game.snek().iter().collect();
        assert_eq!(
            segments,
            vec![
                Pos { x: 12, y: 14 },
                Pos { x: 12, y: 15 },
                Pos { x: 12, y: 16 },
            ]
        );
        assert_eq!(game.direction(), Direction::Up);
        assert_eq!(game.score(), 0);
        assert_eq!(game.status(), GameStatus::Playing);
        assert!(!game.is_bonus_active());
        assert!(!game.snek().contains(game.food()));
    }

    #[test]
    fn test_straight_run_wraps_around() {
        let (mut game, _) = game();
        assert!(game.place_food(Pos { x: 0, y: 0 }));
        let start = game.snek_head();

        for n in 1..=60u16 {
            assert!(game.update());
            let expected_y = (start.y as i32 - n as i32).rem_euclid(GRID_HEIGHT as i32) as u16;
            assert_eq!(game.snek_head(), Pos { x: start.x, y: expected_y });
        }
    }

    #[test]
    fn test_direction_is_buffered_until_update() {
        let (mut game, _) = game();
        game.set_direction(Direction::Left);
        assert_eq!(game.direction(), Direction::Up);
        game.update();
        assert_eq!(game.direction(), Direction::Left);
    }

    #[test]
    fn test_reversal_is_ignored() {
        let (mut game, _) = game();
        game.set_direction(Direction::Down);
        game.update();
        assert_eq!(game.direction(), Direction::Up);

        game.set_direction(Direction::Right);
        game.update();
        game.set_direction(Direction::Left);
        game.update();
        assert_eq!(game.direction(), Direction::Right);
    }

    #[test]
    fn test_reversal_checked_against_current_not_buffered() {
        let (mut game, _) = game();
        // Left is buffered, Down is still the reverse of the current Up
        game.set_direction(Direction::Left);
        game.set_direction(Direction::Down);
        game.update();
        assert_eq!(game.direction(), Direction::Left);
    }

    #[test]
    fn test_eating_food() {
        let (mut game, _) = game();
        let before = game.snek_len();
        feed(&mut game);

        assert_eq!(game.snek_len(), before + 1);
        assert_eq!(game.score(), Difficulty::Normal.food_score());
        assert!(!game.snek().contains(game.food()));
        assert_eq!(game.take_sound_event(), SoundEvent::AteFood);
        assert_eq!(game.take_sound_event(), SoundEvent::None);
    }

    #[test]
    fn test_growth_unfolds_from_tail() {
        let (mut game, _) = game();
        feed(&mut game);
        let len = game.snek_len();
        assert_eq!(game.snek().segment(len - 1), game.snek().segment(len - 2));

        assert!(game.place_food(Pos { x: 0, y: 0 }));
        game.update();
        assert_ne!(game.snek().segment(len - 1), game.snek().segment(len - 2));
        assert_eq!(game.snek_len(), len);
    }

    #[test]
    fn test_food_score_follows_difficulty() {
        let (mut game, _) = game();
        game.set_difficulty(Difficulty::Nightmare);
        feed(&mut game);
        assert_eq!(game.score(), 12);
    }

    #[test]
    fn test_bonus_score_decays() {
        let config = GameConfig::default();
        assert_eq!(bonus_score(0, &config), 500);
        assert_eq!(bonus_score(1000, &config), 400);
        assert_eq!(bonus_score(2500, &config), 250);
        assert_eq!(bonus_score(5000, &config), 0);
        assert_eq!(bonus_score(u32::MAX, &config), 0);

        let mut last = bonus_score(0, &config);
        for t in (0..=5000).step_by(7) {
            let now = bonus_score(t, &config);
            assert!(now <= last);
            last = now;
        }
    }

    #[test]
    fn test_bonus_appears_after_five_foods() {
        let (mut game, _) = game();
        for _ in 0..BONUS_APPEARS_AFTER - 1 {
            feed(&mut game);
            assert!(!game.is_bonus_active());
        }
        feed(&mut game);

        let bonus = game.bonus().expect("bonus should be showing");
        assert!(bonus.cells().all(|c| !game.snek().contains(c)));
        assert!(bonus.cells().all(|c| c != game.food()));
        assert!(bonus.pos.x < GRID_WIDTH - 1 && bonus.pos.y < GRID_HEIGHT - 1);
        assert_eq!(game.foods_eaten, 0);
    }

    #[test]
    fn test_no_second_bonus_while_one_is_showing() {
        let (mut game, clock) = game();
        let showing = BonusFood {
            pos: Pos { x: 0, y: 0 },
            started_ms: clock.now_ms(),
        };
        game.bonus = Some(showing);
        for _ in 0..BONUS_APPEARS_AFTER + 1 {
            feed(&mut game);
        }
        assert_eq!(game.bonus(), Some(showing));
        assert_eq!(game.foods_eaten, BONUS_APPEARS_AFTER + 1);

        // Once it runs out, the next meal brings a fresh one
        clock.advance(BONUS_DURATION_MS);
        feed(&mut game);
        let fresh = game.bonus().expect("bonus should be showing");
        assert_eq!(fresh.started_ms, BONUS_DURATION_MS);
        assert_eq!(game.foods_eaten, 0);
    }

    #[test]
    fn test_eating_bonus() {
        let (mut game, clock) = game();
        assert!(game.place_food(Pos { x: 0, y: 0 }));
        let head = game.snek_head();
        game.bonus = Some(BonusFood {
            // Head enters the lower-right cell of the footprint
            pos: Pos {
                x: head.x - 1,
                y: head.y - 2,
            },
            started_ms: clock.now_ms(),
        });
        clock.advance(1000);
        let before = game.snek_len();

        assert!(game.update());
        assert_eq!(game.score(), 400);
        assert_eq!(game.snek_len(), before + 1);
        assert!(!game.is_bonus_active());
        assert_eq!(game.take_sound_event(), SoundEvent::AteBonus);
    }

    #[test]
    fn test_bonus_expires_in_real_time() {
        let (mut game, clock) = game();
        assert!(game.place_food(Pos { x: 0, y: 0 }));
        game.bonus = Some(BonusFood {
            pos: Pos { x: 0, y: 2 },
            started_ms: clock.now_ms(),
        });

        clock.advance(4999);
        assert_eq!(game.bonus_time_left_ms(), 1);
        game.update();
        assert!(game.is_bonus_active());

        clock.advance(1);
        assert_eq!(game.bonus_time_left_ms(), 0);
        game.update();
        assert!(!game.is_bonus_active());
        assert_eq!(game.bonus_elapsed_ms(), BONUS_DURATION_MS);
    }

    #[test]
    fn test_food_never_spawns_on_bonus() {
        let clock = ManualClock::new();
        let mut game = SnekGame::with_config(small_config(), clock, 7).unwrap();
        game.bonus = Some(BonusFood {
            pos: Pos { x: 2, y: 2 },
            started_ms: 0,
        });
        for _ in 0..200 {
            game.spawn_food();
            assert!(!game.bonus_covers(game.food()));
            assert!(!game.snek().contains(game.food()));
        }
    }

    #[test]
    fn test_self_collision_ends_the_game() {
        let (mut game, _) = game();
        let snek = Snek::from_segments([
            Pos { x: 5, y: 5 },
            Pos { x: 6, y: 5 },
            Pos { x: 6, y: 6 },
            Pos { x: 5, y: 6 },
            Pos { x: 4, y: 6 },
        ])
        .unwrap();
        game.set_snek(snek, Direction::Left);
        assert!(game.place_food(Pos { x: 0, y: 0 }));
        game.set_direction(Direction::Down);

        assert!(!game.update());
        assert!(game.is_game_over());
        assert_eq!(game.take_sound_event(), SoundEvent::GameOver);
        assert_eq!(game.take_sound_event(), SoundEvent::None);

        // Terminal until reset
        let head = game.snek_head();
        assert!(!game.update());
        assert_eq!(game.snek_head(), head);
        assert_eq!(game.take_sound_event(), SoundEvent::None);

        game.reset();
        assert!(!game.is_game_over());
        assert_eq!(game.snek_len(), 3);
    }

    #[test]
    fn test_moving_into_vacated_tail_is_safe() {
        let (mut game, _) = game();
        // Square loop: head follows right behind the tail
        let snek = Snek::from_segments([
            Pos { x: 5, y: 5 },
            Pos { x: 6, y: 5 },
            Pos { x: 6, y: 6 },
            Pos { x: 5, y: 6 },
        ])
        .unwrap();
        game.set_snek(snek, Direction::Left);
        assert!(game.place_food(Pos { x: 0, y: 0 }));
        game.set_direction(Direction::Down);
        assert!(game.update());
    }

    #[test]
    fn test_length_is_capped() {
        let clock = ManualClock::new();
        let config = GameConfig {
            max_length: 4,
            ..GameConfig::default()
        };
        let mut game = SnekGame::with_config(config, clock, DEFAULT_SEED).unwrap();
        feed(&mut game);
        feed(&mut game);
        assert_eq!(game.snek_len(), 4);
    }

    #[test]
    fn test_reset_keeps_generator_running() {
        let (mut game, _) = game();
        let carried = game.rng.state();
        game.reset();

        let fresh = SnekGame::with_seed(ManualClock::new(), carried);
        assert_eq!(game.food(), fresh.food());
        assert_ne!(game.rng, Lcg::default());
    }

    #[test]
    fn test_segment_directions() {
        let (mut game, _) = game();
        for i in 0..game.snek_len() {
            assert_eq!(game.segment_direction(i), Direction::Up);
        }

        assert!(game.place_food(Pos { x: 0, y: 0 }));
        game.set_direction(Direction::Right);
        game.update();
        assert_eq!(game.segment_direction(0), Direction::Right);
        assert_eq!(game.segment_direction(1), Direction::Up);
        assert_eq!(game.segment_direction(2), Direction::Up);
    }

    #[test]
    fn test_cycle_difficulty_five_times() {
        let (mut game, _) = game();
        let start = game.difficulty();
        for _ in 0..5 {
            game.cycle_difficulty();
        }
        assert_eq!(game.difficulty(), start);
        assert_eq!(game.tick_interval(), start.tick_interval());
    }

    #[test]
    fn test_unplayable_configs_are_rejected() {
        let sized = |width, height| GameConfig {
            size: Size { width, height },
            max_length: 4,
            ..GameConfig::default()
        };
        for (width, height) in [(0, 0), (1, 10), (10, 1), (10, 2), (10, 4)] {
            assert!(SnekGame::with_config(sized(width, height), ManualClock::new(), 1).is_none());
        }
        // Board has to leave room for food and bonus at full length
        let crowded = GameConfig {
            max_length: 100,
            ..small_config()
        };
        assert!(SnekGame::with_config(crowded, ManualClock::new(), 1).is_none());

        let mut game = SnekGame::with_config(sized(2, 5), ManualClock::new(), 1).unwrap();
        assert_eq!(game.snek_len(), 3);
        assert!(game.snek().iter().all(|p| p.x < 2 && p.y < 5));
        assert!(game.update());
        assert!(game.food().x < 2 && game.food().y < 5);
        assert!(!game.snek().contains(game.food()));
    }

    #[test]
    fn test_place_food_rejects_snake_cells() {
        let (mut game, _) = game();
        let food = game.food();
        assert!(!game.place_food(game.snek_head()));
        assert_eq!(game.food(), food);
    }
}
