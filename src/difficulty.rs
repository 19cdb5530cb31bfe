// Speed level of a game. Each level fixes how many frame ticks pass between
// two snake moves and how much a normal food is worth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Insane,
    Nightmare,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Insane,
        Difficulty::Nightmare,
    ];

    // Frame ticks per move, calibrated for a 60 Hz tick.
    pub fn tick_interval(&self) -> u32 {
        match self {
            Difficulty::Easy => 60,     // 1 move/s
            Difficulty::Normal => 20,   // 3 moves/s
            Difficulty::Hard => 12,     // 5 moves/s
            Difficulty::Insane => 7,    // ~8 moves/s
            Difficulty::Nightmare => 5, // 12 moves/s
        }
    }

    pub fn food_score(&self) -> u16 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Normal => 3,
            Difficulty::Hard => 5,
            Difficulty::Insane => 8,
            Difficulty::Nightmare => 12,
        }
    }

    pub fn next(&self) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Normal,
            Difficulty::Normal => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Insane,
            Difficulty::Insane => Difficulty::Nightmare,
            Difficulty::Nightmare => Difficulty::Easy,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
            Difficulty::Insane => "INSANE",
            Difficulty::Nightmare => "NIGHTMARE",
        }
    }
}
