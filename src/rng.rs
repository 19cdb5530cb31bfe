// Plain 32-bit LCG for placing food
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

pub const DEFAULT_SEED: u32 = 12345;

const MULTIPLIER: u32 = 1_103_515_245;
const INCREMENT: u32 = 12_345;

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Lcg { state: seed }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn draw(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.state >> 16
    }

    // Draw reduced into `0..bound`. `bound` must be non-zero.
    pub fn below(&mut self, bound: u16) -> u16 {
        (self.draw() % bound as u32) as u16
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Lcg::new(DEFAULT_SEED)
    }
}
