/// The linear congruential generator behind the RANDOM replacement policy
///
/// The recurrence and its constants are fixed, eviction sequences recorded against one seed must
/// replay identically
///
/// # Examples
///
/// ```
/// use cachelib::random::EvictRandom;
/// let mut rng = EvictRandom::default();
/// assert_eq!(rng.next(), 16838);
/// rng.seed(1);
/// assert_eq!(rng.next(), 16838);
/// ```
#[derive(Debug, Clone)]
pub struct EvictRandom {
    state: u64,
}

const MULTIPLIER: u64 = 1103515243;
const INCREMENT: u64 = 12345;

impl EvictRandom {
    pub fn new(seed: u32) -> Self {
        Self { state: seed as u64 }
    }

    pub fn seed(&mut self, seed: u32) {
        self.state = seed as u64;
    }

    /// Advances the generator, returning a value in 0..32768
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u16 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        ((self.state / 65536) as u32 % 32768) as u16
    }
}

impl Default for EvictRandom {
    fn default() -> Self {
        Self::new(1)
    }
}
