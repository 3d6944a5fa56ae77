//! Seedable randomness for explosion sampling

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// 回合专用的确定性RNG
#[derive(Debug, Clone)]
pub struct RoundRng {
    rng: Pcg32,
    seed: u64,
}

impl RoundRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    /// 使用系统熵生成种子
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }

    /// 获取当前种子值
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// 重置RNG状态（使用当前种子）
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
    }

    /// 使用新种子重置RNG
    pub fn reseed(&mut self, new_seed: u64) {
        self.seed = new_seed;
        self.reset();
    }

    /// Uniform sample in `[min, max]`. A degenerate or inverted range
    /// returns `min`, which lets callers pin the explosion time.
    pub fn sample_explosion(&mut self, min: f64, max: f64) -> f64 {
        if !(min < max) {
            return min;
        }
        self.rng.random_range(min..=max)
    }
}
