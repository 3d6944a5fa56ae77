//! Round scoring

use crate::constants::{POINTS_PER_TIME_UNIT, SURVIVAL_BONUS};

// Absorbs representation error so that e.g. 0.3 time-units is worth 3 points.
const SCORE_EPSILON: f64 = 1e-9;

/// Points earned by one jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBreakdown {
    pub time_bonus: u32,
    pub survival_bonus: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.time_bonus.saturating_add(self.survival_bonus)
    }
}

/// Split a jump's score into its time and survival parts.
///
/// `survival_threshold` is the fixed bar (8.0 by default), not the round's
/// sampled explosion time.
pub fn score_breakdown(flight_time: f64, survival_threshold: f64) -> ScoreBreakdown {
    let flight_time = if flight_time.is_finite() { flight_time.max(0.0) } else { 0.0 };
    let time_bonus = (flight_time * POINTS_PER_TIME_UNIT + SCORE_EPSILON).floor() as u32;
    let survival_bonus = if flight_time > survival_threshold {
        SURVIVAL_BONUS
    } else {
        0
    };
    ScoreBreakdown {
        time_bonus,
        survival_bonus,
    }
}

/// `floor(flight_time * 10) + (flight_time > threshold ? 100 : 0)`
pub fn compute_score(flight_time: f64, survival_threshold: f64) -> u32 {
    score_breakdown(flight_time, survival_threshold).total()
}
