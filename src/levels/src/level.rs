//! Level definitions and the built-in catalog

use error::GameError;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Difficulty tier. Ordering is significant: easy < medium < hard < expert < master.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
    Master,
}

/// A level definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub difficulty: Difficulty,
    /// Lifetime best score needed to unlock
    pub required_score: u32,
    /// Explosion time is sampled uniformly from `[min, max]`
    pub explosion_time_range: (f64, f64),
    /// Hard cap on a round's flight time
    pub max_flight_time: f64,
}

impl Level {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
        difficulty: Difficulty,
        required_score: u32,
        explosion_time_range: (f64, f64),
        max_flight_time: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            icon: icon.into(),
            difficulty,
            required_score,
            explosion_time_range,
            max_flight_time,
        }
    }

    /// Check the range and flight cap invariants
    pub fn validate(&self) -> Result<(), GameError> {
        let (min, max) = self.explosion_time_range;
        if !(min.is_finite() && max.is_finite()) || min < 0.0 || min > max {
            return Err(GameError::Config(format!(
                "level {} has invalid explosion range [{}, {}]",
                self.id, min, max
            )));
        }
        if !self.max_flight_time.is_finite() || self.max_flight_time <= 0.0 {
            return Err(GameError::Config(format!(
                "level {} has invalid max flight time {}",
                self.id, self.max_flight_time
            )));
        }
        Ok(())
    }

    /// Rank used to pick the "current" level: tier first, then required score
    pub fn rank(&self) -> (Difficulty, u32) {
        (self.difficulty, self.required_score)
    }
}

fn tier<'a>(
    difficulty: Difficulty,
    icon: &str,
    steps: &'a [(u32, (f64, f64), f64)],
) -> impl Iterator<Item = Level> + 'a {
    let name = difficulty.to_string();
    let icon = icon.to_string();
    steps
        .iter()
        .enumerate()
        .map(move |(index, &(required_score, range, max_flight_time))| {
            let number = index + 1;
            Level::new(
                format!("{}_{}", name.to_lowercase(), number),
                format!("{} {}", name, number),
                format!(
                    "Explosion between {:.1}s and {:.1}s, flight capped at {:.1}s",
                    range.0, range.1, max_flight_time
                ),
                icon.clone(),
                difficulty,
                required_score,
                range,
                max_flight_time,
            )
        })
}

/// Get all level definitions, in display order
pub fn all_levels() -> Vec<Level> {
    // The round ends on the tick that reaches its bound, so the longest jump
    // is 9.9s under a 10.0 cap. No round scores above 199.
    let easy = [
        (0, (5.0, 10.0), 10.0),
        (20, (5.0, 9.5), 10.0),
        (40, (4.5, 9.5), 10.0),
        (60, (4.5, 9.0), 10.0),
    ];
    let medium = [
        (80, (4.0, 9.0), 10.0),
        (100, (4.0, 8.5), 10.0),
        (110, (3.5, 8.5), 10.0),
        (120, (3.5, 8.0), 10.0),
    ];
    let hard = [
        (130, (3.0, 8.0), 9.5),
        (140, (3.0, 7.5), 9.5),
        (150, (2.5, 7.5), 9.0),
        (160, (2.5, 7.0), 9.0),
    ];
    let expert = [
        (170, (2.0, 7.0), 8.5),
        (180, (2.0, 6.5), 8.5),
        (185, (1.5, 6.5), 8.0),
        (190, (1.5, 6.0), 8.0),
    ];
    let master = [(195, (1.0, 6.0), 7.5), (197, (1.0, 5.5), 7.0), (199, (1.0, 5.0), 7.0)];

    tier(Difficulty::Easy, "🌱", &easy)
        .chain(tier(Difficulty::Medium, "🌤️", &medium))
        .chain(tier(Difficulty::Hard, "🔥", &hard))
        .chain(tier(Difficulty::Expert, "⚡", &expert))
        .chain(tier(Difficulty::Master, "👑", &master))
        .collect()
}

/// Display model: a definition merged with its unlock flag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelView<'a> {
    pub level: &'a Level,
    pub unlocked: bool,
}
