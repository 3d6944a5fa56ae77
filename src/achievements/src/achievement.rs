//! Achievement definitions and types

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Unique identifier for an achievement.
///
/// The string form (`first_jump`, `streak_3`, ...) is the persisted key and
/// must never change for an existing variant. Variant order matches
/// [`ACHIEVEMENTS`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum AchievementId {
    // Basic
    FirstJump,
    FirstSuccess,
    FirstExplosion,

    // Timing
    QuickReflex,
    PerfectTiming,
    SpeedDemon,
    Patience,
    LastMoment,
    EarlyBird,

    // Flight time
    Astronaut,
    SpaceExplorer,
    CosmicTraveler,
    TimeMaster,
    ShortFlight,

    // Score
    #[strum(serialize = "score_100")]
    Score100,
    #[strum(serialize = "score_500")]
    Score500,
    #[strum(serialize = "score_1000")]
    Score1000,
    HighScorer,

    // Streaks
    #[strum(serialize = "streak_3")]
    Streak3,
    #[strum(serialize = "streak_5")]
    Streak5,
    #[strum(serialize = "streak_10")]
    Streak10,
    #[strum(serialize = "streak_20")]
    Streak20,

    // Lifetime totals
    Survivor,
    Veteran,
    Master,
    Grandmaster,

    // Special
    LuckyOne,
    RiskTaker,
    Conservative,
    Perfectionist,

    // Milestones
    #[strum(serialize = "milestone_100")]
    Milestone100,
    #[strum(serialize = "milestone_500")]
    Milestone500,
    #[strum(serialize = "milestone_1000")]
    Milestone1000,
}

impl AchievementId {
    /// Persisted string key
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Static definition for this id
    pub fn definition(self) -> &'static Achievement {
        &ACHIEVEMENTS[self as usize]
    }

    pub fn all() -> impl Iterator<Item = AchievementId> {
        AchievementId::iter()
    }
}

impl std::fmt::Display for AchievementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for AchievementId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for AchievementId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let key = String::deserialize(deserializer)?;
        AchievementId::from_str(&key)
            .map_err(|_| serde::de::Error::custom(format!("unknown achievement id: {}", key)))
    }
}

/// An immutable achievement definition. Unlock state lives in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

const fn def(
    id: AchievementId,
    title: &'static str,
    description: &'static str,
    icon: &'static str,
) -> Achievement {
    Achievement {
        id,
        title,
        description,
        icon,
    }
}

/// The full catalog, in display order
pub static ACHIEVEMENTS: [Achievement; 33] = [
    // Basic achievements
    def(AchievementId::FirstJump, "First Jump", "Make your first jump", "🚀"),
    def(AchievementId::FirstSuccess, "First Success", "Successfully complete your first jump", "✨"),
    def(AchievementId::FirstExplosion, "First Explosion", "Experience your first explosion", "💥"),
    // Timing achievements
    def(AchievementId::QuickReflex, "Quick Reflex", "Jump in the last second before explosion", "⚡"),
    def(
        AchievementId::PerfectTiming,
        "Perfect Timing",
        "Jump at the perfect moment (within 0.5s of explosion)",
        "🎯",
    ),
    def(AchievementId::SpeedDemon, "Speed Demon", "Jump within 1 second of takeoff", "💨"),
    def(AchievementId::Patience, "Patience", "Wait more than 7 seconds before jumping", "⏰"),
    def(AchievementId::LastMoment, "Last Moment", "Jump within 0.2 seconds of explosion", "⏱️"),
    def(AchievementId::EarlyBird, "Early Bird", "Jump within 2 seconds of takeoff", "🐦"),
    // Flight time achievements
    def(AchievementId::Astronaut, "Astronaut", "Fly for more than 8 seconds", "👨‍🚀"),
    def(AchievementId::SpaceExplorer, "Space Explorer", "Fly for more than 9 seconds", "🛸"),
    def(AchievementId::CosmicTraveler, "Cosmic Traveler", "Fly for more than 9.5 seconds", "🌌"),
    def(AchievementId::TimeMaster, "Time Master", "Fly for the full 10 seconds", "⏰"),
    def(AchievementId::ShortFlight, "Short Flight", "Fly for less than 3 seconds", "🪶"),
    // Score achievements
    def(AchievementId::Score100, "Century", "Score 100 points in a single game", "💯"),
    def(AchievementId::Score500, "Half Thousand", "Score 500 points in a single game", "🎯"),
    def(AchievementId::Score1000, "Thousand", "Score 1000 points in a single game", "🏆"),
    def(AchievementId::HighScorer, "High Scorer", "Score 2000 points in a single game", "⭐"),
    // Streak achievements
    def(AchievementId::Streak3, "Triple", "Make 3 successful jumps in a row", "🔥"),
    def(AchievementId::Streak5, "Hot Streak", "Make 5 successful jumps in a row", "🔥"),
    def(AchievementId::Streak10, "Unstoppable", "Make 10 successful jumps in a row", "🚀"),
    def(AchievementId::Streak20, "Legendary", "Make 20 successful jumps in a row", "👑"),
    // Lifetime totals
    def(AchievementId::Survivor, "Survivor", "Make 10 successful jumps total", "🏆"),
    def(AchievementId::Veteran, "Veteran", "Make 50 successful jumps total", "🎖️"),
    def(AchievementId::Master, "Master", "Make 100 successful jumps total", "🏅"),
    def(AchievementId::Grandmaster, "Grandmaster", "Make 500 successful jumps total", "👑"),
    // Special achievements
    def(AchievementId::LuckyOne, "Lucky One", "Witness 5 explosions in a row", "🍀"),
    def(AchievementId::RiskTaker, "Risk Taker", "Make 10 last-second jumps", "🎲"),
    def(AchievementId::Conservative, "Conservative", "Make 10 late jumps", "🛡️"),
    def(AchievementId::Perfectionist, "Perfectionist", "Get perfect timing 5 times in a row", "💎"),
    // Milestones
    def(AchievementId::Milestone100, "Century Club", "Play 100 games total", "💯"),
    def(AchievementId::Milestone500, "Half Thousand Club", "Play 500 games total", "🎯"),
    def(AchievementId::Milestone1000, "Thousand Club", "Play 1000 games total", "🏆"),
];

/// Get all achievement definitions
pub fn all_achievements() -> &'static [Achievement] {
    &ACHIEVEMENTS
}

/// Display model: a definition merged with its unlock flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementView {
    pub id: AchievementId,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub unlocked: bool,
}

impl AchievementView {
    pub fn new(definition: &Achievement, unlocked: bool) -> Self {
        Self {
            id: definition.id,
            title: definition.title,
            description: definition.description,
            icon: definition.icon,
            unlocked,
        }
    }
}
