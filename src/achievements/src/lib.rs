//! Achievements tracking system
//!
//! Holds the unlocked-id set and the lifetime counters, and evaluates the
//! unlock predicates after every round. The unlocked set is the only unlock
//! state that is persisted; definitions stay immutable in [`ACHIEVEMENTS`].

pub mod achievement;
pub mod stats;


pub use achievement::{ACHIEVEMENTS, Achievement, AchievementId, AchievementView, all_achievements};
pub use stats::{LifetimeStats, StreakCounters};

use save::{PersistentStore, keys, load_json, save_json};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Success-streak thresholds, checked after every successful jump
const STREAK_RULES: [(u32, AchievementId); 4] = [
    (3, AchievementId::Streak3),
    (5, AchievementId::Streak5),
    (10, AchievementId::Streak10),
    (20, AchievementId::Streak20),
];

type Predicate = fn(&LifetimeStats) -> bool;

/// Threshold predicates re-evaluated against lifetime stats after every round
const THRESHOLD_RULES: [(AchievementId, Predicate); 23] = [
    (AchievementId::FirstJump, |s| s.total_jumps >= 1),
    (AchievementId::FirstSuccess, |s| s.total_successful_jumps >= 1),
    (AchievementId::FirstExplosion, |s| s.total_explosions >= 1),
    (AchievementId::Astronaut, |s| s.longest_flight >= 8.0),
    (AchievementId::SpaceExplorer, |s| s.longest_flight >= 9.0),
    (AchievementId::CosmicTraveler, |s| s.longest_flight >= 9.5),
    (AchievementId::TimeMaster, |s| s.longest_flight >= 10.0),
    (AchievementId::ShortFlight, |s| s.longest_flight > 0.0 && s.longest_flight <= 3.0),
    (AchievementId::Score100, |s| s.best_score >= 100),
    (AchievementId::Score500, |s| s.best_score >= 500),
    (AchievementId::Score1000, |s| s.best_score >= 1000),
    (AchievementId::HighScorer, |s| s.best_score >= 2000),
    (AchievementId::Survivor, |s| s.total_successful_jumps >= 10),
    (AchievementId::Veteran, |s| s.total_successful_jumps >= 50),
    (AchievementId::Master, |s| s.total_successful_jumps >= 100),
    (AchievementId::Grandmaster, |s| s.total_successful_jumps >= 500),
    (AchievementId::LuckyOne, |s| s.consecutive_explosions >= 5),
    (AchievementId::RiskTaker, |s| s.last_second_jumps >= 10),
    (AchievementId::Conservative, |s| s.late_jumps >= 10),
    (AchievementId::Perfectionist, |s| s.consecutive_perfect_timing >= 5),
    (AchievementId::Milestone100, |s| s.total_games >= 100),
    (AchievementId::Milestone500, |s| s.total_games >= 500),
    (AchievementId::Milestone1000, |s| s.total_games >= 1000),
];

/// The main achievements engine that tracks progress and unlocks
#[derive(Debug, Clone, Default)]
pub struct AchievementEngine {
    unlocked: BTreeSet<AchievementId>,
    stats: LifetimeStats,
    streaks: StreakCounters,
    /// Newly unlocked achievements (for notifications)
    newly_unlocked: Vec<AchievementId>,
}

impl AchievementEngine {
    /// Create an engine with nothing unlocked and zeroed stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Load unlocked ids and lifetime stats from the store.
    ///
    /// Missing data means a fresh profile. Unknown ids and an unreadable
    /// blob are logged and skipped.
    pub fn load(store: &dyn PersistentStore) -> Self {
        let mut unlocked = BTreeSet::new();
        match load_json::<BTreeSet<String>>(store, keys::UNLOCKED_ACHIEVEMENTS) {
            Ok(Some(ids)) => {
                for key in ids {
                    match AchievementId::from_str(&key) {
                        Ok(id) => {
                            unlocked.insert(id);
                        }
                        Err(_) => log::warn!("skipping unknown achievement id {:?}", key),
                    }
                }
            }
            Ok(None) => {}
            Err(e) => log::warn!("failed to load unlocked achievements: {}", e),
        }

        Self {
            unlocked,
            stats: LifetimeStats::load(store),
            streaks: StreakCounters::default(),
            newly_unlocked: Vec::new(),
        }
    }

    pub fn stats(&self) -> &LifetimeStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut LifetimeStats {
        &mut self.stats
    }

    pub fn streaks(&self) -> StreakCounters {
        self.streaks
    }

    /// Check if an achievement is unlocked
    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.unlocked.contains(&id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    /// Get unlock percentage (0.0 to 1.0)
    pub fn unlock_percentage(&self) -> f32 {
        let total = ACHIEVEMENTS.len();
        if total == 0 {
            return 0.0;
        }
        self.unlocked.len() as f32 / total as f32
    }

    /// Catalog merged with unlock state, in catalog order
    pub fn achievements(&self) -> Vec<AchievementView> {
        ACHIEVEMENTS
            .iter()
            .map(|def| AchievementView::new(def, self.is_unlocked(def.id)))
            .collect()
    }

    /// Get newly unlocked achievements since last check and clear the list
    pub fn drain_newly_unlocked(&mut self) -> Vec<AchievementId> {
        std::mem::take(&mut self.newly_unlocked)
    }

    /// Unlock an achievement. Returns false if it was already unlocked.
    ///
    /// The whole set is re-serialized on every change. A failed write is
    /// logged; the in-memory unlock stands.
    pub fn unlock(&mut self, id: AchievementId, store: &mut dyn PersistentStore) -> bool {
        if !self.unlocked.insert(id) {
            return false;
        }
        log::debug!("achievement unlocked: {}", id);
        self.newly_unlocked.push(id);
        self.persist_unlocked(store);
        true
    }

    fn persist_unlocked(&self, store: &mut dyn PersistentStore) {
        let ids: BTreeSet<&'static str> = self.unlocked.iter().map(|id| id.key()).collect();
        let result = save_json(store, keys::UNLOCKED_ACHIEVEMENTS, &ids).and_then(|_| store.synchronize());
        if let Err(e) = result {
            log::warn!("failed to persist unlocked achievements: {}", e);
        }
    }

    /// Evaluate the per-jump predicates. Call once per completed jump,
    /// before [`check_achievements`](Self::check_achievements).
    ///
    /// Counters bumped here are persisted by the caller with the rest of the
    /// lifetime stats. Unlocks are reported through
    /// [`drain_newly_unlocked`](Self::drain_newly_unlocked).
    pub fn check_jump_achievements(
        &mut self,
        flight_time: f64,
        explosion_time: f64,
        is_success: bool,
        store: &mut dyn PersistentStore,
    ) {
        if is_success {
            self.stats.total_successful_jumps = self.stats.total_successful_jumps.saturating_add(1);
        }

        // Timing
        if flight_time >= explosion_time - 1.0 && self.unlock(AchievementId::QuickReflex, store) {
            self.stats.last_second_jumps = self.stats.last_second_jumps.saturating_add(1);
        }

        // The perfect-timing streak only grows on the first unlock and is
        // reset by every other jump.
        if (flight_time - explosion_time).abs() <= 0.5 && !self.is_unlocked(AchievementId::PerfectTiming) {
            self.unlock(AchievementId::PerfectTiming, store);
            self.stats.perfect_timing_count = self.stats.perfect_timing_count.saturating_add(1);
            self.stats.consecutive_perfect_timing = self.stats.consecutive_perfect_timing.saturating_add(1);
        } else {
            self.stats.consecutive_perfect_timing = 0;
        }

        if flight_time <= 1.0 && self.unlock(AchievementId::SpeedDemon, store) {
            self.stats.early_jumps = self.stats.early_jumps.saturating_add(1);
        }

        if flight_time >= 7.0 && self.unlock(AchievementId::Patience, store) {
            self.stats.late_jumps = self.stats.late_jumps.saturating_add(1);
        }

        if flight_time >= explosion_time - 0.2 {
            self.unlock(AchievementId::LastMoment, store);
        }

        if flight_time <= 2.0 {
            self.unlock(AchievementId::EarlyBird, store);
        }

        // Streaks
        if is_success {
            self.streaks.consecutive_successful_jumps =
                self.streaks.consecutive_successful_jumps.saturating_add(1);
            let streak = self.streaks.consecutive_successful_jumps;
            for (threshold, id) in STREAK_RULES {
                if streak >= threshold {
                    self.unlock(id, store);
                }
            }
        } else {
            self.streaks.consecutive_successful_jumps = 0;
        }
    }

    /// Re-evaluate every threshold predicate against the lifetime stats.
    /// Safe to call repeatedly; already unlocked ids are skipped.
    pub fn check_achievements(&mut self, store: &mut dyn PersistentStore) {
        for (id, predicate) in THRESHOLD_RULES {
            if predicate(&self.stats) {
                self.unlock(id, store);
            }
        }
    }

    /// Break the success streak (round ended in an explosion)
    pub fn break_success_streak(&mut self) {
        self.streaks.consecutive_successful_jumps = 0;
    }

    /// Persist lifetime stats, logging instead of failing
    pub fn persist_stats(&self, store: &mut dyn PersistentStore) {
        if let Err(e) = self.stats.persist(store) {
            log::warn!("failed to persist statistics: {}", e);
        }
    }

    /// Zero the lifetime counters. Unlocked achievements are kept.
    pub fn reset_statistics(&mut self, store: &mut dyn PersistentStore) {
        self.stats.reset();
        self.streaks = StreakCounters::default();
        self.persist_stats(store);
    }
}
