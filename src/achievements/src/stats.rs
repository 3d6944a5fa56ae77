//! Lifetime statistics feeding the achievement predicates

use error::GameError;
use save::{PersistentStore, keys, load_counter};
use serde::{Deserialize, Serialize};

/// Aggregate counters persisted across sessions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifetimeStats {
    pub total_jumps: u32,
    pub longest_flight: f64,
    pub best_score: u32,
    pub total_games: u32,
    pub total_successful_jumps: u32,
    pub total_explosions: u32,
    pub perfect_timing_count: u32,
    pub last_second_jumps: u32,
    pub early_jumps: u32,
    pub late_jumps: u32,
    pub consecutive_explosions: u32,
    pub consecutive_perfect_timing: u32,
}

impl LifetimeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load all counters; absent keys read as zero
    pub fn load(store: &dyn PersistentStore) -> Self {
        Self {
            total_jumps: load_counter(store, keys::TOTAL_JUMPS),
            longest_flight: store
                .get_float(keys::LONGEST_FLIGHT)
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(0.0),
            best_score: load_counter(store, keys::BEST_SCORE),
            total_games: load_counter(store, keys::TOTAL_GAMES),
            total_successful_jumps: load_counter(store, keys::TOTAL_SUCCESSFUL_JUMPS),
            total_explosions: load_counter(store, keys::TOTAL_EXPLOSIONS),
            perfect_timing_count: load_counter(store, keys::PERFECT_TIMING_COUNT),
            last_second_jumps: load_counter(store, keys::LAST_SECOND_JUMPS),
            early_jumps: load_counter(store, keys::EARLY_JUMPS),
            late_jumps: load_counter(store, keys::LATE_JUMPS),
            consecutive_explosions: load_counter(store, keys::CONSECUTIVE_EXPLOSIONS),
            consecutive_perfect_timing: load_counter(store, keys::CONSECUTIVE_PERFECT_TIMING),
        }
    }

    /// Write every counter and synchronize the store.
    ///
    /// A failed write does not stop the ones after it; the first error is
    /// returned once every key has been attempted.
    pub fn persist(&self, store: &mut dyn PersistentStore) -> Result<(), GameError> {
        let counters = [
            (keys::TOTAL_JUMPS, self.total_jumps),
            (keys::BEST_SCORE, self.best_score),
            (keys::TOTAL_GAMES, self.total_games),
            (keys::TOTAL_SUCCESSFUL_JUMPS, self.total_successful_jumps),
            (keys::TOTAL_EXPLOSIONS, self.total_explosions),
            (keys::PERFECT_TIMING_COUNT, self.perfect_timing_count),
            (keys::LAST_SECOND_JUMPS, self.last_second_jumps),
            (keys::EARLY_JUMPS, self.early_jumps),
            (keys::LATE_JUMPS, self.late_jumps),
            (keys::CONSECUTIVE_EXPLOSIONS, self.consecutive_explosions),
            (keys::CONSECUTIVE_PERFECT_TIMING, self.consecutive_perfect_timing),
        ];
        let mut first_err = None;
        for (key, value) in counters {
            if let Err(e) = store.set_int(key, i64::from(value)) {
                first_err.get_or_insert(e);
            }
        }
        if let Err(e) = store.set_float(keys::LONGEST_FLIGHT, self.longest_flight) {
            first_err.get_or_insert(e);
        }
        if let Err(e) = store.synchronize() {
            first_err.get_or_insert(e);
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Count a started round
    pub fn add_game(&mut self) {
        self.total_games = self.total_games.saturating_add(1);
    }

    /// Count a jump
    pub fn add_jump(&mut self) {
        self.total_jumps = self.total_jumps.saturating_add(1);
    }

    /// Raise the longest flight; returns true when it was exceeded
    pub fn record_flight(&mut self, flight_time: f64) -> bool {
        if flight_time > self.longest_flight {
            self.longest_flight = flight_time;
            true
        } else {
            false
        }
    }

    /// Raise the best score; returns true when it was exceeded
    pub fn record_score(&mut self, score: u32) -> bool {
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }

    /// Round ended without a jump
    pub fn record_explosion(&mut self) {
        self.total_explosions = self.total_explosions.saturating_add(1);
        self.consecutive_explosions = self.consecutive_explosions.saturating_add(1);
        self.consecutive_perfect_timing = 0;
    }

    /// Reset all counters
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Streak counters kept only in process memory.
///
/// These are deliberately absent from [`LifetimeStats::persist`]; a restart
/// starts every streak from zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakCounters {
    pub consecutive_successful_jumps: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use save::MemoryStore;

    #[test]
    fn test_empty_store_loads_defaults() {
        let store = MemoryStore::new();
        assert_eq!(LifetimeStats::load(&store), LifetimeStats::default());
    }

    #[test]
    fn test_persist_then_load() {
        let mut stats = LifetimeStats::new();
        stats.add_game();
        stats.add_jump();
        stats.record_flight(6.5);
        stats.record_score(165);
        stats.late_jumps = 4;
        stats.consecutive_perfect_timing = 1;

        let mut store = MemoryStore::new();
        stats.persist(&mut store).unwrap();

        assert_eq!(store.get_int(keys::TOTAL_GAMES), Some(1));
        assert_eq!(store.get_float(keys::LONGEST_FLIGHT), Some(6.5));
        assert_eq!(LifetimeStats::load(&store), stats);
    }

    /// Memory store that refuses writes to a single key
    struct RejectingStore {
        inner: MemoryStore,
        rejected: &'static str,
    }

    impl PersistentStore for RejectingStore {
        fn get_int(&self, key: &str) -> Option<i64> {
            self.inner.get_int(key)
        }

        fn set_int(&mut self, key: &str, value: i64) -> Result<(), GameError> {
            if key == self.rejected {
                return Err(GameError::CorruptedStore);
            }
            self.inner.set_int(key, value)
        }

        fn get_float(&self, key: &str) -> Option<f64> {
            self.inner.get_float(key)
        }

        fn set_float(&mut self, key: &str, value: f64) -> Result<(), GameError> {
            self.inner.set_float(key, value)
        }

        fn get_blob(&self, key: &str) -> Option<Vec<u8>> {
            self.inner.get_blob(key)
        }

        fn set_blob(&mut self, key: &str, value: Vec<u8>) -> Result<(), GameError> {
            self.inner.set_blob(key, value)
        }

        fn synchronize(&mut self) -> Result<(), GameError> {
            self.inner.synchronize()
        }
    }

    #[test]
    fn test_failed_write_still_persists_other_counters() {
        let mut stats = LifetimeStats::new();
        stats.add_jump();
        stats.late_jumps = 2;
        stats.record_flight(7.5);

        let mut store = RejectingStore {
            inner: MemoryStore::new(),
            rejected: keys::TOTAL_JUMPS,
        };
        let result = stats.persist(&mut store);

        assert!(matches!(result, Err(GameError::CorruptedStore)));
        assert_eq!(store.get_int(keys::TOTAL_JUMPS), None);
        assert_eq!(store.get_int(keys::LATE_JUMPS), Some(2));
        assert_eq!(store.get_int(keys::CONSECUTIVE_PERFECT_TIMING), Some(0));
        assert_eq!(store.get_float(keys::LONGEST_FLIGHT), Some(7.5));
    }

    #[test]
    fn test_bests_only_increase() {
        let mut stats = LifetimeStats::new();
        assert!(stats.record_flight(4.0));
        assert!(!stats.record_flight(3.0));
        assert_eq!(stats.longest_flight, 4.0);

        assert!(stats.record_score(40));
        assert!(!stats.record_score(40));
        assert_eq!(stats.best_score, 40);
    }

    #[test]
    fn test_explosion_breaks_perfect_streak() {
        let mut stats = LifetimeStats::new();
        stats.consecutive_perfect_timing = 3;
        stats.record_explosion();
        stats.record_explosion();
        assert_eq!(stats.total_explosions, 2);
        assert_eq!(stats.consecutive_explosions, 2);
        assert_eq!(stats.consecutive_perfect_timing, 0);
    }

    #[test]
    fn test_saturating_arithmetic() {
        let mut stats = LifetimeStats::new();
        stats.total_jumps = u32::MAX;
        stats.add_jump();
        assert_eq!(stats.total_jumps, u32::MAX);
    }

    #[test]
    fn test_negative_flight_in_store_is_ignored() {
        let mut store = MemoryStore::new();
        store.set_float(keys::LONGEST_FLIGHT, -2.0).unwrap();
        assert_eq!(LifetimeStats::load(&store).longest_flight, 0.0);
    }
}
