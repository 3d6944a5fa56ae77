//! Bounded high-score table
//!
//! Entries are kept sorted by score, highest first, and the list never grows
//! past its capacity. The list is persisted whole after every accepted entry.

use error::GameError;
use save::{PersistentStore, keys, load_json, save_json};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Default number of retained entries
pub const DEFAULT_CAPACITY: usize = 10;

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub id: u64,
    pub player_name: String,
    pub score: u32,
    pub flight_time: f64,
    pub level_title: String,
    pub timestamp: SystemTime,
}

/// Top-N list of high scores
#[derive(Debug, Clone)]
pub struct Leaderboard {
    entries: Vec<HighScoreEntry>,
    capacity: usize,
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Load the stored list. Missing data is an empty board; an unreadable
    /// blob is logged and treated the same way.
    pub fn load(store: &dyn PersistentStore, capacity: usize) -> Self {
        let mut board = Self::new(capacity);
        match load_json::<Vec<HighScoreEntry>>(store, keys::HIGH_SCORES) {
            Ok(Some(entries)) => {
                board.entries = entries;
                board.normalize();
            }
            Ok(None) => {}
            Err(e) => log::warn!("failed to load high scores: {}", e),
        }
        board
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lowest retained score, if any
    pub fn lowest_score(&self) -> Option<u32> {
        self.entries.last().map(|entry| entry.score)
    }

    /// Whether `score` would make the board
    pub fn is_top_ten(&self, score: u32) -> bool {
        if self.entries.len() < self.capacity {
            return true;
        }
        self.lowest_score().is_none_or(|lowest| score > lowest)
    }

    /// Insert a score, keeping the board sorted and bounded.
    ///
    /// Returns the 1-based rank of the new entry, or `None` if it was cut by
    /// truncation. A blank name is rejected with [`GameError::EmptyPlayerName`]
    /// and leaves the board untouched.
    pub fn add_entry(
        &mut self,
        player_name: &str,
        score: u32,
        flight_time: f64,
        level_title: &str,
        store: &mut dyn PersistentStore,
    ) -> Result<Option<usize>, GameError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(GameError::EmptyPlayerName);
        }

        let id = self.next_id();
        self.entries.push(HighScoreEntry {
            id,
            player_name: player_name.to_string(),
            score,
            flight_time: flight_time.max(0.0),
            level_title: level_title.to_string(),
            timestamp: SystemTime::now(),
        });
        self.normalize();

        let rank = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .map(|index| index + 1);
        if let Some(rank) = rank {
            log::info!("high score {} by {} placed #{}", score, player_name, rank);
        }

        self.persist(store);
        Ok(rank)
    }

    fn next_id(&self) -> u64 {
        self.entries.iter().map(|entry| entry.id).max().map_or(1, |max| max + 1)
    }

    // Stable sort: equal scores keep insertion order, so older entries rank first.
    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(self.capacity);
    }

    fn persist(&self, store: &mut dyn PersistentStore) {
        let result = save_json(store, keys::HIGH_SCORES, &self.entries).and_then(|_| store.synchronize());
        if let Err(e) = result {
            log::warn!("failed to persist high scores: {}", e);
        }
    }
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use save::MemoryStore;

    fn scores(board: &Leaderboard) -> Vec<u32> {
        board.entries().iter().map(|e| e.score).collect()
    }

    #[test]
    fn empty_board_accepts_anything() {
        let board = Leaderboard::default();
        assert!(board.is_top_ten(1));
        assert!(board.is_top_ten(0));
    }

    #[test]
    fn blank_name_is_rejected_without_mutation() {
        let mut store = MemoryStore::new();
        let mut board = Leaderboard::default();

        let result = board.add_entry("", 500, 3.0, "Easy 1", &mut store);
        assert!(matches!(result, Err(GameError::EmptyPlayerName)));
        let result = board.add_entry("   \t ", 500, 3.0, "Easy 1", &mut store);
        assert!(matches!(result, Err(GameError::EmptyPlayerName)));

        assert!(board.is_empty());
        assert!(store.get_blob(keys::HIGH_SCORES).is_none());
    }

    #[test]
    fn name_is_trimmed_and_rank_returned() {
        let mut store = MemoryStore::new();
        let mut board = Leaderboard::default();
        assert_eq!(board.add_entry("  Ada ", 60, 6.0, "Easy 1", &mut store).unwrap(), Some(1));
        assert_eq!(board.add_entry("Lin", 190, 9.0, "Easy 2", &mut store).unwrap(), Some(1));
        assert_eq!(board.add_entry("Kai", 60, 6.0, "Easy 1", &mut store).unwrap(), Some(3));

        let names: Vec<&str> = board.entries().iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["Lin", "Ada", "Kai"]);
    }

    #[test]
    fn full_board_requires_beating_the_lowest() {
        let mut store = MemoryStore::new();
        let mut board = Leaderboard::default();
        for score in 1..=10 {
            board.add_entry("p", score * 10, 1.0, "Easy 1", &mut store).unwrap();
        }
        assert_eq!(board.len(), 10);
        assert!(!board.is_top_ten(10));
        assert!(board.is_top_ten(11));

        // Equal to the lowest is cut by truncation
        assert_eq!(board.add_entry("late", 10, 1.0, "Easy 1", &mut store).unwrap(), None);
        assert_eq!(board.add_entry("new", 55, 5.5, "Easy 1", &mut store).unwrap(), Some(6));
        assert_eq!(board.len(), 10);
        assert_eq!(board.lowest_score(), Some(20));
    }

    #[test]
    fn stored_list_reloads_in_order() {
        let mut store = MemoryStore::new();
        let mut board = Leaderboard::default();
        board.add_entry("a", 30, 3.0, "Easy 1", &mut store).unwrap();
        board.add_entry("b", 150, 8.5, "Medium 2", &mut store).unwrap();

        let reloaded = Leaderboard::load(&store, DEFAULT_CAPACITY);
        assert_eq!(reloaded.entries(), board.entries());
        assert_eq!(scores(&reloaded), vec![150, 30]);
    }

    #[test]
    fn oversized_stored_list_is_truncated_on_load() {
        let mut store = MemoryStore::new();
        let mut board = Leaderboard::new(20);
        for score in 0..15 {
            board.add_entry("p", score, 0.5, "Easy 1", &mut store).unwrap();
        }
        let reloaded = Leaderboard::load(&store, DEFAULT_CAPACITY);
        assert_eq!(reloaded.len(), 10);
        assert_eq!(reloaded.lowest_score(), Some(5));
    }

    proptest! {
        #[test]
        fn board_stays_sorted_and_bounded(
            inserts in proptest::collection::vec((0u32..1000, "[a-z ]{0,6}"), 0..40)
        ) {
            let mut store = MemoryStore::new();
            let mut board = Leaderboard::default();
            for (score, name) in &inserts {
                let before = board.len();
                match board.add_entry(name, *score, 1.0, "Easy 1", &mut store) {
                    Ok(_) => prop_assert!(board.len() >= before.min(DEFAULT_CAPACITY)),
                    Err(GameError::EmptyPlayerName) => {
                        prop_assert!(name.trim().is_empty());
                        prop_assert_eq!(board.len(), before);
                    }
                    Err(e) => prop_assert!(false, "unexpected error {}", e),
                }
                prop_assert!(board.len() <= DEFAULT_CAPACITY);
                let s = scores(&board);
                prop_assert!(s.windows(2).all(|w| w[0] >= w[1]));
            }

            let reloaded = Leaderboard::load(&store, DEFAULT_CAPACITY);
            prop_assert_eq!(scores(&reloaded), scores(&board));
        }
    }
}
