//! Level progression
//!
//! Levels unlock once the lifetime best score reaches their requirement and
//! never lock again. The lowest-ranked level is always unlocked.

pub mod level;

pub use level::{Difficulty, Level, LevelView, all_levels};

use save::{PersistentStore, keys, load_json, save_json};
use std::collections::BTreeSet;

/// Tracks which levels of a catalog are unlocked
#[derive(Debug, Clone)]
pub struct LevelProgression {
    catalog: Vec<Level>,
    unlocked: BTreeSet<String>,
    newly_unlocked: Vec<String>,
}

impl LevelProgression {
    /// Fresh progression over `catalog` with only the starting level unlocked
    pub fn new(catalog: Vec<Level>) -> Self {
        let mut progression = Self {
            catalog,
            unlocked: BTreeSet::new(),
            newly_unlocked: Vec::new(),
        };
        progression.seed_starting_level();
        progression
    }

    /// Load unlocked level ids from the store. Ids that are not in the
    /// catalog are dropped with a warning.
    pub fn load(catalog: Vec<Level>, store: &dyn PersistentStore) -> Self {
        let mut progression = Self::new(catalog);
        match load_json::<BTreeSet<String>>(store, keys::UNLOCKED_LEVELS) {
            Ok(Some(ids)) => {
                for id in ids {
                    if progression.get(&id).is_some() {
                        progression.unlocked.insert(id);
                    } else {
                        log::warn!("skipping unknown level id {:?}", id);
                    }
                }
            }
            Ok(None) => {}
            Err(e) => log::warn!("failed to load unlocked levels: {}", e),
        }
        progression
    }

    fn seed_starting_level(&mut self) {
        if let Some(first) = self.catalog.iter().min_by_key(|level| level.rank()) {
            self.unlocked.insert(first.id.clone());
        }
    }

    pub fn catalog(&self) -> &[Level] {
        &self.catalog
    }

    pub fn get(&self, id: &str) -> Option<&Level> {
        self.catalog.iter().find(|level| level.id == id)
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    /// Number of unlocked levels in one tier
    pub fn unlocked_count_by_difficulty(&self, difficulty: Difficulty) -> usize {
        self.catalog
            .iter()
            .filter(|level| level.difficulty == difficulty && self.is_unlocked(&level.id))
            .count()
    }

    /// Catalog merged with unlock state, in catalog order
    pub fn levels(&self) -> Vec<LevelView<'_>> {
        self.catalog
            .iter()
            .map(|level| LevelView {
                level,
                unlocked: self.is_unlocked(&level.id),
            })
            .collect()
    }

    /// Get newly unlocked level ids since last check and clear the list
    pub fn drain_newly_unlocked(&mut self) -> Vec<String> {
        std::mem::take(&mut self.newly_unlocked)
    }

    /// Unlock a level. Returns false for unknown or already unlocked ids.
    pub fn unlock(&mut self, id: &str, store: &mut dyn PersistentStore) -> bool {
        if self.get(id).is_none() || !self.unlocked.insert(id.to_string()) {
            return false;
        }
        log::debug!("level unlocked: {}", id);
        self.newly_unlocked.push(id.to_string());
        let result = save_json(store, keys::UNLOCKED_LEVELS, &self.unlocked).and_then(|_| store.synchronize());
        if let Err(e) = result {
            log::warn!("failed to persist unlocked levels: {}", e);
        }
        true
    }

    /// Unlock every level whose requirement `best_score` meets, in catalog order
    pub fn check_level_unlocks(&mut self, best_score: u32, store: &mut dyn PersistentStore) -> Vec<String> {
        let ready: Vec<String> = self
            .catalog
            .iter()
            .filter(|level| !self.unlocked.contains(&level.id) && best_score >= level.required_score)
            .map(|level| level.id.clone())
            .collect();

        ready.into_iter().filter(|id| self.unlock(id, store)).collect()
    }

    /// The unlocked level with the highest tier; ties go to the higher requirement
    pub fn max_unlocked_level(&self) -> Option<&Level> {
        self.catalog
            .iter()
            .filter(|level| self.is_unlocked(&level.id))
            .max_by_key(|level| level.rank())
    }
}

impl Default for LevelProgression {
    fn default() -> Self {
        Self::new(all_levels())
    }
}
