//! Builders shared by the integration tests.
//!
//! Every engine gets a seeded RNG and a level whose explosion range is
//! degenerate, so explosion times are pinned.

#![allow(dead_code)]

use error::GameError;
use levels::{Difficulty, Level};
use lucky_jet::{GameConfig, GameEngine, RoundRng};
use save::{MemoryStore, PersistentStore};

pub fn pinned_level(id: &str, difficulty: Difficulty, required_score: u32, explosion: f64, cap: f64) -> Level {
    Level::new(
        id,
        format!("Level {}", id),
        "test level",
        "🧪",
        difficulty,
        required_score,
        (explosion, explosion),
        cap,
    )
}

/// Engine over a single easy level exploding at `explosion`
pub fn engine_exploding_at(explosion: f64) -> GameEngine {
    engine_with(
        Box::new(MemoryStore::new()),
        vec![pinned_level("easy_1", Difficulty::Easy, 0, explosion, 10.0)],
    )
}

pub fn engine_with(store: Box<dyn PersistentStore>, catalog: Vec<Level>) -> GameEngine {
    GameEngine::with_catalog(GameConfig::default(), store, RoundRng::new(42), catalog)
}

pub fn fly(engine: &mut GameEngine, ticks: u32) {
    for _ in 0..ticks {
        engine.tick();
    }
}

/// Play a round that jumps after `ticks`
pub fn jump_after(engine: &mut GameEngine, ticks: u32) {
    engine.start_game();
    fly(engine, ticks);
    engine.jump();
}

/// Store whose writes always fail
#[derive(Debug, Default)]
pub struct FailingStore {
    pub reads: MemoryStore,
}

impl PersistentStore for FailingStore {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.reads.get_int(key)
    }

    fn set_int(&mut self, _key: &str, _value: i64) -> Result<(), GameError> {
        Err(GameError::Store(anyhow::anyhow!("disk full")))
    }

    fn get_float(&self, key: &str) -> Option<f64> {
        self.reads.get_float(key)
    }

    fn set_float(&mut self, _key: &str, _value: f64) -> Result<(), GameError> {
        Err(GameError::Store(anyhow::anyhow!("disk full")))
    }

    fn get_blob(&self, key: &str) -> Option<Vec<u8>> {
        self.reads.get_blob(key)
    }

    fn set_blob(&mut self, _key: &str, _value: Vec<u8>) -> Result<(), GameError> {
        Err(GameError::Store(anyhow::anyhow!("disk full")))
    }

    fn synchronize(&mut self) -> Result<(), GameError> {
        Err(GameError::Store(anyhow::anyhow!("disk full")))
    }
}
