pub mod app;
pub mod config;
pub mod constants;
pub mod engine;
pub mod event_bus;
pub mod input;
pub mod render;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod ticker;

pub use config::GameConfig;
pub use engine::GameEngine;
pub use event_bus::{EventBus, EventHandler, GameEvent};
pub use rng::RoundRng;
pub use session::{GameState, RoundOutcome, SessionState};
pub use ticker::{SharedEngine, Ticker};
