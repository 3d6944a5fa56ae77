//! 周期性计时驱动
//!
//! 后台线程按固定周期调用 [`GameEngine::tick`]。每次都在锁内检查
//! `is_ticking()`，回合结束后线程自然退出，不会出现回合结束后的多余 tick。

use crate::engine::GameEngine;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Engine handle shared between the UI thread and the ticker
pub type SharedEngine = Arc<Mutex<GameEngine>>;

pub fn shared(engine: GameEngine) -> SharedEngine {
    Arc::new(Mutex::new(engine))
}

pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<u32>>,
}

impl Ticker {
    /// Spawn a ticker for the round currently in progress
    pub fn spawn(engine: SharedEngine, period: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            let mut ticks = 0u32;
            loop {
                thread::sleep(period);
                if stop_flag.load(Ordering::Acquire) {
                    break;
                }
                let mut engine = match engine.lock() {
                    Ok(engine) => engine,
                    Err(_) => {
                        log::warn!("engine lock poisoned, ticker exiting");
                        break;
                    }
                };
                if !engine.is_ticking() {
                    break;
                }
                engine.tick();
                ticks += 1;
            }
            log::debug!("ticker stopped after {} ticks", ticks);
            ticks
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Signal the thread and wait for it
    pub fn stop(mut self) -> u32 {
        self.stop.store(true, Ordering::Release);
        self.wait()
    }

    /// Wait for the round to end on its own. Returns the number of ticks run.
    pub fn join(mut self) -> u32 {
        self.wait()
    }

    fn wait(&mut self) -> u32 {
        match self.handle.take().map(JoinHandle::join) {
            Some(Ok(ticks)) => ticks,
            Some(Err(_)) => {
                log::warn!("ticker thread panicked");
                0
            }
            None => 0,
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        self.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::rng::RoundRng;
    use crate::session::GameState;
    use save::MemoryStore;

    fn engine(range: (f64, f64)) -> SharedEngine {
        let config = GameConfig {
            default_explosion_range: range,
            ..GameConfig::default()
        };
        shared(GameEngine::with_catalog(
            config,
            Box::new(MemoryStore::new()),
            RoundRng::new(3),
            Vec::new(),
        ))
    }

    #[test]
    fn runs_until_explosion() {
        let engine = engine((0.5, 0.5));
        engine.lock().unwrap().start_game();

        let ticker = Ticker::spawn(Arc::clone(&engine), Duration::from_millis(1));
        assert_eq!(ticker.join(), 5);

        let engine = engine.lock().unwrap();
        assert_eq!(engine.state(), GameState::GameOver);
        assert_eq!(engine.flight_time(), 0.5);
    }

    #[test]
    fn exits_immediately_without_round() {
        let engine = engine((5.0, 10.0));
        let ticker = Ticker::spawn(engine, Duration::from_millis(1));
        assert_eq!(ticker.join(), 0);
    }

    #[test]
    fn stop_halts_a_running_round() {
        let engine = engine((9.0, 9.0));
        engine.lock().unwrap().start_game();

        let ticker = Ticker::spawn(Arc::clone(&engine), Duration::from_millis(1));
        thread::sleep(Duration::from_millis(5));
        let ticks = ticker.stop();

        let engine = engine.lock().unwrap();
        assert!(ticks < 90);
        assert_eq!(engine.state(), GameState::Playing);
    }
}
