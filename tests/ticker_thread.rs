use lucky_jet::ticker::{Ticker, shared};
use lucky_jet::{GameConfig, GameEngine, GameState, RoundRng};
use save::MemoryStore;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn shared_engine(explosion: f64) -> lucky_jet::SharedEngine {
    let config = GameConfig {
        tick_millis: 100,
        default_explosion_range: (explosion, explosion),
        ..GameConfig::default()
    };
    shared(GameEngine::with_catalog(
        config,
        Box::new(MemoryStore::new()),
        RoundRng::new(9),
        Vec::new(),
    ))
}

#[test]
fn ticker_drives_round_to_explosion() {
    let engine = shared_engine(1.0);
    engine.lock().unwrap().start_game();

    let ticker = Ticker::spawn(Arc::clone(&engine), Duration::from_millis(1));
    assert_eq!(ticker.join(), 10);

    let engine = engine.lock().unwrap();
    assert_eq!(engine.state(), GameState::GameOver);
    assert_eq!(engine.flight_time(), 1.0);
    assert_eq!(engine.stats().total_explosions, 1);
    assert!(!engine.is_ticking());
}

#[test]
fn jump_from_another_thread_ends_round_once() {
    let engine = shared_engine(9.5);
    engine.lock().unwrap().start_game();
    let ticker = Ticker::spawn(Arc::clone(&engine), Duration::from_millis(1));

    let jumper = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            engine.lock().unwrap().jump();
        })
    };
    jumper.join().unwrap();
    ticker.join();

    let engine = engine.lock().unwrap();
    assert_eq!(engine.state(), GameState::GameOver);
    let stats = engine.stats();
    assert_eq!(stats.total_games, 1);
    // either the jump or the explosion ended the round, never both
    assert_eq!(stats.total_jumps + stats.total_explosions, 1);
    let ticks = engine.session().ticks();
    assert!(ticks <= 95);
}
