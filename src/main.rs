use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use lucky_jet::{
    GameConfig, GameEngine,
    app::App,
    constants::DEFAULT_CONFIG_PATH,
    input::{ConsoleInput, key_to_action},
    render, ticker,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use save::FileStore;
use scopeguard::defer;
use std::{io, time::Duration};

const FRAME_TIMEOUT: Duration = Duration::from_millis(33);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match GameConfig::load(DEFAULT_CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{}; using default settings", e);
            GameConfig::default()
        }
    };

    let store = match FileStore::open(&config.store_path) {
        Ok(store) => store,
        Err(e) => {
            log::warn!("{}; starting with an empty save", error::handle_error(&e));
            FileStore::empty(&config.store_path)
        }
    };

    let engine = ticker::shared(GameEngine::new(config, Box::new(store)));
    let mut app = App::new(engine);

    enable_raw_mode().context("Failed to enable raw mode")?;
    defer! {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
    execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    let mut input = ConsoleInput::new();

    while !app.should_quit() {
        terminal
            .draw(|frame| {
                let engine = app.engine();
                render::draw(frame, &app, &engine);
            })
            .context("Failed to draw frame")?;

        if let Some(key) = input.poll(FRAME_TIMEOUT)? {
            if let Some(action) = key_to_action(key, app.input_context()) {
                app.handle(action);
            }
        }
        // 计时线程结束回合时产生的事件
        app.pump_events();
    }

    Ok(())
}
