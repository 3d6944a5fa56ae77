//! 终端前端状态
//!
//! `App` 持有共享引擎和计时线程，负责把 [`Action`] 转换为引擎调用，
//! 并把引擎事件转换为提示消息。绘制见 [`render`](crate::render)。

use crate::engine::GameEngine;
use crate::event_bus::GameEvent;
use crate::input::{Action, InputContext, Overlay};
use crate::ticker::{SharedEngine, Ticker};
use std::collections::VecDeque;
use std::sync::{MutexGuard, PoisonError};

const MAX_TOASTS: usize = 4;
const MAX_NAME_LEN: usize = 20;

pub struct App {
    engine: SharedEngine,
    ticker: Option<Ticker>,
    pub overlay: Overlay,
    pub level_cursor: usize,
    /// Name being typed for the leaderboard
    pub name_input: Option<String>,
    pub score_saved: bool,
    /// One-line status shown under the screen
    pub message: Option<String>,
    toasts: VecDeque<String>,
    should_quit: bool,
}

impl App {
    pub fn new(engine: SharedEngine) -> Self {
        Self {
            engine,
            ticker: None,
            overlay: Overlay::None,
            level_cursor: 0,
            name_input: None,
            score_saved: false,
            message: None,
            toasts: VecDeque::new(),
            should_quit: false,
        }
    }

    /// Lock the engine. A poisoned lock is recovered; engine state is
    /// consistent between calls.
    pub fn engine(&self) -> MutexGuard<'_, GameEngine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn toasts(&self) -> impl Iterator<Item = &str> {
        self.toasts.iter().map(String::as_str)
    }

    pub fn input_context(&self) -> InputContext {
        InputContext {
            state: self.engine().state(),
            overlay: self.overlay,
            editing_name: self.name_input.is_some(),
        }
    }

    pub fn handle(&mut self, action: Action) {
        match action {
            Action::Launch | Action::PlayAgain => {
                self.stop_ticker();
                self.engine().start_game();
                self.spawn_ticker_if_needed();
            }
            Action::Jump => self.engine().jump(),
            Action::OpenLevels => {
                self.level_cursor = 0;
                self.engine().open_level_selection();
            }
            Action::CloseLevels => self.engine().close_level_selection(),
            Action::CursorUp => self.level_cursor = self.level_cursor.saturating_sub(1),
            Action::CursorDown => {
                let count = self.engine().levels().catalog().len();
                if self.level_cursor + 1 < count {
                    self.level_cursor += 1;
                }
            }
            Action::SelectLevel => self.select_level(),
            Action::BackToMenu => {
                self.stop_ticker();
                self.name_input = None;
                self.engine().reset_game();
            }
            Action::SaveScore => {
                if !self.score_saved && self.engine().qualifies_for_leaderboard() {
                    self.name_input = Some(String::new());
                }
            }
            Action::TypeChar(c) => {
                if let Some(name) = self.name_input.as_mut() {
                    if name.chars().count() < MAX_NAME_LEN && !c.is_control() {
                        name.push(c);
                    }
                }
            }
            Action::DeleteChar => {
                if let Some(name) = self.name_input.as_mut() {
                    name.pop();
                }
            }
            Action::SubmitName => self.submit_name(),
            Action::CancelName => self.name_input = None,
            Action::ShowAchievements => self.overlay = Overlay::Achievements,
            Action::ShowLeaderboard => self.overlay = Overlay::Leaderboard,
            Action::ShowStatistics => self.overlay = Overlay::Statistics,
            Action::ResetStatistics => {
                self.engine().reset_statistics();
                self.message = Some("Statistics reset".to_string());
            }
            Action::CloseOverlay => self.overlay = Overlay::None,
            Action::Quit => {
                self.stop_ticker();
                self.should_quit = true;
            }
        }
        self.pump_events();
    }

    fn select_level(&mut self) {
        let level_id = {
            let engine = self.engine();
            engine.levels().catalog().get(self.level_cursor).map(|level| level.id.clone())
        };
        let Some(level_id) = level_id else {
            return;
        };
        self.stop_ticker();
        if self.engine().start_level(&level_id) {
            self.spawn_ticker_if_needed();
        } else {
            self.message = Some("That level is still locked".to_string());
        }
    }

    fn submit_name(&mut self) {
        let Some(name) = self.name_input.clone() else {
            return;
        };
        let result = self.engine().add_high_score(&name);
        match result {
            Ok(Some(rank)) => {
                self.score_saved = true;
                self.name_input = None;
                self.message = Some(format!("Saved as #{}", rank));
            }
            Ok(None) => {
                self.score_saved = true;
                self.name_input = None;
            }
            Err(e) => self.message = Some(error::handle_error(&e)),
        }
    }

    /// Turn pending engine events into toasts
    pub fn pump_events(&mut self) {
        let events = self.engine().drain_events();
        for event in events {
            match event {
                GameEvent::RoundStarted { .. } => {
                    self.score_saved = false;
                    self.message = None;
                    self.toasts.clear();
                }
                GameEvent::AchievementUnlocked { id } => {
                    let def = id.definition();
                    self.push_toast(format!("{} Achievement: {}", def.icon, def.title));
                }
                GameEvent::LevelUnlocked { id } => {
                    let title = self
                        .engine()
                        .levels()
                        .get(&id)
                        .map_or_else(|| id.clone(), |level| level.title.clone());
                    self.push_toast(format!("New level: {}", title));
                }
                GameEvent::RoundEnded { .. }
                | GameEvent::HighScoreSaved { .. }
                | GameEvent::HighScoreRejected
                | GameEvent::StatisticsReset => {}
            }
        }
    }

    fn push_toast(&mut self, text: String) {
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(text);
    }

    fn spawn_ticker_if_needed(&mut self) {
        let (ticking, period) = {
            let engine = self.engine();
            (engine.is_ticking(), engine.config().tick_period())
        };
        if ticking {
            self.ticker = Some(Ticker::spawn(SharedEngine::clone(&self.engine), period));
        }
    }

    // 新回合开始前必须先停掉上一回合的线程
    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::rng::RoundRng;
    use crate::session::GameState;
    use crate::ticker::shared;
    use levels::{Difficulty, Level};
    use save::MemoryStore;

    fn app() -> App {
        let config = GameConfig {
            tick_millis: 5,
            ..GameConfig::default()
        };
        let catalog = vec![
            Level::new("one", "One", "", "*", Difficulty::Easy, 0, (9.0, 9.0), 10.0),
            Level::new("two", "Two", "", "*", Difficulty::Hard, 190, (9.0, 9.0), 10.0),
        ];
        App::new(shared(GameEngine::with_catalog(
            config,
            Box::new(MemoryStore::new()),
            RoundRng::new(11),
            catalog,
        )))
    }

    #[test]
    fn launch_and_jump_raise_toasts() {
        let mut app = app();
        app.handle(Action::Launch);
        assert_eq!(app.engine().state(), GameState::Playing);
        app.handle(Action::Jump);

        assert_eq!(app.engine().state(), GameState::GameOver);
        assert!(app.toasts().any(|toast| toast.contains("First Jump")));
    }

    #[test]
    fn locked_level_shows_message() {
        let mut app = app();
        app.handle(Action::OpenLevels);
        app.handle(Action::CursorDown);
        app.handle(Action::CursorDown);
        assert_eq!(app.level_cursor, 1);
        app.handle(Action::SelectLevel);
        assert_eq!(app.engine().state(), GameState::LevelSelection);
        assert!(app.message.is_some());
    }

    #[test]
    fn blank_name_keeps_prompt_open() {
        let mut app = app();
        app.handle(Action::Launch);
        app.handle(Action::Jump);
        app.handle(Action::SaveScore);
        assert_eq!(app.name_input.as_deref(), Some(""));

        app.handle(Action::TypeChar(' '));
        app.handle(Action::SubmitName);
        assert!(app.name_input.is_some());
        assert_eq!(app.message.as_deref(), Some("Please enter your name"));
        assert!(app.engine().leaderboard().is_empty());

        app.handle(Action::DeleteChar);
        for c in "Ada".chars() {
            app.handle(Action::TypeChar(c));
        }
        app.handle(Action::SubmitName);
        assert!(app.name_input.is_none());
        assert!(app.score_saved);
        assert_eq!(app.engine().leaderboard().len(), 1);

        app.handle(Action::SaveScore);
        assert!(app.name_input.is_none());
    }

    #[test]
    fn quit_stops_ticker() {
        let mut app = app();
        app.handle(Action::Launch);
        app.handle(Action::Quit);
        assert!(app.should_quit());
        assert!(app.ticker.is_none());
    }
}
