//! Keyboard input for the terminal front-end.
//!
//! Raw crossterm key events are mapped to [`Action`]s according to what is
//! currently on screen. The mapping is pure so it can be tested without a
//! terminal.

use crate::session::GameState;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Player intents understood by [`App`](crate::app::App)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Launch,
    Jump,
    OpenLevels,
    CloseLevels,
    CursorUp,
    CursorDown,
    SelectLevel,
    PlayAgain,
    BackToMenu,
    SaveScore,
    TypeChar(char),
    DeleteChar,
    SubmitName,
    CancelName,
    ShowAchievements,
    ShowLeaderboard,
    ShowStatistics,
    ResetStatistics,
    CloseOverlay,
    Quit,
}

/// Which panel covers the game screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Achievements,
    Leaderboard,
    Statistics,
}

/// Everything the key mapping depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputContext {
    pub state: GameState,
    pub overlay: Overlay,
    pub editing_name: bool,
}

/// Console input source
#[derive(Debug, Default)]
pub struct ConsoleInput;

impl ConsoleInput {
    pub fn new() -> Self {
        Self
    }

    /// Wait up to `timeout` for a key press
    pub fn poll(&mut self, timeout: Duration) -> anyhow::Result<Option<KeyEvent>> {
        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(key));
                }
            }
        }
        Ok(None)
    }
}

pub fn key_to_action(key: KeyEvent, context: InputContext) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    // 输入玩家名时，所有字符都进入输入框
    if context.editing_name {
        return match key.code {
            KeyCode::Enter => Some(Action::SubmitName),
            KeyCode::Esc => Some(Action::CancelName),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::TypeChar(c)),
            _ => None,
        };
    }

    if context.overlay != Overlay::None {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseOverlay),
            KeyCode::Char('r') if context.overlay == Overlay::Statistics => Some(Action::ResetStatistics),
            _ => None,
        };
    }

    match context.state {
        GameState::Menu => match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Launch),
            KeyCode::Char('l') => Some(Action::OpenLevels),
            KeyCode::Char('a') => Some(Action::ShowAchievements),
            KeyCode::Char('h') => Some(Action::ShowLeaderboard),
            KeyCode::Char('s') => Some(Action::ShowStatistics),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        },
        GameState::LevelSelection => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorDown),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::SelectLevel),
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseLevels),
            _ => None,
        },
        GameState::Playing => match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Jump),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
        GameState::GameOver => match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => Some(Action::PlayAgain),
            KeyCode::Char('m') | KeyCode::Esc => Some(Action::BackToMenu),
            KeyCode::Char('n') => Some(Action::SaveScore),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
    }
}
