//! 单回合会话状态
//!
//! `SessionState` 只描述当前回合，不持久化；每次开局都会重置。
//! 状态迁移由 [`GameEngine`](crate::engine::GameEngine) 驱动。

use crate::constants::UNKNOWN_LEVEL_TITLE;
use levels::Level;
use serde::{Deserialize, Serialize};

/// 游戏状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Menu,
    LevelSelection,
    Playing,
    GameOver,
}

impl GameState {
    /// 可以从此状态开始新回合
    pub fn can_start_round(self) -> bool {
        matches!(self, GameState::Menu | GameState::LevelSelection | GameState::GameOver)
    }
}

/// 回合结果，用于结算界面和 `RoundEnded` 事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub jumped: bool,
    /// 在爆炸之前跳伞
    pub success: bool,
    pub score: u32,
    pub flight_time: f64,
    pub explosion_time: f64,
    pub level_id: Option<String>,
    pub level_title: String,
    /// 本回合刷新了历史最高分
    pub new_best: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub game_state: GameState,
    pub score: u32,
    pub is_flying: bool,
    pub explosion_time: f64,
    pub jump_pressed: bool,
    pub current_level: Option<Level>,
    pub max_flight_time: f64,
    ticks: u32,
    tick_millis: u64,
    last_outcome: Option<RoundOutcome>,
}

impl SessionState {
    pub fn new(tick_millis: u64) -> Self {
        Self {
            game_state: GameState::Menu,
            score: 0,
            is_flying: false,
            explosion_time: 0.0,
            jump_pressed: false,
            current_level: None,
            max_flight_time: 0.0,
            ticks: 0,
            tick_millis,
            last_outcome: None,
        }
    }

    /// Elapsed flight time in time-units
    pub fn flight_time(&self) -> f64 {
        (u64::from(self.ticks) * self.tick_millis) as f64 / 1000.0
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn tick_millis(&self) -> u64 {
        self.tick_millis
    }

    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn level_title(&self) -> &str {
        self.current_level
            .as_ref()
            .map_or(UNKNOWN_LEVEL_TITLE, |level| level.title.as_str())
    }

    /// 开始新回合
    pub(crate) fn begin(&mut self, level: Option<Level>, explosion_time: f64, max_flight_time: f64) {
        self.game_state = GameState::Playing;
        self.score = 0;
        self.ticks = 0;
        self.is_flying = true;
        self.jump_pressed = false;
        self.explosion_time = explosion_time;
        self.max_flight_time = max_flight_time;
        self.current_level = level;
        self.last_outcome = None;
    }

    /// Advance one tick and return the new flight time
    pub(crate) fn advance(&mut self) -> f64 {
        self.ticks = self.ticks.saturating_add(1);
        self.flight_time()
    }

    /// Round is over once either bound is reached
    pub(crate) fn reached_bound(&self) -> bool {
        let flight = self.flight_time();
        flight >= self.explosion_time || flight >= self.max_flight_time
    }

    pub(crate) fn finish(&mut self, outcome: RoundOutcome) {
        self.game_state = GameState::GameOver;
        self.is_flying = false;
        self.last_outcome = Some(outcome);
    }

    /// 回到主菜单，清空回合字段
    pub(crate) fn clear(&mut self) {
        let tick_millis = self.tick_millis;
        *self = Self::new(tick_millis);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_ticks_give_exact_flight_time() {
        let mut session = SessionState::new(100);
        session.begin(None, 7.0, 10.0);
        for _ in 0..60 {
            session.advance();
        }
        assert_eq!(session.flight_time(), 6.0);
        assert!(!session.reached_bound());
    }

    #[test]
    fn bound_is_the_earlier_of_explosion_and_cap() {
        let mut session = SessionState::new(100);
        session.begin(None, 12.0, 3.0);
        for _ in 0..29 {
            session.advance();
        }
        assert!(!session.reached_bound());
        session.advance();
        assert!(session.reached_bound());
    }

    #[test]
    fn clear_keeps_tick_length() {
        let mut session = SessionState::new(50);
        session.begin(None, 5.0, 10.0);
        session.advance();
        session.clear();
        assert_eq!(session.game_state, GameState::Menu);
        assert_eq!(session.ticks(), 0);
        assert_eq!(session.tick_millis(), 50);
        assert_eq!(session.level_title(), UNKNOWN_LEVEL_TITLE);
    }

    #[test]
    fn start_allowed_states() {
        assert!(GameState::Menu.can_start_round());
        assert!(GameState::LevelSelection.can_start_round());
        assert!(GameState::GameOver.can_start_round());
        assert!(!GameState::Playing.can_start_round());
    }
}
