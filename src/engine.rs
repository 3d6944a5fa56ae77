//! 游戏引擎聚合体
//!
//! `GameEngine` 拥有持久化存储句柄和所有子引擎：
//! - 会话状态机（开局、计时、跳伞、爆炸、结算）
//! - 成就引擎与关卡进度
//! - 排行榜
//! - 事件总线，供表现层消费
//!
//! 引擎本身不依赖任何线程；多线程驱动见 [`Ticker`](crate::ticker::Ticker)。

use crate::config::GameConfig;
use crate::event_bus::{EventBus, GameEvent};
use crate::rng::RoundRng;
use crate::scoring::compute_score;
use crate::session::{GameState, RoundOutcome, SessionState};
use achievements::{AchievementEngine, LifetimeStats};
use error::GameError;
use leaderboard::Leaderboard;
use levels::{Level, LevelProgression, all_levels};
use save::PersistentStore;

pub struct GameEngine {
    config: GameConfig,
    store: Box<dyn PersistentStore>,
    session: SessionState,
    achievements: AchievementEngine,
    levels: LevelProgression,
    leaderboard: Leaderboard,
    events: EventBus,
    rng: RoundRng,
    /// Set while a round wants ticks; cleared in `end_round`
    ticking: bool,
}

impl GameEngine {
    /// Load every engine from `store`, seeding the RNG from the config
    pub fn new(config: GameConfig, store: Box<dyn PersistentStore>) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => RoundRng::new(seed),
            None => RoundRng::from_entropy(),
        };
        Self::with_rng(config, store, rng)
    }

    pub fn with_rng(config: GameConfig, store: Box<dyn PersistentStore>, rng: RoundRng) -> Self {
        Self::with_catalog(config, store, rng, all_levels())
    }

    /// Build an engine over a custom level catalog
    pub fn with_catalog(
        config: GameConfig,
        store: Box<dyn PersistentStore>,
        rng: RoundRng,
        catalog: Vec<Level>,
    ) -> Self {
        let achievements = AchievementEngine::load(store.as_ref());
        let levels = LevelProgression::load(catalog, store.as_ref());
        let leaderboard = Leaderboard::load(store.as_ref(), config.leaderboard_capacity);
        log::debug!(
            "engine loaded: {} achievements, {} levels unlocked, {} high scores",
            achievements.unlocked_count(),
            levels.unlocked_count(),
            leaderboard.len()
        );

        Self {
            session: SessionState::new(config.tick_millis),
            config,
            store,
            achievements,
            levels,
            leaderboard,
            events: EventBus::new(),
            rng,
            ticking: false,
        }
    }

    // ---- 状态迁移 ----

    /// menu -> levelSelection
    pub fn open_level_selection(&mut self) {
        if self.session.game_state == GameState::Menu {
            self.session.game_state = GameState::LevelSelection;
        }
    }

    /// levelSelection -> menu
    pub fn close_level_selection(&mut self) {
        if self.session.game_state == GameState::LevelSelection {
            self.session.game_state = GameState::Menu;
        }
    }

    /// Start a round on the best unlocked level, or a level-less round when
    /// nothing is unlocked.
    pub fn start_game(&mut self) {
        if !self.session.game_state.can_start_round() {
            return;
        }
        let level = self.levels.max_unlocked_level().cloned();
        self.begin_round(level);
    }

    /// Start a round on a specific level. Returns false (and changes
    /// nothing) for an unknown or locked level, or from the wrong state.
    pub fn start_level(&mut self, level_id: &str) -> bool {
        if !self.session.game_state.can_start_round() {
            return false;
        }
        let Some(level) = self.levels.get(level_id).cloned() else {
            log::debug!("start_level: unknown level {:?}", level_id);
            return false;
        };
        if !self.levels.is_unlocked(level_id) {
            log::debug!("start_level: level {:?} is locked", level_id);
            return false;
        }
        self.begin_round(Some(level));
        true
    }

    fn begin_round(&mut self, level: Option<Level>) {
        let ((min, max), max_flight_time) = match &level {
            Some(level) => (level.explosion_time_range, level.max_flight_time),
            None => (
                self.config.default_explosion_range,
                self.config.default_max_flight_time,
            ),
        };
        let explosion_time = self.rng.sample_explosion(min, max);
        let level_id = level.as_ref().map(|level| level.id.clone());

        self.session.begin(level, explosion_time, max_flight_time);
        self.achievements.stats_mut().add_game();
        self.achievements.persist_stats(self.store.as_mut());
        self.ticking = true;

        log::debug!(
            "round started: level={:?} explosion={:.2} cap={:.1}",
            level_id,
            explosion_time,
            max_flight_time
        );
        self.events.publish(GameEvent::RoundStarted {
            level_id,
            max_flight_time,
        });
    }

    /// Advance one tick. Ends the round as an explosion once the flight time
    /// reaches the explosion time or the level's cap.
    pub fn tick(&mut self) {
        if self.session.game_state != GameState::Playing || !self.session.is_flying {
            return;
        }
        self.session.advance();
        if self.session.reached_bound() {
            self.session.is_flying = false;
            log::debug!("rocket exploded at {:.1}", self.session.flight_time());
            self.end_round(false);
        }
    }

    /// Bail out of the rocket. No-op unless a round is in flight.
    pub fn jump(&mut self) {
        if self.session.game_state != GameState::Playing || !self.session.is_flying {
            return;
        }
        self.session.jump_pressed = true;
        self.session.is_flying = false;

        let flight_time = self.session.flight_time();
        let explosion_time = self.session.explosion_time;
        self.session.score = self
            .session
            .score
            .saturating_add(compute_score(flight_time, self.config.survival_threshold));

        let stats = self.achievements.stats_mut();
        stats.add_jump();
        stats.record_flight(flight_time);
        let new_best = stats.record_score(self.session.score);
        if new_best {
            log::info!("new best score: {}", self.session.score);
        }

        let is_success = flight_time < explosion_time;
        self.achievements
            .check_jump_achievements(flight_time, explosion_time, is_success, self.store.as_mut());
        self.check_achievements();
        self.achievements.persist_stats(self.store.as_mut());

        self.end_round(new_best);
    }

    fn end_round(&mut self, new_best: bool) {
        self.ticking = false;

        let jumped = self.session.jump_pressed;
        if jumped {
            self.achievements.stats_mut().consecutive_explosions = 0;
        } else {
            self.achievements.stats_mut().record_explosion();
            self.achievements.break_success_streak();
            self.check_achievements();
        }
        self.achievements.persist_stats(self.store.as_mut());

        let flight_time = self.session.flight_time();
        let outcome = RoundOutcome {
            jumped,
            success: jumped && flight_time < self.session.explosion_time,
            score: self.session.score,
            flight_time,
            explosion_time: self.session.explosion_time,
            level_id: self.session.current_level.as_ref().map(|level| level.id.clone()),
            level_title: self.session.level_title().to_string(),
            new_best,
        };
        log::debug!("round ended: {:?}", outcome);

        self.session.finish(outcome.clone());
        self.events.publish(GameEvent::RoundEnded { outcome });
    }

    /// gameOver -> menu. Lifetime stats are untouched.
    pub fn reset_game(&mut self) {
        if self.session.game_state == GameState::GameOver {
            self.session.clear();
        }
    }

    /// Re-evaluate threshold achievements, then level unlocks, publishing
    /// every new unlock.
    fn check_achievements(&mut self) {
        self.achievements.check_achievements(self.store.as_mut());
        let best_score = self.achievements.stats().best_score;
        self.levels.check_level_unlocks(best_score, self.store.as_mut());

        for id in self.achievements.drain_newly_unlocked() {
            self.events.publish(GameEvent::AchievementUnlocked { id });
        }
        for id in self.levels.drain_newly_unlocked() {
            log::debug!("level unlocked: {}", id);
            self.events.publish(GameEvent::LevelUnlocked { id });
        }
    }

    // ---- 排行榜 ----

    pub fn is_top_ten(&self, score: u32) -> bool {
        self.leaderboard.is_top_ten(score)
    }

    /// The last round was a successful jump good enough for the board
    pub fn qualifies_for_leaderboard(&self) -> bool {
        self.session
            .last_outcome()
            .is_some_and(|outcome| outcome.success && self.is_top_ten(outcome.score))
    }

    /// Save the last round to the leaderboard under `player_name`
    pub fn add_high_score(&mut self, player_name: &str) -> Result<Option<usize>, GameError> {
        let score = self.session.score;
        let flight_time = self.session.flight_time();
        let level_title = self.current_level_title().to_string();
        self.add_high_score_entry(player_name, score, flight_time, &level_title)
    }

    pub fn add_high_score_entry(
        &mut self,
        player_name: &str,
        score: u32,
        flight_time: f64,
        level_title: &str,
    ) -> Result<Option<usize>, GameError> {
        match self
            .leaderboard
            .add_entry(player_name, score, flight_time, level_title, self.store.as_mut())
        {
            Ok(rank) => {
                self.events.publish(GameEvent::HighScoreSaved { rank, score });
                Ok(rank)
            }
            Err(e) => {
                self.events.publish(GameEvent::HighScoreRejected);
                Err(e)
            }
        }
    }

    /// Title of the current round's level, or "Unknown Level"
    pub fn current_level_title(&self) -> &str {
        self.session.level_title()
    }

    /// Zero lifetime counters. Unlocked achievements and levels are kept.
    pub fn reset_statistics(&mut self) {
        self.achievements.reset_statistics(self.store.as_mut());
        log::info!("statistics reset");
        self.events.publish(GameEvent::StatisticsReset);
    }

    // ---- 只读访问 ----

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn state(&self) -> GameState {
        self.session.game_state
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn flight_time(&self) -> f64 {
        self.session.flight_time()
    }

    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.session.last_outcome()
    }

    pub fn stats(&self) -> &LifetimeStats {
        self.achievements.stats()
    }

    pub fn achievements(&self) -> &AchievementEngine {
        &self.achievements
    }

    pub fn levels(&self) -> &LevelProgression {
        &self.levels
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn store(&self) -> &dyn PersistentStore {
        self.store.as_ref()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Take every pending event
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain().collect()
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("session", &self.session)
            .field("stats", self.achievements.stats())
            .field("ticking", &self.ticking)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
