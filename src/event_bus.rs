//! 事件总线系统，用于解耦引擎与表现层
//!
//! 引擎在每次状态变更后发布事件：
//! - 表现层可以在每帧调用 `drain` 取出待处理事件
//! - 也可以注册监听器，在发布时同步收到事件
//! - 最近的事件保留在有界历史中，便于调试

use crate::session::RoundOutcome;
use achievements::AchievementId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// 游戏事件定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// 回合开始
    RoundStarted {
        level_id: Option<String>,
        max_flight_time: f64,
    },
    /// 回合结束（跳伞或爆炸）
    RoundEnded { outcome: RoundOutcome },
    /// 成就解锁
    AchievementUnlocked { id: AchievementId },
    /// 关卡解锁
    LevelUnlocked { id: String },
    /// 排行榜记录已保存；`rank` 为 None 表示被截断
    HighScoreSaved { rank: Option<usize>, score: u32 },
    /// 玩家名为空，保存被拒绝
    HighScoreRejected,
    /// 统计数据已重置
    StatisticsReset,
}

impl GameEvent {
    /// 获取事件类型名（用于按类型订阅）
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::RoundStarted { .. } => "RoundStarted",
            GameEvent::RoundEnded { .. } => "RoundEnded",
            GameEvent::AchievementUnlocked { .. } => "AchievementUnlocked",
            GameEvent::LevelUnlocked { .. } => "LevelUnlocked",
            GameEvent::HighScoreSaved { .. } => "HighScoreSaved",
            GameEvent::HighScoreRejected => "HighScoreRejected",
            GameEvent::StatisticsReset => "StatisticsReset",
        }
    }
}

/// 事件处理器
pub trait EventHandler: Send {
    fn handle(&mut self, event: &GameEvent);

    fn name(&self) -> &str;
}

/// 队列模式的事件总线
pub struct EventBus {
    /// 待处理事件队列
    events: Vec<GameEvent>,
    /// 按事件类型注册的处理器
    handlers: HashMap<&'static str, Vec<Box<dyn EventHandler>>>,
    /// 处理所有事件的处理器
    global_handlers: Vec<Box<dyn EventHandler>>,
    /// 事件历史
    history: VecDeque<GameEvent>,
    max_history: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_history_size(100)
    }

    /// 创建一个指定历史记录大小的事件总线
    pub fn with_history_size(max_history: usize) -> Self {
        Self {
            events: Vec::new(),
            handlers: HashMap::new(),
            global_handlers: Vec::new(),
            history: VecDeque::with_capacity(max_history),
            max_history,
        }
    }

    /// 发布事件：立即通知处理器并加入队列
    pub fn publish(&mut self, event: GameEvent) {
        self.add_to_history(event.clone());

        if let Some(handlers) = self.handlers.get_mut(event.event_type()) {
            for handler in handlers.iter_mut() {
                handler.handle(&event);
            }
        }
        for handler in self.global_handlers.iter_mut() {
            handler.handle(&event);
        }

        self.events.push(event);
    }

    /// 获取所有待处理事件并清空队列
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// 检查是否有待处理事件
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// 清空队列（历史保留）
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// 订阅指定类型的事件
    pub fn subscribe(&mut self, event_type: &'static str, handler: Box<dyn EventHandler>) {
        self.handlers.entry(event_type).or_default().push(handler);
    }

    /// 订阅所有事件
    pub fn subscribe_all(&mut self, handler: Box<dyn EventHandler>) {
        self.global_handlers.push(handler);
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum::<usize>() + self.global_handlers.len()
    }

    fn add_to_history(&mut self, event: GameEvent) {
        if self.max_history == 0 {
            return;
        }
        if self.history.len() >= self.max_history {
            self.history.pop_front();
        }
        self.history.push_back(event);
    }

    /// 最近的 `count` 条历史事件（从旧到新）
    pub fn recent(&self, count: usize) -> Vec<&GameEvent> {
        let skip = self.history.len().saturating_sub(count);
        self.history.iter().skip(skip).collect()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("pending", &self.events.len())
            .field("subscribers", &self.subscriber_count())
            .field("history", &self.history.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        name: String,
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    impl EventHandler for Recorder {
        fn handle(&mut self, event: &GameEvent) {
            self.seen.lock().unwrap().push(event.event_type());
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn recorder(name: &str) -> (Box<Recorder>, Arc<Mutex<Vec<&'static str>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            Box::new(Recorder {
                name: name.to_string(),
                seen: Arc::clone(&seen),
            }),
            seen,
        )
    }

    #[test]
    fn publish_queues_and_drains_in_order() {
        let mut bus = EventBus::new();
        bus.publish(GameEvent::StatisticsReset);
        bus.publish(GameEvent::LevelUnlocked { id: "easy_2".into() });
        assert_eq!(bus.len(), 2);

        let drained: Vec<_> = bus.drain().collect();
        assert_eq!(drained[0], GameEvent::StatisticsReset);
        assert_eq!(drained[1], GameEvent::LevelUnlocked { id: "easy_2".into() });
        assert!(bus.is_empty());
    }

    #[test]
    fn typed_and_global_subscribers() {
        let mut bus = EventBus::new();
        let (typed, typed_seen) = recorder("typed");
        let (global, global_seen) = recorder("global");
        bus.subscribe("LevelUnlocked", typed);
        bus.subscribe_all(global);
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(GameEvent::HighScoreRejected);
        bus.publish(GameEvent::LevelUnlocked { id: "hard_1".into() });

        assert_eq!(*typed_seen.lock().unwrap(), vec!["LevelUnlocked"]);
        assert_eq!(
            *global_seen.lock().unwrap(),
            vec!["HighScoreRejected", "LevelUnlocked"]
        );
    }

    #[test]
    fn history_is_bounded() {
        let mut bus = EventBus::with_history_size(2);
        for _ in 0..3 {
            bus.publish(GameEvent::StatisticsReset);
        }
        bus.publish(GameEvent::HighScoreRejected);
        bus.clear();

        let recent = bus.recent(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[1], &GameEvent::HighScoreRejected);
    }

    #[test]
    fn events_serialize() {
        let event = GameEvent::AchievementUnlocked {
            id: AchievementId::Streak5,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("streak_5"));
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
