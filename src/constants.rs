//! 游戏常量，配置默认值与各子系统共用同一份数据

/// Nominal tick period in milliseconds (0.1 time-units)
pub const TICK_MILLIS: u64 = 100;
/// Flight time past which a jump earns the survival bonus
pub const SURVIVAL_THRESHOLD: f64 = 8.0;
/// Survival bonus points
pub const SURVIVAL_BONUS: u32 = 100;
/// Points per time-unit of flight
pub const POINTS_PER_TIME_UNIT: f64 = 10.0;
/// Explosion range for rounds started without a level
pub const DEFAULT_EXPLOSION_RANGE: (f64, f64) = (5.0, 10.0);
/// Flight cap for rounds started without a level
pub const DEFAULT_MAX_FLIGHT_TIME: f64 = 10.0;
/// Shown when a round has no level
pub const UNKNOWN_LEVEL_TITLE: &str = "Unknown Level";
/// Default location of the progress store
pub const DEFAULT_STORE_PATH: &str = "saves/lucky_jet.sav";
/// Default configuration file looked up by the binary
pub const DEFAULT_CONFIG_PATH: &str = "lucky_jet.json";
