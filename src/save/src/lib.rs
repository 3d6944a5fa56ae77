// src/save/src/lib.rs

use anyhow::Context;
use bincode::{Decode, Encode, config};
use error::GameError;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

/// 持久化键名（与旧版客户端保持一致）
pub mod keys {
    pub const TOTAL_JUMPS: &str = "totalJumps";
    pub const LONGEST_FLIGHT: &str = "longestFlight";
    pub const BEST_SCORE: &str = "bestScore";
    pub const TOTAL_GAMES: &str = "totalGames";
    pub const TOTAL_SUCCESSFUL_JUMPS: &str = "totalSuccessfulJumps";
    pub const TOTAL_EXPLOSIONS: &str = "totalExplosions";
    pub const PERFECT_TIMING_COUNT: &str = "perfectTimingCount";
    pub const LAST_SECOND_JUMPS: &str = "lastSecondJumps";
    pub const EARLY_JUMPS: &str = "earlyJumps";
    pub const LATE_JUMPS: &str = "lateJumps";
    pub const CONSECUTIVE_EXPLOSIONS: &str = "consecutiveExplosions";
    pub const CONSECUTIVE_PERFECT_TIMING: &str = "consecutivePerfectTiming";

    pub const UNLOCKED_ACHIEVEMENTS: &str = "unlockedAchievements";
    pub const UNLOCKED_LEVELS: &str = "unlockedLevels";
    pub const HIGH_SCORES: &str = "highScores";
}

/// 键值存储中的单个值
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub enum StoredValue {
    Int(i64),
    Float(f64),
    Blob(Vec<u8>),
}

/// 不透明的持久化键值存储
///
/// Getters return `None` for absent keys and for keys holding a value of a
/// different type; callers treat both as "use the default".
pub trait PersistentStore: Send {
    fn get_int(&self, key: &str) -> Option<i64>;
    fn set_int(&mut self, key: &str, value: i64) -> Result<(), GameError>;
    fn get_float(&self, key: &str) -> Option<f64>;
    fn set_float(&mut self, key: &str, value: f64) -> Result<(), GameError>;
    fn get_blob(&self, key: &str) -> Option<Vec<u8>>;
    fn set_blob(&mut self, key: &str, value: Vec<u8>) -> Result<(), GameError>;
    /// 将挂起的写入落盘
    fn synchronize(&mut self) -> Result<(), GameError>;
}

/// 纯内存存储，进程退出即丢失
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, StoredValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn insert(&mut self, key: &str, value: StoredValue) {
        self.values.insert(key.to_string(), value);
    }
}

impl PersistentStore for MemoryStore {
    fn get_int(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(StoredValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), GameError> {
        self.insert(key, StoredValue::Int(value));
        Ok(())
    }

    fn get_float(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(StoredValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    fn set_float(&mut self, key: &str, value: f64) -> Result<(), GameError> {
        self.insert(key, StoredValue::Float(value));
        Ok(())
    }

    fn get_blob(&self, key: &str) -> Option<Vec<u8>> {
        match self.values.get(key) {
            Some(StoredValue::Blob(v)) => Some(v.clone()),
            _ => None,
        }
    }

    fn set_blob(&mut self, key: &str, value: Vec<u8>) -> Result<(), GameError> {
        self.insert(key, StoredValue::Blob(value));
        Ok(())
    }

    fn synchronize(&mut self) -> Result<(), GameError> {
        Ok(())
    }
}

/// Current store file format version
pub const STORE_VERSION: u32 = 1;

/// 存档文件内容
#[derive(Debug, Encode, Decode)]
struct StoreSnapshot {
    version: u32,
    values: HashMap<String, StoredValue>,
}

/// 基于文件的存储：内存中读写，`synchronize` 时原子性写回磁盘
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    memory: MemoryStore,
    dirty: bool,
}

impl FileStore {
    /// 打开存储文件，文件不存在时返回空存储
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref().to_path_buf();

        let memory = if path.exists() {
            let mut file = fs::File::open(&path)
                .with_context(|| format!("Failed to open store file: {:?}", path))?;
            let snapshot: StoreSnapshot =
                bincode::decode_from_std_read(&mut file, config::standard())?;
            if snapshot.version > STORE_VERSION {
                log::warn!(
                    "store file {:?} has newer version {}, reading best-effort",
                    path,
                    snapshot.version
                );
            }
            MemoryStore {
                values: snapshot.values,
            }
        } else {
            MemoryStore::new()
        };

        Ok(Self {
            path,
            memory,
            dirty: false,
        })
    }

    /// 创建空存储，不读取已有文件；下次 `synchronize` 会覆盖它
    pub fn empty(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            memory: MemoryStore::new(),
            dirty: false,
        }
    }

    /// 获取存储文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 是否有尚未落盘的修改
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn write_to_disk(&self) -> Result<(), GameError> {
        // 创建存档目录(如果不存在)
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).context("Failed to create store directory")?;
            }
        }

        let snapshot = StoreSnapshot {
            version: STORE_VERSION,
            values: self.memory.values.clone(),
        };

        // 创建临时文件
        let temp_path = self.path.with_extension("tmp");
        let mut file =
            fs::File::create(&temp_path).context("Failed to create temporary store file")?;

        bincode::encode_into_std_write(&snapshot, &mut file, config::standard())?;

        // 确保数据写入磁盘
        file.flush().context("Failed to flush store data")?;

        // 原子性重命名
        fs::rename(&temp_path, &self.path).context("Failed to commit store file")?;

        Ok(())
    }
}

impl PersistentStore for FileStore {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.memory.get_int(key)
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), GameError> {
        self.dirty = true;
        self.memory.set_int(key, value)
    }

    fn get_float(&self, key: &str) -> Option<f64> {
        self.memory.get_float(key)
    }

    fn set_float(&mut self, key: &str, value: f64) -> Result<(), GameError> {
        self.dirty = true;
        self.memory.set_float(key, value)
    }

    fn get_blob(&self, key: &str) -> Option<Vec<u8>> {
        self.memory.get_blob(key)
    }

    fn set_blob(&mut self, key: &str, value: Vec<u8>) -> Result<(), GameError> {
        self.dirty = true;
        self.memory.set_blob(key, value)
    }

    fn synchronize(&mut self) -> Result<(), GameError> {
        if !self.dirty {
            return Ok(());
        }
        self.write_to_disk()?;
        self.dirty = false;
        Ok(())
    }
}

/// 读取计数器，缺失或越界时返回0
pub fn load_counter(store: &dyn PersistentStore, key: &str) -> u32 {
    store
        .get_int(key)
        .map(|v| v.clamp(0, u32::MAX as i64) as u32)
        .unwrap_or(0)
}

/// 以JSON编码写入blob
pub fn save_json<T: Serialize + ?Sized>(
    store: &mut dyn PersistentStore,
    key: &str,
    value: &T,
) -> Result<(), GameError> {
    let bytes = serde_json::to_vec(value)?;
    store.set_blob(key, bytes)
}

/// 读取JSON编码的blob，键不存在时返回 `Ok(None)`
pub fn load_json<T: DeserializeOwned>(
    store: &dyn PersistentStore,
    key: &str,
) -> Result<Option<T>, GameError> {
    match store.get_blob(key) {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn absent_and_mistyped_keys_read_as_none() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_int(keys::TOTAL_JUMPS), None);

        store.set_float(keys::LONGEST_FLIGHT, 6.5).unwrap();
        assert_eq!(store.get_int(keys::LONGEST_FLIGHT), None);
        assert_eq!(store.get_float(keys::LONGEST_FLIGHT), Some(6.5));
        assert_eq!(load_counter(&store, keys::TOTAL_JUMPS), 0);
    }

    #[test]
    fn counters_are_clamped() {
        let mut store = MemoryStore::new();
        store.set_int(keys::TOTAL_GAMES, -4).unwrap();
        assert_eq!(load_counter(&store, keys::TOTAL_GAMES), 0);
        store.set_int(keys::TOTAL_GAMES, i64::MAX).unwrap();
        assert_eq!(load_counter(&store, keys::TOTAL_GAMES), u32::MAX);
    }

    #[test]
    fn json_blob_keeps_set_membership() {
        let mut store = MemoryStore::new();
        let ids: BTreeSet<String> = ["first_jump", "astronaut"].iter().map(|s| s.to_string()).collect();
        save_json(&mut store, keys::UNLOCKED_ACHIEVEMENTS, &ids).unwrap();

        let loaded: BTreeSet<String> = load_json(&store, keys::UNLOCKED_ACHIEVEMENTS)
            .unwrap()
            .expect("blob present");
        assert_eq!(loaded, ids);
        assert!(load_json::<BTreeSet<String>>(&store, keys::UNLOCKED_LEVELS).unwrap().is_none());
    }

    #[test]
    fn corrupted_blob_is_reported() {
        let mut store = MemoryStore::new();
        store.set_blob(keys::HIGH_SCORES, b"{not json".to_vec()).unwrap();
        let result = load_json::<Vec<u32>>(&store, keys::HIGH_SCORES);
        assert!(matches!(result, Err(GameError::Deserialization(_))));
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("store.sav");

        let mut store = FileStore::open(&path).expect("open new store");
        assert!(!store.is_dirty());
        store.set_int(keys::BEST_SCORE, 190).unwrap();
        store.set_float(keys::LONGEST_FLIGHT, 9.0).unwrap();
        save_json(&mut store, keys::UNLOCKED_LEVELS, &vec!["easy_1".to_string()]).unwrap();
        assert!(store.is_dirty());
        store.synchronize().expect("write store");
        assert!(!store.is_dirty());
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());

        let reopened = FileStore::open(&path).expect("reopen store");
        assert_eq!(reopened.get_int(keys::BEST_SCORE), Some(190));
        assert_eq!(reopened.get_float(keys::LONGEST_FLIGHT), Some(9.0));
        let levels: Vec<String> = load_json(&reopened, keys::UNLOCKED_LEVELS).unwrap().unwrap();
        assert_eq!(levels, vec!["easy_1".to_string()]);
    }

    #[test]
    fn unsynchronized_writes_are_lost_on_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("store.sav");

        let mut store = FileStore::open(&path).unwrap();
        store.set_int(keys::TOTAL_GAMES, 3).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get_int(keys::TOTAL_GAMES), None);
    }

    #[test]
    fn garbage_file_fails_to_open() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("store.sav");
        fs::write(&path, [0xff, 0xff, 0xff, 0xff, 0xff]).unwrap();
        assert!(FileStore::open(&path).is_err());
    }
}
