//! 游戏错误处理模块
//!
//! 处理存档键值存储、序列化、配置以及玩家输入校验时可能出现的错误。

use bincode::error::{DecodeError, EncodeError};
use thiserror::Error;

/// 游戏运行过程中可能出现的错误类型
#[derive(Debug, Error)]
pub enum GameError {
    /// 存储后端错误
    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),

    /// IO操作错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 反序列化错误
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// 存储数据损坏
    #[error("Corrupted store data")]
    CorruptedStore,

    /// 排行榜玩家名为空（去除空白后）
    #[error("Player name must not be empty")]
    EmptyPlayerName,

    /// 配置无效
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<DecodeError> for GameError {
    fn from(err: DecodeError) -> Self {
        // 解码出非法UTF-8时基本可以确定存储文件已损坏
        if err.to_string().contains("invalid utf-8 sequence") {
            GameError::CorruptedStore
        } else {
            GameError::Deserialization(err.to_string())
        }
    }
}

impl From<EncodeError> for GameError {
    fn from(err: EncodeError) -> Self {
        GameError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            GameError::Deserialization(err.to_string())
        } else {
            GameError::Serialization(err.to_string())
        }
    }
}

/// 处理游戏错误并转换为用户友好的消息
pub fn handle_error(error: &GameError) -> String {
    match error {
        GameError::CorruptedStore => "Saved progress is corrupted and was not loaded".to_string(),
        GameError::EmptyPlayerName => "Please enter your name".to_string(),
        GameError::Io(e) => match e.kind() {
            std::io::ErrorKind::NotFound => "Save file not found".to_string(),
            std::io::ErrorKind::PermissionDenied => "No permission to access the save file".to_string(),
            _ => format!("IO error: {}", e),
        },
        _ => error.to_string(),
    }
}
