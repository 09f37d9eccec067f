//! 核心錯誤型別

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, InfoError>;

/// 核心流程可能產生的錯誤
#[derive(Error, Debug)]
pub enum InfoError {
    /// 檔名無法分解（例如非 UTF-8 編碼）
    #[error("Malformed file name: {0}")]
    MalformedName(String),

    /// 同一批次中出現相同的檔名
    #[error("Duplicate input: {0}")]
    DuplicateInput(String),

    /// 單一序列的代表檔案無法讀取
    #[error("{}: {cause}", path.display())]
    UnreadableMedia { path: PathBuf, cause: String },

    /// 格式化設定不合法
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl InfoError {
    pub fn unreadable(path: impl Into<PathBuf>, cause: &anyhow::Error) -> Self {
        Self::UnreadableMedia {
            path: path.into(),
            cause: format!("{cause:#}"),
        }
    }
}
