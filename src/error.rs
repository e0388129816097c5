// src/error.rs

use crate::models::EntryId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database Error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid log ID: {0:?}")]
    InvalidId(String),

    #[error("Log ID {0} not found")]
    NotFound(EntryId),
}

impl LogError {
    /// 是否为调用方造成的错误（而非存储故障）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            LogError::Validation(_) | LogError::InvalidId(_) | LogError::NotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LogError>;
