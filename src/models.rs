// src/models.rs

use crate::error::{LogError, Result};
use chrono::{Local, TimeZone};
use std::fmt;
use std::str::FromStr;

/// 未指定类型时使用的默认 mime type
pub const DEFAULT_MIME_TYPE: &str = "text/plain";

/// 日志条目的唯一标识，由数据库生成，永不复用
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(i64);

impl EntryId {
    pub(crate) fn from_raw(raw: i64) -> Self {
        EntryId(raw)
    }

    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        // 只接受纯数字，拒绝 "+5"、" 5" 之类的写法
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LogError::InvalidId(s.to_string()));
        }
        match s.parse::<i64>() {
            Ok(raw) if raw > 0 => Ok(EntryId(raw)),
            _ => Err(LogError::InvalidId(s.to_string())),
        }
    }
}

/// 一条完整的日志
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: EntryId,
    pub project: String,
    pub subject: String,
    pub body: Vec<u8>, // 原样保存，不做编码转换
    pub mime_type: String,
    pub timestamp: i64, // Unix 秒
}

/// 列表页使用的轻量投影：只有 id 和时间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHeader {
    pub id: EntryId,
    pub timestamp: i64,
}

impl EntryHeader {
    /// 按本地时区格式化创建时间
    pub fn date(&self) -> String {
        format_timestamp(self.timestamp)
    }
}

pub fn format_timestamp(timestamp: i64) -> String {
    match Local.timestamp_opt(timestamp, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S %z").to_string(),
        None => timestamp.to_string(),
    }
}

/// 待写入的新日志，尚未分配 id
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub project: String,
    pub subject: String,
    pub body: Vec<u8>,
    pub mime_type: String,
    pub timestamp: i64,
}

/// 从路由参数解析出的强类型地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryAddress {
    pub project: String,
    pub subject: String,
    pub id: EntryId,
}

impl EntryAddress {
    pub fn parse(project: &str, subject: &str, id: &str) -> Result<Self> {
        if project.trim().is_empty() || subject.trim().is_empty() {
            return Err(LogError::Validation("empty project or subject".to_string()));
        }
        Ok(EntryAddress {
            project: project.to_string(),
            subject: subject.to_string(),
            id: id.parse()?,
        })
    }
}
