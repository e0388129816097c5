//! logbook: 按 project / subject / id 寻址的只追加日志存储。
//!
//! 日志保存在一张 SQLite 表中（见 [`db::Store`]）；[`service`] 提供写入与查询操作，
//! [`web`] 通过 HTTP 暴露这些操作。

pub mod cli;
pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod pages;
pub mod service;
pub mod web;

pub use db::Store;
pub use error::{LogError, Result};
pub use models::{EntryAddress, EntryHeader, EntryId, LogEntry};
