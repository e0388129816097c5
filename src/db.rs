// src/db.rs

use crate::error::{LogError, Result};
use crate::models::{EntryHeader, EntryId, LogEntry, NewEntry};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// 获取数据库文件的标准路径 (~/.config/logbook/logbook.db)
pub fn get_db_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or(LogError::HomeDirNotFound)?;
    Ok(home_dir.join(".config/logbook/logbook.db"))
}

/// 日志存储。连接在启动时打开一次，由所有请求共享。
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// 打开数据库，如果表不存在则创建
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        info!("Opening log database at {:?}", db_path);
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    /// 内存数据库，用于测试
    pub fn open_in_memory() -> Result<Self> {
        debug!("Opening in-memory log database");
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project TEXT NOT NULL,
                subject TEXT NOT NULL,
                body BLOB NOT NULL,
                mime_type TEXT NOT NULL,
                timestamp INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_logs_project_subject ON logs (project, subject);",
        )?;
        Ok(Store {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| LogError::LockPoisoned)
    }

    /// 插入一条新日志，返回生成的 id
    pub fn insert(&self, entry: &NewEntry) -> Result<EntryId> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO logs (project, subject, body, mime_type, timestamp) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.project,
                entry.subject,
                entry.body,
                entry.mime_type,
                entry.timestamp
            ],
        )?;
        Ok(EntryId::from_raw(conn.last_insert_rowid()))
    }

    /// 获取所有不重复的项目名
    pub fn distinct_projects(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT DISTINCT project FROM logs")?;
        let projects = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(projects)
    }

    /// 获取某个项目下所有不重复的主题名
    pub fn distinct_subjects(&self, project: &str) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT DISTINCT subject FROM logs WHERE project = ?")?;
        let subjects = stmt
            .query_map([project], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(subjects)
    }

    /// 列出 (project, subject) 下的日志头，不读取 body
    pub fn list_headers(&self, project: &str, subject: &str) -> Result<Vec<EntryHeader>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, timestamp FROM logs WHERE project = ? AND subject = ?")?;
        let headers = stmt
            .query_map([project, subject], |row| {
                Ok(EntryHeader {
                    id: EntryId::from_raw(row.get(0)?),
                    timestamp: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(headers)
    }

    /// 根据ID获取单条日志
    pub fn get_by_id(&self, id: EntryId) -> Result<LogEntry> {
        let conn = self.lock()?;
        let entry = conn
            .query_row(
                "SELECT id, project, subject, body, mime_type, timestamp FROM logs WHERE id = ?",
                [id.as_i64()],
                |row| {
                    Ok(LogEntry {
                        id: EntryId::from_raw(row.get(0)?),
                        project: row.get(1)?,
                        subject: row.get(2)?,
                        body: row.get(3)?,
                        mime_type: row.get(4)?,
                        timestamp: row.get(5)?,
                    })
                },
            )
            .optional()?;
        entry.ok_or(LogError::NotFound(id))
    }
}
