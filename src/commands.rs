// src/commands.rs

use crate::db::{self, Store};
use crate::error::Result;
use crate::models::{format_timestamp, EntryId};
use crate::{service, web};
use std::io::{self, Read, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// 命令行未指定 --db 时使用默认路径
pub fn resolve_db_path(db: Option<PathBuf>) -> Result<PathBuf> {
    match db {
        Some(p) => Ok(p),
        None => db::get_db_path(),
    }
}

/// 处理 'init' 命令
pub fn handle_init(db_path: &Path) -> Result<()> {
    Store::open(db_path)?;
    println!("✓ Database initialized successfully at: {:?}", db_path);
    Ok(())
}

/// 处理 'serve' 命令
pub async fn handle_serve(db_path: &Path, bind: SocketAddr) -> anyhow::Result<()> {
    let store = Arc::new(Store::open(db_path)?);
    let app = web::create_router(store);

    info!("database: {}", db_path.display());
    info!("listening on http://{}", bind);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// 处理 'put' 命令
pub fn handle_put<W: Write>(
    db_path: &Path,
    project: &str,
    subject: &str,
    message: Option<String>,
    mime_type: Option<&str>,
    out: &mut W,
) -> Result<EntryId> {
    let body = match message {
        Some(msg) => msg.into_bytes(),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    let store = Store::open(db_path)?;
    let id = service::ingest(&store, project, subject, &body, mime_type)?;
    writeln!(out, "✓ Log recorded: {}", id)?;
    Ok(id)
}

/// 处理 'projects' 命令
pub fn handle_projects<W: Write>(db_path: &Path, out: &mut W) -> Result<()> {
    let store = Store::open(db_path)?;
    let projects = service::list_projects(&store)?;
    if projects.is_empty() {
        writeln!(out, "No logs found.")?;
    }
    for project in projects {
        writeln!(out, "{}", project)?;
    }
    Ok(())
}

/// 处理 'subjects' 命令
pub fn handle_subjects<W: Write>(db_path: &Path, project: &str, out: &mut W) -> Result<()> {
    let store = Store::open(db_path)?;
    let subjects = service::list_subjects(&store, project)?;
    if subjects.is_empty() {
        writeln!(out, "No logs found.")?;
    }
    for subject in subjects {
        writeln!(out, "{}", subject)?;
    }
    Ok(())
}

/// 处理 'headers' 命令
pub fn handle_headers<W: Write>(
    db_path: &Path,
    project: &str,
    subject: &str,
    out: &mut W,
) -> Result<()> {
    let store = Store::open(db_path)?;
    let mut headers = service::list_headers(&store, project, subject)?;
    if headers.is_empty() {
        writeln!(out, "No logs found.")?;
        return Ok(());
    }

    // 数据库不保证顺序，这里按时间排序再输出
    headers.sort_by_key(|h| (h.timestamp, h.id));
    for header in headers {
        writeln!(out, "[{}] {}", header.id, header.date())?;
    }
    Ok(())
}

/// 处理 'show' 命令
pub fn handle_show<W: Write>(db_path: &Path, id: &str, out: &mut W) -> Result<()> {
    let id: EntryId = id.parse()?;
    let store = Store::open(db_path)?;
    let entry = service::get_entry(&store, id)?;

    writeln!(
        out,
        "[{}] {} | {}/{} | {}",
        entry.id,
        format_timestamp(entry.timestamp),
        entry.project,
        entry.subject,
        entry.mime_type
    )?;
    writeln!(out, "{}", String::from_utf8_lossy(&entry.body).trim_end())?;
    writeln!(out, "{}", "─".repeat(40))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogError;

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_put_then_show() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("logbook.db");

        let mut out = Vec::new();
        let id = handle_put(
            &db_path,
            "alpha",
            "build",
            Some("compiled fine\n".to_string()),
            None,
            &mut out,
        )
        .unwrap();
        assert_eq!(output(out), format!("✓ Log recorded: {}\n", id));

        let mut out = Vec::new();
        handle_show(&db_path, &id.to_string(), &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("alpha/build"));
        assert!(text.contains("text/plain"));
        assert!(text.contains("compiled fine"));
    }

    #[test]
    fn test_show_rejects_bad_id() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("logbook.db");
        let mut out = Vec::new();
        assert!(matches!(
            handle_show(&db_path, "nope", &mut out),
            Err(LogError::InvalidId(_))
        ));
        assert!(matches!(
            handle_show(&db_path, "9", &mut out),
            Err(LogError::NotFound(_))
        ));
    }

    #[test]
    fn test_listings() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("logbook.db");
        let mut sink = Vec::new();
        let first = handle_put(&db_path, "alpha", "build", Some("1".into()), None, &mut sink).unwrap();
        let second = handle_put(&db_path, "alpha", "build", Some("2".into()), None, &mut sink).unwrap();
        handle_put(&db_path, "alpha", "deploy", Some("3".into()), None, &mut sink).unwrap();

        let mut out = Vec::new();
        handle_projects(&db_path, &mut out).unwrap();
        assert_eq!(output(out), "alpha\n");

        let mut out = Vec::new();
        handle_subjects(&db_path, "beta", &mut out).unwrap();
        assert_eq!(output(out), "No logs found.\n");

        let mut out = Vec::new();
        handle_headers(&db_path, "alpha", "build", &mut out).unwrap();
        let text = output(out);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(&format!("[{}] ", first)));
        assert!(lines[1].starts_with(&format!("[{}] ", second)));
    }
}
