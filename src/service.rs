// src/service.rs
//
// 对外暴露的核心操作：一次调用对应一次数据库读写。

use crate::db::Store;
use crate::error::{LogError, Result};
use crate::models::{EntryAddress, EntryHeader, EntryId, LogEntry, NewEntry, DEFAULT_MIME_TYPE};
use tracing::info;

/// 写入一条日志，返回新生成的 id
pub fn ingest(
    store: &Store,
    project: &str,
    subject: &str,
    body: &[u8],
    mime_type: Option<&str>,
) -> Result<EntryId> {
    if project.trim().is_empty() || subject.trim().is_empty() {
        return Err(LogError::Validation("empty project or subject".to_string()));
    }

    let mime_type = match mime_type.map(str::trim) {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => DEFAULT_MIME_TYPE.to_string(),
    };

    let entry = NewEntry {
        project: project.to_string(),
        subject: subject.to_string(),
        body: body.to_vec(),
        mime_type,
        timestamp: chrono::Utc::now().timestamp(),
    };
    let id = store.insert(&entry)?;

    info!(
        project = %entry.project,
        subject = %entry.subject,
        id = %id,
        mime_type = %entry.mime_type,
        bytes = entry.body.len(),
        "upload"
    );
    Ok(id)
}

pub fn list_projects(store: &Store) -> Result<Vec<String>> {
    store.distinct_projects()
}

pub fn list_subjects(store: &Store, project: &str) -> Result<Vec<String>> {
    store.distinct_subjects(project)
}

pub fn list_headers(store: &Store, project: &str, subject: &str) -> Result<Vec<EntryHeader>> {
    store.list_headers(project, subject)
}

pub fn get_entry(store: &Store, id: EntryId) -> Result<LogEntry> {
    store.get_by_id(id)
}

/// 按完整地址获取日志。id 存在但不属于该 project/subject 时同样视为不存在。
pub fn resolve(store: &Store, address: &EntryAddress) -> Result<LogEntry> {
    let entry = store.get_by_id(address.id)?;
    if entry.project != address.project || entry.subject != address.subject {
        return Err(LogError::NotFound(address.id));
    }
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_then_list_headers() {
        let store = Store::open_in_memory().unwrap();
        let id = ingest(&store, "alpha", "build", b"hello", None).unwrap();

        let headers = list_headers(&store, "alpha", "build").unwrap();
        assert!(headers.iter().any(|h| h.id == id));
    }

    #[test]
    fn test_ingest_rejects_empty_fields() {
        let store = Store::open_in_memory().unwrap();
        assert!(matches!(
            ingest(&store, "", "x", b"b", None),
            Err(LogError::Validation(_))
        ));
        assert!(matches!(
            ingest(&store, "p", "", b"b", None),
            Err(LogError::Validation(_))
        ));
        assert!(matches!(
            ingest(&store, "   ", "x", b"b", None),
            Err(LogError::Validation(_))
        ));
        assert!(list_projects(&store).unwrap().is_empty());
    }

    #[test]
    fn test_ingest_defaults_mime_type() {
        let store = Store::open_in_memory().unwrap();
        let a = ingest(&store, "p", "s", b"b", None).unwrap();
        let b = ingest(&store, "p", "s", b"b", Some("")).unwrap();
        assert_eq!(get_entry(&store, a).unwrap().mime_type, DEFAULT_MIME_TYPE);
        assert_eq!(get_entry(&store, b).unwrap().mime_type, DEFAULT_MIME_TYPE);
    }

    #[test]
    fn test_round_trip() {
        let store = Store::open_in_memory().unwrap();
        let before = chrono::Utc::now().timestamp();
        let id = ingest(&store, "alpha", "build", b"hello", Some("text/plain")).unwrap();
        let after = chrono::Utc::now().timestamp();

        let entry = get_entry(&store, id).unwrap();
        assert_eq!(entry.body, b"hello");
        assert_eq!(entry.mime_type, "text/plain");
        assert_eq!(entry.project, "alpha");
        assert_eq!(entry.subject, "build");
        assert!(entry.timestamp >= before && entry.timestamp <= after);
    }

    #[test]
    fn test_projects_are_distinct() {
        let store = Store::open_in_memory().unwrap();
        for subject in ["a", "b", "c"] {
            ingest(&store, "alpha", subject, b"x", None).unwrap();
        }
        assert_eq!(list_projects(&store).unwrap(), vec!["alpha"]);
    }

    #[test]
    fn test_unknown_project_has_no_subjects() {
        let store = Store::open_in_memory().unwrap();
        ingest(&store, "alpha", "build", b"x", None).unwrap();
        assert!(list_subjects(&store, "nonexistent-project").unwrap().is_empty());
    }

    #[test]
    fn test_get_unknown_entry() {
        let store = Store::open_in_memory().unwrap();
        let id: EntryId = "77".parse().unwrap();
        assert!(matches!(get_entry(&store, id), Err(LogError::NotFound(_))));
    }

    #[test]
    fn test_resolve_checks_address() {
        let store = Store::open_in_memory().unwrap();
        let id = ingest(&store, "alpha", "build", b"x", None).unwrap();
        let raw = id.to_string();

        let ok = EntryAddress::parse("alpha", "build", &raw).unwrap();
        assert_eq!(resolve(&store, &ok).unwrap().id, id);

        let wrong = EntryAddress::parse("alpha", "deploy", &raw).unwrap();
        assert!(matches!(resolve(&store, &wrong), Err(LogError::NotFound(_))));
    }
}
