// src/web.rs
//
// HTTP 路由：
//   GET  /                               项目列表
//   POST /upload/:project/:subject       上传日志 (表单字段 body, mimeType)
//   GET  /log/:project/                  主题列表
//   GET  /log/:project/:subject/         日志头列表
//   GET  /log/:project/:subject/:id      原始日志内容

use crate::db::Store;
use crate::error::LogError;
use crate::models::EntryAddress;
use crate::{pages, service};
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::error;

pub type SharedStore = Arc<Store>;

/// 上传表单，支持 urlencoded 和 multipart 两种编码。
/// 字段值按字节保存，同名字段只取第一个。
#[derive(Debug, Default)]
pub struct UploadForm {
    pub body: Option<Vec<u8>>,
    pub mime_type: Option<String>,
}

impl UploadForm {
    /// 解析 application/x-www-form-urlencoded 请求体
    pub fn from_urlencoded(input: &[u8]) -> Self {
        let mut form = UploadForm::default();
        for pair in input.split(|&b| b == b'&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = match pair.iter().position(|&b| b == b'=') {
                Some(i) => (&pair[..i], &pair[i + 1..]),
                None => (pair, &[][..]),
            };
            form.set_field(&decode_component(key), decode_component(value));
        }
        form
    }

    fn set_field(&mut self, name: &[u8], value: Vec<u8>) {
        match name {
            b"body" if self.body.is_none() => self.body = Some(value),
            b"mimeType" if self.mime_type.is_none() => {
                self.mime_type = Some(String::from_utf8_lossy(&value).into_owned())
            }
            _ => {}
        }
    }
}

// '+' 表示空格，必须在百分号解码之前替换，否则 %2B 会被误转
fn decode_component(raw: &[u8]) -> Vec<u8> {
    let spaced: Vec<u8> = raw
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    urlencoding::decode_binary(&spaced).into_owned()
}

#[async_trait]
impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            let mut form = UploadForm::default();
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(IntoResponse::into_response)?
            {
                let name = field.name().unwrap_or_default().to_string();
                let value = field.bytes().await.map_err(IntoResponse::into_response)?;
                form.set_field(name.as_bytes(), value.to_vec());
            }
            Ok(form)
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(UploadForm::from_urlencoded(&bytes))
        } else {
            Err((
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "upload must be application/x-www-form-urlencoded or multipart/form-data",
            )
                .into_response())
        }
    }
}

pub fn create_router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/upload/:project/:subject", post(upload))
        .route("/log/:project/", get(project))
        .route("/log/:project/:subject/", get(subject))
        .route("/log/:project/:subject/:id", get(entry))
        .with_state(store)
}

impl IntoResponse for LogError {
    fn into_response(self) -> Response {
        let status = match &self {
            LogError::Validation(_) | LogError::InvalidId(_) => StatusCode::BAD_REQUEST,
            LogError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if !self.is_client_error() {
            error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}

/// 在阻塞线程池上执行一次数据库操作，避免占用 tokio 工作线程
async fn with_store<F, T>(store: SharedStore, f: F) -> Result<T, LogError>
where
    F: FnOnce(&Store) -> Result<T, LogError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&store)).await?
}

async fn health_check() -> &'static str {
    "OK"
}

async fn index(State(store): State<SharedStore>) -> Result<Html<String>, LogError> {
    let projects = with_store(store, service::list_projects).await?;
    Ok(Html(pages::index(&projects)))
}

async fn upload(
    State(store): State<SharedStore>,
    Path((project, subject)): Path<(String, String)>,
    form: UploadForm,
) -> Result<impl IntoResponse, LogError> {
    let id = with_store(store, move |s| {
        service::ingest(
            s,
            &project,
            &subject,
            form.body.as_deref().unwrap_or_default(),
            form.mime_type.as_deref(),
        )
    })
    .await?;
    Ok((StatusCode::CREATED, id.to_string()))
}

async fn project(
    State(store): State<SharedStore>,
    Path(project): Path<String>,
) -> Result<Html<String>, LogError> {
    let name = project.clone();
    let subjects = with_store(store, move |s| service::list_subjects(s, &name)).await?;
    Ok(Html(pages::project(&project, &subjects)))
}

async fn subject(
    State(store): State<SharedStore>,
    Path((project, subject)): Path<(String, String)>,
) -> Result<Html<String>, LogError> {
    let (p, s) = (project.clone(), subject.clone());
    let headers = with_store(store, move |store| service::list_headers(store, &p, &s)).await?;
    Ok(Html(pages::subject(&project, &subject, &headers)))
}

async fn entry(
    State(store): State<SharedStore>,
    Path((project, subject, id)): Path<(String, String, String)>,
) -> Result<Response, LogError> {
    let address = EntryAddress::parse(&project, &subject, &id)?;
    let entry = with_store(store, move |s| service::resolve(s, &address)).await?;

    // 存储的类型不是合法的 header 值时退回二进制流
    let content_type = HeaderValue::from_str(&entry.mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    Ok(([(header::CONTENT_TYPE, content_type)], entry.body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryId;

    #[test]
    fn test_urlencoded_keeps_raw_bytes() {
        let form = UploadForm::from_urlencoded(b"body=%FF%FE%00%01&mimeType=application%2Foctet-stream");
        assert_eq!(form.body, Some(vec![0xFF, 0xFE, 0x00, 0x01]));
        assert_eq!(form.mime_type.as_deref(), Some("application/octet-stream"));
    }

    #[test]
    fn test_urlencoded_plus_and_first_value() {
        let form = UploadForm::from_urlencoded(b"body=a+b%2Bc&body=second&other=1&mimeType");
        assert_eq!(form.body.as_deref(), Some(&b"a b+c"[..]));
        assert_eq!(form.mime_type.as_deref(), Some(""));

        let empty = UploadForm::from_urlencoded(b"");
        assert!(empty.body.is_none());
        assert!(empty.mime_type.is_none());
    }

    #[test]
    fn test_error_status_codes() {
        let id: EntryId = "1".parse().unwrap();
        let cases = [
            (LogError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (LogError::InvalidId("x".into()), StatusCode::BAD_REQUEST),
            (LogError::NotFound(id), StatusCode::NOT_FOUND),
            (LogError::LockPoisoned, StatusCode::INTERNAL_SERVER_ERROR),
            (
                LogError::Storage(rusqlite::Error::InvalidQuery),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
