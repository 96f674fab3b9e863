#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! HTTP backend for the financial statement query form.
//!
//! # Usage
//!
//! ```rust,ignore
//! use finform_core::{FinancialsBackend, FormState};
//! use finform_http::HttpBackend;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = HttpBackend::new("http://127.0.0.1:8000")?;
//!
//!     let request = FormState::read(&form).into_request();
//!     let view = backend.query(&request).await?;
//!
//!     if let Some(href) = &view.file_url {
//!         let bytes = backend.download(href).await?;
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use finform_core::{
    FinancialsBackend, FormError, QueryRequest, Result, ResultView, display_text, is_truthy,
};
use reqwest::{Client, Response, Url};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Default server address of the financials service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Path of the financials query endpoint.
pub const FINANCIALS_PATH: &str = "/api/financials";

/// Financials backend reached over HTTP.
///
/// Each query is a single `POST` without retry and without a client-side
/// timeout; the transport's own behavior applies.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl HttpBackend {
    /// Create a backend talking to `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Config`] when `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a backend with a custom HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Config`] when `base_url` is not an absolute URL.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FormError::Config(format!("invalid base URL {base_url:?}: {e}")))?;
        Ok(Self { client, base_url })
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a path or link target against the base URL.
    ///
    /// Absolute targets are returned unchanged; paths are origin-relative.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Config`] when the target cannot be joined.
    pub fn resolve(&self, href: &str) -> Result<Url> {
        self.base_url
            .join(href)
            .map_err(|e| FormError::Config(format!("invalid link target {href:?}: {e}")))
    }
}

#[async_trait]
impl FinancialsBackend for HttpBackend {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn query(&self, request: &QueryRequest) -> Result<ResultView> {
        let url = self.resolve(FINANCIALS_PATH)?;
        debug!(
            url = %url,
            symbols = request.payload.symbols.len(),
            period_type = %request.payload.period_type,
            "Financials request"
        );

        let mut builder = self.client.post(url).json(&request.payload);
        for (name, value) in request.credentials.headers() {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(send_error)?;
        let text = ensure_success(response)
            .await?
            .text()
            .await
            .map_err(|e| FormError::Network(e.to_string()))?;
        ResultView::from_json_str(&text)
    }

    async fn download(&self, href: &str) -> Result<Vec<u8>> {
        let url = self.resolve(href)?;
        debug!(url = %url, "Export download");

        let response = self.client.get(url).send().await.map_err(send_error)?;
        let bytes = ensure_success(response)
            .await?
            .bytes()
            .await
            .map_err(|e| FormError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

fn send_error(e: reqwest::Error) -> FormError {
    if e.is_builder() {
        FormError::Config(e.to_string())
    } else {
        FormError::Network(e.to_string())
    }
}

/// Pass success responses through; turn anything else into a server error.
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), "Server reported failure");
    Err(FormError::server(status.as_u16(), error_detail(&text)))
}

/// Extract the `detail` of an error body.
///
/// Returns `None` when the body is not JSON or `detail` is missing or falsy.
/// Validation errors (`detail` as a list of objects with `msg`) are joined
/// with `; `.
pub fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail").filter(|d| is_truthy(d))?;
    let text = match detail {
        Value::Array(items) => items
            .iter()
            .map(|item| match item.get("msg") {
                Some(msg) => display_text(msg),
                None => display_text(item),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => display_text(other),
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode},
        routing::{get, post},
    };
    use finform_core::{
        Credentials, FieldNumber, OPENAI_KEY_HEADER, PeriodType, RequestPayload, Symbol,
        TUSHARE_TOKEN_HEADER,
    };
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    #[derive(Clone, Default)]
    struct Captured {
        headers: Arc<Mutex<Option<HeaderMap>>>,
        body: Arc<Mutex<Option<Value>>>,
    }

    async fn spawn_server(status: StatusCode, response: &'static str) -> (String, Captured) {
        let captured = Captured::default();
        let state = captured.clone();
        let app = Router::new()
            .route(
                FINANCIALS_PATH,
                post(move |headers: HeaderMap, Json(body): Json<Value>| async move {
                    *state.headers.lock().unwrap() = Some(headers);
                    *state.body.lock().unwrap() = Some(body);
                    (status, response)
                }),
            )
            .route(
                "/api/download/:token",
                get(|| async { (StatusCode::OK, vec![0x50_u8, 0x4b, 0x03, 0x04]) }),
            )
            .route(
                "/api/missing/:token",
                get(|| async {
                    (StatusCode::NOT_FOUND, r#"{"detail":"file expired"}"#)
                }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (format!("http://{addr}"), captured)
    }

    fn request(credentials: Credentials) -> QueryRequest {
        QueryRequest {
            payload: RequestPayload {
                symbols: vec![Symbol::new("600519.SH"), Symbol::new("AAPL")],
                period_type: PeriodType::Quarter,
                start_year: FieldNumber::from(2022),
                end_year: FieldNumber::from(2023),
                start_quarter: Some(FieldNumber::from(1)),
                end_quarter: Some(FieldNumber::from(4)),
                filename: Some("report".to_string()),
            },
            credentials,
        }
    }

    #[test]
    fn test_resolve_links() {
        let backend = HttpBackend::new("http://localhost:8000/app/").unwrap();
        assert_eq!(
            backend.resolve("/api/download/a.xlsx").unwrap().as_str(),
            "http://localhost:8000/api/download/a.xlsx"
        );
        assert_eq!(
            backend.resolve("https://cdn.example.com/x.xlsx").unwrap().as_str(),
            "https://cdn.example.com/x.xlsx"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpBackend::new("not a url").unwrap_err();
        assert!(matches!(err, FormError::Config(_)));
    }

    #[test]
    fn test_backend_metadata() {
        let backend = HttpBackend::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(backend.name(), "HTTP");
        assert!(format!("{backend:?}").contains("127.0.0.1:8000"));
    }

    #[test]
    fn test_error_detail_shapes() {
        assert_eq!(error_detail(r#"{"detail":"bad token"}"#).as_deref(), Some("bad token"));
        assert_eq!(error_detail(r#"{"detail":""}"#), None);
        assert_eq!(error_detail(r#"{"message":"x"}"#), None);
        assert_eq!(error_detail("Internal Server Error"), None);
        assert_eq!(
            error_detail(
                r#"{"detail":[{"loc":["body","symbols"],"msg":"field required"},{"msg":"too long"}]}"#
            )
            .as_deref(),
            Some("field required; too long")
        );
    }

    #[tokio::test]
    async fn test_query_sends_body_and_headers() {
        let (url, captured) = spawn_server(
            StatusCode::OK,
            r#"{"summary":"ok","columns":["A","B"],"rows":[[1,2],[3,4]]}"#,
        )
        .await;
        let backend = HttpBackend::new(&url).unwrap();

        let view = backend
            .query(&request(Credentials::from_fields("tok", "sk-key")))
            .await
            .unwrap();
        assert_eq!(view.summary.as_deref(), Some("ok"));
        assert_eq!(view.rows.len(), 2);

        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "symbols": ["600519.SH", "AAPL"],
                "period_type": "quarter",
                "start_year": 2022,
                "end_year": 2023,
                "start_quarter": 1,
                "end_quarter": 4,
                "filename": "report"
            })
        );

        let headers = captured.headers.lock().unwrap().clone().unwrap();
        assert_eq!(headers[TUSHARE_TOKEN_HEADER], "tok");
        assert_eq!(headers[OPENAI_KEY_HEADER], "sk-key");
        assert_eq!(headers["content-type"], "application/json");
    }

    #[tokio::test]
    async fn test_query_omits_empty_credentials() {
        let (url, captured) = spawn_server(StatusCode::OK, "{}").await;
        let backend = HttpBackend::new(&url).unwrap();

        let view = backend.query(&request(Credentials::default())).await.unwrap();
        assert_eq!(view, ResultView::default());

        let headers = captured.headers.lock().unwrap().clone().unwrap();
        assert!(!headers.contains_key(TUSHARE_TOKEN_HEADER));
        assert!(!headers.contains_key(OPENAI_KEY_HEADER));
    }

    #[tokio::test]
    async fn test_query_server_error_with_detail() {
        let (url, _captured) =
            spawn_server(StatusCode::INTERNAL_SERVER_ERROR, r#"{"detail":"bad token"}"#).await;
        let backend = HttpBackend::new(&url).unwrap();

        let err = backend.query(&request(Credentials::default())).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "bad token");
    }

    #[tokio::test]
    async fn test_query_server_error_unparsable_body() {
        let (url, _captured) =
            spawn_server(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>").await;
        let backend = HttpBackend::new(&url).unwrap();

        let err = backend.query(&request(Credentials::default())).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_query_malformed_success_body() {
        let (url, _captured) = spawn_server(StatusCode::OK, "not json").await;
        let backend = HttpBackend::new(&url).unwrap();

        let err = backend.query(&request(Credentials::default())).await.unwrap_err();
        assert!(matches!(err, FormError::Parse(_)));
    }

    #[tokio::test]
    async fn test_query_network_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = HttpBackend::new(&format!("http://{addr}")).unwrap();
        let err = backend.query(&request(Credentials::default())).await.unwrap_err();
        assert!(matches!(err, FormError::Network(_)));
    }

    #[tokio::test]
    async fn test_download_relative_link() {
        let (url, _captured) = spawn_server(StatusCode::OK, "{}").await;
        let backend = HttpBackend::new(&url).unwrap();

        let bytes = backend.download("/api/download/10.15.xlsx").await.unwrap();
        assert_eq!(bytes, b"PK\x03\x04");

        let err = backend.download("/api/missing/old.xlsx").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "file expired");
    }
}
