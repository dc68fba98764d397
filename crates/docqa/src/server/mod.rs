//! HTTP server for the document Q&A service

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::DocQaConfig;
use crate::error::Result;
use state::AppState;

/// Document Q&A HTTP server
pub struct DocQaServer {
    config: DocQaConfig,
    state: AppState,
}

impl DocQaServer {
    /// Create a new server using tesseract for OCR
    pub fn new(config: DocQaConfig) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Create a server around existing state
    pub fn with_state(state: AppState) -> Self {
        Self {
            config: state.config().clone(),
            state,
        }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        let router = Router::new()
            // Health check
            .route("/health", get(health_check))
            .route("/ready", get(readiness))
            .nest("/api", routes::api_routes(self.config.server.max_upload_size))
            .with_state(self.state.clone())
            // Middleware layers (order matters - applied bottom to top)
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new());

        if self.config.server.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any);
            router.layer(cors)
        } else {
            router
        }
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| crate::error::Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.router();

        tracing::info!("Starting document Q&A server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::error::Error::Config(format!("Failed to bind: {}", e)))?;
        self.state.set_ready(true);

        let result = axum::serve(listener, router)
            .await
            .map_err(|e| crate::error::Error::Internal(format!("Server error: {}", e)));
        self.state.set_ready(false);

        result
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }

    /// Get the shared state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint
async fn readiness(state: axum::extract::State<AppState>) -> axum::http::StatusCode {
    if state.is_ready() {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::ingestion::{OcrAttempt, OcrEngine};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use std::path::Path;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "docqa-test-boundary";

    /// Treats the uploaded bytes as the recognised text; "FAIL" makes every attempt error
    struct EchoOcr;

    impl OcrEngine for EchoOcr {
        fn recognize(&self, image: &Path, _attempt: &OcrAttempt) -> crate::error::Result<String> {
            let text = std::fs::read_to_string(image)?;
            if text == "FAIL" {
                return Err(Error::internal("engine crashed"));
            }
            Ok(text)
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    fn test_server(dir: &Path) -> DocQaServer {
        let mut config = DocQaConfig::default();
        config.upload.upload_dir = dir.join("uploads");
        let state = AppState::with_ocr_engine(config, Arc::new(EchoOcr)).unwrap();
        DocQaServer::with_state(state)
    }

    fn multipart(files: &[(&str, &str)]) -> Body {
        let mut body = String::new();
        if files.is_empty() {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nnothing attached\r\n"
            ));
        }
        for (name, content) in files {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{content}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        Body::from(body)
    }

    async fn upload(router: &Router, session: Option<&str>, files: &[(&str, &str)]) -> (StatusCode, Option<String>, Value) {
        let mut request = Request::post("/api/upload").header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        if let Some(id) = session {
            request = request.header(routes::SESSION_HEADER, id);
        }
        let response = router
            .clone()
            .oneshot(request.body(multipart(files)).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let session = response
            .headers()
            .get(routes::SESSION_HEADER)
            .map(|v| v.to_str().unwrap().to_string());
        (status, session, body_json(response).await)
    }

    async fn post_json(router: &Router, path: &str, session: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut request = Request::post(path).header(header::CONTENT_TYPE, "application/json");
        if let Some(id) = session {
            request = request.header(routes::SESSION_HEADER, id);
        }
        let response = router
            .clone()
            .oneshot(request.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    }

    const RECEIPT: &str = "Name: John Smith\nAmount: ₹500\nReference Number: AB1234";

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_server(dir.path()).router();
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_upload_ask_search_flow() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_server(dir.path()).router();

        let (status, session, body) = upload(&router, None, &[("fee receipt.png", RECEIPT)]).await;
        assert_eq!(status, StatusCode::OK);
        let session = session.expect("session header");
        assert_eq!(body["session_id"], json!(session));
        assert_eq!(body["total_files"], json!(1));
        assert_eq!(body["results"][0]["filename"], json!("fee_receipt.png"));
        assert_eq!(body["results"][0]["word_count"], json!(8));
        let stored = body["results"][0]["filepath"].as_str().unwrap().to_string();
        assert!(Path::new(&stored).exists());

        let (status, body) =
            post_json(&router, "/api/ask", Some(session.as_str()), json!({"question": "  Who is the student? "})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["question"], json!("Who is the student?"));
        assert_eq!(body["category"], json!("who"));
        assert_eq!(
            body["answer"],
            json!("Based on the document, the person mentioned is: John Smith")
        );

        let (_, body) =
            post_json(&router, "/api/ask", Some(session.as_str()), json!({"question": "How much was paid?"})).await;
        assert_eq!(body["answer"], json!("The amount mentioned is: ₹500"));

        let (status, body) =
            post_json(&router, "/api/search", Some(session.as_str()), json!({"search_term": "smith"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], json!(1));
        assert_eq!(body["matches"][0], json!({"start": 11, "end": 16, "text": "Smith"}));

        let (status, _) =
            post_json(&router, "/api/clear_session", Some(session.as_str()), json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!Path::new(&stored).exists());

        let (status, body) =
            post_json(&router, "/api/ask", Some(session.as_str()), json!({"question": "Who?"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Please upload and process documents first"));
    }

    #[tokio::test]
    async fn test_ask_validation() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_server(dir.path()).router();

        let (status, body) = post_json(&router, "/api/ask", None, json!({"question": "   "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Please enter a question"));

        let (status, body) = post_json(&router, "/api/ask", None, json!({"question": "Who?"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Please upload and process documents first"));
    }

    #[tokio::test]
    async fn test_search_without_documents() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_server(dir.path()).router();

        let (status, body) = post_json(&router, "/api/search", None, json!({"search_term": "x"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"matches": [], "count": 0}));
    }

    #[tokio::test]
    async fn test_upload_rejections() {
        let dir = tempfile::tempdir().unwrap();
        let server = test_server(dir.path());
        let router = server.router();

        let (status, _, body) = upload(&router, None, &[("notes.pdf", RECEIPT)]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Invalid file type: notes.pdf"));

        let (status, _, body) = upload(&router, None, &[]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("No files selected"));

        let (status, _, body) = upload(&router, None, &[("blank.png", "   ")]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("No text could be extracted from blank.png"));

        let (status, _, body) = upload(&router, None, &[("broken.png", "FAIL")]).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("OCR processing failed for broken.png"));

        // Nothing from the failed requests is left on disk
        let leftover = std::fs::read_dir(dir.path().join("uploads")).unwrap().count();
        assert_eq!(leftover, 0);

        // Sessions created by the failed requests are not kept
        assert!(server.state().sessions().is_empty());
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_existing_session() {
        let dir = tempfile::tempdir().unwrap();
        let server = test_server(dir.path());
        let router = server.router();

        let (status, body) = post_json(&router, "/api/session", None, json!({})).await;
        assert_eq!(status, StatusCode::OK);
        let session = body["session_id"].as_str().unwrap().to_string();

        for _ in 0..3 {
            let (status, _, _) = upload(&router, Some(session.as_str()), &[("notes.pdf", RECEIPT)]).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
        for _ in 0..3 {
            let (status, _, _) = upload(&router, None, &[("notes.pdf", RECEIPT)]).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
        assert_eq!(server.state().sessions().len(), 1);

        let (status, session_again, _) = upload(&router, Some(session.as_str()), &[("scan.png", RECEIPT)]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session_again.as_deref(), Some(session.as_str()));
    }

    #[tokio::test]
    async fn test_same_filename_in_two_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_server(dir.path()).router();

        let (_, first, first_body) = upload(&router, None, &[("scan.png", RECEIPT)]).await;
        let (_, second, second_body) =
            upload(&router, None, &[("scan.png", "Date: 05/06/2024 issued")]).await;
        let (first, second) = (first.unwrap(), second.unwrap());
        assert_ne!(first, second);

        let first_path = first_body["results"][0]["filepath"].as_str().unwrap().to_string();
        let second_path = second_body["results"][0]["filepath"].as_str().unwrap().to_string();
        assert_ne!(first_path, second_path);
        assert_eq!(std::fs::read_to_string(&first_path).unwrap(), RECEIPT);

        let (status, _) = post_json(&router, "/api/clear_session", Some(first.as_str()), json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!Path::new(&first_path).exists());
        assert!(Path::new(&second_path).exists());

        let (_, body) =
            post_json(&router, "/api/ask", Some(second.as_str()), json!({"question": "When was it issued?"})).await;
        assert_eq!(body["answer"], json!("The date/time mentioned is: 05/06/2024 issued"));
    }

    #[tokio::test]
    async fn test_same_filename_twice_in_one_upload() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_server(dir.path()).router();

        let (status, _, body) = upload(
            &router,
            None,
            &[("scan.png", RECEIPT), ("scan.png", "Date: 05/06/2024 issued")],
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let first = body["results"][0]["filepath"].as_str().unwrap();
        let second = body["results"][1]["filepath"].as_str().unwrap();
        assert_ne!(first, second);
        assert_eq!(std::fs::read_to_string(first).unwrap(), RECEIPT);
    }

    #[tokio::test]
    async fn test_readiness() {
        let dir = tempfile::tempdir().unwrap();
        let server = test_server(dir.path());
        let router = server.router();

        let ready = |router: Router| async move {
            router
                .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
                .await
                .unwrap()
                .status()
        };

        assert_eq!(ready(router.clone()).await, StatusCode::SERVICE_UNAVAILABLE);
        server.state().set_ready(true);
        assert_eq!(ready(router.clone()).await, StatusCode::OK);
        server.state().set_ready(false);
        assert_eq!(ready(router).await, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_upload_replaces_documents_and_delete_file() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_server(dir.path()).router();

        let (_, session, _) = upload(&router, None, &[("old.png", "Old receipt text here")]).await;
        let session = session.unwrap();

        let (status, session_again, body) = upload(
            &router,
            Some(session.as_str()),
            &[("a.png", "Name: Priya Nair lives here"), ("b.png", "Date: 05/06/2024 issued")],
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session_again.as_deref(), Some(session.as_str()));
        assert_eq!(body["total_files"], json!(2));

        let response = router
            .clone()
            .oneshot(
                Request::get("/api/documents")
                    .header(routes::SESSION_HEADER, &session)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let listing = body_json(response).await;
        assert_eq!(listing["total_count"], json!(2));
        assert_eq!(listing["documents"][0]["filename"], json!("a.png"));

        let (status, body) =
            post_json(&router, "/api/delete_file", Some(session.as_str()), json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("No filename provided"));

        let (status, _) =
            post_json(&router, "/api/delete_file", Some(session.as_str()), json!({"filename": "a.png"})).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) =
            post_json(&router, "/api/ask", Some(session.as_str()), json!({"question": "When was it issued?"})).await;
        assert_eq!(body["answer"], json!("The date/time mentioned is: 05/06/2024 issued"));
    }

    #[tokio::test]
    async fn test_new_session() {
        let dir = tempfile::tempdir().unwrap();
        let server = test_server(dir.path());
        let router = server.router();

        let (status, body) = post_json(&router, "/api/session", None, json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["session_id"].is_string());
        assert_eq!(server.state().sessions().len(), 1);
    }
}
