//! HTTP surface for the PeTTa execution pipeline.
//!
//! One JSON endpoint, `POST /run`, hands the submitted snippet to a
//! [`CodeExecutor`] and returns whatever shape the pipeline produced. Every
//! pipeline outcome is HTTP 200; callers distinguish success from failure by
//! the presence of the `error` key in the body, not by status code. The
//! router is generic over the executor seam so it can be exercised in tests
//! with a mock, the same way it is wired to the real runner in the binary.

pub mod error;

pub use error::{Result, ServerError};
pub use petta_run_core::{CodeExecutor, PettaRunner, RunRequest, RunResponse, RunnerConfig};

use axum::extract::{Json as AxumJson, State};
use axum::response::Json;
use axum::routing::{get, post};
use axum::{middleware, Router};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

/// Configuration for the run server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// CORS allowed origins (if empty, allows any origin)
    pub cors_origins: Vec<String>,
    /// Enable request logging
    pub enable_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".parse().unwrap(),
            // The Vite dev server hosting the editor frontend.
            cors_origins: vec!["http://localhost:5173".to_string()],
            enable_logging: true,
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address.
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Parse and set the bind address from a string.
    pub fn with_bind_addr_str(mut self, addr: &str) -> Result<Self> {
        self.bind_addr = addr
            .parse()
            .map_err(|e| ServerError::config_error(format!("Invalid bind address: {}", e)))?;
        Ok(self)
    }

    /// Set allowed CORS origins. An empty list allows any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Enable or disable request logging.
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }
}

/// Shared application state containing the executor.
#[derive(Clone)]
pub struct AppState<T: CodeExecutor + Clone> {
    pub executor: T,
}

/// Handler for the /run POST endpoint.
///
/// Always responds 200 with one of the two body shapes; the pipeline folds
/// its own failures into the `Failed` variant before they get here.
async fn run_handler<T: CodeExecutor + Clone>(
    State(state): State<AppState<T>>,
    AxumJson(request): AxumJson<RunRequest>,
) -> Json<RunResponse> {
    log::info!("Received run request ({} bytes of code)", request.code.len());

    let response = state.executor.run(&request.code).await;
    match &response {
        RunResponse::Completed { returncode, .. } => {
            log::info!("Run completed with returncode {}", returncode);
        }
        RunResponse::Failed { error } => {
            log::warn!("Run failed: {}", error);
        }
    }

    Json(response)
}

/// The run server.
pub struct PettaRunServer<T: CodeExecutor + Clone> {
    executor: T,
    config: ServerConfig,
}

impl<T: CodeExecutor + Clone + Send + Sync + 'static> PettaRunServer<T> {
    /// Create a new server with the given executor and default configuration.
    pub fn new(executor: T) -> Self {
        Self {
            executor,
            config: ServerConfig::default(),
        }
    }

    /// Create a new server with custom configuration.
    pub fn with_config(executor: T, config: ServerConfig) -> Self {
        Self { executor, config }
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the Axum router with all routes and middleware.
    pub fn build_router(&self) -> Router {
        let state = AppState {
            executor: self.executor.clone(),
        };

        let mut router = Router::new()
            .route(
                "/health",
                get(|| async {
                    Json(HealthResponse {
                        status: "healthy".to_string(),
                        timestamp: chrono::Utc::now(),
                        version: env!("CARGO_PKG_VERSION").to_string(),
                    })
                }),
            )
            .route("/run", post(run_handler::<T>))
            .with_state(state);

        if self.config.enable_logging {
            router = router.layer(middleware::from_fn(
                |request: axum::http::Request<axum::body::Body>,
                 next: axum::middleware::Next| async {
                    let request_id = uuid::Uuid::new_v4().to_string();
                    let method = request.method().clone();
                    let uri = request.uri().clone();
                    log::info!("Request {} {} {}", request_id, method, uri);

                    let start = std::time::Instant::now();
                    let response = next.run(request).await;
                    let duration = start.elapsed();
                    log::info!("Response {} completed in {:?}", request_id, duration);

                    response
                },
            ));
        }

        router = router.layer(TraceLayer::new_for_http());

        let cors_layer = if self.config.cors_origins.is_empty() {
            CorsLayer::permissive()
        } else {
            let origins: std::result::Result<Vec<_>, _> =
                self.config.cors_origins.iter().map(|s| s.parse()).collect();
            match origins {
                Ok(origins) => CorsLayer::new()
                    .allow_origin(origins)
                    .allow_methods(Any)
                    .allow_headers(Any),
                Err(_) => CorsLayer::permissive(),
            }
        };
        router.layer(cors_layer)
    }

    /// Start the server and listen for connections.
    ///
    /// This method will block until the server is shut down.
    pub async fn serve(self) -> Result<()> {
        let router = self.build_router();
        let listener = TcpListener::bind(self.config.bind_addr)
            .await
            .map_err(|e| {
                ServerError::config_error(format!(
                    "Failed to bind to {}: {}",
                    self.config.bind_addr, e
                ))
            })?;

        log::info!("petta-run server starting on {}", self.config.bind_addr);
        log::info!("Health check: http://{}/health", self.config.bind_addr);
        log::info!("Run endpoint: http://{}/run", self.config.bind_addr);

        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Start the server with graceful shutdown support.
    ///
    /// The server will shut down when the provided shutdown signal is received.
    pub async fn serve_with_shutdown<F>(self, shutdown_signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let listener = TcpListener::bind(self.config.bind_addr)
            .await
            .map_err(|e| {
                ServerError::config_error(format!(
                    "Failed to bind to {}: {}",
                    self.config.bind_addr, e
                ))
            })?;

        log::info!(
            "petta-run server starting on {} with graceful shutdown",
            self.config.bind_addr
        );
        log::info!("Run endpoint: http://{}/run", self.config.bind_addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::internal(format!("Server error: {}", e)))?;

        log::info!("petta-run server shut down gracefully");
        Ok(())
    }
}

/// Utility function to create a shutdown signal from Ctrl+C.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            log::info!("Received SIGTERM, shutting down...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt; // for `oneshot`

    #[derive(Clone)]
    struct MockExecutor {
        response: RunResponse,
        last_code: Arc<Mutex<Option<String>>>,
    }

    impl MockExecutor {
        fn returning(response: RunResponse) -> Self {
            Self {
                response,
                last_code: Arc::new(Mutex::new(None)),
            }
        }
    }

    #[async_trait]
    impl CodeExecutor for MockExecutor {
        async fn run(&self, code: &str) -> RunResponse {
            *self.last_code.lock().unwrap() = Some(code.to_string());
            self.response.clone()
        }
    }

    fn post_run(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/run")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn run_endpoint_returns_completed_shape() {
        let executor = MockExecutor::returning(RunResponse::Completed {
            stdout: "true\nresult: 5".to_string(),
            stderr: String::new(),
            returncode: 0,
        });
        let last_code = executor.last_code.clone();
        let app = PettaRunServer::new(executor).build_router();

        let response = app
            .oneshot(post_run(r#"{"code": "(+ 2 3)"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["stdout"], "true\nresult: 5");
        assert_eq!(body["stderr"], "");
        assert_eq!(body["returncode"], 0);
        assert!(body.get("error").is_none());

        assert_eq!(last_code.lock().unwrap().as_deref(), Some("(+ 2 3)"));
    }

    #[tokio::test]
    async fn pipeline_failure_is_still_http_200() {
        let executor = MockExecutor::returning(RunResponse::failed(
            "PeTTa entry point not found at /srv/petta/src/main.pl",
        ));
        let app = PettaRunServer::new(executor).build_router();

        let response = app.oneshot(post_run(r#"{"code": "(x)"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(body["error"].as_str().unwrap().contains("not found"));
        assert!(body.get("stdout").is_none());
    }

    #[tokio::test]
    async fn empty_code_is_accepted() {
        let executor = MockExecutor::returning(RunResponse::Completed {
            stdout: String::new(),
            stderr: String::new(),
            returncode: 0,
        });
        let last_code = executor.last_code.clone();
        let app = PettaRunServer::new(executor).build_router();

        let response = app.oneshot(post_run(r#"{"code": ""}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(last_code.lock().unwrap().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_before_the_pipeline() {
        let executor = MockExecutor::returning(RunResponse::failed("unreachable"));
        let last_code = executor.last_code.clone();
        let app = PettaRunServer::new(executor).build_router();

        let response = app.oneshot(post_run(r#"{"snippet": "(x)"}"#)).await.unwrap();

        assert!(response.status().is_client_error());
        assert!(last_code.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn health_endpoint_reports_healthy() {
        let executor = MockExecutor::returning(RunResponse::failed("unused"));
        let app = PettaRunServer::new(executor).build_router();

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "healthy");
    }
}
