//! Staffgate Web - HTTP gateway
//!
//! The JSON gateway in front of the four entity stores. Every route runs
//! inside the session middleware: resolve identity on the way in, persist it
//! and settle the `session_id` cookie on the way out.

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{StaffgateServer, StaffgateServerBuilder};
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use staffgate_app::AppError;
use staffgate_core::{GatewayConfig, StoreError};

/// Create the gateway router.
pub fn create_app(state: AppState) -> Router {
    routes::gateway_routes()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Configuration for the web gateway.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Store endpoints, TTL, timeouts and pagination defaults
    pub gateway: GatewayConfig,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            gateway: GatewayConfig::default(),
        }
    }
}

impl WebConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("STAFFGATE_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("STAFFGATE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            gateway: GatewayConfig::from_env(),
        }
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Error type for the web gateway.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error(transparent)]
    App(#[from] AppError),

    /// Malformed request body or parameters, caught before any workflow runs.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

pub type WebResult<T> = Result<T, WebError>;

impl WebError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::App(AppError::Unauthorized { .. }) => StatusCode::UNAUTHORIZED,
            Self::App(AppError::Conflict { .. }) => StatusCode::CONFLICT,
            Self::App(AppError::Store(store)) => match store {
                StoreError::Unreachable { .. } => StatusCode::SERVICE_UNAVAILABLE,
                StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                StoreError::Conflict { .. } => StatusCode::CONFLICT,
                StoreError::Validation { .. } => StatusCode::BAD_REQUEST,
                StoreError::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = serde_json::json!({
            "error": status.as_u16(),
            "reason": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

/// Initialize logging for the gateway binary.
pub fn init_logging() {
    staffgate_core::init_logging(
        "staffgate_web=debug,staffgate_app=debug,staffgate_store=debug,tower_http=info",
    );
}
