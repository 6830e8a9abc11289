pub mod handlers;
pub mod pages;

use crate::config::cli::LocalStorage;
use crate::config::toml_config::ServerConfig;
use crate::utils::error::{EtlError, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub storage: LocalStorage,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            storage: LocalStorage::new(config.upload_dir().to_string()),
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/", get(pages::index))
        .route("/index.html", get(pages::index))
        .route(pages::SIGNUP_PAGE, get(pages::signup))
        .route(pages::UPLOAD_PAGE, get(pages::upload))
        .route(pages::SCRIPT_PATH, get(pages::script))
        .route(pages::API_SCRIPT_PATH, get(pages::api_script))
        .route("/upload", post(handlers::upload))
        .route("/process", post(handlers::process))
        .route("/download/:name", get(handlers::download))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 綁定設定檔中的位址並持續服務直到程序結束
pub async fn serve(config: ServerConfig) -> Result<()> {
    let addr = config.bind_address()?;
    tokio::fs::create_dir_all(config.upload_dir()).await?;

    let app = router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🌐 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

impl IntoResponse for EtlError {
    fn into_response(self) -> Response {
        let status = match &self {
            EtlError::NotFoundError { .. } => StatusCode::NOT_FOUND,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(
                "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
                self,
                self.category(),
                self.severity()
            );
        } else {
            tracing::warn!("⚠️ Rejected request: {}", self);
        }

        let body = serde_json::json!({ "error": self.user_friendly_message() });
        (status, Json(body)).into_response()
    }
}
