//! HTTP boundary: the two-endpoint JSON API.
//!
//! The wire contract is deliberately tiny:
//!
//! * `GET /api/check-api-key` → `{ "hasApiKey": bool, "message": string }`
//! * `POST /api/convert` `{ "text": string }` → `{ "markdown": string }`,
//!   or 400 `{ "error": string }` when `text` is missing, not a string, or
//!   empty.
//!
//! Conversion cannot fail (the heuristic fallback is total), so a valid
//! request always gets a 200 with Markdown — a failing completion service is
//! recovered inside [`crate::convert::convert`] and never surfaces here.

use crate::config::ConversionConfig;
use crate::convert::convert;
use crate::error::ProseMdError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Build the API router around a shared conversion config.
///
/// Exposed separately from [`serve`] so tests can bind an ephemeral port
/// and callers can mount the API under a larger application.
pub fn router(config: ConversionConfig) -> Router {
    let state = Arc::new(config);
    Router::new()
        .route("/api/check-api-key", get(check_api_key))
        .route("/api/convert", post(convert_text))
        .with_state(state)
}

/// Serve the API on an already-bound listener until the task is dropped.
pub async fn serve(
    listener: TcpListener,
    config: ConversionConfig,
) -> Result<(), ProseMdError> {
    let addr = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());
    info!("prose2md API listening on {addr}");

    axum::serve(listener, router(config))
        .await
        .map_err(|e| ProseMdError::Server {
            addr,
            detail: e.to_string(),
        })
}

/// Bind `addr` and serve the API.
pub async fn bind_and_serve(
    addr: &str,
    config: ConversionConfig,
) -> Result<(), ProseMdError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ProseMdError::Server {
            addr: addr.to_string(),
            detail: e.to_string(),
        })?;
    serve(listener, config).await
}

// ── Handlers ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ApiKeyStatus {
    #[serde(rename = "hasApiKey")]
    has_api_key: bool,
    message: &'static str,
}

async fn check_api_key(State(config): State<Arc<ConversionConfig>>) -> Json<ApiKeyStatus> {
    let has_api_key = config.has_service();
    Json(ApiKeyStatus {
        has_api_key,
        message: if has_api_key {
            "OpenAI APIキーが設定されています"
        } else {
            "OpenAI APIキーが設定されていません"
        },
    })
}

#[derive(Serialize)]
struct ConvertResponse {
    markdown: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn convert_text(
    State(config): State<Arc<ConversionConfig>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    // Missing, non-string, and empty text are all rejected identically.
    let Some(text) = body
        .get("text")
        .and_then(|v| v.as_str())
        .filter(|t| !t.is_empty())
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: ProseMdError::MissingText.to_string(),
            }),
        )
            .into_response();
    };

    let output = convert(text, &config).await;
    Json(ConvertResponse {
        markdown: output.markdown,
    })
    .into_response()
}
