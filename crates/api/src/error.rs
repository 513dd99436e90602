use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use storyreel_client::ClientError;
use storyreel_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`ClientError`] for failures
/// of the backend behind the gateway. Implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `storyreel_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The backend refused the request or could not be reached.
    #[error(transparent)]
    Upstream(#[from] ClientError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND".to_string(),
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR".to_string(),
                    msg.clone(),
                ),
                CoreError::Conflict(msg) => {
                    (StatusCode::CONFLICT, "CONFLICT".to_string(), msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Backend errors ---
            AppError::Upstream(err) => classify_upstream_error(err),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, String, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR".to_string(),
        "An internal error occurred".to_string(),
    )
}

/// Classify a backend error into an HTTP status, error code, and message.
///
/// - Backend rejections keep their status. A JSON `{error, code}` body is
///   forwarded as-is; any other body becomes the message.
/// - Backend 5xx responses are sanitized.
/// - Transport and decode failures map to 502.
fn classify_upstream_error(err: &ClientError) -> (StatusCode, String, String) {
    match err {
        ClientError::Api { status, body } => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
            if status.is_server_error() {
                tracing::error!(status = status.as_u16(), %body, "Backend error");
                return (
                    status,
                    "UPSTREAM_ERROR".to_string(),
                    "The story backend failed to handle the request".to_string(),
                );
            }

            let forwarded = serde_json::from_str::<serde_json::Value>(body).ok();
            let message = forwarded
                .as_ref()
                .and_then(|v| v["error"].as_str())
                .map(str::to_string)
                .unwrap_or_else(|| body.trim().to_string());
            let code = forwarded
                .as_ref()
                .and_then(|v| v["code"].as_str())
                .map(str::to_string)
                .unwrap_or_else(|| code_for_status(status).to_string());
            (status, code, message)
        }
        ClientError::Request(e) => {
            tracing::error!(error = %e, "Backend unreachable");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNAVAILABLE".to_string(),
                "The story backend could not be reached".to_string(),
            )
        }
        ClientError::Decode(e) => {
            tracing::error!(error = %e, "Backend returned an unexpected body");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_INVALID_RESPONSE".to_string(),
                "The story backend returned an unexpected response".to_string(),
            )
        }
    }
}

fn code_for_status(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => "VALIDATION_ERROR",
        StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
        StatusCode::FORBIDDEN => "FORBIDDEN",
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::CONFLICT => "CONFLICT",
        _ => "UPSTREAM_ERROR",
    }
}
