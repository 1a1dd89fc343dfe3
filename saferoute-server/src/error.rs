use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// A newer request started before this one finished
    Superseded,
    InternalServerError(String),
}

impl From<saferoute_core::Error> for ApiError {
    fn from(error: saferoute_core::Error) -> Self {
        use saferoute_core::Error;
        match error {
            Error::InvalidData(_) | Error::GeoJsonError(_) | Error::JsonError(_) => {
                ApiError::BadRequest(error.to_string())
            }
            other => ApiError::InternalServerError(other.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(error: tokio::task::JoinError) -> Self {
        ApiError::InternalServerError(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Superseded => (
                StatusCode::CONFLICT,
                "superseded by a newer request".to_string(),
            ),
            ApiError::InternalServerError(message) => {
                tracing::error!("{message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
