use actix_web::{error, http::header::ContentType, http::StatusCode, HttpRequest, HttpResponse};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::models::ErrorResponse;

/// Errors surfaced to HTTP clients, rendered as `{"detail": ...}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = match self {
            ApiError::BadRequest(message) | ApiError::NotFound(message) => json!(message),
            ApiError::Validation(problems) => json!(problems),
            ApiError::Internal => json!("Internal server error"),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse { detail })
    }
}

/// 200 response with a JSON body; a body that cannot be serialized is a 500
pub fn json_response<T: Serialize>(value: &T) -> Result<HttpResponse, ApiError> {
    let body = serde_json::to_string(value).map_err(|e| {
        tracing::error!("Failed to serialize response body: {}", e);
        ApiError::Internal
    })?;

    Ok(HttpResponse::Ok().content_type(ContentType::json()).body(body))
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::BadRequest(format!("Invalid JSON: {}", err)).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    ApiError::BadRequest(format!("Invalid query: {}", err)).into()
}
