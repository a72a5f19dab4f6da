use axum::http::StatusCode;
use axum::Json;

use crate::domain::error::ServiceError;
use crate::transport::http::types::ApiResponse;

/// Maps a service error to its HTTP status plus the response envelope.
pub fn service_error_response(err: ServiceError) -> (StatusCode, Json<ApiResponse>) {
    let status = match &err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
        ServiceError::Forbidden => StatusCode::FORBIDDEN,
        ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        ServiceError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::err(err.to_string())))
}
