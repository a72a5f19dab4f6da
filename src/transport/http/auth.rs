//! The access gate: one predicate per request.
//!
//! A caller is admitted when its bearer token resolves to an employee account
//! that is active. Missing or unknown tokens are an authentication failure,
//! an inactive account an authorization failure; both are rejected before any
//! resource access. The admin console does not pass through here (it is a
//! separate trust boundary with direct database access).

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

use crate::storage::employees;
use crate::transport::http::types::{ApiResponse, AppState};

pub async fn require_active_employee(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_string());

    let Some(token) = token else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::err("authentication required")),
        )
            .into_response();
    };

    match employees::find_by_token(&state.pool, &token).await {
        Ok(Some(employee)) if employee.is_active => {
            request.extensions_mut().insert(employee);
            next.run(request).await
        }
        Ok(Some(employee)) => {
            warn!(username = %employee.username, "inactive employee rejected");
            (
                StatusCode::FORBIDDEN,
                Json(ApiResponse::err("account is inactive")),
            )
                .into_response()
        }
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::err("authentication required")),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::err(format!("employee lookup failed: {e}"))),
        )
            .into_response(),
    }
}
