use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{success, ApiErrorResponse};

pub mod openapi;
pub mod ticket_orders;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
    storage: &'static str,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service and storage are reachable"),
        (status = 503, description = "Storage is unreachable", body = ApiErrorResponse)
    )
)]
/// Report service health and which storage backend is in use.
pub async fn health_check(State(state): State<AppState>) -> Response {
    if let Err(e) = state.store.health_check().await {
        tracing::error!(error = ?e, "Storage health check failed");
        return AppError::ServiceUnavailable("Storage is unreachable".to_string()).into_response();
    }

    let payload = HealthPayload {
        status: "ok",
        service: "city-events-api",
        storage: state.store.backend_name(),
    };

    success(payload, "Health check successful").into_response()
}
