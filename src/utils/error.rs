use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;
use crate::utils::response::error as error_response;

pub const INVALID_DATA: &str = "Invalid data.";
pub const EVENT_NAME_REQUIRED: &str = "Event name is required.";
pub const MISMATCHED_ORDER_ID: &str = "Mismatched order ID.";
pub const MISSING_REFERENCE: &str = "Referenced event or customer does not exist.";
pub const ORDER_IDS_EXHAUSTED: &str = "No order ids are left to assign.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => {
                warn!(code = self.code(), message = %msg, "Request rejected");
            }
            AppError::ServiceUnavailable(msg) => {
                error!(message = %msg, "Service unavailable");
            }
            AppError::InternalServerError(msg) => {
                error!(message = %msg, "Internal server error");
            }
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingReference => AppError::ValidationError(MISSING_REFERENCE.to_string()),
            StoreError::DuplicateOrder(order_id) => {
                AppError::Conflict(format!("Order {} already exists.", order_id))
            }
            StoreError::OrderIdsExhausted => {
                AppError::InternalServerError(ORDER_IDS_EXHAUSTED.to_string())
            }
            StoreError::Database(e) => AppError::DatabaseError(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Not-found answers carry no body; the status says it all.
        let public_message = match &self {
            AppError::NotFound(_) => return status.into_response(),
            AppError::ValidationError(msg)
            | AppError::Conflict(msg)
            | AppError::ServiceUnavailable(msg)
            | AppError::InternalServerError(msg) => msg.clone(),
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
        };

        error_response(code, public_message, None, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_error_kind() {
        assert_eq!(
            AppError::ValidationError(INVALID_DATA.to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("order 1".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("dup".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_errors_map_to_client_errors() {
        let missing = AppError::from(StoreError::MissingReference);
        assert!(matches!(missing, AppError::ValidationError(ref msg) if msg == MISSING_REFERENCE));

        let duplicate = AppError::from(StoreError::DuplicateOrder(3));
        assert!(matches!(duplicate, AppError::Conflict(ref msg) if msg == "Order 3 already exists."));

        let exhausted = AppError::from(StoreError::OrderIdsExhausted);
        assert_eq!(exhausted.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(exhausted, AppError::InternalServerError(ref msg) if msg == ORDER_IDS_EXHAUSTED));

        let database = AppError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(database.code(), "DATABASE_ERROR");
    }

    #[tokio::test]
    async fn test_not_found_response_has_empty_body() {
        let response = AppError::NotFound("order 9".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let response = AppError::DatabaseError(sqlx::Error::PoolTimedOut).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "DATABASE_ERROR");
        assert_eq!(body["error"]["message"], "A database error occurred");
    }
}
