use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweetError {
    #[error("Sweet not found: {0}")]
    NotFound(ObjectId),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Quantity must be a positive number")]
    InvalidQuantity,

    #[error("Not enough stock available. Available: {available}, Requested: {requested}")]
    InsufficientStock { available: i64, requested: i64 },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type SweetResult<T> = Result<T, SweetError>;

/// Convert SweetError to AppError for standardized error responses
impl From<SweetError> for AppError {
    fn from(err: SweetError) -> Self {
        match err {
            SweetError::NotFound(_) => AppError::NotFound("Sweet not found".to_string()),
            SweetError::Validation(msg) => AppError::BadRequest(msg),
            err @ (SweetError::InvalidQuantity | SweetError::InsufficientStock { .. }) => {
                AppError::BadRequest(err.to_string())
            }
            SweetError::Database(msg) => AppError::Database(msg),
            SweetError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for SweetError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for SweetError {
    fn from(err: mongodb::error::Error) -> Self {
        SweetError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message() {
        let err = SweetError::InsufficientStock {
            available: 5,
            requested: 10,
        };
        assert_eq!(
            err.to_string(),
            "Not enough stock available. Available: 5, Requested: 10"
        );
    }

    #[test]
    fn test_not_found_maps_to_fixed_message() {
        let app: AppError = SweetError::NotFound(ObjectId::new()).into();
        assert!(matches!(app, AppError::NotFound(msg) if msg == "Sweet not found"));
    }

    #[test]
    fn test_invalid_quantity_maps_to_bad_request() {
        let app: AppError = SweetError::InvalidQuantity.into();
        assert!(
            matches!(app, AppError::BadRequest(msg) if msg == "Quantity must be a positive number")
        );
    }

    #[test]
    fn test_database_maps_to_database() {
        let app: AppError = SweetError::Database("socket closed".into()).into();
        assert!(matches!(app, AppError::Database(_)));
    }
}
