//! HTTP mapping for inventory errors
//!
//! | Error          | Status |
//! |----------------|--------|
//! | `NotFound`     | 404    |
//! | `DuplicateSku` | 400    |
//! | `Validation`   | 422    |
//! | `Storage`      | 500    |
//! | `Worker`       | 500    |
//!
//! Extractor rejections (bad JSON, non-integer id, bad skip/limit) are
//! folded into `Validation` so every client error has the same body shape.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::inventory::{InventoryError, ValidationDetails};
use crate::observability::{log_event_with_fields, Event};

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationDetails>,
}

/// HTTP status code for an inventory error
pub fn status_code(err: &InventoryError) -> StatusCode {
    match err {
        InventoryError::NotFound => StatusCode::NOT_FOUND,
        InventoryError::DuplicateSku => StatusCode::BAD_REQUEST,
        InventoryError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        InventoryError::Storage(_) | InventoryError::Worker(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<InventoryError> for ErrorResponse {
    fn from(err: InventoryError) -> Self {
        let code = status_code(&err).as_u16();
        match err {
            InventoryError::Validation(errors) => Self {
                detail: "Validation failed".to_string(),
                code,
                errors,
            },
            // Fault internals stay in the log.
            err if err.is_fault() => Self {
                detail: "Internal server error".to_string(),
                code,
                errors: Vec::new(),
            },
            other => Self {
                detail: other.to_string(),
                code,
                errors: Vec::new(),
            },
        }
    }
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        if self.is_fault() {
            log_event_with_fields(Event::StorageFailure, &[("error", &self.to_string())]);
        } else {
            match &self {
                InventoryError::DuplicateSku => log_event_with_fields(Event::SkuConflict, &[]),
                InventoryError::Validation(_) => log_event_with_fields(
                    Event::ValidationRejected,
                    &[("reason", &self.to_string())],
                ),
                _ => {}
            }
        }

        let status = status_code(&self);
        (status, Json(ErrorResponse::from(self))).into_response()
    }
}

impl From<JsonRejection> for InventoryError {
    fn from(rejection: JsonRejection) -> Self {
        InventoryError::invalid(ValidationDetails::new(
            "$body",
            "JSON object",
            rejection.body_text(),
        ))
    }
}

impl From<PathRejection> for InventoryError {
    fn from(rejection: PathRejection) -> Self {
        InventoryError::invalid(ValidationDetails::new(
            "id",
            "integer",
            rejection.body_text(),
        ))
    }
}

impl From<QueryRejection> for InventoryError {
    fn from(rejection: QueryRejection) -> Self {
        InventoryError::invalid(ValidationDetails::new(
            "$query",
            "non-negative integer skip and limit",
            rejection.body_text(),
        ))
    }
}
