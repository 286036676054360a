// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Stockfolio

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ApiResponse;
use crate::storage::StoreError;

/// API-facing error: an HTTP status plus a message, rendered in the
/// uniform response envelope with `data: null` and `success: false`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<crate::auth::AuthError> for ApiError {
    fn from(err: crate::auth::AuthError) -> Self {
        Self::new(err.status_code(), err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Self::not_found(format!("{what} not found")),
            StoreError::AlreadyExists(what) => Self::bad_request(format!("{what} already exists")),
            StoreError::InsufficientFunds { .. } => Self::new(
                StatusCode::PAYMENT_REQUIRED,
                "Insufficient balance in Virtual Wallet",
            ),
            StoreError::InsufficientInventory { .. } => {
                Self::new(StatusCode::CONFLICT, "Not enough stock available")
            }
            StoreError::Overflow => Self::bad_request("Order size out of range"),
            other => {
                // Persistence details stay server-side
                tracing::error!(error = %other, "storage operation failed");
                Self::internal("Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse {
            statuscode: self.status.as_u16(),
            data: serde_json::Value::Null,
            message: self.message,
            success: false,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);

        let forbidden = ApiError::forbidden("no");
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn store_errors_map_to_statuses() {
        let funds = ApiError::from(StoreError::InsufficientFunds {
            cost: 100,
            balance: 10,
        });
        assert_eq!(funds.status, StatusCode::PAYMENT_REQUIRED);

        let inventory = ApiError::from(StoreError::InsufficientInventory {
            requested: 5,
            available: 1,
        });
        assert_eq!(inventory.status, StatusCode::CONFLICT);

        let missing = ApiError::from(StoreError::NotFound("Stock s-1".to_string()));
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let exists = ApiError::from(StoreError::AlreadyExists("User".to_string()));
        assert_eq!(exists.status, StatusCode::BAD_REQUEST);
        assert_eq!(exists.message, "User already exists");

        let overflow = ApiError::from(StoreError::Overflow);
        assert_eq!(overflow.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_leak_no_detail() {
        let err = ApiError::from(StoreError::Serde(serde_json::from_str::<u8>("x").unwrap_err()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Internal server error");
    }

    #[tokio::test]
    async fn into_response_renders_envelope() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["statuscode"], 400);
        assert_eq!(body["data"], serde_json::Value::Null);
        assert_eq!(body["message"], "bad data");
        assert_eq!(body["success"], false);
    }
}
