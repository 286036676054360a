// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Stockfolio

//! # API Data Models
//!
//! Request and response data structures for the REST API. All types
//! derive `Serialize`/`Deserialize` and `ToSchema` for automatic JSON
//! handling and OpenAPI documentation.
//!
//! Every endpoint wraps its payload in the uniform [`ApiResponse`]
//! envelope: `{statuscode, data, message, success}`.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::storage::{StockRecord, StockSummary, UserProfile};

// =============================================================================
// Response Envelope
// =============================================================================

/// Uniform response envelope.
///
/// Success and failure responses share this shape; failures carry
/// `data: null` and `success: false`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// HTTP status code, repeated in the body
    pub statuscode: u16,
    /// Operation payload
    pub data: T,
    /// Human-readable outcome
    pub message: String,
    /// Whether the operation succeeded
    pub success: bool,
}

impl<T> ApiResponse<T> {
    /// 200 envelope.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            statuscode: 200,
            data,
            message: message.into(),
            success: true,
        }
    }

    /// 201 envelope.
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            statuscode: 201,
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Payload for responses that carry no data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

// =============================================================================
// User Models
// =============================================================================

/// Fields of the multipart registration form.
///
/// The form also accepts a `photo` file part; it is drained and
/// discarded (media handling is not part of this service).
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RegisterForm {
    /// Display name
    pub name: String,
    /// Contact address (unique)
    pub email: String,
    /// Handle (unique)
    pub username: String,
    /// Password (stored as a bcrypt hash)
    pub password: String,
    /// National identifier (unique)
    pub pan: String,
    /// Requested role; defaults to `user`
    #[serde(default)]
    pub role: Option<String>,
}

/// Request body for POST /user/login.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Contact address
    pub email: String,
    /// Password
    pub password: String,
}

/// Payload returned by a successful login.
///
/// Tokens are also set as http-only cookies; they are repeated here for
/// clients that prefer the Authorization header.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginData {
    /// The logged-in user, secrets excluded
    pub user: UserProfile,
    /// Access token (see [`crate::auth::tokens::AccessClaims`])
    #[serde(rename = "accessToken")]
    pub access_token: String,
    /// Renewal token (see [`crate::auth::tokens::RefreshClaims`])
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Request body for POST /user/addMoney.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddMoneyRequest {
    /// Amount to credit; must be positive
    pub amount: i64,
}

// =============================================================================
// Stock Models
// =============================================================================

/// Request body for POST /stocks/createStock (admin only).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateStockRequest {
    /// Stock name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Price per unit in whole currency units
    pub price_per_unit: u64,
    /// Units available for purchase
    pub available_quantity: u64,
    /// Category label
    pub category: String,
}

/// Request body for POST /stocks/buyStock.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BuyStockRequest {
    /// Target stock id
    pub stockid: String,
    /// Units to buy; must be ≥ 1
    pub total_unit: u64,
}

/// Payload returned by a settled buy order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PurchaseData {
    /// Buyer snapshot after settlement
    pub user: UserProfile,
    /// Stock snapshot after settlement
    pub stock: StockRecord,
}

/// Request body for POST /stocks/update_stock (admin only).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateStockPriceRequest {
    /// Target stock id
    pub stockid: String,
    /// Replacement price per unit
    pub new_price: u64,
}

/// Query parameters for GET /stocks/getStockDetail.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct StockDetailQuery {
    /// Stock id to fetch
    pub stockid: Option<String>,
}

/// Query parameters for GET /stocks/searchStock.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct SearchStockQuery {
    /// Case-insensitive substring to match against stock names
    #[serde(rename = "searchQuery")]
    pub search_query: Option<String>,
}
