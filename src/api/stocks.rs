// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Stockfolio

//! Stock catalog endpoints: admin listing management, buy orders, search.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::{AdminOnly, Auth},
    error::ApiError,
    models::{
        ApiResponse, BuyStockRequest, CreateStockRequest, PurchaseData, SearchStockQuery,
        StockDetailQuery, UpdateStockPriceRequest,
    },
    state::AppState,
    storage::{StockRecord, StockSummary},
};

/// How many results a name search may return.
const SEARCH_RESULT_CAP: usize = 5;

/// List a new stock in the catalog. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/stocks/createStock",
    tag = "Stocks",
    security(("bearer" = [])),
    request_body = CreateStockRequest,
    responses(
        (status = 201, description = "Stock created", body = ApiResponse<StockRecord>),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin"),
    )
)]
pub async fn create_stock(
    State(state): State<AppState>,
    AdminOnly(user): AdminOnly,
    Json(payload): Json<CreateStockRequest>,
) -> Result<(axum::http::StatusCode, Json<ApiResponse<StockRecord>>), ApiError> {
    if payload.name.trim().is_empty()
        || payload.description.trim().is_empty()
        || payload.category.trim().is_empty()
        || payload.price_per_unit == 0
        || payload.available_quantity == 0
    {
        return Err(ApiError::bad_request("All stock fields are required"));
    }

    let record = StockRecord {
        stock_id: Uuid::new_v4().to_string(),
        name: payload.name,
        description: payload.description,
        price_per_unit: payload.price_per_unit,
        available_quantity: payload.available_quantity,
        category: payload.category,
        invested_amount: 0,
        investor_count: 0,
        owner: user.user_id.clone(),
        created_at: Utc::now(),
    };

    state.db.create_stock(&record)?;

    tracing::info!(stock_id = %record.stock_id, admin = %user.user_id, "stock created");
    Ok((
        axum::http::StatusCode::CREATED,
        Json(ApiResponse::created(record, "Stock has been created")),
    ))
}

/// Settle a buy order against the acting user's wallet.
///
/// Validation and both record updates run in one storage transaction:
/// wallet and inventory change together or not at all.
#[utoipa::path(
    post,
    path = "/api/v1/stocks/buyStock",
    tag = "Stocks",
    security(("bearer" = [])),
    request_body = BuyStockRequest,
    responses(
        (status = 200, description = "Purchase settled", body = ApiResponse<PurchaseData>),
        (status = 400, description = "Invalid quantity"),
        (status = 401, description = "Unauthorized"),
        (status = 402, description = "Insufficient wallet balance"),
        (status = 404, description = "Stock not found"),
        (status = 409, description = "Not enough stock available"),
    )
)]
pub async fn buy_stock(
    State(state): State<AppState>,
    Auth(user): Auth,
    Json(payload): Json<BuyStockRequest>,
) -> Result<Json<ApiResponse<PurchaseData>>, ApiError> {
    if payload.total_unit == 0 {
        return Err(ApiError::bad_request("total_unit must be at least 1"));
    }

    let (buyer, stock) =
        state
            .db
            .settle_purchase(&user.user_id, &payload.stockid, payload.total_unit)?;

    let message = format!(
        "Payment Successful for {} by {}",
        stock.name, buyer.name
    );
    tracing::info!(
        user_id = %buyer.user_id,
        stock_id = %stock.stock_id,
        units = payload.total_unit,
        "buy order settled"
    );

    Ok(Json(ApiResponse::ok(
        PurchaseData {
            user: buyer.into(),
            stock,
        },
        message,
    )))
}

/// Overwrite a stock's unit price. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/stocks/update_stock",
    tag = "Stocks",
    security(("bearer" = [])),
    request_body = UpdateStockPriceRequest,
    responses(
        (status = 200, description = "Price updated", body = ApiResponse<u64>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Stock not found"),
    )
)]
pub async fn update_stock(
    State(state): State<AppState>,
    AdminOnly(user): AdminOnly,
    Json(payload): Json<UpdateStockPriceRequest>,
) -> Result<Json<ApiResponse<u64>>, ApiError> {
    let (previous, stock) = state
        .db
        .update_price(&payload.stockid, payload.new_price)
        .map_err(|e| match e {
            crate::storage::StoreError::NotFound(_) => ApiError::not_found("Stock not found"),
            other => other.into(),
        })?;

    tracing::info!(
        stock_id = %stock.stock_id,
        admin = %user.user_id,
        previous,
        new = stock.price_per_unit,
        "stock price updated"
    );

    Ok(Json(ApiResponse::ok(
        stock.price_per_unit,
        format!("Price updated from {previous} to {}", stock.price_per_unit),
    )))
}

/// Fetch a single stock by id.
#[utoipa::path(
    get,
    path = "/api/v1/stocks/getStockDetail",
    tag = "Stocks",
    security(("bearer" = [])),
    params(StockDetailQuery),
    responses(
        (status = 200, description = "Stock detail", body = ApiResponse<StockRecord>),
        (status = 400, description = "stockid missing"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Stock not found"),
    )
)]
pub async fn get_stock_detail(
    State(state): State<AppState>,
    Auth(_user): Auth,
    Query(query): Query<StockDetailQuery>,
) -> Result<Json<ApiResponse<StockRecord>>, ApiError> {
    let stock_id = query
        .stockid
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("stockid is required"))?;

    let stock = state.db.get_stock(&stock_id).map_err(|e| match e {
        crate::storage::StoreError::NotFound(_) => ApiError::not_found("Stock not found"),
        other => other.into(),
    })?;

    Ok(Json(ApiResponse::ok(stock, "Stock detail fetched")))
}

/// All catalog entries, projected to the listing fields.
#[utoipa::path(
    get,
    path = "/api/v1/stocks/getAllStocks",
    tag = "Stocks",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All stocks", body = ApiResponse<Vec<StockSummary>>),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn get_all_stocks(
    State(state): State<AppState>,
    Auth(_user): Auth,
) -> Result<Json<ApiResponse<Vec<StockSummary>>>, ApiError> {
    let stocks: Vec<StockSummary> = state
        .db
        .list_stocks()?
        .into_iter()
        .map(StockSummary::from)
        .collect();

    Ok(Json(ApiResponse::ok(
        stocks,
        "All stocks fetched successfully",
    )))
}

/// Case-insensitive name search, capped at five results.
#[utoipa::path(
    get,
    path = "/api/v1/stocks/searchStock",
    tag = "Stocks",
    security(("bearer" = [])),
    params(SearchStockQuery),
    responses(
        (status = 200, description = "Matching stocks", body = ApiResponse<Vec<StockRecord>>),
        (status = 400, description = "searchQuery missing"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No stock matched"),
    )
)]
pub async fn search_stock(
    State(state): State<AppState>,
    Auth(_user): Auth,
    Query(query): Query<SearchStockQuery>,
) -> Result<Json<ApiResponse<Vec<StockRecord>>>, ApiError> {
    let needle = query
        .search_query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Search query is required"))?;

    let matches = state.db.search_stocks(&needle, SEARCH_RESULT_CAP)?;
    if matches.is_empty() {
        return Err(ApiError::not_found("No matching data found."));
    }

    Ok(Json(ApiResponse::ok(matches, "Data fetched successfully")))
}
