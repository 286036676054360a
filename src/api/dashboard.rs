// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Stockfolio

//! Portfolio dashboard endpoints.
//!
//! Four independent read-only scalars over the acting user. Each request
//! runs on its own storage snapshot; there is no transaction spanning
//! the four calls, so a trade settling in between can make them
//! mutually inconsistent. `current_value` always prices holdings at the
//! catalog's live prices, not at the prices paid.

use axum::{extract::State, Json};

use crate::{auth::Auth, error::ApiError, models::ApiResponse, state::AppState};

/// Total amount ever invested by the acting user.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/invested",
    tag = "Dashboard",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Invested amount", body = ApiResponse<i64>),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn invested(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<ApiResponse<i64>>, ApiError> {
    let record = state.db.get_user(&user.user_id)?;
    Ok(Json(ApiResponse::ok(
        record.total_invested as i64,
        "Invest amount fetched",
    )))
}

/// Holdings valued at live catalog prices.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/current_value",
    tag = "Dashboard",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current portfolio value", body = ApiResponse<i64>),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn current_value(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<ApiResponse<i64>>, ApiError> {
    let value = state.db.portfolio_value(&user.user_id)?;
    Ok(Json(ApiResponse::ok(value as i64, "total current value")))
}

/// Unrealized return: live portfolio value minus invested amount.
///
/// Negative when held stocks have been marked down since purchase.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/returns",
    tag = "Dashboard",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Return on investment", body = ApiResponse<i64>),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn returns(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<ApiResponse<i64>>, ApiError> {
    let record = state.db.get_user(&user.user_id)?;
    let value = state.db.portfolio_value(&user.user_id)?;
    let actual_return = value as i64 - record.total_invested as i64;
    Ok(Json(ApiResponse::ok(actual_return, "total return")))
}

/// The acting user's wallet balance.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/wallet_balance",
    tag = "Dashboard",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Wallet balance", body = ApiResponse<i64>),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn wallet_balance(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<ApiResponse<i64>>, ApiError> {
    let record = state.db.get_user(&user.user_id)?;
    Ok(Json(ApiResponse::ok(
        record.wallet_money as i64,
        "wallet balance fetched",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{CurrentUser, Role, TokenService};
    use crate::storage::{MarketDatabase, StockRecord, UserRecord};
    use chrono::Utc;
    use tempfile::TempDir;

    fn create_test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = MarketDatabase::open(&temp_dir.path().join("test.redb")).unwrap();
        let state = AppState::new(db, TokenService::new("access-secret", "refresh-secret"));
        (state, temp_dir)
    }

    fn seed_portfolio(state: &AppState) -> CurrentUser {
        let record = UserRecord {
            user_id: "u1".to_string(),
            name: "Alice".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            pan: "PAN1".to_string(),
            password_hash: "hash".to_string(),
            role: Role::User,
            wallet_money: 1000,
            total_invested: 0,
            stocks: Vec::new(),
            refresh_token: None,
            created_at: Utc::now(),
        };
        state.db.create_user(&record).unwrap();

        let stock = StockRecord {
            stock_id: "w".to_string(),
            name: "Widget".to_string(),
            description: "widget".to_string(),
            price_per_unit: 100,
            available_quantity: 50,
            category: "industrial".to_string(),
            invested_amount: 0,
            investor_count: 0,
            owner: "admin".to_string(),
            created_at: Utc::now(),
        };
        state.db.create_stock(&stock).unwrap();

        state.db.settle_purchase("u1", "w", 3).unwrap();
        record.into()
    }

    #[tokio::test]
    async fn scalars_reflect_a_settled_buy() {
        let (state, _dir) = create_test_state();
        let user = seed_portfolio(&state);

        let Json(invested_body) = invested(State(state.clone()), Auth(user.clone()))
            .await
            .unwrap();
        assert_eq!(invested_body.data, 300);

        let Json(value_body) = current_value(State(state.clone()), Auth(user.clone()))
            .await
            .unwrap();
        assert_eq!(value_body.data, 300);

        let Json(returns_body) = returns(State(state.clone()), Auth(user.clone()))
            .await
            .unwrap();
        assert_eq!(returns_body.data, 0);

        let Json(wallet_body) = wallet_balance(State(state), Auth(user)).await.unwrap();
        assert_eq!(wallet_body.data, 700);
    }

    #[tokio::test]
    async fn returns_follow_live_prices_both_directions() {
        let (state, _dir) = create_test_state();
        let user = seed_portfolio(&state);

        // Price doubles: 3 units now worth 600 against 300 invested
        state.db.update_price("w", 200).unwrap();
        let Json(up) = returns(State(state.clone()), Auth(user.clone())).await.unwrap();
        assert_eq!(up.data, 300);

        // Price collapses: unrealized loss
        state.db.update_price("w", 10).unwrap();
        let Json(down) = returns(State(state.clone()), Auth(user.clone())).await.unwrap();
        assert_eq!(down.data, -270);

        // Invested stays at what was paid
        let Json(invested_body) = invested(State(state), Auth(user)).await.unwrap();
        assert_eq!(invested_body.data, 300);
    }

    #[tokio::test]
    async fn repeated_reads_are_idempotent() {
        let (state, _dir) = create_test_state();
        let user = seed_portfolio(&state);

        let Json(first) = current_value(State(state.clone()), Auth(user.clone()))
            .await
            .unwrap();
        let Json(second) = current_value(State(state), Auth(user)).await.unwrap();
        assert_eq!(first.data, second.data);
    }
}
