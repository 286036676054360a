// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Stockfolio

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::Role,
    models::{
        AddMoneyRequest, ApiResponse, BuyStockRequest, CreateStockRequest, EmptyData, LoginData,
        LoginRequest, PurchaseData, RegisterForm, UpdateStockPriceRequest,
    },
    state::AppState,
    storage::{Holding, StockRecord, StockSummary, UserProfile},
};

pub mod dashboard;
pub mod health;
pub mod stocks;
pub mod users;

/// Build the application router.
///
/// Cross-origin calls are limited to the configured origin allow-list,
/// with credentials enabled so the session cookies flow.
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let user_routes = Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/logout", post(users::logout))
        .route("/GetCurrentUser", get(users::get_current_user))
        .route("/addMoney", post(users::add_money));

    let stock_routes = Router::new()
        .route("/createStock", post(stocks::create_stock))
        .route("/buyStock", post(stocks::buy_stock))
        .route("/update_stock", post(stocks::update_stock))
        .route("/getStockDetail", get(stocks::get_stock_detail))
        .route("/getAllStocks", get(stocks::get_all_stocks))
        .route("/searchStock", get(stocks::search_stock));

    let dashboard_routes = Router::new()
        .route("/invested", get(dashboard::invested))
        .route("/returns", get(dashboard::returns))
        .route("/current_value", get(dashboard::current_value))
        .route("/wallet_balance", get(dashboard::wallet_balance));

    let api_routes = Router::new()
        .nest("/user", user_routes)
        .nest("/stocks", stock_routes)
        .nest("/dashboard", dashboard_routes)
        .with_state(state);

    Router::new()
        .route("/", get(health::root))
        .route("/healthz", get(health::healthz))
        .nest("/api/v1", api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
}

/// Fixed-allow-list CORS with credentials, matching the frontend's needs.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::COOKIE,
            HeaderName::from_static("x-requested-with"),
        ])
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::root,
        health::healthz,
        users::register,
        users::login,
        users::logout,
        users::get_current_user,
        users::add_money,
        stocks::create_stock,
        stocks::buy_stock,
        stocks::update_stock,
        stocks::get_stock_detail,
        stocks::get_all_stocks,
        stocks::search_stock,
        dashboard::invested,
        dashboard::returns,
        dashboard::current_value,
        dashboard::wallet_balance
    ),
    components(
        schemas(
            Role,
            UserProfile,
            Holding,
            StockRecord,
            StockSummary,
            RegisterForm,
            LoginRequest,
            LoginData,
            AddMoneyRequest,
            CreateStockRequest,
            BuyStockRequest,
            UpdateStockPriceRequest,
            PurchaseData,
            EmptyData,
            ApiResponse<UserProfile>,
            ApiResponse<LoginData>,
            ApiResponse<EmptyData>,
            ApiResponse<StockRecord>,
            ApiResponse<PurchaseData>,
            ApiResponse<Vec<StockSummary>>,
            ApiResponse<Vec<StockRecord>>,
            ApiResponse<u64>,
            ApiResponse<i64>,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness probes"),
        (name = "Users", description = "Registration, sessions and wallet top-up"),
        (name = "Stocks", description = "Catalog administration and buy orders"),
        (name = "Dashboard", description = "Per-user portfolio scalars")
    )
)]
struct ApiDoc;
