// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Stockfolio

use std::{env, net::SocketAddr};

use tracing_subscriber::EnvFilter;

use stockfolio_server::{
    api::router,
    auth::TokenService,
    config::Config,
    state::AppState,
    storage::MarketDatabase,
};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = Config::from_env();

    let db = MarketDatabase::open(&config.database_path())
        .expect("Failed to open ledger database");
    tracing::info!(path = %config.database_path().display(), "ledger database opened");

    let tokens = TokenService::new(
        config.access_token_secret.clone(),
        config.refresh_token_secret.clone(),
    );
    let state = AppState::new(db, tokens);
    let app = router(state, &config.allowed_origins);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!("Stockfolio server listening on http://{addr} (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    if env::var("LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install ctrl-c handler");
    tracing::info!("shutdown signal received");
}
