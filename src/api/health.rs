// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Stockfolio

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Root banner for anyone poking the API directly.
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Welcome banner", body = String)
    )
)]
pub async fn root() -> &'static str {
    "Welcome to the Stocks APP! Use the available routes to interact with the platform."
}
