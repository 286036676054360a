// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Stockfolio

use std::sync::Arc;

use crate::auth::TokenService;
use crate::storage::MarketDatabase;

/// Shared application state: the embedded ledger and the session issuer.
///
/// redb synchronizes its own transactions, so the database is shared as
/// a plain `Arc` with no outer lock.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<MarketDatabase>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(db: MarketDatabase, tokens: TokenService) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
        }
    }
}
