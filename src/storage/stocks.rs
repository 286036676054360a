// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Stockfolio

//! Stock catalog records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A tradable catalog entry as stored in the `stocks` table.
///
/// `available_quantity`, `invested_amount` and `investor_count` are only
/// ever mutated by trade settlement; `price_per_unit` only by the explicit
/// price-update operation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockRecord {
    /// Unique stock identifier (UUID)
    pub stock_id: String,
    /// Stock name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Price per unit in whole currency units
    pub price_per_unit: u64,
    /// Units still available for purchase
    pub available_quantity: u64,
    /// Category label
    pub category: String,
    /// Aggregate amount invested into this stock across all buys
    pub invested_amount: u64,
    /// Number of settled buy orders
    pub investor_count: u64,
    /// user_id of the admin who listed this stock
    pub owner: String,
    /// When the stock was listed
    pub created_at: DateTime<Utc>,
}

/// Catalog listing projection (the `getAllStocks` field set).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockSummary {
    /// Unique stock identifier
    pub stock_id: String,
    /// Stock name
    pub name: String,
    /// Price per unit
    pub price_per_unit: u64,
    /// Units still available
    pub available_quantity: u64,
    /// Free-form description
    pub description: String,
    /// Aggregate invested amount
    pub invested_amount: u64,
    /// Number of settled buy orders
    pub investor_count: u64,
}

impl From<StockRecord> for StockSummary {
    fn from(record: StockRecord) -> Self {
        Self {
            stock_id: record.stock_id,
            name: record.name,
            price_per_unit: record.price_per_unit,
            available_quantity: record.available_quantity,
            description: record.description,
            invested_amount: record.invested_amount,
            investor_count: record.investor_count,
        }
    }
}
