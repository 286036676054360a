// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Stockfolio

//! # Storage Module
//!
//! Persistence for users and the stock catalog on top of an embedded
//! [redb](https://docs.rs/redb) database (pure Rust, ACID).
//!
//! ## Layout
//!
//! - [`database`] - the redb wrapper: tables, CRUD, trade settlement,
//!   portfolio valuation
//! - [`users`] - user records, holdings and the secret-free profile
//!   projection
//! - [`stocks`] - catalog records and the listing projection
//!
//! ## Transactional guarantees
//!
//! Every multi-record mutation (user creation with its uniqueness
//! indexes, trade settlement touching buyer and stock) happens inside a
//! single redb write transaction. A failed validation or write aborts the
//! transaction; partially applied updates cannot be observed.

pub mod database;
pub mod stocks;
pub mod users;

pub use database::{MarketDatabase, StoreError, StoreResult};
pub use stocks::{StockRecord, StockSummary};
pub use users::{Holding, UserProfile, UserRecord};
