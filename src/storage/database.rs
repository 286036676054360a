// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Stockfolio

//! Embedded ledger database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized UserRecord
//! - `user_email_index`: lowercase email → user_id
//! - `user_username_index`: username → user_id
//! - `user_pan_index`: pan → user_id
//! - `stocks`: stock_id → serialized StockRecord
//!
//! The secondary index tables enforce handle/contact/pan uniqueness and are
//! written in the same transaction as the user record.
//!
//! Trade settlement ([`MarketDatabase::settle_purchase`]) validates and
//! mutates the buyer and the stock inside a single write transaction:
//! either both records commit or neither does.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::stocks::StockRecord;
use super::users::{Holding, UserRecord};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: user_id → serialized UserRecord (JSON bytes).
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Index: lowercase email → user_id.
const USER_EMAIL_INDEX: TableDefinition<&str, &str> = TableDefinition::new("user_email_index");

/// Index: username → user_id.
const USER_USERNAME_INDEX: TableDefinition<&str, &str> =
    TableDefinition::new("user_username_index");

/// Index: pan → user_id.
const USER_PAN_INDEX: TableDefinition<&str, &str> = TableDefinition::new("user_pan_index");

/// Primary table: stock_id → serialized StockRecord (JSON bytes).
const STOCKS: TableDefinition<&str, &[u8]> = TableDefinition::new("stocks");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("insufficient funds: cost {cost} exceeds wallet balance {balance}")]
    InsufficientFunds { cost: u64, balance: u64 },

    #[error("insufficient inventory: requested {requested}, available {available}")]
    InsufficientInventory { requested: u64, available: u64 },

    #[error("arithmetic overflow")]
    Overflow,
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// MarketDatabase
// =============================================================================

/// Embedded ACID store for users and the stock catalog.
pub struct MarketDatabase {
    db: Database,
}

impl MarketDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USER_EMAIL_INDEX)?;
            let _ = write_txn.open_table(USER_USERNAME_INDEX)?;
            let _ = write_txn.open_table(USER_PAN_INDEX)?;
            let _ = write_txn.open_table(STOCKS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a new user, enforcing username/email/pan uniqueness.
    ///
    /// The record and all three index entries are written in one
    /// transaction; a clash on any handle aborts with `AlreadyExists`.
    pub fn create_user(&self, user: &UserRecord) -> StoreResult<()> {
        let email_key = user.email.to_lowercase();
        let json = serde_json::to_vec(user)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut email_idx = write_txn.open_table(USER_EMAIL_INDEX)?;
            let mut username_idx = write_txn.open_table(USER_USERNAME_INDEX)?;
            let mut pan_idx = write_txn.open_table(USER_PAN_INDEX)?;

            if email_idx.get(email_key.as_str())?.is_some()
                || username_idx.get(user.username.as_str())?.is_some()
                || pan_idx.get(user.pan.as_str())?.is_some()
            {
                return Err(StoreError::AlreadyExists("User".to_string()));
            }

            let mut users = write_txn.open_table(USERS)?;
            users.insert(user.user_id.as_str(), json.as_slice())?;
            email_idx.insert(email_key.as_str(), user.user_id.as_str())?;
            username_idx.insert(user.username.as_str(), user.user_id.as_str())?;
            pan_idx.insert(user.pan.as_str(), user.user_id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Load a user by id.
    pub fn get_user(&self, user_id: &str) -> StoreResult<UserRecord> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(user_id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Err(StoreError::NotFound(format!("User {user_id}"))),
        }
    }

    /// Look up a user by contact address (case-insensitive).
    pub fn find_user_by_email(&self, email: &str) -> StoreResult<UserRecord> {
        let email_key = email.to_lowercase();
        let read_txn = self.db.begin_read()?;
        let idx = read_txn.open_table(USER_EMAIL_INDEX)?;
        let user_id = match idx.get(email_key.as_str())? {
            Some(v) => v.value().to_string(),
            None => return Err(StoreError::NotFound(format!("User <{email}>"))),
        };
        let users = read_txn.open_table(USERS)?;
        match users.get(user_id.as_str())? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Err(StoreError::NotFound(format!("User {user_id}"))),
        }
    }

    /// Atomically add funds to a user's wallet. Returns the updated record.
    pub fn credit_wallet(&self, user_id: &str, amount: u64) -> StoreResult<UserRecord> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(USERS)?;
            let mut user = read_user(&table, user_id)?;
            user.wallet_money = user
                .wallet_money
                .checked_add(amount)
                .ok_or(StoreError::Overflow)?;
            let json = serde_json::to_vec(&user)?;
            table.insert(user_id, json.as_slice())?;
            user
        };
        write_txn.commit()?;
        Ok(updated)
    }

    /// Overwrite (or clear) the persisted renewal token for a user.
    pub fn set_refresh_token(&self, user_id: &str, token: Option<&str>) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(USERS)?;
            let mut user = read_user(&table, user_id)?;
            user.refresh_token = token.map(str::to_string);
            let json = serde_json::to_vec(&user)?;
            table.insert(user_id, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    // =========================================================================
    // Stocks
    // =========================================================================

    /// Insert a new catalog entry.
    pub fn create_stock(&self, stock: &StockRecord) -> StoreResult<()> {
        let json = serde_json::to_vec(stock)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(STOCKS)?;
            if table.get(stock.stock_id.as_str())?.is_some() {
                return Err(StoreError::AlreadyExists(format!(
                    "Stock {}",
                    stock.stock_id
                )));
            }
            table.insert(stock.stock_id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Load a stock by id.
    pub fn get_stock(&self, stock_id: &str) -> StoreResult<StockRecord> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STOCKS)?;
        match table.get(stock_id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Err(StoreError::NotFound(format!("Stock {stock_id}"))),
        }
    }

    /// All catalog entries.
    pub fn list_stocks(&self) -> StoreResult<Vec<StockRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STOCKS)?;
        let mut stocks = Vec::new();
        for entry in table.iter()? {
            let entry = entry?;
            stocks.push(serde_json::from_slice(entry.1.value())?);
        }
        Ok(stocks)
    }

    /// Case-insensitive substring search on stock names, capped at `limit`.
    pub fn search_stocks(&self, query: &str, limit: usize) -> StoreResult<Vec<StockRecord>> {
        let needle = query.to_lowercase();
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STOCKS)?;
        let mut matches = Vec::new();
        for entry in table.iter()? {
            let entry = entry?;
            let stock: StockRecord = serde_json::from_slice(entry.1.value())?;
            if stock.name.to_lowercase().contains(&needle) {
                matches.push(stock);
                if matches.len() >= limit {
                    break;
                }
            }
        }
        Ok(matches)
    }

    /// Overwrite a stock's unit price.
    ///
    /// Returns the previous price alongside the updated record.
    pub fn update_price(&self, stock_id: &str, new_price: u64) -> StoreResult<(u64, StockRecord)> {
        let write_txn = self.db.begin_write()?;
        let result = {
            let mut table = write_txn.open_table(STOCKS)?;
            let mut stock = read_stock(&table, stock_id)?;
            let previous = stock.price_per_unit;
            stock.price_per_unit = new_price;
            let json = serde_json::to_vec(&stock)?;
            table.insert(stock_id, json.as_slice())?;
            (previous, stock)
        };
        write_txn.commit()?;
        Ok(result)
    }

    // =========================================================================
    // Trade Settlement
    // =========================================================================

    /// Apply a buy order against the buyer and the stock.
    ///
    /// Runs entirely inside one write transaction: the balance and
    /// inventory checks and both record updates commit together or not at
    /// all. Any validation failure aborts before mutation.
    pub fn settle_purchase(
        &self,
        user_id: &str,
        stock_id: &str,
        quantity: u64,
    ) -> StoreResult<(UserRecord, StockRecord)> {
        let write_txn = self.db.begin_write()?;
        let (user, stock) = {
            let mut users = write_txn.open_table(USERS)?;
            let mut stocks = write_txn.open_table(STOCKS)?;

            let mut user = read_user(&users, user_id)?;
            let mut stock = read_stock(&stocks, stock_id)?;

            let cost = quantity
                .checked_mul(stock.price_per_unit)
                .ok_or(StoreError::Overflow)?;

            if cost > user.wallet_money {
                return Err(StoreError::InsufficientFunds {
                    cost,
                    balance: user.wallet_money,
                });
            }
            if quantity > stock.available_quantity {
                return Err(StoreError::InsufficientInventory {
                    requested: quantity,
                    available: stock.available_quantity,
                });
            }

            user.wallet_money -= cost;
            user.total_invested = user
                .total_invested
                .checked_add(cost)
                .ok_or(StoreError::Overflow)?;
            user.stocks.push(Holding {
                stock_id: stock_id.to_string(),
                quantity,
            });

            stock.available_quantity -= quantity;
            stock.invested_amount = stock
                .invested_amount
                .checked_add(cost)
                .ok_or(StoreError::Overflow)?;
            stock.investor_count += 1;

            let user_json = serde_json::to_vec(&user)?;
            users.insert(user_id, user_json.as_slice())?;
            let stock_json = serde_json::to_vec(&stock)?;
            stocks.insert(stock_id, stock_json.as_slice())?;

            (user, stock)
        };
        write_txn.commit()?;
        Ok((user, stock))
    }

    // =========================================================================
    // Portfolio valuation
    // =========================================================================

    /// Value the user's holdings at live catalog prices.
    ///
    /// One read transaction over both tables, so all holdings are priced
    /// against the same catalog snapshot.
    pub fn portfolio_value(&self, user_id: &str) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let users = read_txn.open_table(USERS)?;
        let user: UserRecord = match users.get(user_id)? {
            Some(value) => serde_json::from_slice(value.value())?,
            None => return Err(StoreError::NotFound(format!("User {user_id}"))),
        };

        let stocks = read_txn.open_table(STOCKS)?;
        let mut total: u64 = 0;
        for holding in &user.stocks {
            if let Some(value) = stocks.get(holding.stock_id.as_str())? {
                let stock: StockRecord = serde_json::from_slice(value.value())?;
                let position = holding
                    .quantity
                    .checked_mul(stock.price_per_unit)
                    .ok_or(StoreError::Overflow)?;
                total = total.checked_add(position).ok_or(StoreError::Overflow)?;
            }
        }
        Ok(total)
    }
}

// =============================================================================
// Record helpers
// =============================================================================

fn read_user<T>(table: &T, user_id: &str) -> StoreResult<UserRecord>
where
    T: ReadableTable<&'static str, &'static [u8]>,
{
    let bytes = {
        let guard = table
            .get(user_id)?
            .ok_or_else(|| StoreError::NotFound(format!("User {user_id}")))?;
        guard.value().to_vec()
    };
    Ok(serde_json::from_slice(&bytes)?)
}

fn read_stock<T>(table: &T, stock_id: &str) -> StoreResult<StockRecord>
where
    T: ReadableTable<&'static str, &'static [u8]>,
{
    let bytes = {
        let guard = table
            .get(stock_id)?
            .ok_or_else(|| StoreError::NotFound(format!("Stock {stock_id}")))?;
        guard.value().to_vec()
    };
    Ok(serde_json::from_slice(&bytes)?)
}

// =============================================================================
// Tests
// =============================================================================
