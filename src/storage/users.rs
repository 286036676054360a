// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Stockfolio

//! User records and their API projection.
//!
//! ## Security
//!
//! - Passwords are stored as bcrypt hashes, never plaintext
//! - `password_hash` and `refresh_token` are NEVER returned via API;
//!   handlers only ever see [`UserProfile`]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Role;

/// A quantity of a stock owned by a user.
///
/// Holdings are append-only: every settled buy order pushes a new entry,
/// repeat purchases of the same stock included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Holding {
    /// The stock this holding references.
    pub stock_id: String,
    /// Units owned (≥ 1).
    pub quantity: u64,
}

/// Full user record as stored in the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique user identifier (UUID)
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Unique handle
    pub username: String,
    /// Unique contact address (stored lowercase)
    pub email: String,
    /// Unique national identifier
    pub pan: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Authorization role
    pub role: Role,
    /// Wallet balance in whole currency units
    pub wallet_money: u64,
    /// Aggregate amount ever invested through settled buys
    pub total_invested: u64,
    /// Owned holdings, one entry per settled buy
    pub stocks: Vec<Holding>,
    /// Single active renewal token; overwritten on login, cleared on logout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Compare a candidate password against the stored bcrypt hash.
    pub fn is_password_correct(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}

/// User data returned to API clients (secret fields excluded).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    /// Unique user identifier
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Unique handle
    pub username: String,
    /// Contact address
    pub email: String,
    /// National identifier
    pub pan: String,
    /// Authorization role
    pub role: Role,
    /// Wallet balance in whole currency units
    pub wallet_money: u64,
    /// Aggregate invested amount
    pub total_invested: u64,
    /// Owned holdings
    pub stocks: Vec<Holding>,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        Self {
            user_id: record.user_id,
            name: record.name,
            username: record.username,
            email: record.email,
            pan: record.pan,
            role: record.role,
            wallet_money: record.wallet_money,
            total_invested: record.total_invested,
            stocks: record.stocks,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> UserRecord {
        UserRecord {
            user_id: "u-1".into(),
            name: "Alice".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            pan: "ABCDE1234F".into(),
            password_hash: bcrypt::hash("hunter2", 4).unwrap(),
            role: Role::User,
            wallet_money: 500,
            total_invested: 100,
            stocks: vec![Holding {
                stock_id: "s-1".into(),
                quantity: 2,
            }],
            refresh_token: Some("secret-token".into()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn password_verification_round_trip() {
        let record = sample_record();
        assert!(record.is_password_correct("hunter2"));
        assert!(!record.is_password_correct("wrong"));
    }

    #[test]
    fn profile_excludes_secret_fields() {
        let profile: UserProfile = sample_record().into();
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("refresh_token").is_none());
        assert_eq!(json["username"], "alice");
        assert_eq!(json["wallet_money"], 500);
    }
}
