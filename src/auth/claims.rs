// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Stockfolio

//! The authenticated identity attached to a request.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;
use crate::storage::UserRecord;

/// The acting identity resolved by the access guard.
///
/// Built from the live user record after token verification, with the
/// secret fields (password hash, renewal token) stripped. This is the
/// only user shape handlers ever receive.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    /// Canonical user id
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Unique handle
    pub username: String,
    /// Contact address
    pub email: String,
    /// User's role
    pub role: Role,
}

impl CurrentUser {
    /// Check if this user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<UserRecord> for CurrentUser {
    fn from(record: UserRecord) -> Self {
        Self {
            user_id: record.user_id,
            name: record.name,
            username: record.username,
            email: record.email,
            role: record.role,
        }
    }
}
