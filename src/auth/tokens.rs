// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Stockfolio

//! Session issuer: access and renewal token pairs.
//!
//! Both tokens are HS256 JWTs signed with separate secrets. The access
//! token (1 day) embeds enough identity for request handling; the renewal
//! token (10 days) embeds only the user id and is persisted on the user
//! record, a single active token per user, overwritten on every login.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::storage::UserRecord;

/// Access token lifetime.
pub const ACCESS_TOKEN_TTL_HOURS: i64 = 24;

/// Renewal token lifetime.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 10;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user id)
    pub sub: String,
    /// Unique handle
    pub username: String,
    /// Contact address
    pub email: String,
    /// Display name
    pub name: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Claims carried by a renewal token. Identity id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (user id)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Issues and verifies the two session tokens.
pub struct TokenService {
    access_secret: String,
    refresh_secret: String,
}

impl TokenService {
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
        }
    }

    /// Sign a 1-day access token for a verified user.
    pub fn issue_access_token(&self, user: &UserRecord) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user.user_id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(ACCESS_TOKEN_TTL_HOURS)).timestamp(),
        };

        tracing::debug!(user_id = %user.user_id, "issuing access token");

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.access_secret.as_bytes()),
        )
        .map_err(|e| AuthError::InternalError(e.to_string()))
    }

    /// Sign a 10-day renewal token for a verified user.
    pub fn issue_refresh_token(&self, user: &UserRecord) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user.user_id.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::days(REFRESH_TOKEN_TTL_DAYS)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.refresh_secret.as_bytes()),
        )
        .map_err(|e| AuthError::InternalError(e.to_string()))
    }

    /// Verify signature and expiry of an access token.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = CLOCK_SKEW_LEEWAY;

        decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.access_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(map_jwt_error)
    }

    /// Verify signature and expiry of a renewal token.
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = CLOCK_SKEW_LEEWAY;

        decode::<RefreshClaims>(
            token,
            &DecodingKey::from_secret(self.refresh_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(map_jwt_error)
    }
}

fn map_jwt_error(e: jsonwebtoken::errors::Error) -> AuthError {
    match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::MalformedToken,
    }
}
