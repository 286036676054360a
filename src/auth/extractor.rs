// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Stockfolio

//! Axum extractors enforcing the access guard.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is CurrentUser
//! }
//! ```
//!
//! The guard accepts the access token from the `accessToken` cookie or
//! from `Authorization: Bearer <token>`, verifies signature and expiry,
//! then resolves the embedded id to a live user record. Any failure stops
//! the request before the protected handler runs.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::CookieJar;

use super::{AuthError, CurrentUser};
use crate::state::AppState;
use crate::storage::StoreError;

/// Cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Cookie carrying the renewal token.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Extractor for authenticated users.
///
/// Resolves the acting identity or rejects with 401 in the uniform
/// envelope.
pub struct Auth(pub CurrentUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Middleware or a previous extractor may already have resolved the user
        if let Some(user) = parts.extensions.get::<CurrentUser>().cloned() {
            return Ok(Auth(user));
        }

        let token = extract_token(parts)?;
        let claims = state.tokens.verify_access_token(&token)?;

        // The token may outlive the account; resolve against live storage
        let record = state.db.get_user(&claims.sub).map_err(|e| match e {
            StoreError::NotFound(_) => AuthError::UnknownUser,
            other => AuthError::InternalError(other.to_string()),
        })?;

        Ok(Auth(record.into()))
    }
}

/// Pull the access token from the cookie jar, else the bearer header.
fn extract_token(parts: &Parts) -> Result<String, AuthError> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE) {
        return Ok(cookie.value().to_string());
    }

    let auth_header = match parts.headers.get(AUTHORIZATION) {
        Some(value) => value.to_str().map_err(|_| AuthError::InvalidAuthHeader)?,
        None => return Err(AuthError::MissingToken),
    };

    auth_header
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .ok_or(AuthError::InvalidAuthHeader)
}

/// Extractor that requires admin role.
pub struct AdminOnly(pub CurrentUser);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AdminOnly(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Role, TokenService};
    use crate::storage::{MarketDatabase, UserRecord};
    use axum::http::Request;
    use chrono::Utc;
    use tempfile::TempDir;

    fn create_test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db = MarketDatabase::open(&temp_dir.path().join("test.redb"))
            .expect("Failed to open database");
        let state = AppState::new(db, TokenService::new("access-secret", "refresh-secret"));
        (state, temp_dir)
    }

    fn insert_user(state: &AppState, id: &str, role: Role) -> UserRecord {
        let record = UserRecord {
            user_id: id.to_string(),
            name: format!("Name {id}"),
            username: format!("user-{id}"),
            email: format!("{id}@example.com"),
            pan: format!("PAN{id}"),
            password_hash: "hash".to_string(),
            role,
            wallet_money: 0,
            total_invested: 0,
            stocks: Vec::new(),
            refresh_token: None,
            created_at: Utc::now(),
        };
        state.db.create_user(&record).unwrap();
        record
    }

    fn parts_with_headers(headers: &[(&str, String)]) -> Parts {
        let mut builder = Request::builder().uri("/test");
        for (name, value) in headers {
            builder = builder.header(*name, value.as_str());
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn rejects_without_token() {
        let (state, _dir) = create_test_state();
        let mut parts = parts_with_headers(&[]);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn accepts_bearer_token() {
        let (state, _dir) = create_test_state();
        let user = insert_user(&state, "u1", Role::User);
        let token = state.tokens.issue_access_token(&user).unwrap();

        let mut parts =
            parts_with_headers(&[("authorization", format!("Bearer {token}"))]);
        let Auth(current) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(current.user_id, "u1");
        assert_eq!(current.username, "user-u1");
    }

    #[tokio::test]
    async fn accepts_cookie_token() {
        let (state, _dir) = create_test_state();
        let user = insert_user(&state, "u1", Role::User);
        let token = state.tokens.issue_access_token(&user).unwrap();

        let mut parts = parts_with_headers(&[("cookie", format!("accessToken={token}"))]);
        let Auth(current) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(current.user_id, "u1");
    }

    #[tokio::test]
    async fn rejects_token_for_missing_user() {
        let (state, _dir) = create_test_state();
        // Token for a user that was never stored
        let ghost = UserRecord {
            user_id: "ghost".to_string(),
            name: "Ghost".to_string(),
            username: "ghost".to_string(),
            email: "ghost@example.com".to_string(),
            pan: "PANghost".to_string(),
            password_hash: "hash".to_string(),
            role: Role::User,
            wallet_money: 0,
            total_invested: 0,
            stocks: Vec::new(),
            refresh_token: None,
            created_at: Utc::now(),
        };
        let token = state.tokens.issue_access_token(&ghost).unwrap();

        let mut parts =
            parts_with_headers(&[("authorization", format!("Bearer {token}"))]);
        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::UnknownUser)));
    }

    #[tokio::test]
    async fn rejects_malformed_authorization_header() {
        let (state, _dir) = create_test_state();
        let mut parts = parts_with_headers(&[("authorization", "Token abc".to_string())]);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn prefers_user_from_extensions() {
        let (state, _dir) = create_test_state();
        let mut parts = parts_with_headers(&[]);
        parts.extensions.insert(CurrentUser {
            user_id: "from-middleware".to_string(),
            name: "M".to_string(),
            username: "m".to_string(),
            email: "m@example.com".to_string(),
            role: Role::Admin,
        });

        let Auth(current) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(current.user_id, "from-middleware");
    }

    #[tokio::test]
    async fn admin_only_rejects_non_admin() {
        let (state, _dir) = create_test_state();
        let user = insert_user(&state, "u1", Role::User);
        let token = state.tokens.issue_access_token(&user).unwrap();

        let mut parts =
            parts_with_headers(&[("authorization", format!("Bearer {token}"))]);
        let result = AdminOnly::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InsufficientPermissions)));
    }

    #[tokio::test]
    async fn admin_only_accepts_admin() {
        let (state, _dir) = create_test_state();
        let admin = insert_user(&state, "a1", Role::Admin);
        let token = state.tokens.issue_access_token(&admin).unwrap();

        let mut parts =
            parts_with_headers(&[("authorization", format!("Bearer {token}"))]);
        let AdminOnly(current) = AdminOnly::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(current.is_admin());
    }
}
