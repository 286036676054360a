// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Stockfolio

//! # Authentication Module
//!
//! Session issuance and the per-request access guard.
//!
//! ## Auth Flow
//!
//! 1. `POST /user/login` verifies the bcrypt password hash
//! 2. [`TokenService`] signs an access token (1 day) and a renewal token
//!    (10 days); the renewal token is persisted on the user record and
//!    both are set as http-only cookies
//! 3. On each protected request the [`Auth`] extractor:
//!    - takes the token from the `accessToken` cookie or the
//!      `Authorization: Bearer` header
//!    - verifies signature and expiry (HS256, 60 s clock-skew leeway)
//!    - resolves the embedded user id against live storage
//! 4. `POST /user/logout` clears the persisted renewal token and expires
//!    both cookies

pub mod claims;
pub mod error;
pub mod extractor;
pub mod roles;
pub mod tokens;

pub use claims::CurrentUser;
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
pub use roles::Role;
pub use tokens::TokenService;
