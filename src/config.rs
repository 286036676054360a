// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Stockfolio

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Directory holding the redb database file | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8000` |
//! | `ACCESS_TOKEN_SECRET` | HS256 secret for access tokens | dev fallback (warned) |
//! | `REFRESH_TOKEN_SECRET` | HS256 secret for renewal tokens | dev fallback (warned) |
//! | `ALLOWED_ORIGINS` | Comma-separated CORS origin allow-list | dev frontend origins |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the access token signing secret.
pub const ACCESS_TOKEN_SECRET_ENV: &str = "ACCESS_TOKEN_SECRET";

/// Environment variable name for the renewal token signing secret.
pub const REFRESH_TOKEN_SECRET_ENV: &str = "REFRESH_TOKEN_SECRET";

/// Environment variable name for the CORS origin allow-list.
pub const ALLOWED_ORIGINS_ENV: &str = "ALLOWED_ORIGINS";

/// Default CORS allow-list: the dev frontend origins.
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:8000";

/// Name of the redb database file inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "stockfolio.redb";

/// Runtime configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from the environment, falling back to the
    /// documented defaults. Missing signing secrets are tolerated with a
    /// warning so local development works out of the box.
    pub fn from_env() -> Self {
        let data_dir = env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var(PORT_ENV)
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .unwrap_or(8000);

        let access_token_secret = secret_from_env(ACCESS_TOKEN_SECRET_ENV, "dev-access-secret");
        let refresh_token_secret = secret_from_env(REFRESH_TOKEN_SECRET_ENV, "dev-refresh-secret");

        let allowed_origins = env::var(ALLOWED_ORIGINS_ENV)
            .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Self {
            data_dir,
            host,
            port,
            access_token_secret,
            refresh_token_secret,
            allowed_origins,
        }
    }

    /// Full path of the redb database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

fn secret_from_env(var: &str, dev_fallback: &str) -> String {
    match env::var(var) {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            tracing::warn!(variable = var, "signing secret not set, using dev fallback");
            dev_fallback.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_path_appends_file_name() {
        let config = Config {
            data_dir: PathBuf::from("/tmp/stockfolio"),
            host: "0.0.0.0".to_string(),
            port: 8000,
            access_token_secret: "a".to_string(),
            refresh_token_secret: "r".to_string(),
            allowed_origins: vec![],
        };
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/stockfolio/stockfolio.redb")
        );
    }
}
