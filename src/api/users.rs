// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Stockfolio

//! User account endpoints: registration, login/logout, wallet top-up.

use axum::{
    extract::{Multipart, State},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::{
        tokens::{ACCESS_TOKEN_TTL_HOURS, REFRESH_TOKEN_TTL_DAYS},
        Auth, Role, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE,
    },
    error::ApiError,
    models::{AddMoneyRequest, ApiResponse, EmptyData, LoginData, LoginRequest, RegisterForm},
    state::AppState,
    storage::{UserProfile, UserRecord},
};

/// Register a new user.
///
/// Accepts a multipart form with the account fields. A `photo` file part
/// is tolerated and discarded; this service stores no media.
#[utoipa::path(
    post,
    path = "/api/v1/user/register",
    tag = "Users",
    request_body(content = RegisterForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "User registered", body = ApiResponse<UserProfile>),
        (status = 400, description = "Missing fields or duplicate handle/email/pan"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let mut form = RegisterForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Malformed multipart form"))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "photo" {
            // Media handling is out of scope; drain and drop the part
            let _ = field
                .bytes()
                .await
                .map_err(|_| ApiError::bad_request("Malformed multipart form"))?;
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|_| ApiError::bad_request("Malformed multipart form"))?;

        match name.as_str() {
            "name" => form.name = value,
            "email" => form.email = value,
            "username" => form.username = value,
            "password" => form.password = value,
            "pan" => form.pan = value,
            "role" => form.role = Some(value),
            _ => {}
        }
    }

    let profile = create_user_from_form(&state, form)?;

    tracing::info!(username = %profile.username, "user created");
    Ok(Json(ApiResponse::ok(profile, "user registration done")))
}

/// Validate a registration form and persist the new user.
fn create_user_from_form(
    state: &AppState,
    form: RegisterForm,
) -> Result<UserProfile, ApiError> {
    let required = [
        &form.name,
        &form.email,
        &form.username,
        &form.password,
        &form.pan,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(ApiError::bad_request("All fields are required"));
    }

    let role = match form.role.as_deref() {
        None | Some("") => Role::User,
        Some(raw) => Role::from_str(raw)
            .ok_or_else(|| ApiError::bad_request("role must be 'user' or 'admin'"))?,
    };

    let password_hash = bcrypt::hash(&form.password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let record = UserRecord {
        user_id: Uuid::new_v4().to_string(),
        name: form.name,
        username: form.username,
        email: form.email.to_lowercase(),
        pan: form.pan,
        password_hash,
        role,
        wallet_money: 0,
        total_invested: 0,
        stocks: Vec::new(),
        refresh_token: None,
        created_at: Utc::now(),
    };

    state.db.create_user(&record)?;
    Ok(record.into())
}

/// Authenticate and open a session.
///
/// On success both tokens are set as http-only cookies and repeated in
/// the body; the renewal token is persisted on the user record,
/// replacing any previous one.
#[utoipa::path(
    post,
    path = "/api/v1/user/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<LoginData>),
        (status = 400, description = "Missing email"),
        (status = 401, description = "Unknown email or wrong password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginData>>), ApiError> {
    if payload.email.trim().is_empty() {
        return Err(ApiError::bad_request("All fields are required"));
    }

    let user = state
        .db
        .find_user_by_email(&payload.email)
        .map_err(|e| match e {
            crate::storage::StoreError::NotFound(_) => {
                ApiError::unauthorized("Invalid user credentials")
            }
            other => other.into(),
        })?;

    if !user.is_password_correct(&payload.password) {
        tracing::warn!(email = %payload.email, "failed login attempt");
        return Err(ApiError::unauthorized("Invalid user credentials"));
    }

    let access_token = state.tokens.issue_access_token(&user)?;
    let refresh_token = state.tokens.issue_refresh_token(&user)?;
    state
        .db
        .set_refresh_token(&user.user_id, Some(&refresh_token))?;

    let jar = jar
        .add(session_cookie(
            ACCESS_TOKEN_COOKIE,
            access_token.clone(),
            time::Duration::hours(ACCESS_TOKEN_TTL_HOURS),
        ))
        .add(session_cookie(
            REFRESH_TOKEN_COOKIE,
            refresh_token.clone(),
            time::Duration::days(REFRESH_TOKEN_TTL_DAYS),
        ));

    tracing::info!(user_id = %user.user_id, "login done");

    Ok((
        jar,
        Json(ApiResponse::ok(
            LoginData {
                user: user.into(),
                access_token,
                refresh_token,
            },
            "User logged in successfully",
        )),
    ))
}

/// Close the session: forget the renewal token and expire both cookies.
#[utoipa::path(
    post,
    path = "/api/v1/user/logout",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<EmptyData>),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Auth(user): Auth,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<EmptyData>>), ApiError> {
    state.db.set_refresh_token(&user.user_id, None)?;

    let jar = jar
        .remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_TOKEN_COOKIE).path("/"));

    tracing::info!(user_id = %user.user_id, "user logout done");
    Ok((jar, Json(ApiResponse::ok(EmptyData {}, "User logged out"))))
}

/// Fetch the acting user's account, secrets excluded.
#[utoipa::path(
    get,
    path = "/api/v1/user/GetCurrentUser",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User data", body = ApiResponse<UserProfile>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User no longer exists"),
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let record = state
        .db
        .get_user(&user.user_id)
        .map_err(|_| ApiError::not_found("User not found"))?;

    Ok(Json(ApiResponse::ok(
        record.into(),
        "User fetched successfully",
    )))
}

/// Credit the acting user's wallet.
#[utoipa::path(
    post,
    path = "/api/v1/user/addMoney",
    tag = "Users",
    security(("bearer" = [])),
    request_body = AddMoneyRequest,
    responses(
        (status = 200, description = "Wallet credited", body = ApiResponse<UserProfile>),
        (status = 400, description = "Non-positive amount"),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn add_money(
    State(state): State<AppState>,
    Auth(user): Auth,
    Json(payload): Json<AddMoneyRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    if payload.amount <= 0 {
        return Err(ApiError::bad_request("Invalid amount"));
    }

    let updated = state.db.credit_wallet(&user.user_id, payload.amount as u64)?;

    Ok(Json(ApiResponse::ok(
        updated.into(),
        "Amount added successfully",
    )))
}

fn session_cookie(
    name: &'static str,
    value: String,
    max_age: time::Duration,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(max_age)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{CurrentUser, TokenService};
    use crate::storage::MarketDatabase;
    use tempfile::TempDir;

    fn create_test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = MarketDatabase::open(&temp_dir.path().join("test.redb")).unwrap();
        let state = AppState::new(db, TokenService::new("access-secret", "refresh-secret"));
        (state, temp_dir)
    }

    fn register_alice(state: &AppState) -> UserProfile {
        create_user_from_form(
            state,
            RegisterForm {
                name: "Alice".into(),
                email: "Alice@Example.com".into(),
                username: "alice".into(),
                password: "hunter2".into(),
                pan: "ABCDE1234F".into(),
                role: None,
            },
        )
        .unwrap()
    }

    fn current(profile: &UserProfile) -> CurrentUser {
        CurrentUser {
            user_id: profile.user_id.clone(),
            name: profile.name.clone(),
            username: profile.username.clone(),
            email: profile.email.clone(),
            role: profile.role,
        }
    }

    #[test]
    fn registration_normalizes_email_and_defaults_role() {
        let (state, _dir) = create_test_state();
        let profile = register_alice(&state);

        assert_eq!(profile.email, "alice@example.com");
        assert_eq!(profile.role, Role::User);
        assert_eq!(profile.wallet_money, 0);

        let stored = state.db.get_user(&profile.user_id).unwrap();
        assert!(stored.is_password_correct("hunter2"));
    }

    #[test]
    fn registration_rejects_blank_fields_and_bad_roles() {
        let (state, _dir) = create_test_state();

        let blank = create_user_from_form(
            &state,
            RegisterForm {
                name: "  ".into(),
                email: "a@b.c".into(),
                username: "a".into(),
                password: "pw".into(),
                pan: "PAN".into(),
                role: None,
            },
        );
        assert_eq!(blank.unwrap_err().status.as_u16(), 400);

        let bad_role = create_user_from_form(
            &state,
            RegisterForm {
                name: "A".into(),
                email: "a@b.c".into(),
                username: "a".into(),
                password: "pw".into(),
                pan: "PAN".into(),
                role: Some("superuser".into()),
            },
        );
        assert_eq!(bad_role.unwrap_err().status.as_u16(), 400);
    }

    #[test]
    fn registration_rejects_duplicates() {
        let (state, _dir) = create_test_state();
        register_alice(&state);

        let dup = create_user_from_form(
            &state,
            RegisterForm {
                name: "Other".into(),
                email: "alice@example.com".into(),
                username: "other".into(),
                password: "pw".into(),
                pan: "ZZZZZ9999Z".into(),
                role: None,
            },
        );
        let err = dup.unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
        assert_eq!(err.message, "User already exists");
    }

    #[tokio::test]
    async fn login_sets_cookies_and_persists_refresh_token() {
        let (state, _dir) = create_test_state();
        let profile = register_alice(&state);

        let (jar, Json(body)) = login(
            State(state.clone()),
            CookieJar::new(),
            Json(LoginRequest {
                email: "alice@example.com".into(),
                password: "hunter2".into(),
            }),
        )
        .await
        .unwrap();

        assert!(body.success);
        assert_eq!(body.data.user.user_id, profile.user_id);
        assert!(!body.data.access_token.is_empty());
        assert!(jar.get(ACCESS_TOKEN_COOKIE).is_some());
        assert!(jar.get(REFRESH_TOKEN_COOKIE).is_some());

        let stored = state.db.get_user(&profile.user_id).unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some(body.data.refresh_token.as_str()));

        // Access token round-trips through the verifier
        let claims = state
            .tokens
            .verify_access_token(&body.data.access_token)
            .unwrap();
        assert_eq!(claims.sub, profile.user_id);
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials() {
        let (state, _dir) = create_test_state();
        register_alice(&state);

        let wrong_password = login(
            State(state.clone()),
            CookieJar::new(),
            Json(LoginRequest {
                email: "alice@example.com".into(),
                password: "nope".into(),
            }),
        )
        .await;
        assert_eq!(wrong_password.unwrap_err().status.as_u16(), 401);

        let unknown = login(
            State(state.clone()),
            CookieJar::new(),
            Json(LoginRequest {
                email: "ghost@example.com".into(),
                password: "pw".into(),
            }),
        )
        .await;
        assert_eq!(unknown.unwrap_err().status.as_u16(), 401);

        let blank = login(
            State(state),
            CookieJar::new(),
            Json(LoginRequest {
                email: "".into(),
                password: "pw".into(),
            }),
        )
        .await;
        assert_eq!(blank.unwrap_err().status.as_u16(), 400);
    }

    #[tokio::test]
    async fn logout_clears_stored_refresh_token() {
        let (state, _dir) = create_test_state();
        let profile = register_alice(&state);
        state
            .db
            .set_refresh_token(&profile.user_id, Some("tok"))
            .unwrap();

        let (jar, Json(body)) = logout(
            State(state.clone()),
            Auth(current(&profile)),
            CookieJar::new(),
        )
        .await
        .unwrap();

        assert!(body.success);
        assert_eq!(body.message, "User logged out");
        assert!(state.db.get_user(&profile.user_id).unwrap().refresh_token.is_none());
        assert!(jar.get(ACCESS_TOKEN_COOKIE).is_none());
    }

    #[tokio::test]
    async fn add_money_validates_and_credits() {
        let (state, _dir) = create_test_state();
        let profile = register_alice(&state);

        let err = add_money(
            State(state.clone()),
            Auth(current(&profile)),
            Json(AddMoneyRequest { amount: 0 }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status.as_u16(), 400);

        let Json(body) = add_money(
            State(state.clone()),
            Auth(current(&profile)),
            Json(AddMoneyRequest { amount: 1000 }),
        )
        .await
        .unwrap();
        assert_eq!(body.data.wallet_money, 1000);
        assert_eq!(state.db.get_user(&profile.user_id).unwrap().wallet_money, 1000);
    }

    #[tokio::test]
    async fn get_current_user_returns_profile() {
        let (state, _dir) = create_test_state();
        let profile = register_alice(&state);

        let Json(body) = get_current_user(State(state), Auth(current(&profile)))
            .await
            .unwrap();
        assert_eq!(body.data.username, "alice");
        assert_eq!(body.message, "User fetched successfully");
    }
}
