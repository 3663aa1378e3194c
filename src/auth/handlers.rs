use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::auth::dto::{
    ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, LoginResponse, MessageResponse,
    RegisterRequest, RegisterResponse, ResetPasswordRequest,
};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{
    hash_password, validate_password, verify_password, WEAK_PASSWORD_MESSAGE,
};
use crate::auth::repo_types::User;
use crate::error::ApiError;
use crate::referrals::code::{generate_referral_code, referral_link};
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.username = payload.username.trim().to_string();

    if payload.username.is_empty() {
        return Err(ApiError::bad_request("Username is required"));
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::bad_request("Invalid email"));
    }

    if !validate_password(&payload.password) {
        warn!("weak password rejected");
        return Err(ApiError::bad_request(WEAK_PASSWORD_MESSAGE));
    }

    if User::find_by_email(&state.db, &payload.email)
        .await?
        .is_some()
    {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::bad_request("User already exists"));
    }

    let hash = hash_password(&payload.password)?;

    // An unmatched referral code is ignored; registration still succeeds.
    let referred_by = match payload.referral_code.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => User::find_by_referral_code(&state.db, code)
            .await?
            .map(|referrer| referrer.id),
        _ => None,
    };

    let referral_code = generate_referral_code();
    let user = User::create(
        &state.db,
        &payload.username,
        &payload.email,
        &hash,
        &referral_code,
        referred_by,
    )
    .await
    .map_err(map_unique_violation)?;

    info!(
        user_id = %user.id,
        email = %user.email,
        referred = referred_by.is_some(),
        "user registered"
    );

    let link = referral_link(&state.config.frontend_url, &user.referral_code);
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".into(),
            referral_code: user.referral_code,
            referral_link: link,
        }),
    ))
}

/// The pre-insert duplicate check can lose a race; the unique constraints are
/// the source of truth, so their violations map back to client errors.
fn map_unique_violation(e: sqlx::Error) -> ApiError {
    if let Some(constraint) = e.as_database_error().and_then(|db| db.constraint()) {
        match constraint {
            "users_email_key" => return ApiError::bad_request("User already exists"),
            "users_username_key" => return ApiError::bad_request("Username already taken"),
            _ => {}
        }
    }
    e.into()
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    // Unknown email and wrong password share one message, so neither case
    // reveals whether the account exists.
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::bad_request("Invalid email or password")
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::bad_request("Invalid email or password"));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign_session(&user.email)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        token,
        message: "Login successful".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(mut payload): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "forgot-password unknown email");
            ApiError::bad_request("User not found")
        })?;

    let keys = JwtKeys::from_ref(&state);
    let reset_token = keys.sign_reset(&user.email)?;

    // Delivery is best effort; the token is also returned in the body.
    if let Err(e) = state
        .mailer
        .send_password_reset(&user.email, &reset_token)
        .await
    {
        warn!(error = %e, user_id = %user.id, "password reset mail failed");
    }

    info!(user_id = %user.id, "reset token issued");
    Ok(Json(ForgotPasswordResponse {
        message: "Use this token to reset your password".into(),
        reset_token,
    }))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_reset(&payload.token).map_err(|_| {
        warn!("reset with invalid token");
        ApiError::bad_request("Invalid or expired token")
    })?;

    let user = User::find_by_email(&state.db, &claims.sub)
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid or expired token"))?;

    if !validate_password(&payload.new_password) {
        return Err(ApiError::bad_request(WEAK_PASSWORD_MESSAGE));
    }

    let hash = hash_password(&payload.new_password)?;
    User::update_password_hash(&state.db, user.id, &hash).await?;

    info!(user_id = %user.id, "password reset");
    Ok(Json(MessageResponse {
        message: "Password reset successful".into(),
    }))
}
