use axum::{extract::State, routing::get, Json, Router};
use tracing::{instrument, warn};

use crate::auth::extractors::AuthUser;
use crate::auth::repo_types::User;
use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{ReferralStatsResponse, ReferredUser};

pub fn referral_routes() -> Router<AppState> {
    Router::new()
        .route("/referrals", get(list_referrals))
        .route("/referral-stats", get(referral_stats))
}

/// Accounts the caller referred, scoped by the token subject.
#[instrument(skip(state))]
pub async fn list_referrals(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
) -> Result<Json<Vec<ReferredUser>>, ApiError> {
    let user = resolve_caller(&state, &email).await?;

    let referred = User::list_referred_by(&state.db, user.id).await?;
    let items = referred
        .into_iter()
        .map(|u| ReferredUser {
            username: u.username,
            email: u.email,
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn referral_stats(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
) -> Result<Json<ReferralStatsResponse>, ApiError> {
    let user = resolve_caller(&state, &email).await?;

    Ok(Json(ReferralStatsResponse {
        username: user.username,
        total_referrals: user.referrals,
    }))
}

async fn resolve_caller(state: &AppState, email: &str) -> Result<User, ApiError> {
    User::find_by_email(&state.db, email)
        .await?
        .ok_or_else(|| {
            warn!(email = %email, "token subject no longer exists");
            ApiError::bad_request("User not found")
        })
}
