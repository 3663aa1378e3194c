use axum::Router;

use crate::state::AppState;

pub(crate) mod code;
mod dto;
pub mod handlers;

pub fn router() -> Router<AppState> {
    handlers::referral_routes()
}
