use axum::Router;

use crate::state::AppState;

pub mod domain;
pub mod dto;
pub mod handlers;
pub mod repo;
pub mod services;

pub fn router() -> Router<AppState> {
    handlers::swap_routes()
}
