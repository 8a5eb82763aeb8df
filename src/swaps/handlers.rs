use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreateSwapBody, FeedbackBody, SwapView};
use super::services;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn swap_routes() -> Router<AppState> {
    Router::new()
        .route("/swap-requests", get(list_swaps).post(create_swap))
        .route("/swap-requests/:id", delete(withdraw_swap))
        .route("/swap-requests/:id/accept", post(accept_swap))
        .route("/swap-requests/:id/reject", post(reject_swap))
        .route("/swap-requests/:id/feedback", post(leave_feedback))
}

#[instrument(skip(state, body))]
pub async fn create_swap(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(body): Json<CreateSwapBody>,
) -> Result<(StatusCode, Json<SwapView>), ApiError> {
    let view = services::create_request(&state.db, caller, &body).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[instrument(skip(state))]
pub async fn list_swaps(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Vec<SwapView>>, ApiError> {
    Ok(Json(services::list_for_user(&state.db, caller).await?))
}

#[instrument(skip(state))]
pub async fn withdraw_swap(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    services::withdraw_request(&state.db, caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn accept_swap(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SwapView>, ApiError> {
    Ok(Json(services::accept_request(&state.db, caller, id).await?))
}

#[instrument(skip(state))]
pub async fn reject_swap(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SwapView>, ApiError> {
    Ok(Json(services::reject_request(&state.db, caller, id).await?))
}

#[instrument(skip(state, body))]
pub async fn leave_feedback(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<FeedbackBody>,
) -> Result<Json<SwapView>, ApiError> {
    Ok(Json(
        services::complete_request(&state.db, caller, id, &body).await?,
    ))
}
