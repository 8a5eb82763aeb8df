use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::FeedbackEntry;
use super::repo::FeedbackRow;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn feedback_routes() -> Router<AppState> {
    Router::new().route("/users/:id/feedback", get(feedback_for_user))
}

#[instrument(skip(state))]
pub async fn feedback_for_user(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<FeedbackEntry>>, ApiError> {
    let rows = FeedbackRow::list_for_user(&state.db, id).await?;
    Ok(Json(rows.into_iter().map(FeedbackEntry::from).collect()))
}
