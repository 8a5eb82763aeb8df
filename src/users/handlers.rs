use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{PublicProfile, UserSearchFilter};
use super::repo::User;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/search", get(search_users))
        .route("/users/:id", get(get_public_profile))
}

/// Candidates for swap initiation. The caller is not excluded here; the
/// self-swap rule is enforced when the request is created.
#[instrument(skip(state))]
pub async fn search_users(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Query(filter): Query<UserSearchFilter>,
) -> Result<Json<Vec<PublicProfile>>, ApiError> {
    let filter = filter.normalized();
    let users = User::search_public(&state.db, &filter).await?;
    Ok(Json(users.into_iter().map(PublicProfile::from).collect()))
}

/// Private profiles answer exactly like absent ones so that existence is
/// not leaked.
#[instrument(skip(state))]
pub async fn get_public_profile(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicProfile>, ApiError> {
    match User::find_by_id(&state.db, id).await? {
        Some(user) if user.is_public => Ok(Json(PublicProfile::from(user))),
        _ => Err(ApiError::not_found("User not found")),
    }
}
