use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::skills::repo::Skill;
use crate::state::AppState;
use crate::swaps::dto::SwapView;
use crate::swaps::repo::SwapRequest;
use crate::users::repo::User;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/skills", get(list_all_skills))
        .route("/admin/skills/:id/reject", post(reject_skill))
        .route("/admin/users", get(list_all_users))
        .route("/admin/users/:id/ban", post(ban_user))
        .route("/admin/users/:id/unban", post(unban_user))
        .route("/admin/swaps", get(list_all_swaps))
}

async fn require_admin(db: &PgPool, caller: Uuid) -> Result<User, ApiError> {
    let user = User::caller(db, caller).await?;
    if !user.is_admin {
        return Err(ApiError::permission("Admin only"));
    }
    Ok(user)
}

#[instrument(skip(state))]
pub async fn list_all_skills(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Vec<Skill>>, ApiError> {
    require_admin(&state.db, caller).await?;
    Ok(Json(Skill::list_all(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn reject_skill(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Skill>, ApiError> {
    let admin = require_admin(&state.db, caller).await?;
    let skill = Skill::reject(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Skill not found"))?;
    info!(skill_id = %skill.id, admin = %admin.id, "skill rejected");
    Ok(Json(skill))
}

#[instrument(skip(state))]
pub async fn list_all_users(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Vec<User>>, ApiError> {
    require_admin(&state.db, caller).await?;
    Ok(Json(User::list_all(&state.db).await?))
}

/// Bans take effect on the user's next action; in-flight swaps are left
/// alone for audit.
#[instrument(skip(state))]
pub async fn ban_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let admin = require_admin(&state.db, caller).await?;
    let user = User::set_banned(&state.db, id, true)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    info!(user_id = %user.id, admin = %admin.id, "user banned");
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn unban_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let admin = require_admin(&state.db, caller).await?;
    let user = User::set_banned(&state.db, id, false)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    info!(user_id = %user.id, admin = %admin.id, "user unbanned");
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn list_all_swaps(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Vec<SwapView>>, ApiError> {
    require_admin(&state.db, caller).await?;
    let rows = SwapRequest::list_views_all(&state.db).await?;
    Ok(Json(rows.into_iter().map(SwapView::from).collect()))
}
