use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CreateSkillRequest, SkillDetails, SkillFilter, SkillListItem};
use super::repo::Skill;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn skill_routes() -> Router<AppState> {
    Router::new()
        .route("/skills", get(list_skills).post(create_skill))
        .route("/skills/categories", get(get_categories))
        .route("/skills/levels", get(get_levels))
        .route("/skills/:id", get(get_skill))
}

#[instrument(skip(state))]
pub async fn list_skills(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Query(filter): Query<SkillFilter>,
) -> Result<Json<Vec<SkillListItem>>, ApiError> {
    let filter = filter.normalized();
    let rows = Skill::list_active(&state.db, &filter).await?;
    Ok(Json(rows.into_iter().map(SkillListItem::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_categories(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(Skill::categories(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn get_levels(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(Skill::levels(&state.db).await?))
}

/// Rejected listings are indistinguishable from absent ones here; they stay
/// visible only through the moderation views.
#[instrument(skip(state))]
pub async fn get_skill(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SkillDetails>, ApiError> {
    let row = Skill::find_active_with_owner(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Skill not found"))?;
    Ok(Json(SkillDetails::from(row)))
}

#[instrument(skip(state, payload))]
pub async fn create_skill(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<CreateSkillRequest>,
) -> Result<(StatusCode, Json<Skill>), ApiError> {
    payload.validate()?;
    let skill = Skill::create(&state.db, caller, &payload).await?;
    info!(skill_id = %skill.id, owner = %caller, "skill created");
    Ok((StatusCode::CREATED, Json(skill)))
}
