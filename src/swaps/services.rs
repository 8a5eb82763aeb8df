use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::domain::{
    ensure_accept_allowed, ensure_actor_not_banned, ensure_complete_allowed, ensure_new_request,
    ensure_reject_allowed, ensure_withdraw_allowed, validate_rating,
};
use super::dto::{CreateSwapBody, FeedbackBody, SwapView};
use super::repo::SwapRequest;
use crate::error::ApiError;
use crate::skills::repo::Skill;
use crate::users::repo::User;

/// Creates a pending request against the skill's current owner. Ownership
/// is resolved here, not by the caller, so there is no window between
/// "look up skill" and "submit request".
pub async fn create_request(
    db: &PgPool,
    caller: Uuid,
    body: &CreateSwapBody,
) -> Result<SwapView, ApiError> {
    let requester = User::caller(db, caller).await?;
    ensure_actor_not_banned(requester.banned)?;

    let skill = Skill::find_by_id(db, body.skill_id)
        .await?
        .ok_or_else(|| ApiError::validation("Skill not found"))?;
    let owner = User::find_by_id(db, skill.user_id)
        .await?
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("skill owner row missing")))?;
    ensure_new_request(requester.id, owner.id, skill.status, owner.banned)?;

    let swap = SwapRequest::insert(db, skill.id, requester.id, owner.id, &body.message).await?;
    info!(swap_id = %swap.id, from = %requester.id, to = %owner.id, "swap request created");
    view(db, swap.id).await
}

/// pending→accepted, target user only. The repo update carries the status
/// guard, so a concurrent double-accept loses with ConflictError.
pub async fn accept_request(db: &PgPool, caller: Uuid, id: Uuid) -> Result<SwapView, ApiError> {
    let user = User::caller(db, caller).await?;
    ensure_actor_not_banned(user.banned)?;

    let swap = SwapRequest::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Swap request not found"))?;
    ensure_accept_allowed(user.id, swap.to_user_id, swap.status)?;

    match SwapRequest::try_accept(db, id).await? {
        Some(updated) => {
            info!(swap_id = %updated.id, by = %user.id, "swap request accepted");
            view(db, updated.id).await
        }
        // Lost the race against a concurrent transition.
        None => Err(ApiError::conflict("Request is not pending")),
    }
}

/// pending|accepted → rejected, by either party.
pub async fn reject_request(db: &PgPool, caller: Uuid, id: Uuid) -> Result<SwapView, ApiError> {
    let user = User::caller(db, caller).await?;
    ensure_actor_not_banned(user.banned)?;

    let swap = SwapRequest::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Swap request not found"))?;
    ensure_reject_allowed(user.id, swap.from_user_id, swap.to_user_id, swap.status)?;

    match SwapRequest::try_reject(db, id).await? {
        Some(updated) => {
            info!(swap_id = %updated.id, by = %user.id, "swap request rejected");
            view(db, updated.id).await
        }
        None => Err(ApiError::conflict("Request is already resolved")),
    }
}

/// accepted→completed with feedback, by either party. Feedback is written
/// in the same guarded update as the transition and is immutable afterward.
pub async fn complete_request(
    db: &PgPool,
    caller: Uuid,
    id: Uuid,
    body: &FeedbackBody,
) -> Result<SwapView, ApiError> {
    validate_rating(body.rating)?;

    let user = User::caller(db, caller).await?;
    ensure_actor_not_banned(user.banned)?;

    let swap = SwapRequest::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Swap request not found"))?;
    ensure_complete_allowed(user.id, swap.from_user_id, swap.to_user_id, swap.status)?;

    match SwapRequest::try_complete(db, id, &body.feedback, body.rating).await? {
        Some(updated) => {
            info!(swap_id = %updated.id, by = %user.id, rating = body.rating, "swap completed");
            view(db, updated.id).await
        }
        None => Err(ApiError::conflict("Request is not accepted")),
    }
}

/// Deletes the caller's own still-pending request. The conditional delete
/// mirrors the transition updates: a request accepted concurrently is no
/// longer deletable and the caller gets ConflictError.
pub async fn withdraw_request(db: &PgPool, caller: Uuid, id: Uuid) -> Result<(), ApiError> {
    let user = User::caller(db, caller).await?;
    ensure_actor_not_banned(user.banned)?;

    let swap = SwapRequest::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Swap request not found"))?;
    ensure_withdraw_allowed(user.id, swap.from_user_id, swap.status)?;

    match SwapRequest::try_delete_pending(db, id).await? {
        Some(deleted) => {
            info!(swap_id = %deleted, by = %user.id, "swap request withdrawn");
            Ok(())
        }
        None => Err(ApiError::conflict("Only pending requests can be withdrawn")),
    }
}

pub async fn list_for_user(db: &PgPool, caller: Uuid) -> Result<Vec<SwapView>, ApiError> {
    let rows = SwapRequest::list_views_for_user(db, caller).await?;
    Ok(rows.into_iter().map(SwapView::from).collect())
}

async fn view(db: &PgPool, id: Uuid) -> Result<SwapView, ApiError> {
    let row = SwapRequest::view_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("swap row vanished after write")))?;
    Ok(SwapView::from(row))
}
