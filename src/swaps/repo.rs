use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::domain::SwapStatus;

const SWAP_COLUMNS: &str =
    "id, skill_id, from_user_id, to_user_id, message, status, feedback, rating, created_at";

const SWAP_VIEW_COLUMNS: &str =
    "r.id, r.skill_id, r.from_user_id, r.to_user_id, r.message, r.status, r.feedback, r.rating, \
     r.created_at, \
     s.title AS skill_title, s.category AS skill_category, \
     fu.first_name AS from_first_name, fu.last_name AS from_last_name, \
     tu.first_name AS to_first_name, tu.last_name AS to_last_name";

const SWAP_VIEW_FROM: &str = "swap_requests r \
     JOIN skills s ON s.id = r.skill_id \
     JOIN users fu ON fu.id = r.from_user_id \
     JOIN users tu ON tu.id = r.to_user_id";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SwapRequest {
    pub id: Uuid,
    pub skill_id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub message: String,
    pub status: SwapStatus,
    pub feedback: Option<String>,
    pub rating: Option<i16>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Swap row joined with the skill and party summaries the dashboard embeds.
#[derive(Debug, Clone, FromRow)]
pub struct SwapViewRow {
    pub id: Uuid,
    pub skill_id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub message: String,
    pub status: SwapStatus,
    pub feedback: Option<String>,
    pub rating: Option<i16>,
    pub created_at: OffsetDateTime,
    pub skill_title: String,
    pub skill_category: String,
    pub from_first_name: String,
    pub from_last_name: String,
    pub to_first_name: String,
    pub to_last_name: String,
}

impl SwapRequest {
    pub async fn insert(
        db: &PgPool,
        skill_id: Uuid,
        from_user_id: Uuid,
        to_user_id: Uuid,
        message: &str,
    ) -> sqlx::Result<SwapRequest> {
        let sql = format!(
            "INSERT INTO swap_requests (skill_id, from_user_id, to_user_id, message) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {SWAP_COLUMNS}"
        );
        sqlx::query_as::<_, SwapRequest>(&sql)
            .bind(skill_id)
            .bind(from_user_id)
            .bind(to_user_id)
            .bind(message)
            .fetch_one(db)
            .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<SwapRequest>> {
        let sql = format!("SELECT {SWAP_COLUMNS} FROM swap_requests WHERE id = $1");
        sqlx::query_as::<_, SwapRequest>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Conditional accept: the status guard in the WHERE clause makes the
    /// read-check-write a single atomic statement, so of two concurrent
    /// accepts exactly one sees a pending row.
    pub async fn try_accept(db: &PgPool, id: Uuid) -> sqlx::Result<Option<SwapRequest>> {
        let sql = format!(
            "UPDATE swap_requests SET status = 'accepted' \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {SWAP_COLUMNS}"
        );
        sqlx::query_as::<_, SwapRequest>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn try_reject(db: &PgPool, id: Uuid) -> sqlx::Result<Option<SwapRequest>> {
        let sql = format!(
            "UPDATE swap_requests SET status = 'rejected' \
             WHERE id = $1 AND status IN ('pending', 'accepted') \
             RETURNING {SWAP_COLUMNS}"
        );
        sqlx::query_as::<_, SwapRequest>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Completion writes feedback and rating in the same conditional update
    /// that leaves `accepted`, so feedback is recorded exactly once.
    pub async fn try_complete(
        db: &PgPool,
        id: Uuid,
        feedback: &str,
        rating: i16,
    ) -> sqlx::Result<Option<SwapRequest>> {
        let sql = format!(
            "UPDATE swap_requests SET status = 'completed', feedback = $2, rating = $3 \
             WHERE id = $1 AND status = 'accepted' \
             RETURNING {SWAP_COLUMNS}"
        );
        sqlx::query_as::<_, SwapRequest>(&sql)
            .bind(id)
            .bind(feedback)
            .bind(rating)
            .fetch_optional(db)
            .await
    }

    /// Conditional withdraw: deletes only while the row is still pending,
    /// so a request accepted in the meantime survives.
    pub async fn try_delete_pending(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "DELETE FROM swap_requests WHERE id = $1 AND status = 'pending' RETURNING id",
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn view_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<SwapViewRow>> {
        let sql = format!("SELECT {SWAP_VIEW_COLUMNS} FROM {SWAP_VIEW_FROM} WHERE r.id = $1");
        sqlx::query_as::<_, SwapViewRow>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Everything the user is a party to, all statuses, oldest first.
    pub async fn list_views_for_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<SwapViewRow>> {
        let sql = format!(
            "SELECT {SWAP_VIEW_COLUMNS} FROM {SWAP_VIEW_FROM} \
             WHERE r.from_user_id = $1 OR r.to_user_id = $1 \
             ORDER BY r.seq"
        );
        sqlx::query_as::<_, SwapViewRow>(&sql)
            .bind(user_id)
            .fetch_all(db)
            .await
    }

    /// Moderation view: every swap on the platform.
    pub async fn list_views_all(db: &PgPool) -> sqlx::Result<Vec<SwapViewRow>> {
        let sql = format!(
            "SELECT {SWAP_VIEW_COLUMNS} FROM {SWAP_VIEW_FROM} ORDER BY r.seq"
        );
        sqlx::query_as::<_, SwapViewRow>(&sql).fetch_all(db).await
    }
}
