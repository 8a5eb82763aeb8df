use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Ledger entry: the feedback fields of a completed swap, keyed by the swap
/// and the rater. There is no separate store; `complete` is the only writer.
#[derive(Debug, Clone, FromRow)]
pub struct FeedbackRow {
    pub swap_id: Uuid,
    pub rater_id: Uuid,
    pub rater_first_name: String,
    pub rater_last_name: String,
    pub skill_title: String,
    pub feedback: String,
    pub rating: i16,
    pub created_at: OffsetDateTime,
}

impl FeedbackRow {
    /// Feedback left on completed swaps where the user was the target.
    pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<FeedbackRow>> {
        sqlx::query_as::<_, FeedbackRow>(
            "SELECT r.id AS swap_id, \
                    fu.id AS rater_id, \
                    fu.first_name AS rater_first_name, \
                    fu.last_name AS rater_last_name, \
                    s.title AS skill_title, \
                    COALESCE(r.feedback, '') AS feedback, \
                    r.rating, \
                    r.created_at \
             FROM swap_requests r \
             JOIN users fu ON fu.id = r.from_user_id \
             JOIN skills s ON s.id = r.skill_id \
             WHERE r.to_user_id = $1 AND r.status = 'completed' AND r.rating IS NOT NULL \
             ORDER BY r.seq",
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }
}
