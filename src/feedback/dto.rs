use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::FeedbackRow;

#[derive(Debug, Serialize)]
pub struct RaterSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackEntry {
    pub swap_id: Uuid,
    pub rater: RaterSummary,
    pub skill_title: String,
    pub feedback: String,
    pub rating: i16,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<FeedbackRow> for FeedbackEntry {
    fn from(row: FeedbackRow) -> Self {
        Self {
            swap_id: row.swap_id,
            rater: RaterSummary {
                id: row.rater_id,
                first_name: row.rater_first_name,
                last_name: row.rater_last_name,
            },
            skill_title: row.skill_title,
            feedback: row.feedback,
            rating: row.rating,
            created_at: row.created_at,
        }
    }
}
