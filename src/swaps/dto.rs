use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::domain::SwapStatus;
use super::repo::SwapViewRow;

/// Body for creating a swap request. The target user is not part of the
/// body: it is derived from the skill's current owner by the engine.
#[derive(Debug, Deserialize)]
pub struct CreateSwapBody {
    pub skill_id: Uuid,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackBody {
    #[serde(default)]
    pub feedback: String,
    pub rating: i16,
}

#[derive(Debug, Serialize)]
pub struct PartySummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct SwapSkillSummary {
    pub id: Uuid,
    pub title: String,
    pub category: String,
}

/// Swap request as surfaced to dashboards and the admin audit view.
#[derive(Debug, Serialize)]
pub struct SwapView {
    pub id: Uuid,
    pub skill: SwapSkillSummary,
    pub from_user: PartySummary,
    pub to_user: PartySummary,
    pub message: String,
    pub status: SwapStatus,
    pub feedback: Option<String>,
    pub rating: Option<i16>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<SwapViewRow> for SwapView {
    fn from(row: SwapViewRow) -> Self {
        Self {
            id: row.id,
            skill: SwapSkillSummary {
                id: row.skill_id,
                title: row.skill_title,
                category: row.skill_category,
            },
            from_user: PartySummary {
                id: row.from_user_id,
                first_name: row.from_first_name,
                last_name: row.from_last_name,
            },
            to_user: PartySummary {
                id: row.to_user_id,
                first_name: row.to_first_name,
                last_name: row.to_last_name,
            },
            message: row.message,
            status: row.status,
            feedback: row.feedback,
            rating: row.rating,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn create_body_message_defaults_to_empty() {
        let body: CreateSwapBody = serde_json::from_str(
            r#"{"skill_id":"7f2c1cce-95b2-47f8-a433-7a3febcd2563"}"#,
        )
        .unwrap();
        assert!(body.message.is_empty());
    }

    #[test]
    fn view_serializes_nested_summaries_and_status() {
        let view = SwapView {
            id: Uuid::new_v4(),
            skill: SwapSkillSummary {
                id: Uuid::new_v4(),
                title: "Spanish".into(),
                category: "Language".into(),
            },
            from_user: PartySummary {
                id: Uuid::new_v4(),
                first_name: "Sarah".into(),
                last_name: "Designer".into(),
            },
            to_user: PartySummary {
                id: Uuid::new_v4(),
                first_name: "Maria".into(),
                last_name: "Garcia".into(),
            },
            message: "hi".into(),
            status: SwapStatus::Completed,
            feedback: Some("Great!".into()),
            rating: Some(5),
            created_at: datetime!(2024-01-01 00:00:00 UTC),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["rating"], 5);
        assert_eq!(json["skill"]["title"], "Spanish");
        assert_eq!(json["from_user"]["first_name"], "Sarah");
    }
}
