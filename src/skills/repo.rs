use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{CreateSkillRequest, SkillFilter};

/// Moderation status of a listing. Rejection is terminal; there is no
/// re-activation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "skill_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SkillStatus {
    Active,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub proficiency_level: String,
    pub tags: Vec<String>,
    pub hourly_rate: i32,
    pub status: SkillStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Skill row joined with the owner columns the catalog embeds.
#[derive(Debug, Clone, FromRow)]
pub struct SkillWithOwnerRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub proficiency_level: String,
    pub tags: Vec<String>,
    pub hourly_rate: i32,
    pub status: SkillStatus,
    pub created_at: OffsetDateTime,
    pub owner_first_name: String,
    pub owner_last_name: String,
    pub owner_location: String,
    pub owner_bio: String,
    pub owner_availability: String,
}

const SKILL_COLUMNS: &str =
    "id, user_id, title, description, category, proficiency_level, tags, hourly_rate, status, \
     created_at";

const SKILL_WITH_OWNER_COLUMNS: &str =
    "s.id, s.user_id, s.title, s.description, s.category, s.proficiency_level, s.tags, \
     s.hourly_rate, s.status, s.created_at, \
     u.first_name AS owner_first_name, u.last_name AS owner_last_name, \
     u.location AS owner_location, u.bio AS owner_bio, u.availability AS owner_availability";

impl Skill {
    pub async fn create(
        db: &PgPool,
        owner_id: Uuid,
        req: &CreateSkillRequest,
    ) -> sqlx::Result<Skill> {
        let sql = format!(
            "INSERT INTO skills (user_id, title, description, category, proficiency_level, tags, \
             hourly_rate) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {SKILL_COLUMNS}"
        );
        sqlx::query_as::<_, Skill>(&sql)
            .bind(owner_id)
            .bind(req.title.trim())
            .bind(&req.description)
            .bind(req.category.trim())
            .bind(req.proficiency_level.trim())
            .bind(&req.tags)
            .bind(req.hourly_rate)
            .fetch_one(db)
            .await
    }

    /// Current row regardless of status; swap creation needs to see
    /// rejected skills to report them distinctly.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Skill>> {
        let sql = format!("SELECT {SKILL_COLUMNS} FROM skills WHERE id = $1");
        sqlx::query_as::<_, Skill>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Active skills matching the filter, in insertion order. The search
    /// term is a case-insensitive substring over title, description and
    /// tags; category and level match exactly (case-folded); location is
    /// matched against the owner's profile.
    pub async fn list_active(
        db: &PgPool,
        filter: &SkillFilter,
    ) -> sqlx::Result<Vec<SkillWithOwnerRow>> {
        let sql = format!(
            "SELECT {SKILL_WITH_OWNER_COLUMNS} \
             FROM skills s JOIN users u ON u.id = s.user_id \
             WHERE s.status = 'active' \
               AND ($1::text IS NULL \
                    OR s.title ILIKE '%' || $1 || '%' \
                    OR s.description ILIKE '%' || $1 || '%' \
                    OR EXISTS (SELECT 1 FROM unnest(s.tags) t WHERE t ILIKE '%' || $1 || '%')) \
               AND ($2::text IS NULL OR lower(s.category) = lower($2)) \
               AND ($3::text IS NULL OR lower(s.proficiency_level) = lower($3)) \
               AND ($4::text IS NULL OR u.location ILIKE '%' || $4 || '%') \
             ORDER BY s.seq"
        );
        sqlx::query_as::<_, SkillWithOwnerRow>(&sql)
            .bind(filter.search.as_deref())
            .bind(filter.category.as_deref())
            .bind(filter.level.as_deref())
            .bind(filter.location.as_deref())
            .fetch_all(db)
            .await
    }

    pub async fn find_active_with_owner(
        db: &PgPool,
        id: Uuid,
    ) -> sqlx::Result<Option<SkillWithOwnerRow>> {
        let sql = format!(
            "SELECT {SKILL_WITH_OWNER_COLUMNS} \
             FROM skills s JOIN users u ON u.id = s.user_id \
             WHERE s.id = $1 AND s.status = 'active'"
        );
        sqlx::query_as::<_, SkillWithOwnerRow>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn categories(db: &PgPool) -> sqlx::Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM skills WHERE status = 'active' ORDER BY category",
        )
        .fetch_all(db)
        .await
    }

    pub async fn levels(db: &PgPool) -> sqlx::Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT proficiency_level FROM skills WHERE status = 'active' \
             ORDER BY proficiency_level",
        )
        .fetch_all(db)
        .await
    }

    /// Idempotent: rejecting an already-rejected skill rewrites the same
    /// status and succeeds.
    pub async fn reject(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Skill>> {
        let sql = format!(
            "UPDATE skills SET status = 'rejected' WHERE id = $1 RETURNING {SKILL_COLUMNS}"
        );
        sqlx::query_as::<_, Skill>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Moderation view: every skill, rejected included.
    pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<Skill>> {
        let sql = format!("SELECT {SKILL_COLUMNS} FROM skills ORDER BY seq");
        sqlx::query_as::<_, Skill>(&sql).fetch_all(db).await
    }
}
