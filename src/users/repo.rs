use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::UserSearchFilter;
use crate::auth::dto::UpdateProfileRequest;
use crate::error::ApiError;

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, bio, \
     location, availability, is_public, skills_offered, skills_wanted, banned, is_admin, \
     created_at";

/// User record in the database. The password hash is opaque to the engine
/// and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub location: String,
    pub availability: String,
    pub is_public: bool,
    pub skills_offered: Vec<String>,
    pub skills_wanted: Vec<String>,
    pub banned: bool,
    pub is_admin: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub bio: &'a str,
    pub location: &'a str,
    pub availability: &'a str,
    pub is_public: bool,
    pub skills_offered: &'a [String],
    pub skills_wanted: &'a [String],
}

impl User {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_username(db: &PgPool, username: &str) -> sqlx::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(db)
            .await
    }

    pub async fn create(db: &PgPool, new: &NewUser<'_>) -> sqlx::Result<User> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, first_name, last_name, bio, \
             location, availability, is_public, skills_offered, skills_wanted) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(new.username)
            .bind(new.email)
            .bind(new.password_hash)
            .bind(new.first_name)
            .bind(new.last_name)
            .bind(new.bio)
            .bind(new.location)
            .bind(new.availability)
            .bind(new.is_public)
            .bind(new.skills_offered)
            .bind(new.skills_wanted)
            .fetch_one(db)
            .await
    }

    /// Partial profile update; absent fields keep their current value.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        update: &UpdateProfileRequest,
    ) -> sqlx::Result<Option<User>> {
        let sql = format!(
            "UPDATE users SET \
             first_name = COALESCE($2, first_name), \
             last_name = COALESCE($3, last_name), \
             bio = COALESCE($4, bio), \
             location = COALESCE($5, location), \
             availability = COALESCE($6, availability), \
             is_public = COALESCE($7, is_public), \
             skills_offered = COALESCE($8, skills_offered), \
             skills_wanted = COALESCE($9, skills_wanted) \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(update.first_name.as_deref())
            .bind(update.last_name.as_deref())
            .bind(update.bio.as_deref())
            .bind(update.location.as_deref())
            .bind(update.availability.as_deref())
            .bind(update.is_public)
            .bind(update.skills_offered.as_deref())
            .bind(update.skills_wanted.as_deref())
            .fetch_optional(db)
            .await
    }

    /// Public, non-banned users matching the filter, in insertion order.
    /// The skill term matches offered and wanted labels alike; the offered
    /// and wanted terms scope to one list each.
    pub async fn search_public(db: &PgPool, filter: &UserSearchFilter) -> sqlx::Result<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE is_public AND NOT banned \
               AND ($1::text IS NULL \
                    OR EXISTS (SELECT 1 FROM unnest(skills_offered) s WHERE s ILIKE '%' || $1 || '%') \
                    OR EXISTS (SELECT 1 FROM unnest(skills_wanted) s WHERE s ILIKE '%' || $1 || '%')) \
               AND ($2::text IS NULL \
                    OR EXISTS (SELECT 1 FROM unnest(skills_offered) s WHERE s ILIKE '%' || $2 || '%')) \
               AND ($3::text IS NULL \
                    OR EXISTS (SELECT 1 FROM unnest(skills_wanted) s WHERE s ILIKE '%' || $3 || '%')) \
               AND ($4::text IS NULL OR availability ILIKE '%' || $4 || '%') \
               AND ($5::text IS NULL OR location ILIKE '%' || $5 || '%') \
             ORDER BY seq"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(filter.skill.as_deref())
            .bind(filter.offered.as_deref())
            .bind(filter.wanted.as_deref())
            .bind(filter.availability.as_deref())
            .bind(filter.location.as_deref())
            .fetch_all(db)
            .await
    }

    /// Moderation view: every user, banned and private included.
    pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY seq");
        sqlx::query_as::<_, User>(&sql).fetch_all(db).await
    }

    pub async fn set_banned(db: &PgPool, id: Uuid, banned: bool) -> sqlx::Result<Option<User>> {
        let sql = format!("UPDATE users SET banned = $2 WHERE id = $1 RETURNING {USER_COLUMNS}");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(banned)
            .fetch_optional(db)
            .await
    }

    /// Resolve the authenticated caller to a user row. A valid token for a
    /// row that no longer exists is treated as an authentication failure.
    pub async fn caller(db: &PgPool, id: Uuid) -> Result<User, ApiError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Unknown user"))
    }
}
