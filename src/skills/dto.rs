use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::{SkillStatus, SkillWithOwnerRow};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateSkillRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub proficiency_level: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub hourly_rate: i32,
}

impl CreateSkillRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::validation("Title is required"));
        }
        if self.category.trim().is_empty() {
            return Err(ApiError::validation("Category is required"));
        }
        if self.proficiency_level.trim().is_empty() {
            return Err(ApiError::validation("Proficiency level is required"));
        }
        if self.hourly_rate < 0 {
            return Err(ApiError::validation("Hourly rate must not be negative"));
        }
        Ok(())
    }
}

/// Catalog query parameters; blank terms mean "no filter". The substring
/// terms (search, location) are escaped so LIKE metacharacters match
/// literally; category and level are exact matches and stay as typed.
#[derive(Debug, Default, Deserialize)]
pub struct SkillFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub location: Option<String>,
}

impl SkillFilter {
    pub fn normalized(self) -> Self {
        Self {
            search: like_term(self.search),
            category: non_empty(self.category),
            level: non_empty(self.level),
            location: like_term(self.location),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn like_term(value: Option<String>) -> Option<String> {
    non_empty(value).map(|v| escape_like(&v))
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Serialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub location: String,
}

/// Owner summary with the extra profile fields shown on the skill detail
/// page.
#[derive(Debug, Serialize)]
pub struct OwnerDetails {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub location: String,
    pub bio: String,
    pub availability: String,
}

#[derive(Debug, Serialize)]
pub struct SkillListItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub proficiency_level: String,
    pub tags: Vec<String>,
    pub hourly_rate: i32,
    pub status: SkillStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub user: OwnerSummary,
}

#[derive(Debug, Serialize)]
pub struct SkillDetails {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub proficiency_level: String,
    pub tags: Vec<String>,
    pub hourly_rate: i32,
    pub status: SkillStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub user: OwnerDetails,
}

impl From<SkillWithOwnerRow> for SkillListItem {
    fn from(row: SkillWithOwnerRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            proficiency_level: row.proficiency_level,
            tags: row.tags,
            hourly_rate: row.hourly_rate,
            status: row.status,
            created_at: row.created_at,
            user: OwnerSummary {
                id: row.user_id,
                first_name: row.owner_first_name,
                last_name: row.owner_last_name,
                location: row.owner_location,
            },
        }
    }
}

impl From<SkillWithOwnerRow> for SkillDetails {
    fn from(row: SkillWithOwnerRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            proficiency_level: row.proficiency_level,
            tags: row.tags,
            hourly_rate: row.hourly_rate,
            status: row.status,
            created_at: row.created_at,
            user: OwnerDetails {
                id: row.user_id,
                first_name: row.owner_first_name,
                last_name: row.owner_last_name,
                location: row.owner_location,
                bio: row.owner_bio,
                availability: row.owner_availability,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateSkillRequest {
        CreateSkillRequest {
            title: "Spanish Language Tutoring".into(),
            description: "Conversational and academic tutoring".into(),
            category: "Language".into(),
            proficiency_level: "Native".into(),
            tags: vec!["Spanish".into(), "Tutoring".into()],
            hourly_rate: 15,
        }
    }

    #[test]
    fn valid_skill_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn blank_title_category_or_level_fails() {
        for field in ["title", "category", "proficiency_level"] {
            let mut req = valid_request();
            match field {
                "title" => req.title = "  ".into(),
                "category" => req.category = String::new(),
                _ => req.proficiency_level = String::new(),
            }
            assert!(req.validate().is_err(), "{field} should be required");
        }
    }

    #[test]
    fn negative_rate_fails() {
        let mut req = valid_request();
        req.hourly_rate = -1;
        assert!(req.validate().is_err());
    }

    #[test]
    fn zero_rate_is_allowed() {
        let mut req = valid_request();
        req.hourly_rate = 0;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn filter_normalization_drops_blanks() {
        let filter = SkillFilter {
            search: Some(" ".into()),
            category: Some("Design".into()),
            level: None,
            location: Some(String::new()),
        }
        .normalized();
        assert!(filter.search.is_none());
        assert_eq!(filter.category.as_deref(), Some("Design"));
        assert!(filter.location.is_none());
    }

    #[test]
    fn substring_terms_escape_like_metacharacters() {
        let filter = SkillFilter {
            search: Some("C_and_C%".into()),
            category: Some("Pro_gramming".into()),
            level: None,
            location: None,
        }
        .normalized();
        assert_eq!(filter.search.as_deref(), Some(r"C\_and\_C\%"));
        // exact-match fields are compared with =, not LIKE
        assert_eq!(filter.category.as_deref(), Some("Pro_gramming"));
    }
}
