use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::User;

/// Query parameters for people search. Empty strings from the query string
/// are normalized to "no filter"; surviving terms are escaped so that LIKE
/// metacharacters in user input match literally.
#[derive(Debug, Default, Deserialize)]
pub struct UserSearchFilter {
    pub skill: Option<String>,
    pub offered: Option<String>,
    pub wanted: Option<String>,
    pub availability: Option<String>,
    pub location: Option<String>,
}

impl UserSearchFilter {
    pub fn normalized(self) -> Self {
        Self {
            skill: like_term(self.skill),
            offered: like_term(self.offered),
            wanted: like_term(self.wanted),
            availability: like_term(self.availability),
            location: like_term(self.location),
        }
    }
}

fn like_term(value: Option<String>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| escape_like(&v))
}

/// Backslash-escapes `\`, `%` and `_` so a bound term is a substring, not a
/// pattern.
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

/// Profile snapshot exposed to other members. Email, credential and
/// moderation flags stay internal.
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub location: String,
    pub availability: String,
    pub skills_offered: Vec<String>,
    pub skills_wanted: Vec<String>,
    pub is_public: bool,
}

impl From<User> for PublicProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            location: user.location,
            availability: user.availability,
            skills_offered: user.skills_offered,
            skills_wanted: user.skills_wanted,
            is_public: user.is_public,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filter_terms_become_none() {
        let filter = UserSearchFilter {
            skill: Some("".into()),
            availability: Some("   ".into()),
            location: Some("Design City".into()),
            ..Default::default()
        }
        .normalized();
        assert!(filter.skill.is_none());
        assert!(filter.availability.is_none());
        assert_eq!(filter.location.as_deref(), Some("Design City"));
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        let filter = UserSearchFilter {
            skill: Some("Data_Analysis".into()),
            offered: Some("100%".into()),
            wanted: Some(r"back\slash".into()),
            ..Default::default()
        }
        .normalized();
        assert_eq!(filter.skill.as_deref(), Some(r"Data\_Analysis"));
        assert_eq!(filter.offered.as_deref(), Some(r"100\%"));
        assert_eq!(filter.wanted.as_deref(), Some(r"back\\slash"));
    }

    #[test]
    fn plain_terms_pass_through_unchanged() {
        let filter = UserSearchFilter {
            skill: Some("Spanish".into()),
            ..Default::default()
        }
        .normalized();
        assert_eq!(filter.skill.as_deref(), Some("Spanish"));
    }

    #[test]
    fn public_profile_omits_email() {
        let profile = PublicProfile {
            id: Uuid::new_v4(),
            username: "tutor".into(),
            first_name: "Maria".into(),
            last_name: "Garcia".into(),
            bio: String::new(),
            location: "Language City".into(),
            availability: "weekends".into(),
            skills_offered: vec!["Spanish".into()],
            skills_wanted: vec!["Data Analysis".into()],
            is_public: true,
        };
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("Spanish"));
        assert!(!json.contains("email"));
        assert!(!json.contains("password"));
    }
}
