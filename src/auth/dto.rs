use serde::{Deserialize, Serialize};

use crate::users::repo::User;

/// Request body for user registration. Registration doubles as the profile
/// seed, so the optional profile fields default to empty.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub availability: String,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub skills_offered: Vec<String>,
    #[serde(default)]
    pub skills_wanted: Vec<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Returned after register, login or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Partial self-edit of the caller's own profile; absent fields are left
/// unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub availability: Option<String>,
    pub is_public: Option<bool>,
    pub skills_offered: Option<Vec<String>>,
    pub skills_wanted: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_defaults_fill_optional_profile_fields() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"username":"maria","email":"maria@example.com","password":"secret-pw",
                "first_name":"Maria","last_name":"Garcia"}"#,
        )
        .unwrap();
        assert!(req.is_public);
        assert!(req.bio.is_empty());
        assert!(req.skills_offered.is_empty());
    }

    #[test]
    fn update_profile_absent_fields_deserialize_to_none() {
        let req: UpdateProfileRequest = serde_json::from_str(r#"{"bio":"new bio"}"#).unwrap();
        assert_eq!(req.bio.as_deref(), Some("new bio"));
        assert!(req.first_name.is_none());
        assert!(req.skills_wanted.is_none());
    }
}
