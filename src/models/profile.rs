// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated user profile.

use serde::{Deserialize, Serialize};

/// Profile of the signed-in user, as shown by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    /// Account username
    pub username: String,
    /// First name, plus last name when the account has one
    pub display_name: String,
    /// Always `@` + username
    pub login_handle: String,
    /// Bio text, empty when unset
    pub bio: String,
}

impl From<ProfileResultBody> for Profile {
    fn from(body: ProfileResultBody) -> Self {
        let display_name = compose_display_name(&body.first_name, body.last_name.as_deref());
        Self {
            login_handle: format!("@{}", body.username),
            username: body.username,
            display_name,
            bio: body.bio.unwrap_or_default(),
        }
    }
}

/// Join first and last name. A missing or blank last name adds nothing,
/// so there is never a trailing space.
pub fn compose_display_name(first_name: &str, last_name: Option<&str>) -> String {
    match last_name.map(str::trim).filter(|last| !last.is_empty()) {
        Some(last) => format!("{} {}", first_name, last),
        None => first_name.to_string(),
    }
}

/// `GET /me` response (only the fields we use).
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResultBody {
    pub username: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

/// `GET /users/{username}` response (only the fields we use).
#[derive(Debug, Clone, Deserialize)]
pub struct UserResultBody {
    pub username: String,
    pub profile_image: ProfileImageUrls,
}

/// Avatar URLs by size. Only `large` is shown.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileImageUrls {
    pub large: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(last_name: Option<&str>, bio: Option<&str>) -> ProfileResultBody {
        ProfileResultBody {
            username: "jdoe".to_string(),
            first_name: "Jane".to_string(),
            last_name: last_name.map(String::from),
            bio: bio.map(String::from),
        }
    }

    #[test]
    fn test_profile_with_last_name() {
        let profile = Profile::from(body(Some("Doe"), Some("Photographer")));
        assert_eq!(profile.display_name, "Jane Doe");
        assert_eq!(profile.login_handle, "@jdoe");
        assert_eq!(profile.bio, "Photographer");
    }

    #[test]
    fn test_profile_without_last_name_has_no_trailing_space() {
        let profile = Profile::from(body(None, None));
        assert_eq!(profile.display_name, "Jane");
        assert_eq!(profile.bio, "");
    }

    #[test]
    fn test_blank_last_name_is_treated_as_absent() {
        assert_eq!(compose_display_name("Jane", Some("  ")), "Jane");
        assert_eq!(compose_display_name("Jane", Some("")), "Jane");
    }

    #[test]
    fn test_decode_me_response() {
        let json = r#"{
            "id": "x1",
            "username": "jdoe",
            "first_name": "Jane",
            "last_name": null,
            "email": "jane@example.com",
            "total_likes": 3
        }"#;
        let decoded: ProfileResultBody = serde_json::from_str(json).unwrap();
        assert_eq!(decoded.last_name, None);
        assert_eq!(decoded.bio, None);
    }

    #[test]
    fn test_decode_user_response_keeps_large_avatar() {
        let json = r#"{
            "username": "jdoe",
            "profile_image": {
                "small": "https://images.example.com/s",
                "medium": "https://images.example.com/m",
                "large": "https://images.example.com/l"
            }
        }"#;
        let decoded: UserResultBody = serde_json::from_str(json).unwrap();
        assert_eq!(decoded.profile_image.large, "https://images.example.com/l");
    }
}
