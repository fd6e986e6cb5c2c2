use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AppError;
use crate::users::repo::{Role, User, UserStatus};

/// Request body for user creation.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.username = self.username.trim().to_string();
        if self.username.is_empty() {
            return Err(AppError::Validation("username is required".into()));
        }
        if self.password.len() < 8 {
            return Err(AppError::Validation(
                "password must be at least 8 characters".into(),
            ));
        }
        Ok(())
    }
}

/// Request body for user update. Full replace of the mutable fields:
/// an omitted phone clears the stored one.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub status: UserStatus,
    pub phone: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role,
            status: u.status,
            phone: u.phone,
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_and_status_default_when_absent() {
        let req: CreateUserRequest = serde_json::from_value(json!({
            "username": "ivanov",
            "password": "hunter2hunter2"
        }))
        .expect("deserialize");
        assert_eq!(req.role, Role::Client);
        assert_eq!(req.status, UserStatus::Active);
        assert_eq!(req.phone, None);
    }

    #[test]
    fn validate_rejects_blank_username() {
        let mut req: CreateUserRequest = serde_json::from_value(json!({
            "username": "   ",
            "password": "hunter2hunter2"
        }))
        .expect("deserialize");
        assert!(req.validate().is_err());
    }

    #[test]
    fn validate_rejects_short_password() {
        let mut req: CreateUserRequest = serde_json::from_value(json!({
            "username": "ivanov",
            "password": "short"
        }))
        .expect("deserialize");
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_requires_role_but_defaults_status() {
        let req: UpdateUserRequest = serde_json::from_value(json!({
            "role": "admin"
        }))
        .expect("deserialize");
        assert_eq!(req.role, Role::Admin);
        assert_eq!(req.status, UserStatus::Active);
        assert_eq!(req.phone, None);

        let missing_role = serde_json::from_value::<UpdateUserRequest>(json!({}));
        assert!(missing_role.is_err());
    }

    #[test]
    fn response_never_contains_password_hash() {
        let user = User {
            id: 1,
            username: "ivanov".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::Client,
            status: UserStatus::Active,
            phone: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let body = serde_json::to_string(&UserResponse::from(user)).expect("serialize");
        assert!(!body.contains("argon2"));
        assert!(!body.contains("password"));
        assert!(body.contains("ivanov"));
    }
}
