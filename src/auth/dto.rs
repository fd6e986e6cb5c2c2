use serde::{Deserialize, Serialize};

use crate::users::repo::Role;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub role: Role,
}

/// The session identity echoed back to the frontend.
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
    pub role: Role,
}
