use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use crate::auth::password::hash_password;

/// Account role; decides the authorization scope of every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Client,
}

impl Default for Role {
    fn default() -> Self {
        Role::Client
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl Default for UserStatus {
    fn default() -> Self {
        UserStatus::Active
    }
}

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String, // Argon2 hash, never serialized
    pub role: Role,
    pub status: UserStatus,
    pub phone: Option<String>,
    pub created_at: OffsetDateTime,
}

impl User {
    /// Find a user by exact username match.
    pub async fn find_by_username(db: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, status, phone, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    /// All users, most recently created first.
    pub async fn list(db: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, status, phone, created_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    /// Create a new user with an already-hashed password.
    pub async fn create(
        db: &PgPool,
        username: &str,
        password_hash: &str,
        role: Role,
        status: UserStatus,
        phone: Option<&str>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role, status, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, password_hash, role, status, phone, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .bind(status)
        .bind(phone)
        .fetch_one(db)
        .await
    }

    /// Replace phone/role/status. Username and password are immutable here.
    pub async fn update(
        db: &PgPool,
        id: i32,
        phone: Option<&str>,
        role: Role,
        status: UserStatus,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET phone = $1, role = $2, status = $3
            WHERE id = $4
            RETURNING id, username, password_hash, role, status, phone, created_at
            "#,
        )
        .bind(phone)
        .bind(role)
        .bind(status)
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Delete a user. Objects referencing it keep existing; the foreign key
    /// is declared ON DELETE SET NULL so their client_id is cleared.
    pub async fn delete(db: &PgPool, id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Seed the default admin account on startup; a no-op when it already exists.
pub async fn ensure_bootstrap_admin(db: &PgPool, password: &str) -> anyhow::Result<()> {
    let hash = hash_password(password)?;
    let result = sqlx::query(
        r#"
        INSERT INTO users (username, password_hash, role)
        VALUES ('admin', $1, 'admin')
        ON CONFLICT (username) DO NOTHING
        "#,
    )
    .bind(hash)
    .execute(db)
    .await?;

    if result.rows_affected() > 0 {
        tracing::info!("bootstrap admin account created");
    }
    Ok(())
}
