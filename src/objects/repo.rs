use sqlx::{types::Decimal, FromRow, PgPool};
use time::OffsetDateTime;

use crate::auth::policy::ObjectScope;

/// Construction object row with the assigned client's name joined in.
#[derive(Debug, Clone, FromRow)]
pub struct ConstructionObject {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub budget: Decimal,
    pub spent: Decimal,
    pub client_id: Option<i32>,
    pub client_name: Option<String>,
    pub photo: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Validated field set for create and full-replace update.
#[derive(Debug, Clone)]
pub struct ObjectFields {
    pub name: String,
    pub address: Option<String>,
    pub budget: Decimal,
    pub spent: Decimal,
    pub client_id: Option<i32>,
    pub photo: Option<String>,
}

const SELECT_COLUMNS: &str = r#"
    objects.id, objects.name, objects.address, objects.budget, objects.spent,
    objects.client_id, users.username AS client_name, objects.photo, objects.created_at
"#;

impl ConstructionObject {
    /// List objects visible under `scope`, most recently created first.
    /// The scope predicate is applied in SQL; unowned rows never reach the
    /// process for client sessions.
    pub async fn list(db: &PgPool, scope: ObjectScope) -> Result<Vec<Self>, sqlx::Error> {
        match scope {
            ObjectScope::All => {
                sqlx::query_as::<_, Self>(&format!(
                    r#"
                    SELECT {SELECT_COLUMNS}
                    FROM objects
                    LEFT JOIN users ON users.id = objects.client_id
                    ORDER BY objects.created_at DESC
                    "#
                ))
                .fetch_all(db)
                .await
            }
            ObjectScope::OwnedBy(user_id) => {
                sqlx::query_as::<_, Self>(&format!(
                    r#"
                    SELECT {SELECT_COLUMNS}
                    FROM objects
                    LEFT JOIN users ON users.id = objects.client_id
                    WHERE objects.client_id = $1
                    ORDER BY objects.created_at DESC
                    "#
                ))
                .bind(user_id)
                .fetch_all(db)
                .await
            }
        }
    }

    /// Fetch one object if `scope` allows seeing it.
    pub async fn find(db: &PgPool, scope: ObjectScope, id: i32) -> Result<Option<Self>, sqlx::Error> {
        match scope {
            ObjectScope::All => {
                sqlx::query_as::<_, Self>(&format!(
                    r#"
                    SELECT {SELECT_COLUMNS}
                    FROM objects
                    LEFT JOIN users ON users.id = objects.client_id
                    WHERE objects.id = $1
                    "#
                ))
                .bind(id)
                .fetch_optional(db)
                .await
            }
            ObjectScope::OwnedBy(user_id) => {
                sqlx::query_as::<_, Self>(&format!(
                    r#"
                    SELECT {SELECT_COLUMNS}
                    FROM objects
                    LEFT JOIN users ON users.id = objects.client_id
                    WHERE objects.id = $1 AND objects.client_id = $2
                    "#
                ))
                .bind(id)
                .bind(user_id)
                .fetch_optional(db)
                .await
            }
        }
    }

    pub async fn create(db: &PgPool, fields: &ObjectFields) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO objects (name, address, budget, spent, client_id, photo)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, address, budget, spent, client_id,
                      (SELECT username FROM users WHERE users.id = objects.client_id) AS client_name,
                      photo, created_at
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.address)
        .bind(fields.budget)
        .bind(fields.spent)
        .bind(fields.client_id)
        .bind(&fields.photo)
        .fetch_one(db)
        .await
    }

    /// Full replace of every mutable column in one statement.
    pub async fn update(
        db: &PgPool,
        id: i32,
        fields: &ObjectFields,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE objects
            SET name = $1, address = $2, budget = $3, spent = $4, client_id = $5, photo = $6
            WHERE id = $7
            RETURNING id, name, address, budget, spent, client_id,
                      (SELECT username FROM users WHERE users.id = objects.client_id) AS client_name,
                      photo, created_at
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.address)
        .bind(fields.budget)
        .bind(fields.spent)
        .bind(fields.client_id)
        .bind(&fields.photo)
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Deleting a missing id succeeds with zero rows affected.
    pub async fn delete(db: &PgPool, id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM objects WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
