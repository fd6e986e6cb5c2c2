use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Request-level error taxonomy. Every handler returns this; the
/// `IntoResponse` impl is the single place HTTP codes and bodies are decided.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("access denied")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("a user with this username already exists")]
    DuplicateUsername,
    #[error("assigned client does not exist")]
    ReferenceNotFound,
    #[error("you cannot delete your own account")]
    SelfDeletionForbidden,
    #[error("{0}")]
    Validation(String),
    #[error("database error")]
    Database(#[source] sqlx::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateUsername
            | AppError::ReferenceNotFound
            | AppError::SelfDeletionForbidden
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code so the frontend can show field-specific
    /// messages without parsing prose.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated => "UNAUTHENTICATED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Forbidden => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DuplicateUsername => "DUPLICATE_USERNAME",
            AppError::ReferenceNotFound => "REFERENCE_NOT_FOUND",
            AppError::SelfDeletionForbidden => "SELF_DELETION_FORBIDDEN",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Database(_) | AppError::Internal(_) => "SERVER_ERROR",
        }
    }
}

/// Constraint violations surface with their SQLSTATE code; the only unique
/// constraint is users.username and the only foreign key is objects.client_id.
impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            match db.code().as_deref() {
                Some("23505") => return AppError::DuplicateUsername,
                Some("23503") => return AppError::ReferenceNotFound,
                _ => {}
            }
        }
        AppError::Database(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error");
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
            }
            AppError::Forbidden => {
                tracing::warn!("forbidden request");
            }
            _ => {}
        }

        // 5xx details stay in the logs.
        let message = if status.is_server_error() {
            "server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": message,
            "code": self.code(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(AppError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("user").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::DuplicateUsername.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ReferenceNotFound.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::SelfDeletionForbidden.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn row_not_found_is_a_server_error_not_a_404() {
        // Missing rows are modeled with fetch_optional + NotFound at call
        // sites; a RowNotFound leaking through is a bug worth a 500.
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(AppError::DuplicateUsername.code(), "DUPLICATE_USERNAME");
        assert_eq!(
            AppError::SelfDeletionForbidden.code(),
            "SELF_DELETION_FORBIDDEN"
        );
        assert_eq!(AppError::NotFound("object").code(), "NOT_FOUND");
    }
}
