use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use tracing::warn;

use crate::auth::policy::Identity;
use crate::auth::session::SESSION_COOKIE;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves the session cookie into an explicit per-request [`Identity`].
///
/// Handlers that take this extractor are authenticated by construction;
/// a missing, unknown or expired session rejects with 401 before the
/// handler body runs.
#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Unauthenticated)?;

        let cookie = jar.get(SESSION_COOKIE).ok_or_else(|| {
            warn!("request without session cookie");
            AppError::Unauthenticated
        })?;

        let session = state.sessions.get(cookie.value()).ok_or_else(|| {
            warn!("unknown or expired session");
            AppError::Unauthenticated
        })?;

        Ok(Identity {
            user_id: session.user_id,
            username: session.username,
            role: session.role,
        })
    }
}
