use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, SessionUser},
        password::verify_password,
        policy::Identity,
        session::{expired_session_cookie, session_cookie, SESSION_COOKIE},
    },
    error::AppError,
    state::AppState,
    users::repo::User,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/user", get(current_user))
}

/// Unknown username and wrong password take the same error path so the
/// response never reveals which usernames exist.
#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let user = User::find_by_username(&state.db, &payload.username)
        .await?
        .ok_or_else(|| {
            warn!("login with unknown username");
            AppError::InvalidCredentials
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = user.id, "login with invalid password");
        return Err(AppError::InvalidCredentials);
    }

    // Logins double as the cleanup point for abandoned sessions.
    state.sessions.purge_expired();

    let session_id = state
        .sessions
        .create(user.id, user.username.clone(), user.role);
    let cookie = session_cookie(
        session_id,
        state.sessions.ttl(),
        state.config.session.cookie_secure,
    );

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            success: true,
            role: user.role,
        }),
    ))
}

/// Idempotent: logging out without a session is still a success.
#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<Value>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.remove(cookie.value());
    }
    let jar = jar.add(expired_session_cookie(state.config.session.cookie_secure));
    (jar, Json(json!({ "success": true })))
}

/// Echoes the session identity; no database round trip.
#[instrument(skip(identity), fields(user_id = identity.user_id))]
pub async fn current_user(identity: Identity) -> Json<SessionUser> {
    Json(SessionUser {
        id: identity.user_id,
        username: identity.username,
        role: identity.role,
    })
}
