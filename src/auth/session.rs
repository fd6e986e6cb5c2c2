use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::users::repo::Role;

pub const SESSION_COOKIE: &str = "buildtrack_session";

/// Identity snapshot taken at login; lives only as long as the session.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
    pub created_at: OffsetDateTime,
}

/// In-memory session store keyed by random session ids. Shared across
/// request handlers via AppState; expired entries are dropped on read.
#[derive(Clone)]
pub struct SessionStore {
    ttl: Duration,
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn create(&self, user_id: i32, username: String, role: Role) -> String {
        let session_id = Uuid::new_v4().to_string();
        let data = SessionData {
            user_id,
            username,
            role,
            created_at: OffsetDateTime::now_utc(),
        };
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(session_id.clone(), data);
        }
        session_id
    }

    /// Look up a session, treating anything older than the TTL as gone.
    pub fn get(&self, session_id: &str) -> Option<SessionData> {
        let data = if let Ok(sessions) = self.sessions.read() {
            sessions.get(session_id).cloned()
        } else {
            None
        }?;

        if OffsetDateTime::now_utc() - data.created_at >= self.ttl {
            self.remove(session_id);
            return None;
        }
        Some(data)
    }

    /// Idempotent; removing an unknown or already-removed id is fine.
    pub fn remove(&self, session_id: &str) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.remove(session_id);
        }
    }

    pub fn purge_expired(&self) {
        let cutoff = OffsetDateTime::now_utc() - self.ttl;
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.retain(|_, data| data.created_at > cutoff);
        }
    }
}

pub fn session_cookie(session_id: String, ttl: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(ttl)
        .path("/")
        .build()
}

pub fn expired_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(0))
        .path("/")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_get_returns_the_identity() {
        let store = SessionStore::new(Duration::hours(24));
        let id = store.create(5, "ivanov".into(), Role::Client);
        let data = store.get(&id).expect("session should exist");
        assert_eq!(data.user_id, 5);
        assert_eq!(data.username, "ivanov");
        assert_eq!(data.role, Role::Client);
    }

    #[test]
    fn unknown_id_yields_none() {
        let store = SessionStore::new(Duration::hours(24));
        assert!(store.get("no-such-session").is_none());
    }

    #[test]
    fn remove_is_idempotent() {
        let store = SessionStore::new(Duration::hours(24));
        let id = store.create(5, "ivanov".into(), Role::Client);
        store.remove(&id);
        store.remove(&id);
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let store = SessionStore::new(Duration::seconds(0));
        let id = store.create(5, "ivanov".into(), Role::Client);
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn purge_drops_only_expired_entries() {
        let store = SessionStore::new(Duration::hours(24));
        let id = store.create(5, "ivanov".into(), Role::Client);
        store.purge_expired();
        assert!(store.get(&id).is_some());
    }

    #[test]
    fn session_ids_are_unique() {
        let store = SessionStore::new(Duration::hours(24));
        let a = store.create(1, "a".into(), Role::Admin);
        let b = store.create(1, "a".into(), Role::Admin);
        assert_ne!(a, b);
    }

    #[test]
    fn cookie_is_http_only_and_lax() {
        let cookie = session_cookie("abc".into(), Duration::hours(24), true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn logout_cookie_expires_at_once() {
        let cookie = expired_session_cookie(true);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::seconds(0)));
    }
}
