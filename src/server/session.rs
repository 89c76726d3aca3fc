//! Per-session search history keyed by a cookie.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::entities::history::SearchHistory;

pub const SESSION_COOKIE_NAME: &str = "medlookup_session";

/// Session lifetime in seconds.
const SESSION_MAX_AGE: i64 = 60 * 60 * 24 * 7;

fn build_session_cookie(session_id: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, session_id.to_string()))
        .path("/")
        .max_age(time::Duration::seconds(SESSION_MAX_AGE))
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Returns the request's session id, issuing a new cookie when the request
/// carries none or an unparseable one.
pub fn session_id(jar: CookieJar) -> (CookieJar, Uuid) {
    let existing = jar
        .get(SESSION_COOKIE_NAME)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

    match existing {
        Some(id) => (jar, id),
        None => {
            let id = Uuid::new_v4();
            (jar.add(build_session_cookie(id)), id)
        }
    }
}

/// Inactivity after which a session's history is dropped.
const SESSION_TTL: Duration = Duration::from_secs(SESSION_MAX_AGE as u64);

#[derive(Debug)]
struct SessionEntry {
    last_seen: Instant,
    history: SearchHistory,
}

/// In-memory search histories. A session that has not recorded a search
/// within its TTL is treated as ended and evicted on the next write.
#[derive(Debug, Clone)]
pub struct SessionStore {
    entries: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn history(&self, session_id: Uuid) -> SearchHistory {
        self.history_at(session_id, Instant::now()).await
    }

    /// Records `term` for the session and returns the updated history.
    pub async fn record(&self, session_id: Uuid, term: &str) -> SearchHistory {
        self.record_at(session_id, term, Instant::now()).await
    }

    async fn history_at(&self, session_id: Uuid, now: Instant) -> SearchHistory {
        self.entries
            .read()
            .await
            .get(&session_id)
            .filter(|entry| !self.is_expired(entry, now))
            .map(|entry| entry.history.clone())
            .unwrap_or_default()
    }

    async fn record_at(&self, session_id: Uuid, term: &str, now: Instant) -> SearchHistory {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry, now));
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted, "Evicted expired sessions");
        }

        let entry = entries.entry(session_id).or_insert_with(|| SessionEntry {
            last_seen: now,
            history: SearchHistory::new(),
        });
        entry.last_seen = now;
        entry.history = entry.history.record(term);
        entry.history.clone()
    }

    fn is_expired(&self, entry: &SessionEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.last_seen) >= self.ttl
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
