use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::state::UploadSession;
use crate::models::image::UploadedImage;

/// In-memory map of upload sessions keyed by the session cookie.
///
/// Every access runs inside one short critical section, so each request's
/// mutation is atomic with respect to the others.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, UploadSession>>,
    idle_ttl: chrono::Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_ttl: chrono::Duration::from_std(idle_ttl).unwrap_or(chrono::Duration::MAX),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, UploadSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the id of a live session, creating a fresh Idle one when the
    /// presented id is missing or unknown. The bool is true for new sessions.
    pub fn resolve(&self, presented: Option<Uuid>) -> (Uuid, bool) {
        let now = Utc::now();
        let mut sessions = self.lock();

        if let Some(id) = presented {
            if let Some(session) = sessions.get_mut(&id) {
                session.touch(now);
                return (id, false);
            }
        }

        let pruned = prune(&mut sessions, now, self.idle_ttl);
        if pruned > 0 {
            debug!("Pruned {pruned} idle upload sessions");
        }

        let id = Uuid::new_v4();
        sessions.insert(id, UploadSession::new(now));
        (id, true)
    }

    /// Runs `f` against the session, recreating it if it was pruned meanwhile.
    pub fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut UploadSession) -> R) -> R {
        let mut sessions = self.lock();
        let session = sessions
            .entry(id)
            .or_insert_with(|| UploadSession::new(Utc::now()));
        f(session)
    }

    /// Runs `f` only if the session still exists; a pruned session stays gone.
    pub fn with_existing<R>(&self, id: Uuid, f: impl FnOnce(&mut UploadSession) -> R) -> Option<R> {
        self.lock().get_mut(&id).map(f)
    }

    pub fn image(&self, id: Uuid) -> Option<Arc<UploadedImage>> {
        self.lock().get(&id).and_then(|s| s.image().cloned())
    }

    pub fn snapshot(&self, id: Uuid) -> Option<UploadSession> {
        self.lock().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn prune_idle(&self, now: DateTime<Utc>) -> usize {
        prune(&mut self.lock(), now, self.idle_ttl)
    }
}

/// Busy sessions are kept so the in-flight call has somewhere to land.
fn prune(
    sessions: &mut HashMap<Uuid, UploadSession>,
    now: DateTime<Utc>,
    idle_ttl: chrono::Duration,
) -> usize {
    let before = sessions.len();
    sessions.retain(|_, s| s.is_busy() || now.signed_duration_since(s.last_seen()) < idle_ttl);
    before - sessions.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::image::UploadedImage;

    fn image() -> UploadedImage {
        UploadedImage {
            id: uuid::Uuid::new_v4(),
            data_url: "data:image/png;base64,AA==".to_string(),
            bytes: bytes::Bytes::from_static(&[0]),
            file_name: "a.png".to_string(),
            size_bytes: 1,
            mime_type: "image/png".to_string(),
        }
    }

    #[test]
    fn test_resolve_creates_and_reuses() {
        let store = SessionStore::new(Duration::from_secs(60));
        let (id, created) = store.resolve(None);
        assert!(created);

        let (same, created) = store.resolve(Some(id));
        assert_eq!(same, id);
        assert!(!created);

        let (other, created) = store.resolve(Some(Uuid::new_v4()));
        assert_ne!(other, id);
        assert!(created);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_with_session_mutates_in_place() {
        let store = SessionStore::new(Duration::from_secs(60));
        let (id, _) = store.resolve(None);
        store.with_session(id, |s| s.load_image(image()));
        assert!(store.snapshot(id).unwrap().image().is_some());
    }

    #[test]
    fn test_prune_keeps_fresh_and_busy_sessions() {
        let store = SessionStore::new(Duration::from_secs(60));
        let (idle, _) = store.resolve(None);
        let (busy, _) = store.resolve(None);
        store.with_session(busy, |s| {
            s.load_image(image());
            s.begin_analysis().unwrap();
        });

        assert_eq!(store.prune_idle(Utc::now()), 0);

        let later = Utc::now() + chrono::Duration::minutes(5);
        assert_eq!(store.prune_idle(later), 1);
        assert!(store.snapshot(idle).is_none());
        assert!(store.snapshot(busy).is_some());
    }

    #[test]
    fn test_with_existing_skips_missing_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        assert!(store.with_existing(Uuid::new_v4(), |s| s.clear()).is_none());
        assert_eq!(store.len(), 0);

        let (id, _) = store.resolve(None);
        assert_eq!(store.with_existing(id, |s| s.is_busy()), Some(false));
    }

    #[test]
    fn test_image_is_shared_not_copied() {
        let store = SessionStore::new(Duration::from_secs(60));
        let (id, _) = store.resolve(None);
        assert!(store.image(id).is_none());

        store.with_session(id, |s| s.load_image(image()));
        let first = store.image(id).unwrap();
        let second = store.image(id).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.mime_type, "image/png");
    }
}
