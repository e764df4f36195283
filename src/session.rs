//! Locally persisted consultation session.
//!
//! One JSON file holds the current session record; it survives restarts
//! within a 24-hour window from creation. Everything here fails soft:
//! a malformed or expired file is cleared and treated as "no session",
//! and persistence failures are logged, never raised to the user.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::api::{ApiError, LegalApi};
use crate::config;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no active session")]
    NoSession,

    #[error("session call failed: {0}")]
    Api(#[from] ApiError),
}

/// The persisted session record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub created: DateTime<Utc>,
    pub question_count: u32,
    pub last_activity: DateTime<Utc>,
}

impl SessionRecord {
    fn fresh(session_id: String) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            created: now,
            question_count: 0,
            last_activity: now,
        }
    }

    /// Expired records are discarded before any use.
    pub fn is_expired(&self) -> bool {
        Utc::now().signed_duration_since(self.created)
            >= Duration::hours(config::SESSION_TTL_HOURS)
    }

    fn has_valid_id(&self) -> bool {
        is_uuid_v4(&self.session_id)
    }
}

/// The backend mints UUIDv4 session ids; anything else — whether from
/// the persisted file or a server payload — is rejected.
fn is_uuid_v4(id: &str) -> bool {
    Uuid::parse_str(id)
        .map(|u| u.get_version_num() == 4)
        .unwrap_or(false)
}

/// Owner of the single local session record.
pub struct SessionStore {
    path: PathBuf,
    record: Option<SessionRecord>,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path, record: None }
    }

    /// Load the persisted record at startup.
    ///
    /// Expired or malformed data clears the file and leaves no session.
    pub fn restore(&mut self) {
        self.record = None;
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return,
        };

        match serde_json::from_str::<SessionRecord>(&raw) {
            Ok(record) if record.is_expired() => {
                tracing::info!(session_id = %record.session_id, "cached session expired");
                self.clear_file();
            }
            Ok(record) if !record.has_valid_id() => {
                tracing::warn!("cached session id is not a valid UUID — discarding");
                self.clear_file();
            }
            Ok(record) => {
                tracing::info!(session_id = %record.session_id, "restored cached session");
                self.record = Some(record);
            }
            Err(e) => {
                tracing::warn!(error = %e, "cached session unreadable — discarding");
                self.clear_file();
            }
        }
    }

    /// The current session id, if one is loaded and unexpired.
    pub fn current(&self) -> Option<&str> {
        self.record
            .as_ref()
            .filter(|r| !r.is_expired())
            .map(|r| r.session_id.as_str())
    }

    pub fn record(&self) -> Option<&SessionRecord> {
        self.record.as_ref().filter(|r| !r.is_expired())
    }

    /// Obtain a server-assigned session id and persist a fresh record.
    ///
    /// Creation goes through the reset endpoint, which mints a new
    /// session when no prior id is supplied.
    pub async fn create(&mut self, api: &dyn LegalApi) -> Result<String, SessionError> {
        let session_id = api.reset_session(None).await?;
        tracing::info!(session_id = %session_id, "session created");
        self.install(session_id.clone());
        Ok(session_id)
    }

    /// Invalidate the old session (if any) and start a fresh one.
    ///
    /// Succeeds even when no local session exists — the backend mints a
    /// new id either way.
    pub async fn reset(&mut self, api: &dyn LegalApi) -> Result<String, SessionError> {
        let old = self.record.as_ref().map(|r| r.session_id.clone());
        let new_id = api.reset_session(old.as_deref()).await?;
        tracing::info!(old = old.as_deref().unwrap_or("-"), new = %new_id, "session reset");
        self.install(new_id.clone());
        Ok(new_id)
    }

    /// Refresh activity, optionally overwrite the question counter, persist.
    ///
    /// Called after every successful turn and by the 30-second refresh
    /// task. A missing record makes this a no-op.
    pub fn update(&mut self, question_count: Option<u32>) {
        let Some(record) = self.record.as_mut() else {
            return;
        };
        record.last_activity = Utc::now();
        if let Some(count) = question_count {
            record.question_count = count;
        }
        self.persist();
    }

    /// Adopt a server-reported session id.
    ///
    /// The backend silently replaces unknown or expired sessions during
    /// an ask call; when the reported id differs from ours, the local
    /// record follows the server.
    pub fn adopt(&mut self, session_id: &str) {
        if session_id.is_empty() {
            return;
        }
        if !is_uuid_v4(session_id) {
            tracing::warn!(session_id = %session_id, "server reported a non-UUID session id — ignoring");
            return;
        }
        let known = self
            .record
            .as_ref()
            .is_some_and(|r| r.session_id == session_id);
        if !known {
            tracing::info!(session_id = %session_id, "adopting server-assigned session");
            self.install(session_id.to_string());
        }
    }

    fn install(&mut self, session_id: String) {
        self.record = Some(SessionRecord::fresh(session_id));
        self.persist();
    }

    fn persist(&self) {
        let Some(record) = self.record.as_ref() else {
            return;
        };
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!(error = %e, "cannot create session directory");
                return;
            }
        }
        match serde_json::to_string_pretty(record) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    tracing::warn!(error = %e, "cannot persist session record");
                }
            }
            Err(e) => tracing::warn!(error = %e, "cannot serialize session record"),
        }
    }

    /// Serialize the current record for export.
    pub fn snapshot(&self) -> Result<crate::export::SessionSnapshot, SessionError> {
        self.record()
            .map(crate::export::session_snapshot)
            .ok_or(SessionError::NoSession)
    }

    fn clear_file(&self) {
        let _ = fs::remove_file(&self.path);
    }

    #[cfg(test)]
    pub fn with_record(path: PathBuf, record: SessionRecord) -> Self {
        let store = Self {
            path,
            record: Some(record),
        };
        store.persist();
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{FakeApi, MINTED_SESSION_ID};
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("session.json"))
    }

    fn valid_record(hours_old: i64) -> SessionRecord {
        let created = Utc::now() - Duration::hours(hours_old);
        SessionRecord {
            session_id: Uuid::new_v4().to_string(),
            created,
            question_count: 3,
            last_activity: created,
        }
    }

    #[test]
    fn restore_without_file_yields_no_session() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.restore();
        assert!(store.current().is_none());
    }

    #[test]
    fn restore_roundtrip_keeps_fresh_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let record = valid_record(1);
        let id = record.session_id.clone();
        SessionStore::with_record(path.clone(), record);

        let mut store = SessionStore::new(path);
        store.restore();
        assert_eq!(store.current(), Some(id.as_str()));
        assert_eq!(store.record().unwrap().question_count, 3);
    }

    #[test]
    fn record_25_hours_old_is_discarded_on_restore() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        SessionStore::with_record(path.clone(), valid_record(25));

        let mut store = SessionStore::new(path.clone());
        store.restore();
        assert!(store.current().is_none());
        assert!(!path.exists(), "expired file must be cleared");
    }

    #[test]
    fn malformed_file_is_discarded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let mut store = SessionStore::new(path.clone());
        store.restore();
        assert!(store.current().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn non_uuid_session_id_is_discarded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let mut record = valid_record(1);
        record.session_id = "definitely-not-a-uuid".to_string();
        SessionStore::with_record(path.clone(), record);

        let mut store = SessionStore::new(path);
        store.restore();
        assert!(store.current().is_none());
    }

    #[test]
    fn update_refreshes_activity_and_counter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let stale = valid_record(2);
        let old_activity = stale.last_activity;
        let mut store = SessionStore::with_record(path, stale);

        store.update(Some(7));
        let record = store.record().unwrap();
        assert_eq!(record.question_count, 7);
        assert!(record.last_activity > old_activity);
    }

    #[test]
    fn update_without_record_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.update(Some(4));
        assert!(store.record().is_none());
    }

    #[tokio::test]
    async fn create_installs_server_session() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let api = FakeApi::answering("");

        let id = store.create(&api).await.unwrap();
        assert_eq!(id, MINTED_SESSION_ID);
        assert_eq!(store.current(), Some(MINTED_SESSION_ID));
        assert_eq!(store.record().unwrap().question_count, 0);
    }

    #[tokio::test]
    async fn reset_without_prior_session_succeeds() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let api = FakeApi::answering("");

        let id = store.reset(&api).await.unwrap();
        assert_eq!(id, MINTED_SESSION_ID);
        assert_eq!(store.current(), Some(MINTED_SESSION_ID));
        assert_eq!(api.reset_count(), 1);
    }

    #[tokio::test]
    async fn reset_replaces_existing_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let mut store = SessionStore::with_record(path, valid_record(1));
        let api = FakeApi::answering("");

        store.reset(&api).await.unwrap();
        let record = store.record().unwrap();
        assert_eq!(record.session_id, MINTED_SESSION_ID);
        assert_eq!(record.question_count, 0);
    }

    #[test]
    fn adopt_replaces_unknown_id() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let mut store = SessionStore::with_record(path, valid_record(1));

        store.adopt(MINTED_SESSION_ID);
        assert_eq!(store.current(), Some(MINTED_SESSION_ID));

        // Same id again keeps the record (and its counters).
        store.update(Some(2));
        store.adopt(MINTED_SESSION_ID);
        assert_eq!(store.record().unwrap().question_count, 2);
    }

    #[test]
    fn adopt_rejects_non_uuid_id() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let record = valid_record(1);
        let id = record.session_id.clone();
        let mut store = SessionStore::with_record(path, record);

        store.adopt("server-minted-id");
        assert_eq!(store.current(), Some(id.as_str()), "existing record kept");
    }

    #[test]
    fn adopted_id_survives_restart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let mut store = SessionStore::with_record(path.clone(), valid_record(1));
        store.adopt(MINTED_SESSION_ID);

        let mut reloaded = SessionStore::new(path);
        reloaded.restore();
        assert_eq!(reloaded.current(), Some(MINTED_SESSION_ID));
    }

    #[test]
    fn snapshot_requires_a_session() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(matches!(store.snapshot(), Err(SessionError::NoSession)));

        let store = SessionStore::with_record(dir.path().join("s.json"), valid_record(1));
        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.question_count, 3);
    }

    #[test]
    fn adopt_ignores_empty_id() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.adopt("");
        assert!(store.current().is_none());
    }
}
