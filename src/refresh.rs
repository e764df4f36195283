//! Cancellable periodic refresh tasks.
//!
//! Two timers run alongside the shell: a 30-second session-activity
//! persist and a 60-second session-indicator re-render. Each returns a
//! handle that aborts its task on drop, so refreshers never outlive the
//! shell that spawned them. Both tolerate a record that a concurrent
//! reset is replacing — an absent or expired record reads as "no
//! session".

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::session::{SessionRecord, SessionStore};

/// Handle for a periodic task; aborts the task when dropped.
pub struct RefreshHandle {
    handle: JoinHandle<()>,
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Persist session activity every `every`.
pub fn spawn_session_refresh(
    store: Arc<Mutex<SessionStore>>,
    every: Duration,
) -> RefreshHandle {
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await; // the immediate first tick

        loop {
            ticker.tick().await;
            store.lock().await.update(None);
        }
    });
    RefreshHandle { handle }
}

/// Re-render the session indicator into `indicator` every `every`.
pub fn spawn_indicator_refresh(
    store: Arc<Mutex<SessionStore>>,
    indicator: Arc<std::sync::Mutex<String>>,
    every: Duration,
) -> RefreshHandle {
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let rendered = {
                let store = store.lock().await;
                session_indicator(store.record())
            };
            if let Ok(mut current) = indicator.lock() {
                *current = rendered;
            }
        }
    });
    RefreshHandle { handle }
}

/// One-line session display: short id and question count, or "no session".
pub fn session_indicator(record: Option<&SessionRecord>) -> String {
    match record {
        Some(record) => {
            let short_id: String = record.session_id.chars().take(8).collect();
            format!(
                "session {} · {} question{}",
                short_id,
                record.question_count,
                if record.question_count == 1 { "" } else { "s" }
            )
        }
        None => "no session".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn record(question_count: u32) -> SessionRecord {
        let now = Utc::now();
        SessionRecord {
            session_id: "0f8fad5b-d9cb-469f-a165-70867728950e".to_string(),
            created: now,
            question_count,
            last_activity: now,
        }
    }

    #[test]
    fn indicator_without_record_reads_no_session() {
        assert_eq!(session_indicator(None), "no session");
    }

    #[test]
    fn indicator_shows_short_id_and_count() {
        assert_eq!(
            session_indicator(Some(&record(1))),
            "session 0f8fad5b · 1 question"
        );
        assert_eq!(
            session_indicator(Some(&record(4))),
            "session 0f8fad5b · 4 questions"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn session_refresh_persists_activity() {
        let dir = TempDir::new().unwrap();
        let mut stale = record(2);
        stale.last_activity = Utc::now() - chrono::Duration::hours(1);
        let old_activity = stale.last_activity;

        let store = Arc::new(Mutex::new(SessionStore::with_record(
            dir.path().join("session.json"),
            stale,
        )));
        let _handle = spawn_session_refresh(store.clone(), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(31)).await;

        let store = store.lock().await;
        let refreshed = store.record().unwrap();
        assert!(refreshed.last_activity > old_activity);
        assert_eq!(refreshed.question_count, 2, "counter untouched");
    }

    #[tokio::test(start_paused = true)]
    async fn session_refresh_tolerates_missing_record() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(Mutex::new(SessionStore::new(
            dir.path().join("session.json"),
        )));
        let _handle = spawn_session_refresh(store.clone(), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(95)).await;
        assert!(store.lock().await.record().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn indicator_refresh_rewrites_shared_line() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(Mutex::new(SessionStore::with_record(
            dir.path().join("session.json"),
            record(3),
        )));
        let indicator = Arc::new(std::sync::Mutex::new(String::new()));
        let _handle =
            spawn_indicator_refresh(store, indicator.clone(), Duration::from_secs(60));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(
            indicator.lock().unwrap().as_str(),
            "session 0f8fad5b · 3 questions"
        );
    }
}
