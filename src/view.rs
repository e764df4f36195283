//! Conversation view: transcript ownership, submission state machine,
//! and the single-flight guard.
//!
//! States: `Idle -> AwaitingSession -> AwaitingResponse -> Idle`. Only
//! `Idle` accepts submissions; anything arriving while a request is in
//! flight is dropped, not queued. A per-view epoch counter discards
//! responses that resolve after `clear()` or a session reset wiped the
//! transcript they belonged to.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::{ApiError, AskResponse, LegalApi};
use crate::export::{self, ExportError};
use crate::session::{SessionError, SessionStore};
use crate::transcript::{AnswerMetadata, Message, Transcript};

/// Shown when the service cannot be reached at all.
pub const CONNECTIVITY_APOLOGY: &str = "I'm sorry, I couldn't reach the legal consultation \
service. Please check that the service is running and try again.";

/// Frames a backend-supplied error string.
pub const BACKEND_APOLOGY_PREFIX: &str = "I'm sorry, the service reported a problem:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    AwaitingSession,
    AwaitingResponse,
}

/// What a call to [`ConversationView::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Assistant answer appended.
    Answered,
    /// Failure appended as an error message.
    Failed,
    /// Empty or whitespace-only input; nothing happened.
    IgnoredEmpty,
    /// A request was already in flight; submission dropped.
    IgnoredBusy,
    /// The transcript moved on (clear/reset) while the request was in
    /// flight; the response was discarded.
    Stale,
}

struct ViewInner {
    transcript: Transcript,
    state: ViewState,
    epoch: u64,
}

pub struct ConversationView {
    api: Arc<dyn LegalApi>,
    store: Arc<Mutex<SessionStore>>,
    inner: Mutex<ViewInner>,
}

impl ConversationView {
    pub fn new(api: Arc<dyn LegalApi>, store: Arc<Mutex<SessionStore>>) -> Self {
        Self {
            api,
            store,
            inner: Mutex::new(ViewInner {
                transcript: Transcript::new(),
                state: ViewState::Idle,
                epoch: 0,
            }),
        }
    }

    /// Submit a question.
    ///
    /// The user message is appended before any network activity; exactly
    /// one assistant message (answer or error) follows unless the
    /// transcript was wiped mid-flight.
    pub async fn submit(&self, raw: &str) -> SubmitOutcome {
        let question = raw.trim().to_string();
        if question.is_empty() {
            return SubmitOutcome::IgnoredEmpty;
        }

        let epoch = {
            let mut inner = self.inner.lock().await;
            if inner.state != ViewState::Idle {
                tracing::debug!("submission dropped: request already in flight");
                return SubmitOutcome::IgnoredBusy;
            }
            inner.transcript.push(Message::user(&question));
            inner.state = ViewState::AwaitingSession;
            inner.epoch
        };

        let session_id = self.ensure_session().await;
        self.inner.lock().await.state = ViewState::AwaitingResponse;

        let result = self.api.ask(&question, session_id.as_deref()).await;

        let mut inner = self.inner.lock().await;
        inner.state = ViewState::Idle;
        if inner.epoch != epoch {
            tracing::debug!("response discarded: transcript was reset mid-flight");
            return SubmitOutcome::Stale;
        }

        match result {
            Ok(response) => {
                inner
                    .transcript
                    .push(Message::assistant(&response.answer, AnswerMetadata::from_response(&response)));
                drop(inner);
                self.record_session_stats(&response).await;
                SubmitOutcome::Answered
            }
            Err(error) => {
                tracing::warn!(error = %error, "question request failed");
                inner.transcript.push(Message::error(&apology_for(&error)));
                SubmitOutcome::Failed
            }
        }
    }

    /// Current session id, creating one when absent. Creation failure
    /// degrades to "no session" — the backend mints one during the ask.
    async fn ensure_session(&self) -> Option<String> {
        let mut store = self.store.lock().await;
        if let Some(id) = store.current() {
            return Some(id.to_string());
        }
        match store.create(self.api.as_ref()).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(error = %e, "could not establish a session; asking without one");
                None
            }
        }
    }

    /// Adopt the session id and question counter the server reported.
    async fn record_session_stats(&self, response: &AskResponse) {
        let mut store = self.store.lock().await;
        match &response.session_stats {
            Some(stats) if !stats.session_id.is_empty() => {
                store.adopt(&stats.session_id);
                store.update(Some(stats.question_count));
            }
            _ => store.update(None),
        }
    }

    /// Wipe the transcript back to the greeting placeholder. Pending
    /// responses from before the wipe will be discarded on arrival.
    /// Callers confirm with the user first.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.epoch += 1;
        inner.transcript.clear();
    }

    /// Reset the session (new server-side id) and wipe the transcript.
    pub async fn reset(&self) -> Result<String, SessionError> {
        let new_id = {
            let mut store = self.store.lock().await;
            store.reset(self.api.as_ref()).await?
        };
        self.clear().await;
        Ok(new_id)
    }

    pub async fn state(&self) -> ViewState {
        self.inner.lock().await.state
    }

    pub async fn transcript_len(&self) -> usize {
        self.inner.lock().await.transcript.len()
    }

    pub async fn has_exchanges(&self) -> bool {
        self.inner.lock().await.transcript.has_exchanges()
    }

    /// Snapshot of the messages for rendering.
    pub async fn messages(&self) -> Vec<Message> {
        self.inner.lock().await.transcript.messages().to_vec()
    }

    /// Export the transcript as a JSON document under `dir`.
    pub async fn export_transcript(&self, dir: &Path) -> Result<std::path::PathBuf, ExportError> {
        let messages = self.messages().await;
        let session_id = {
            let store = self.store.lock().await;
            store.current().map(str::to_string)
        };
        let document = export::transcript_export(session_id, &messages)?;
        export::write_json(dir, "consultation", &document)
    }
}

/// Map an API failure to the transcript text. Only backend-supplied
/// error strings are shown verbatim; transport detail stays in the logs.
fn apology_for(error: &ApiError) -> String {
    match error.backend_message() {
        Some(message) => format!("{BACKEND_APOLOGY_PREFIX} {message}"),
        None => CONNECTIVITY_APOLOGY.to_string(),
    }
}
