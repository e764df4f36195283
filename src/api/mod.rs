pub mod client;
pub mod types;

pub use client::HttpApi;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("cannot reach the consultation service at {0}")]
    Connection(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("malformed response body: {0}")]
    ResponseParsing(String),

    #[error("{0}")]
    Backend(String),
}

impl ApiError {
    /// The error string supplied by the backend itself, if any.
    /// Only this text is safe to show verbatim in the transcript;
    /// transport detail stays in the logs.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Backend(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Seam over the legal-consultation backend.
///
/// `HttpApi` is the production implementation; tests substitute an
/// in-memory fake so view and session logic run without a network.
#[async_trait]
pub trait LegalApi: Send + Sync {
    /// POST /api/ask — submit a question, optionally within a session.
    async fn ask(
        &self,
        question: &str,
        session_id: Option<&str>,
    ) -> Result<AskResponse, ApiError>;

    /// GET /api/status — system readiness report.
    async fn system_status(&self) -> Result<SystemStatus, ApiError>;

    /// GET /api/examples — curated example queries.
    async fn example_queries(&self) -> Result<Vec<ExampleCategory>, ApiError>;

    /// GET /api/session/:id — server-side session statistics.
    async fn session_stats(&self, session_id: &str) -> Result<SessionStats, ApiError>;

    /// POST /api/reset-session — invalidate `session_id` (when given)
    /// and mint a fresh one. With no id this is plain session creation.
    async fn reset_session(&self, session_id: Option<&str>) -> Result<String, ApiError>;

    /// GET /api/health — basic liveness.
    async fn health(&self) -> Result<HealthResponse, ApiError>;
}
