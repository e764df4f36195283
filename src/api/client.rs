//! Reqwest-backed implementation of [`LegalApi`].
//!
//! Transport failures are discriminated (connect vs timeout vs other) so
//! the shell can log something actionable; the transcript only ever sees
//! the generic apology or a backend-supplied error string.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::types::*;
use super::{ApiError, LegalApi};
use crate::config;

/// HTTP client for the legal-consultation backend.
///
/// Answer generation is slow; the status, examples, session and health
/// endpoints are not. Each request carries its own timeout instead of
/// one client-wide value.
pub struct HttpApi {
    base_url: String,
    client: reqwest::Client,
    ask_timeout_secs: u64,
    status_timeout_secs: u64,
}

impl HttpApi {
    /// Create a client pointing at `base_url` (trailing slash tolerated).
    pub fn new(base_url: &str) -> Self {
        Self::with_timeouts(
            base_url,
            config::ASK_TIMEOUT_SECS,
            config::STATUS_TIMEOUT_SECS,
        )
    }

    fn with_timeouts(base_url: &str, ask_timeout_secs: u64, status_timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            ask_timeout_secs,
            status_timeout_secs,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn map_transport(&self, e: reqwest::Error, timeout_secs: u64) -> ApiError {
        if e.is_connect() {
            ApiError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            ApiError::Timeout(timeout_secs)
        } else {
            ApiError::Transport(e.to_string())
        }
    }

    /// Send a request with `timeout_secs` applied and decode the JSON body.
    ///
    /// A body that parses is returned regardless of HTTP status — the
    /// backend wraps application errors in `success: false` envelopes
    /// with 4xx/5xx statuses, and the caller inspects the flag. A body
    /// that does not parse maps to `ResponseParsing` (2xx) or `Http`.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        timeout_secs: u64,
    ) -> Result<T, ApiError> {
        let request = request.timeout(Duration::from_secs(timeout_secs));
        let response = request
            .send()
            .await
            .map_err(|e| self.map_transport(e, timeout_secs))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport(e, timeout_secs))?;

        match serde_json::from_str::<T>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) if status.is_success() => Err(ApiError::ResponseParsing(e.to_string())),
            Err(_) => Err(ApiError::Http {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            }),
        }
    }

    fn backend_error(error: Option<String>) -> ApiError {
        ApiError::Backend(error.unwrap_or_else(|| "unspecified service error".to_string()))
    }
}

#[async_trait]
impl LegalApi for HttpApi {
    async fn ask(
        &self,
        question: &str,
        session_id: Option<&str>,
    ) -> Result<AskResponse, ApiError> {
        let body = AskRequest {
            question,
            session_id,
        };
        let response: AskResponse = self
            .execute(
                self.client.post(self.url("/api/ask")).json(&body),
                self.ask_timeout_secs,
            )
            .await?;

        if !response.success {
            return Err(Self::backend_error(response.error));
        }
        Ok(response)
    }

    async fn system_status(&self) -> Result<SystemStatus, ApiError> {
        let response: StatusResponse = self
            .execute(
                self.client.get(self.url("/api/status")),
                self.status_timeout_secs,
            )
            .await?;

        if !response.success {
            return Err(Self::backend_error(response.error));
        }
        response
            .status
            .ok_or_else(|| ApiError::ResponseParsing("status payload missing".to_string()))
    }

    async fn example_queries(&self) -> Result<Vec<ExampleCategory>, ApiError> {
        let response: ExamplesResponse = self
            .execute(
                self.client.get(self.url("/api/examples")),
                self.status_timeout_secs,
            )
            .await?;

        if !response.success {
            return Err(Self::backend_error(response.error));
        }
        Ok(response.examples)
    }

    async fn session_stats(&self, session_id: &str) -> Result<SessionStats, ApiError> {
        let response: SessionInfoResponse = self
            .execute(
                self.client
                    .get(self.url(&format!("/api/session/{session_id}"))),
                self.status_timeout_secs,
            )
            .await?;

        if !response.success {
            return Err(Self::backend_error(response.error));
        }
        response
            .session
            .ok_or_else(|| ApiError::ResponseParsing("session payload missing".to_string()))
    }

    async fn reset_session(&self, session_id: Option<&str>) -> Result<String, ApiError> {
        let body = serde_json::json!({ "session_id": session_id });
        let response: ResetResponse = self
            .execute(
                self.client.post(self.url("/api/reset-session")).json(&body),
                self.status_timeout_secs,
            )
            .await?;

        if !response.success {
            return Err(Self::backend_error(response.error));
        }
        response
            .new_session_id
            .ok_or_else(|| ApiError::ResponseParsing("new_session_id missing".to_string()))
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.execute(
            self.client.get(self.url("/api/health")),
            self.status_timeout_secs,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let api = HttpApi::new("http://localhost:5000/");
        assert_eq!(api.base_url(), "http://localhost:5000");
        assert_eq!(api.url("/api/ask"), "http://localhost:5000/api/ask");
    }

    /// Compile-time check: HttpApi satisfies the LegalApi seam.
    #[test]
    fn http_api_satisfies_legal_api_trait() {
        fn _accepts_legal_api<A: LegalApi>(_a: &A) {}
        let _: fn(&HttpApi) = _accepts_legal_api;
    }

    #[tokio::test]
    async fn lightweight_endpoints_time_out_on_their_own_budget() {
        // A bound socket that never answers: connects succeed at the
        // kernel backlog, reads hang until the request timeout fires.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let api = HttpApi::with_timeouts(&format!("http://{addr}"), 30, 1);

        match api.health().await {
            Err(ApiError::Timeout(secs)) => assert_eq!(secs, 1, "status budget, not ask budget"),
            other => panic!("expected a timeout, got {other:?}"),
        }
    }

    #[test]
    fn backend_error_falls_back_to_generic_text() {
        let err = HttpApi::backend_error(None);
        assert_eq!(err.backend_message(), Some("unspecified service error"));

        let err = HttpApi::backend_error(Some("Question is required".to_string()));
        assert_eq!(err.backend_message(), Some("Question is required"));
    }
}
