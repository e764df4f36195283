//! Wire types for the consultation backend.
//!
//! Every response body carries `success: bool`; failed calls add an
//! `error` string. Fields the client does not consume are left out —
//! serde ignores unknown fields by default.

use serde::{Deserialize, Serialize};

/// Request body for POST /api/ask.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest<'a> {
    pub question: &'a str,
    pub session_id: Option<&'a str>,
}

/// Response body for POST /api/ask.
///
/// The backend answers error cases with `success: false` plus an apology
/// `answer`, so every payload field defaults rather than hard-failing the
/// parse.
#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub query_type: String,
    #[serde(default)]
    pub retrieved_docs_count: u32,
    #[serde(default)]
    pub bns_citations: Vec<String>,
    #[serde(default)]
    pub relevant_excerpts: Vec<RelevantExcerpt>,
    #[serde(default)]
    pub session_stats: Option<SessionStats>,
}

/// One retrieved source excerpt attached to an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevantExcerpt {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub legal_section: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub relevance_score: f32,
}

/// Server-side session statistics, embedded in ask responses and
/// returned whole by GET /api/session/:id.
///
/// The backend sends `{}` for an unknown session, so everything defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionStats {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub question_count: u32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub average_confidence: Option<f32>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub last_activity: Option<String>,
}

/// Envelope for GET /api/status.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub status: Option<SystemStatus>,
}

/// System readiness report.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SystemStatus {
    #[serde(default)]
    pub rag_engine: String,
    #[serde(default)]
    pub vector_store: VectorStoreStatus,
    #[serde(default)]
    pub documents_loaded: bool,
    #[serde(default)]
    pub llm_model: String,
    #[serde(default)]
    pub ready_for_queries: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct VectorStoreStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub document_count: u64,
}

/// Envelope for GET /api/examples.
#[derive(Debug, Clone, Deserialize)]
pub struct ExamplesResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub examples: Vec<ExampleCategory>,
}

/// A category of curated example queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleCategory {
    pub category: String,
    pub queries: Vec<String>,
}

/// Envelope for GET /api/session/:id.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionInfoResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub session: Option<SessionStats>,
}

/// Envelope for POST /api/reset-session.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub new_session_id: Option<String>,
}

/// GET /api/health — no success envelope, just a liveness report.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_ask_response() {
        let body = r#"{
            "success": true,
            "answer": "Murder is punishable under Section 103 of the BNS.",
            "confidence": 0.82,
            "query_type": "penalty",
            "retrieved_docs_count": 5,
            "bns_citations": ["Section 103"],
            "relevant_excerpts": [
                {"content": "Whoever commits murder...", "source": "bns.pdf",
                 "relevance_score": 0.91, "legal_section": "Section 103"}
            ],
            "session_stats": {"session_id": "abc-123", "question_count": 1}
        }"#;

        let parsed: AskResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.bns_citations, vec!["Section 103"]);
        assert_eq!(parsed.relevant_excerpts.len(), 1);
        assert_eq!(parsed.relevant_excerpts[0].legal_section, "Section 103");
        let stats = parsed.session_stats.unwrap();
        assert_eq!(stats.session_id, "abc-123");
        assert_eq!(stats.question_count, 1);
    }

    #[test]
    fn parse_ask_error_envelope() {
        let body = r#"{"success": false, "error": "Question is required"}"#;
        let parsed: AskResponse = serde_json::from_str(body).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.error.as_deref(), Some("Question is required"));
        assert!(parsed.answer.is_empty());
    }

    #[test]
    fn parse_empty_session_stats() {
        let stats: SessionStats = serde_json::from_str("{}").unwrap();
        assert!(stats.session_id.is_empty());
        assert_eq!(stats.question_count, 0);
    }

    #[test]
    fn parse_status_response() {
        let body = r#"{
            "success": true,
            "status": {
                "rag_engine": "initialized",
                "vector_store": {"status": "ready", "document_count": 1240},
                "documents_loaded": true,
                "llm_model": "gpt-3.5-turbo",
                "ready_for_queries": true
            }
        }"#;
        let parsed: StatusResponse = serde_json::from_str(body).unwrap();
        let status = parsed.status.unwrap();
        assert!(status.ready_for_queries);
        assert_eq!(status.vector_store.document_count, 1240);
    }

    #[test]
    fn parse_examples_response() {
        let body = r#"{
            "success": true,
            "examples": [
                {"category": "Penalties",
                 "queries": ["What is the punishment for murder under BNS?"]}
            ]
        }"#;
        let parsed: ExamplesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.examples.len(), 1);
        assert_eq!(parsed.examples[0].category, "Penalties");
    }
}
