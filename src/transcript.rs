//! Message model and the in-memory conversation transcript.
//!
//! Messages are immutable once appended. The transcript lives only for
//! the process lifetime; `clear()` truncates back to the greeting
//! placeholder rather than emptying it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{AskResponse, RelevantExcerpt};

/// Shown as the placeholder first entry of every transcript.
pub const GREETING: &str = "Namaste! I can help with questions about the Bharatiya Nyaya \
Sanhita — definitions, procedures, penalties, and specific provisions. What would you \
like to know?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// A source excerpt as carried on an assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceExcerpt {
    pub source: String,
    pub legal_section: String,
    pub preview: String,
}

impl From<&RelevantExcerpt> for SourceExcerpt {
    fn from(excerpt: &RelevantExcerpt) -> Self {
        Self {
            source: excerpt.source.clone(),
            legal_section: excerpt.legal_section.clone(),
            preview: excerpt.content.clone(),
        }
    }
}

/// Answer metadata — present only on non-error assistant messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerMetadata {
    pub confidence: f32,
    pub query_type: String,
    pub citations: Vec<String>,
    pub excerpts: Vec<SourceExcerpt>,
    pub retrieved_docs_count: u32,
}

impl AnswerMetadata {
    pub fn from_response(response: &AskResponse) -> Self {
        Self {
            confidence: response.confidence,
            query_type: response.query_type.clone(),
            citations: response.bns_citations.clone(),
            excerpts: response.relevant_excerpts.iter().map(Into::into).collect(),
            retrieved_docs_count: response.retrieved_docs_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: Option<AnswerMetadata>,
    pub is_error: bool,
}

impl Message {
    pub fn user(text: &str) -> Self {
        Self {
            sender: Sender::User,
            text: text.to_string(),
            timestamp: Utc::now(),
            metadata: None,
            is_error: false,
        }
    }

    pub fn assistant(text: &str, metadata: AnswerMetadata) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.to_string(),
            timestamp: Utc::now(),
            metadata: Some(metadata),
            is_error: false,
        }
    }

    /// Error messages never carry metadata.
    pub fn error(text: &str) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.to_string(),
            timestamp: Utc::now(),
            metadata: None,
            is_error: true,
        }
    }
}

/// Ordered in-memory transcript; insertion order is display order.
#[derive(Debug)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// A new transcript containing only the greeting placeholder.
    pub fn new() -> Self {
        let placeholder = Message {
            sender: Sender::Assistant,
            text: GREETING.to_string(),
            timestamp: Utc::now(),
            metadata: None,
            is_error: false,
        };
        Self {
            messages: vec![placeholder],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false after construction (the greeting is never removed);
    /// present to pair with `len` per clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// True once any real exchange happened beyond the placeholder.
    pub fn has_exchanges(&self) -> bool {
        self.messages.len() > 1
    }

    /// Truncate back to the greeting placeholder only.
    pub fn clear(&mut self) {
        self.messages.truncate(1);
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transcript_holds_only_greeting() {
        let transcript = Transcript::new();
        assert_eq!(transcript.len(), 1);
        assert!(!transcript.is_empty());
        assert_eq!(transcript.messages()[0].sender, Sender::Assistant);
        assert!(!transcript.messages()[0].is_error);
        assert!(!transcript.has_exchanges());
    }

    #[test]
    fn clear_truncates_to_placeholder() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("What is theft?"));
        transcript.push(Message::error("apology"));
        assert!(transcript.has_exchanges());

        transcript.clear();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].text, GREETING);
    }

    #[test]
    fn error_messages_carry_no_metadata() {
        let message = Message::error("I'm sorry, something went wrong.");
        assert!(message.is_error);
        assert!(message.metadata.is_none());
    }

    #[test]
    fn metadata_built_from_response() {
        let response = crate::api::AskResponse {
            success: true,
            error: None,
            answer: "Punishable under Section 103.".to_string(),
            confidence: 0.74,
            query_type: "penalty".to_string(),
            retrieved_docs_count: 4,
            bns_citations: vec!["Section 103".to_string()],
            relevant_excerpts: vec![crate::api::RelevantExcerpt {
                source: "bns.pdf".to_string(),
                legal_section: "Section 103".to_string(),
                content: "Whoever commits murder...".to_string(),
                relevance_score: 0.9,
            }],
            session_stats: None,
        };

        let metadata = AnswerMetadata::from_response(&response);
        assert_eq!(metadata.citations, vec!["Section 103"]);
        assert_eq!(metadata.excerpts.len(), 1);
        assert_eq!(metadata.excerpts[0].preview, "Whoever commits murder...");
        assert_eq!(metadata.retrieved_docs_count, 4);
    }
}
