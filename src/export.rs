//! Downloadable JSON documents: session snapshot and full transcript.
//!
//! Every export is stamped with the session id, a generation timestamp
//! and the fixed legal disclaimer.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::config;
use crate::session::SessionRecord;
use crate::transcript::{Message, Sender, SourceExcerpt};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,

    #[error("could not write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Serialized session record with export stamps.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub created: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub question_count: u32,
    pub generated_at: DateTime<Utc>,
    pub disclaimer: &'static str,
}

/// Full transcript export.
#[derive(Debug, Serialize)]
pub struct TranscriptExport {
    pub session_id: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub disclaimer: &'static str,
    pub conversation: Vec<ExportedTurn>,
}

/// One completed exchange (user question + assistant reply).
#[derive(Debug, Serialize)]
pub struct ExportedTurn {
    pub question: String,
    pub answer: String,
    pub confidence: Option<f32>,
    pub query_type: Option<String>,
    pub citations: Vec<String>,
    pub sources: Vec<SourceExcerpt>,
    pub timestamp: DateTime<Utc>,
}

pub fn session_snapshot(record: &SessionRecord) -> SessionSnapshot {
    SessionSnapshot {
        session_id: record.session_id.clone(),
        created: record.created,
        last_activity: record.last_activity,
        question_count: record.question_count,
        generated_at: Utc::now(),
        disclaimer: config::LEGAL_DISCLAIMER,
    }
}

/// Build a transcript export by pairing each user message with the
/// assistant message that follows it. The greeting placeholder pairs
/// with nothing and is skipped; an empty pairing is an `Empty` error.
pub fn transcript_export(
    session_id: Option<String>,
    messages: &[Message],
) -> Result<TranscriptExport, ExportError> {
    let mut conversation = Vec::new();
    let mut iter = messages.iter().peekable();

    while let Some(message) = iter.next() {
        if message.sender != Sender::User {
            continue;
        }
        let Some(reply) = iter.peek().filter(|m| m.sender == Sender::Assistant) else {
            continue;
        };
        conversation.push(ExportedTurn {
            question: message.text.clone(),
            answer: reply.text.clone(),
            confidence: reply.metadata.as_ref().map(|m| m.confidence),
            query_type: reply.metadata.as_ref().map(|m| m.query_type.clone()),
            citations: reply
                .metadata
                .as_ref()
                .map(|m| m.citations.clone())
                .unwrap_or_default(),
            sources: reply
                .metadata
                .as_ref()
                .map(|m| m.excerpts.clone())
                .unwrap_or_default(),
            timestamp: reply.timestamp,
        });
    }

    if conversation.is_empty() {
        return Err(ExportError::Empty);
    }
    Ok(TranscriptExport {
        session_id,
        generated_at: Utc::now(),
        disclaimer: config::LEGAL_DISCLAIMER,
        conversation,
    })
}

/// Write a document as pretty JSON under `dir` with a timestamped name.
pub fn write_json<T: Serialize>(
    dir: &Path,
    prefix: &str,
    document: &T,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!(
        "{prefix}-{}.json",
        Utc::now().format("%Y%m%d-%H%M%S")
    ));
    fs::write(&path, serde_json::to_string_pretty(document)?)?;
    Ok(path)
}
