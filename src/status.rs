//! System-status display glue. Pure renderers over the status payloads;
//! fetching and error handling live with the shell.

use crate::api::{HealthResponse, SessionStats, SystemStatus};

/// Render the readiness report as display lines.
pub fn render_status(status: &SystemStatus) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "rag engine: {}",
        non_empty(&status.rag_engine, "unknown")
    ));
    lines.push(format!(
        "vector store: {} ({} documents)",
        non_empty(&status.vector_store.status, "unknown"),
        status.vector_store.document_count
    ));
    if !status.llm_model.is_empty() {
        lines.push(format!("model: {}", status.llm_model));
    }
    lines.push(format!(
        "ready for queries: {}",
        if status.ready_for_queries { "yes" } else { "no" }
    ));
    lines
}

/// One-line liveness summary from /api/health.
pub fn render_health(health: &HealthResponse) -> String {
    format!(
        "{} — {} v{}",
        non_empty(&health.status, "unknown"),
        non_empty(&health.service, "legal consultation service"),
        non_empty(&health.version, "?")
    )
}

/// Render server-side session statistics as display lines.
pub fn render_session_stats(stats: &SessionStats) -> Vec<String> {
    let mut lines = vec![
        format!("session: {}", stats.session_id),
        format!("questions asked: {}", stats.question_count),
    ];
    if let Some(average) = stats.average_confidence {
        lines.push(format!("average confidence: {average:.2}"));
    }
    if let Some(minutes) = stats.duration_minutes {
        lines.push(format!("duration: {minutes} min"));
    }
    lines
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
