//! Confidence tiers and answer-metadata display.

use crate::transcript::AnswerMetadata;

/// Coarse bucketing of the backend's answer-confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    /// `< 0.4` low, `[0.4, 0.7)` medium, `>= 0.7` high.
    pub fn from_score(score: f32) -> Self {
        if score < 0.4 {
            ConfidenceTier::Low
        } else if score < 0.7 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfidenceTier::Low => "low",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::High => "high",
        }
    }
}

/// Render metadata as display lines. Absent or empty collections render
/// nothing — no placeholders.
pub fn render_metadata(metadata: &AnswerMetadata) -> Vec<String> {
    let mut lines = Vec::new();

    let tier = ConfidenceTier::from_score(metadata.confidence);
    lines.push(format!(
        "confidence: {} ({:.2})",
        tier.label(),
        metadata.confidence
    ));

    if !metadata.query_type.is_empty() {
        lines.push(format!("query type: {}", metadata.query_type));
    }
    if metadata.retrieved_docs_count > 0 {
        lines.push(format!("sources consulted: {}", metadata.retrieved_docs_count));
    }
    if !metadata.citations.is_empty() {
        lines.push(format!("citations: {}", metadata.citations.join(" · ")));
    }
    for excerpt in &metadata.excerpts {
        lines.push(format!(
            "{} — {}: {}",
            excerpt.source, excerpt.legal_section, excerpt.preview
        ));
    }
    lines
}
