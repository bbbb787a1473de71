use eyre::Result;
use serde::{Deserialize, Serialize};

use crate::Transcript;

/// The shape the model is asked to reply with. Parsed opportunistically;
/// replies that don't match are shown raw.
#[derive(Debug, Deserialize, Serialize)]
pub struct Evaluation {
    pub relevance_score: f64,
    pub explanation: String,
    #[serde(default)]
    pub detected_segments: Vec<serde_json::Value>,
}

/// Parse a model reply into an Evaluation, tolerating markdown code fences
pub fn parse_evaluation(raw: &str) -> Option<Evaluation> {
    serde_json::from_str(strip_code_fence(raw)).ok()
}

fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

/// Render a model reply for the terminal: structured when it parses as the
/// expected JSON, verbatim otherwise
pub fn render_evaluation(raw: &str) -> String {
    match parse_evaluation(raw) {
        Some(eval) => {
            let mut out = format!(
                "Relevance score: {:.0}/100\nExplanation: {}\n",
                eval.relevance_score, eval.explanation
            );
            if !eval.detected_segments.is_empty() {
                out.push_str("Detected segments:\n");
                for seg in &eval.detected_segments {
                    out.push_str(&format!("  - {}\n", segment_note(seg)));
                }
            }
            out.trim_end().to_string()
        }
        None => raw.trim().to_string(),
    }
}

fn segment_note(value: &serde_json::Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

/// Render transcript as plain text (space-joined caption segments)
pub fn render_text(transcript: &Transcript) -> String {
    transcript.text()
}

/// Render transcript with its metadata as pretty JSON
pub fn render_json(transcript: &Transcript) -> Result<String> {
    Ok(serde_json::to_string_pretty(transcript)?)
}
