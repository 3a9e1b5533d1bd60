//! Structured error types for the rendering engine.
//!
//! Three variants cover the real error sources: JSON parsing, font loading,
//! and layout/PDF generation failures.

use thiserror::Error;

/// The unified error type returned by the engine's public render functions.
#[derive(Debug, Error)]
pub enum RenderError {
    /// JSON input failed to parse as a valid document.
    #[error("failed to parse document: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
    /// A font could not be loaded, parsed, or embedded.
    #[error("font error: {0}")]
    Font(String),
    /// Layout or PDF generation failed.
    #[error("render error: {0}")]
    Render(String),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the document schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => "Unexpected end of input. Is the JSON truncated?".to_string(),
            serde_json::error::Category::Io => String::new(),
        };
        RenderError::Parse { source: e, hint }
    }
}
