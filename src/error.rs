//! Structured error types for the engine's outer seams.
//!
//! Parsing, layout, and rendering never fail: malformed Markdown degrades to
//! literal text and missing assets degrade to alt text. Errors exist only
//! where the crate touches the outside world — theme JSON and document
//! fetching — and even a fetch error ends as a rendered fallback document
//! rather than a propagated failure.

use thiserror::Error;

/// The unified error type returned by the crate's fallible entry points.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Theme JSON failed to parse or didn't match the theme schema.
    #[error("failed to parse theme: {0}")]
    Theme(#[from] serde_json::Error),

    /// A document source could not produce the requested document.
    #[error("could not load document '{id}': {reason}")]
    Load { id: String, reason: String },
}

impl EngineError {
    /// Convenience constructor for [`crate::session::DocumentSource`]
    /// implementations.
    pub fn load(id: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::Load {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_display_names_the_document() {
        let err = EngineError::load("notes.md", "no such file");
        assert_eq!(
            err.to_string(),
            "could not load document 'notes.md': no such file"
        );
    }
}
