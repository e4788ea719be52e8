//! Error types shared across Festa crates.

use thiserror::Error;

/// Errors surfaced by configuration loading, task generation and the task board.
#[derive(Debug, Error)]
pub enum FestaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// An event date that is neither `YYYY-MM-DD` nor RFC 3339.
    #[error("Invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    /// A budget references a template that no template source knows about.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, FestaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = FestaError::TemplateNotFound("tpl-42".into());
        assert_eq!(err.to_string(), "Template not found: tpl-42");

        let err = FestaError::InvalidDate {
            value: "02/08/2024".into(),
            reason: "input contains invalid characters".into(),
        };
        assert!(err.to_string().contains("02/08/2024"));
    }

    #[test]
    fn test_json_error_converts() {
        fn parse() -> Result<serde_json::Value> {
            Ok(serde_json::from_str("{not json")?)
        }
        assert!(matches!(parse(), Err(FestaError::Json(_))));
    }
}
