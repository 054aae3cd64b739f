use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("Ambiguous paragraph mapping for '{reference}' ({matches} matches)")]
    AmbiguousParagraphMapping { reference: String, matches: usize },

    #[error("Paragraph reference could not be resolved: {0}")]
    UnresolvedParagraph(String),

    #[error("Classification failed: {0}")]
    ClassificationFailure(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
