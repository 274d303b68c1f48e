use thiserror::Error;

#[derive(Debug, Error)]
pub enum SectionError {
    /// The HTML could not be handed to the tokenizer at all.
    #[error("failed to parse HTML: {reason}")]
    ParseFailure { reason: String },

    #[error("No HTML content provided")]
    EmptyHtml,

    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl SectionError {
    pub(crate) fn parse_failure(reason: impl Into<String>) -> Self {
        SectionError::ParseFailure {
            reason: reason.into(),
        }
    }
}
