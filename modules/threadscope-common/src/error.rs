use thiserror::Error;

pub type Result<T> = std::result::Result<T, ThreadscopeError>;

/// Terminal outcomes of an analysis run.
///
/// Partial fetch failure and an empty extraction are not errors; they degrade
/// the report instead of aborting it.
#[derive(Error, Debug)]
pub enum ThreadscopeError {
    #[error("No candidate threads found for: {0}")]
    NoCandidatesFound(String),

    #[error("All {attempted} thread fetches failed")]
    AllFetchesFailed { attempted: usize },

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl ThreadscopeError {
    /// Whether simply re-running the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Extraction(_) | Self::Model(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_errors_suggest_retry() {
        assert!(ThreadscopeError::Extraction("invalid model output".into()).is_retryable());
        assert!(!ThreadscopeError::NoCandidatesFound("x".into()).is_retryable());
        assert!(!ThreadscopeError::AllFetchesFailed { attempted: 3 }.is_retryable());
    }
}
