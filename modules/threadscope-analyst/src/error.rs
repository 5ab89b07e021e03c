use thiserror::Error;
use threadscope_common::ThreadscopeError;

pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Failure of the single model call or of decoding its reply. No partial
/// result is ever returned alongside one of these.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("invalid model output: {reason}")]
    InvalidOutput { reason: String },

    #[error("model request failed: {0}")]
    Model(String),
}

impl From<ExtractionError> for ThreadscopeError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::Model(msg) => ThreadscopeError::Model(msg),
            other => ThreadscopeError::Extraction(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_into_run_error() {
        let err: ThreadscopeError = ExtractionError::InvalidOutput {
            reason: "expected value at line 1 column 1".into(),
        }
        .into();
        assert!(matches!(err, ThreadscopeError::Extraction(_)));
        assert!(err.to_string().contains("invalid model output"));

        let err: ThreadscopeError = ExtractionError::Model("timeout".into()).into();
        assert!(matches!(err, ThreadscopeError::Model(_)));
    }
}
