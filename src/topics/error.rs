//! Generation errors.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Whether retrying can help.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum GenerationErrorKind {
    /// Network trouble, rate limiting, or a server-side failure.
    #[display("transient")]
    Transient,
    /// Bad key, bad request, or an unusable response.
    #[display("terminal")]
    Terminal,
}

/// Generation error with the location it was raised at.
#[derive(Debug, Clone, Display, Error)]
#[display("Generation error ({}): {} at {}:{}", kind, message, file, line)]
pub struct GenerationError {
    /// Whether retrying can help.
    pub kind: GenerationErrorKind,
    /// What went wrong.
    pub message: String,
    /// Line where the error was created.
    pub line: u32,
    /// File where the error was created.
    pub file: &'static str,
}

impl GenerationError {
    /// Creates an error of the given kind.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(%kind, error_message = %message, "Generation error created");
        Self {
            kind,
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// An error worth retrying.
    #[track_caller]
    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Transient, message)
    }

    /// An error that retrying will not fix.
    #[track_caller]
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Terminal, message)
    }

    /// Returns true when another attempt may succeed.
    pub fn is_transient(&self) -> bool {
        self.kind == GenerationErrorKind::Transient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_records_location() {
        let err = GenerationError::terminal("bad key");
        assert_eq!(err.file, file!());
        assert!(!err.is_transient());
        assert!(err.to_string().contains("bad key"));
    }
}
