//! External generation of category word lists.
//!
//! Generation is the engine's only async boundary. A [`TopicGenerator`]
//! produces candidate words for a category name; [`generate_with_retry`]
//! wraps it with bounded exponential backoff. The session controller spawns
//! the retrying call on the tokio runtime and drains its single result
//! without ever awaiting it.

mod error;
mod gemini;
mod retry;

pub use error::{GenerationError, GenerationErrorKind};
pub use gemini::{DEFAULT_GEMINI_MODEL, DEFAULT_WORD_COUNT, GeminiGenerator};
pub use retry::{RetryPolicy, generate_with_retry};

use async_trait::async_trait;

/// Source of generated words for a category.
#[async_trait]
pub trait TopicGenerator: Send + Sync {
    /// Short name for logs and status messages.
    fn name(&self) -> &str;

    /// Produces candidate secrets for `category`.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] whose kind tells the retry loop whether
    /// another attempt can help.
    async fn generate(&self, category: &str) -> Result<Vec<String>, GenerationError>;
}
