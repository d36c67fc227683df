//! Error Types - Summarization Errors
//!
//! Every error here is fatal for the call that raised it: the engine never
//! returns partial state, and a failed call leaves the caller's
//! [`RunningSummary`](crate::RunningSummary) untouched, so retrying the same
//! call is always safe.
//!
//! # Error Categories
//!
//! - **Input errors** - [`MissingMessageId`](SummarizationError::MissingMessageId),
//!   [`AlreadySummarized`](SummarizationError::AlreadySummarized)
//! - **Configuration errors** - inconsistent token budgets or bad environment values
//! - **Node state errors** - host state that does not have the expected shape
//! - **Model errors** - failures of the model collaborator, passed through unchanged
//!
//! # Example
//!
//! ```rust,ignore
//! use langmem_summarize::{summarize_messages, SummarizationError};
//!
//! match summarize_messages(&messages, None, &model, &counter, &config) {
//!     Ok(result) => persist(result),
//!     Err(SummarizationError::AlreadySummarized { id }) => {
//!         eprintln!("stale history resubmitted (message {})", id);
//!     }
//!     Err(e) => return Err(e),
//! }
//! ```

use langmem_core::CoreError;
use thiserror::Error;

/// Result type for summarization operations
pub type Result<T> = std::result::Result<T, SummarizationError>;

/// Errors that can occur while summarizing a conversation
#[derive(Error, Debug)]
pub enum SummarizationError {
    /// An input message has no id.
    #[error("Messages are required to have ID field (message at index {index} has none)")]
    MissingMessageId {
        /// Position of the offending message in the input
        index: usize,
    },

    /// An input message reuses an id that was already folded into the summary.
    #[error("Message with ID {id} has already been summarized")]
    AlreadySummarized {
        /// The conflicting id
        id: String,
    },

    /// Invalid configuration values
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Host state handed to the node has an unexpected shape
    #[error("Invalid node state: {0}")]
    InvalidState(String),

    /// The model collaborator failed
    #[error(transparent)]
    Model(#[from] CoreError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
