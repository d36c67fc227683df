//! Error types for the core crate
//!
//! Errors raised here come from the two external seams the core defines: the
//! model collaborator ([`ChatModel`](crate::llm::ChatModel)) and message
//! (de)serialization. All of them implement `std::error::Error` via `thiserror`.
//!
//! # Example
//!
//! ```rust
//! use langmem_core::error::{CoreError, Result};
//!
//! fn call_provider() -> Result<String> {
//!     Err(CoreError::Model("upstream returned 503".to_string()))
//! }
//!
//! match call_provider() {
//!     Ok(text) => println!("{}", text),
//!     Err(CoreError::Model(msg)) => eprintln!("model failed: {}", msg),
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in core components
#[derive(Error, Debug)]
pub enum CoreError {
    /// The model collaborator failed to produce a response.
    ///
    /// Implementations of [`ChatModel`](crate::llm::ChatModel) should map
    /// network failures, authentication errors and provider-side rejections
    /// to this variant.
    #[error("Model invocation failed: {0}")]
    Model(String),

    /// The model returned a message without any text.
    #[error("Model returned an empty response")]
    EmptyResponse,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
