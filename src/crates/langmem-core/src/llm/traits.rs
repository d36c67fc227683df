//! Core trait for the model collaborator.
//!
//! The summarization engine never talks to a provider directly. It hands an
//! ordered prompt to a [`ChatModel`] and reads back one message. Provider
//! clients (OpenAI, Anthropic, Ollama, ...) implement this trait.
//!
//! # Example Implementation
//!
//! ```rust,ignore
//! use langmem_core::llm::{ChatModel, ChatRequest, ChatResponse};
//! use langmem_core::error::Result;
//! use async_trait::async_trait;
//!
//! struct MyClient { /* http client, api key, ... */ }
//!
//! #[async_trait]
//! impl ChatModel for MyClient {
//!     fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
//!         // blocking HTTP call
//!         todo!()
//!     }
//!
//!     async fn achat(&self, request: ChatRequest) -> Result<ChatResponse> {
//!         // non-blocking HTTP call
//!         todo!()
//!     }
//! }
//! ```

use crate::error::Result;
use crate::llm::config::ChatRequest;
use crate::llm::response::ChatResponse;
use async_trait::async_trait;

/// Core trait for chat-based language models.
///
/// Both entry points take the whole prompt and return one complete response.
/// Retries, backoff and timeouts belong to the implementation; any error it
/// returns is surfaced unchanged to whoever invoked the engine.
///
/// # Threading and Safety
///
/// Implementations must be `Send + Sync`. Share them as `Arc<dyn ChatModel>`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a response, blocking the calling thread until it is ready.
    fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Generate a response without blocking.
    ///
    /// The default implementation delegates to [`ChatModel::chat`]. Clients with
    /// a real async transport should override it.
    async fn achat(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.chat(request)
    }
}
