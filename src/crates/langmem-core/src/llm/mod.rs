//! Model integration traits and types.
//!
//! This crate is not an LLM client library. It defines the [`ChatModel`]
//! trait the summarization engine calls, plus the request and response types
//! that cross that seam. Users implement `ChatModel` for their provider.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use langmem_core::llm::{ChatModel, ChatRequest};
//! use langmem_core::messages::Message;
//!
//! let model: Arc<dyn ChatModel> = Arc::new(MyClient::new());
//! let request = ChatRequest::new(vec![Message::human("Hello!")]).with_max_tokens(64);
//! let response = model.achat(request).await?;
//! println!("{}", response.text()?);
//! ```

pub mod config;
pub mod response;
pub mod traits;

pub use config::{ChatConfig, ChatRequest};
pub use response::{ChatResponse, UsageMetadata};
pub use traits::ChatModel;
