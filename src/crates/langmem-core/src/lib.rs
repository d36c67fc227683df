//! # langmem-core - Shared Types for Conversational Memory
//!
//! The leaf crate of the langmem workspace. It defines the vocabulary every
//! other crate speaks:
//!
//! - **[Messages](messages)** - the conversational turn, its roles and tool calls
//! - **[Token counting](tokens)** - pluggable counters used for budget math
//! - **[Model interface](llm)** - the [`ChatModel`] trait for the text-generation collaborator
//! - **[Errors](error)** - [`CoreError`] and the crate [`Result`] alias
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  langmem-summarize - running-summary compaction engine      │
//! │  • partition / prompt / assemble                            │
//! │  • SummarizationNode                                        │
//! └─────────────┬───────────────────────────────────────────────┘
//!               │ Uses
//!               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  langmem-core                                               │
//! │  • Message, MessageRole, ToolCall, add_messages             │
//! │  • TokenCounter                                             │
//! │  • ChatModel                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use langmem_core::{Message, MessageCountCounter, TokenCounter};
//!
//! let messages = vec![
//!     Message::human("Hello").with_id("1"),
//!     Message::ai("Hi there!").with_id("2"),
//! ];
//! assert_eq!(MessageCountCounter.count(&messages), 2);
//! ```

pub mod error;
pub mod llm;
pub mod messages;
pub mod tokens;

pub use error::{CoreError, Result};
pub use llm::{ChatConfig, ChatModel, ChatRequest, ChatResponse, UsageMetadata};
pub use messages::{add_messages, ContentPart, Message, MessageContent, MessageRole, ToolCall};
pub use tokens::{ApproximateTokenCounter, MessageCountCounter, TokenCounter};
