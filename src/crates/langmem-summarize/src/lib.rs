//! # langmem-summarize - Running-Summary Conversation Compaction
//!
//! Keeps an agent's context window bounded by folding older turns into a
//! running summary while recent turns stay verbatim.
//!
//! ## Pipeline
//!
//! ```text
//! messages + RunningSummary?
//!        │
//!        ↓ partition        (partition)  system? | summarized prefix | to_summarize | kept tail
//!        ↓ budget check     (budget)     window > trigger threshold?
//!        ↓ prompt           (prompt)     create or extend instruction
//!        ↓ ChatModel                     one generated summary
//!        ↓ assemble         (assemble)   [system?, summary, ...kept tail]
//!        │
//! SummarizationResult { messages, running_summary }
//! ```
//!
//! ## Guarantees
//!
//! - every message must carry an id; a missing one fails before any work
//! - a message is summarized at most once; resubmitting a summarized id is an error
//! - an `ai` message and the `tool` messages answering it land on the same side
//!   of the summary boundary
//! - after a summarizing call the kept tail plus `max_summary_tokens` fits
//!   `max_tokens`
//! - calls with nothing new to summarize never invoke the model
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use langmem_core::{Message, MessageCountCounter};
//! use langmem_summarize::{summarize_messages, SummarizationConfig};
//!
//! let config = SummarizationConfig::new(6).with_max_summary_tokens(1);
//! let result = summarize_messages(&messages, None, &model, &MessageCountCounter, &config)?;
//!
//! for msg in &result.messages {
//!     println!("{}: {}", msg.role.provider_name(), msg.text_content());
//! }
//! ```
//!
//! Inside an orchestration graph, use [`SummarizationNode`] instead; it reads
//! and writes the running summary through host state.

pub mod assemble;
pub mod budget;
pub mod config;
pub mod error;
pub mod node;
pub mod partition;
pub mod prompt;
pub mod state;
pub mod summarize;

pub use budget::TokenBudget;
pub use config::{SummarizationConfig, SummaryPrompts, DEFAULT_ENV_PREFIX};
pub use error::{Result, SummarizationError};
pub use node::{SummarizationNode, DEFAULT_INPUT_MESSAGES_KEY, DEFAULT_OUTPUT_MESSAGES_KEY};
pub use partition::{partition_messages, Partition};
pub use prompt::build_summary_prompt;
pub use state::{RunningSummary, SummarizationContext, SummarizationResult, SUMMARY_MESSAGE_ID};
pub use summarize::{asummarize_messages, summarize_messages};
