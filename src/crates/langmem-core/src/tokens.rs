//! Token counting for message sequences.
//!
//! Budget math in the summarization engine is expressed in whatever unit the
//! supplied [`TokenCounter`] returns. Two counters ship with the crate:
//!
//! - [`MessageCountCounter`] - one unit per message, exact and predictable
//! - [`ApproximateTokenCounter`] - a character-based estimate of real tokens
//!
//! Closures work too:
//!
//! ```rust
//! use langmem_core::messages::Message;
//! use langmem_core::tokens::TokenCounter;
//!
//! let by_words = |messages: &[Message]| -> usize {
//!     messages.iter().map(|m| m.text_content().split_whitespace().count()).sum()
//! };
//! assert_eq!(by_words.count(&[Message::human("three small words")]), 3);
//! ```
//!
//! For tokenizer-exact counts, implement the trait over the model's tokenizer.

use crate::messages::{Message, MessageContent};

/// Counts the tokens a message sequence occupies.
pub trait TokenCounter: Send + Sync {
    /// Total token count of `messages`.
    fn count(&self, messages: &[Message]) -> usize;
}

impl<F> TokenCounter for F
where
    F: Fn(&[Message]) -> usize + Send + Sync,
{
    fn count(&self, messages: &[Message]) -> usize {
        self(messages)
    }
}

/// Counts every message as a single token.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageCountCounter;

impl TokenCounter for MessageCountCounter {
    fn count(&self, messages: &[Message]) -> usize {
        messages.len()
    }
}

const MIN_CHARS_PER_TOKEN: f64 = 1.0;

/// Character-based token estimate.
///
/// For each message the counted characters are the text content (the JSON
/// form for multi-part content), the JSON form of any tool calls, the
/// `tool_call_id` of tool messages, the provider role name and the optional
/// sender name. Each message contributes `ceil(chars / chars_per_token)` plus
/// `extra_tokens_per_message`.
#[derive(Debug, Clone, Copy)]
pub struct ApproximateTokenCounter {
    /// Average number of characters per token.
    pub chars_per_token: f64,
    /// Fixed overhead added for every message.
    pub extra_tokens_per_message: f64,
    /// Whether the sender name counts towards the total.
    pub count_name: bool,
}

impl Default for ApproximateTokenCounter {
    fn default() -> Self {
        Self {
            chars_per_token: 4.0,
            extra_tokens_per_message: 3.0,
            count_name: true,
        }
    }
}

impl ApproximateTokenCounter {
    /// Create a counter with the default ratios
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the characters-per-token ratio.
    ///
    /// Ratios below one character per token, zero and NaN are raised to 1.0.
    pub fn with_chars_per_token(mut self, chars_per_token: f64) -> Self {
        self.chars_per_token = chars_per_token.max(MIN_CHARS_PER_TOKEN);
        self
    }

    /// Set the per-message overhead
    pub fn with_extra_tokens_per_message(mut self, extra: f64) -> Self {
        self.extra_tokens_per_message = extra;
        self
    }

    fn message_chars(&self, message: &Message) -> usize {
        let mut chars = match &message.content {
            MessageContent::Text(text) => text.chars().count(),
            MessageContent::Parts(parts) => serde_json::to_string(parts)
                .map(|s| s.chars().count())
                .unwrap_or_default(),
        };

        if message.has_tool_calls() && matches!(message.content, MessageContent::Text(_)) {
            chars += serde_json::to_string(message.tool_calls())
                .map(|s| s.chars().count())
                .unwrap_or_default();
        }
        if let Some(tool_call_id) = message.tool_call_id() {
            chars += tool_call_id.chars().count();
        }
        chars += message.role.provider_name().len();
        if self.count_name {
            if let Some(name) = &message.name {
                chars += name.chars().count();
            }
        }
        chars
    }
}

impl TokenCounter for ApproximateTokenCounter {
    fn count(&self, messages: &[Message]) -> usize {
        let total: f64 = messages
            .iter()
            .map(|m| {
                (self.message_chars(m) as f64 / self.chars_per_token.max(MIN_CHARS_PER_TOKEN))
                    .ceil()
                    + self.extra_tokens_per_message
            })
            .sum();
        total.ceil() as usize
    }
}
