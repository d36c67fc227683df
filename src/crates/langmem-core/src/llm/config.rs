//! Request types for model invocation.

use crate::messages::Message;
use serde::{Deserialize, Serialize};

/// A request to a chat model containing messages and configuration.
///
/// This is the input type for [`ChatModel::chat`](crate::llm::ChatModel::chat)
/// and [`ChatModel::achat`](crate::llm::ChatModel::achat).
///
/// # Example
///
/// ```rust
/// use langmem_core::llm::ChatRequest;
/// use langmem_core::messages::Message;
///
/// let request = ChatRequest::new(vec![
///     Message::human("Message 1").with_id("1"),
///     Message::human("Create a summary of the conversation above:"),
/// ])
/// .with_max_tokens(128);
///
/// assert_eq!(request.config.max_tokens, Some(128));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// The ordered prompt sent to the model.
    pub messages: Vec<Message>,

    /// Generation parameters.
    pub config: ChatConfig,
}

impl ChatRequest {
    /// Create a new chat request with the given messages and default configuration.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            config: ChatConfig::default(),
        }
    }

    /// Set the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }
}

/// Configuration parameters for chat generation.
///
/// Not every provider honors every field; implementations should document
/// which ones they support.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum tokens to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,

    /// Sampling temperature (provider-dependent range).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_builder() {
        let request = ChatRequest::new(vec![Message::human("test")])
            .with_temperature(0.2)
            .with_max_tokens(100);

        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.config.temperature, Some(0.2));
        assert_eq!(request.config.max_tokens, Some(100));
    }

    #[test]
    fn test_default_config() {
        let config = ChatConfig::default();
        assert!(config.max_tokens.is_none());
        assert!(config.temperature.is_none());
    }
}
