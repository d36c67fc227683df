//! Response types for model invocation.

use crate::error::{CoreError, Result};
use crate::messages::Message;
use serde::{Deserialize, Serialize};

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    /// Tokens in the prompt.
    pub input_tokens: usize,
    /// Tokens generated.
    pub output_tokens: usize,
    /// Sum of input and output tokens.
    pub total_tokens: usize,
}

/// A complete model response.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    /// The generated message.
    pub message: Message,

    /// Token usage, when the provider reports it.
    pub usage: Option<UsageMetadata>,
}

impl ChatResponse {
    /// Wrap a generated message without usage data.
    pub fn new(message: Message) -> Self {
        Self {
            message,
            usage: None,
        }
    }

    /// Attach usage data.
    pub fn with_usage(mut self, usage: UsageMetadata) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Text of the generated message.
    ///
    /// Returns [`CoreError::EmptyResponse`] when the message carries no text.
    pub fn text(&self) -> Result<String> {
        let text = self.message.text_content();
        if text.trim().is_empty() {
            return Err(CoreError::EmptyResponse);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text() {
        let response = ChatResponse::new(Message::ai("A summary."));
        assert_eq!(response.text().unwrap(), "A summary.");
    }

    #[test]
    fn test_empty_response_is_error() {
        let response = ChatResponse::new(Message::ai("   "));
        assert!(matches!(response.text(), Err(CoreError::EmptyResponse)));
    }

    #[test]
    fn test_with_usage() {
        let usage = UsageMetadata {
            input_tokens: 10,
            output_tokens: 5,
            total_tokens: 15,
        };
        let response = ChatResponse::new(Message::ai("ok")).with_usage(usage);
        assert_eq!(response.usage, Some(usage));
    }
}
