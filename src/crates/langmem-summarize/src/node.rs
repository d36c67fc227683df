//! SummarizationNode - State-Threading Wrapper
//!
//! [`SummarizationNode`] runs one summarization round per invocation inside a
//! host orchestration graph. It reads the transcript and the persisted
//! running summary from host state and returns a state update.
//!
//! # State Shape
//!
//! ```text
//! input:  { "messages": [...], "context": { "running_summary": {...} | null, ... } }
//!                 │
//!                 ↓ SummarizationNode.invoke(state)
//! output: { "summarized_messages": [...], "context": { ..., "running_summary": {...} } }
//! ```
//!
//! Both slot names are configurable. Unknown `context` entries are carried
//! through.
//!
//! # Replacing the Message List
//!
//! Hosts that merge message lists with an append-only reducer such as
//! [`add_messages`](langmem_core::add_messages) cannot shrink a list by
//! returning a shorter one. When the output slot is the input slot, the node
//! prepends a [`Message::remove_all`] marker so the reducer discards the old
//! list first:
//!
//! ```text
//! { "messages": [ {type: "remove", id: "__remove_all__"}, summary, ...kept tail ] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use langmem_summarize::{SummarizationConfig, SummarizationNode};
//! use langmem_core::ApproximateTokenCounter;
//! use std::sync::Arc;
//!
//! let node = SummarizationNode::new(
//!     Arc::new(my_model),
//!     Arc::new(ApproximateTokenCounter::default()),
//!     SummarizationConfig::new(256).with_max_summary_tokens(128),
//! )
//! .with_output_messages_key("messages");
//!
//! let update = node.ainvoke(state).await?;
//! ```
//!
//! The node holds no per-thread state. The host keeps one `context` per
//! conversation thread and must not run two rounds for the same thread
//! concurrently.

use crate::config::SummarizationConfig;
use crate::error::{Result, SummarizationError};
use crate::state::{SummarizationContext, SummarizationResult};
use crate::summarize::{asummarize_messages, summarize_messages};
use langmem_core::{ChatModel, Message, TokenCounter};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Default input slot
pub const DEFAULT_INPUT_MESSAGES_KEY: &str = "messages";

/// Default output slot
pub const DEFAULT_OUTPUT_MESSAGES_KEY: &str = "summarized_messages";

/// Key of the persisted context object in host state
pub const CONTEXT_KEY: &str = "context";

/// Graph node that summarizes the message history in host state
#[derive(Clone)]
pub struct SummarizationNode {
    model: Arc<dyn ChatModel>,
    token_counter: Arc<dyn TokenCounter>,
    config: SummarizationConfig,
    input_messages_key: String,
    output_messages_key: String,
}

impl SummarizationNode {
    /// Create a node with the default slot names
    pub fn new(
        model: Arc<dyn ChatModel>,
        token_counter: Arc<dyn TokenCounter>,
        config: SummarizationConfig,
    ) -> Self {
        Self {
            model,
            token_counter,
            config,
            input_messages_key: DEFAULT_INPUT_MESSAGES_KEY.to_string(),
            output_messages_key: DEFAULT_OUTPUT_MESSAGES_KEY.to_string(),
        }
    }

    /// Set the slot the transcript is read from
    pub fn with_input_messages_key(mut self, key: impl Into<String>) -> Self {
        self.input_messages_key = key.into();
        self
    }

    /// Set the slot the compacted messages are written to
    pub fn with_output_messages_key(mut self, key: impl Into<String>) -> Self {
        self.output_messages_key = key.into();
        self
    }

    /// Engine configuration
    pub fn config(&self) -> &SummarizationConfig {
        &self.config
    }

    /// Whether updates replace the input slot instead of filling a separate one
    pub fn replaces_input(&self) -> bool {
        self.input_messages_key == self.output_messages_key
    }

    /// Run one round, blocking on the model if it is needed.
    pub fn invoke(&self, state: Value) -> Result<Value> {
        let (messages, context) = self.read_state(state)?;
        let result = summarize_messages(
            &messages,
            context.running_summary.as_ref(),
            self.model.as_ref(),
            self.token_counter.as_ref(),
            &self.config,
        )?;
        self.build_update(result, context)
    }

    /// Run one round, awaiting the model if it is needed.
    pub async fn ainvoke(&self, state: Value) -> Result<Value> {
        let (messages, context) = self.read_state(state)?;
        let result = asummarize_messages(
            &messages,
            context.running_summary.as_ref(),
            self.model.as_ref(),
            self.token_counter.as_ref(),
            &self.config,
        )
        .await?;
        self.build_update(result, context)
    }

    /// Extract the transcript and context from host state
    fn read_state(&self, state: Value) -> Result<(Vec<Message>, SummarizationContext)> {
        let Value::Object(mut state) = state else {
            return Err(SummarizationError::InvalidState(
                "state must be a JSON object".into(),
            ));
        };

        let messages_value = state.remove(&self.input_messages_key).ok_or_else(|| {
            SummarizationError::InvalidState(format!(
                "State missing '{}' field",
                self.input_messages_key
            ))
        })?;
        let messages: Vec<Message> = serde_json::from_value(messages_value).map_err(|e| {
            SummarizationError::InvalidState(format!(
                "Failed to parse '{}': {}",
                self.input_messages_key, e
            ))
        })?;

        let context = match state.remove(CONTEXT_KEY) {
            None | Some(Value::Null) => SummarizationContext::default(),
            Some(value @ Value::Object(_)) => serde_json::from_value(value)?,
            Some(_) => {
                return Err(SummarizationError::InvalidState(format!(
                    "'{}' must be a JSON object",
                    CONTEXT_KEY
                )))
            }
        };

        Ok((messages, context))
    }

    /// Build the state update for `result`
    fn build_update(
        &self,
        result: SummarizationResult,
        mut context: SummarizationContext,
    ) -> Result<Value> {
        let mut messages = result.messages;
        if self.replaces_input() {
            messages.insert(0, Message::remove_all());
        }
        context.running_summary = result.running_summary;

        let mut update = Map::new();
        update.insert(
            self.output_messages_key.clone(),
            serde_json::to_value(messages)?,
        );
        update.insert(CONTEXT_KEY.to_string(), serde_json::to_value(context)?);
        Ok(Value::Object(update))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use langmem_core::{ChatRequest, ChatResponse, MessageCountCounter};
    use serde_json::json;

    struct StaticModel;

    #[async_trait]
    impl ChatModel for StaticModel {
        fn chat(&self, _request: ChatRequest) -> langmem_core::Result<ChatResponse> {
            Ok(ChatResponse::new(Message::ai("A summary.")))
        }
    }

    fn node() -> SummarizationNode {
        SummarizationNode::new(
            Arc::new(StaticModel),
            Arc::new(MessageCountCounter),
            SummarizationConfig::new(6).with_max_summary_tokens(1),
        )
    }

    #[test]
    fn test_defaults() {
        let node = node();
        assert!(!node.replaces_input());
        assert!(node
            .clone()
            .with_output_messages_key("messages")
            .replaces_input());
    }

    #[test]
    fn test_rejects_non_object_state() {
        let err = node().invoke(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, SummarizationError::InvalidState(_)));
    }

    #[test]
    fn test_rejects_missing_input_slot() {
        let err = node().invoke(json!({"history": []})).unwrap_err();
        assert!(matches!(err, SummarizationError::InvalidState(msg) if msg.contains("messages")));
    }

    #[test]
    fn test_rejects_non_object_context() {
        let err = node()
            .invoke(json!({"messages": [], "context": "nope"}))
            .unwrap_err();
        assert!(matches!(err, SummarizationError::InvalidState(_)));
    }

    #[test]
    fn test_empty_transcript() {
        let update = node()
            .invoke(json!({"messages": [], "context": {"user": "u-1"}}))
            .unwrap();
        assert_eq!(update["summarized_messages"], json!([]));
        assert!(update["context"]["running_summary"].is_null());
        assert_eq!(update["context"]["user"], "u-1");
    }
}
