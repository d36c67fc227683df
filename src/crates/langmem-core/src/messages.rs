//! Message types for conversational memory
//!
//! This module defines the shape of a single conversational turn as seen by the
//! summarization engine and by the host that stores the transcript.
//!
//! # Overview
//!
//! - **[`Message`]** - one turn: optional id, role, content, optional name
//! - **[`MessageRole`]** - closed set of roles; tool-call data lives only on the
//!   `Ai` and `Tool` variants
//! - **[`ToolCall`]** - a tool invocation requested by an `Ai` message
//! - **[`add_messages`]** - append-only host reducer that understands removal markers
//!
//! # Quick Start
//!
//! ```rust
//! use langmem_core::messages::{Message, ToolCall};
//! use serde_json::json;
//!
//! let question = Message::human("What's the weather in Paris?").with_id("1");
//! let request = Message::ai("")
//!     .with_tool_calls(vec![ToolCall::new("call_1", "weather", json!({"city": "Paris"}))])
//!     .with_id("2");
//! let answer = Message::tool("18°C, cloudy", "call_1").with_id("3");
//!
//! assert!(request.has_tool_calls());
//! assert_eq!(answer.tool_call_id(), Some("call_1"));
//! ```
//!
//! # Message IDs
//!
//! Constructors never assign an id. The summarization engine tracks messages by
//! id and rejects any message without one, so callers either set ids explicitly
//! with [`Message::with_id`] or call [`Message::ensure_id`] before handing the
//! transcript over.
//!
//! # Serialization Format
//!
//! The role is flattened into the message under a `"type"` tag:
//!
//! ```json
//! {"id": "1", "type": "human", "content": "Hello!"}
//! {"id": "2", "type": "ai", "content": "", "tool_calls": [{"id": "call_1", "name": "search", "args": {}}]}
//! {"id": "3", "type": "tool", "tool_call_id": "call_1", "content": "Found 10 results"}
//! {"id": "__remove_all__", "type": "remove", "content": ""}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Tool call structure representing a function/tool invocation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,

    /// Name of the tool to call
    pub name: String,

    /// Arguments to pass to the tool
    pub args: Value,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, args: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            args,
        }
    }
}

/// Role of the message sender in a conversation.
///
/// Roles form a closed set. Tool-call metadata is attached to the variants that
/// own it, so code that needs to pair tool requests with tool responses can
/// match exhaustively instead of probing optional fields.
///
/// # Role Semantics
///
/// - **System**: instructions, context, or a rendered running summary
/// - **Human**: input from end users
/// - **Ai**: model output, optionally requesting tool invocations
/// - **Tool**: the result of one tool invocation, linked back by call id
/// - **Remove**: a removal marker consumed by [`add_messages`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageRole {
    /// System message providing instructions, context, or constraints.
    System,

    /// Human/user message.
    Human,

    /// AI assistant message.
    Ai {
        /// Tool invocations requested by this message, in order.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },

    /// Tool execution result message.
    Tool {
        /// Id of the [`ToolCall`] this message answers.
        tool_call_id: String,
    },

    /// Removal marker. The message id names the message to delete, or
    /// [`Message::REMOVE_ALL`] to clear the whole list.
    Remove,
}

impl MessageRole {
    /// Role name used by OpenAI-style chat APIs.
    pub fn provider_name(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::Human => "user",
            MessageRole::Ai { .. } => "assistant",
            MessageRole::Tool { .. } => "tool",
            MessageRole::Remove => "remove",
        }
    }
}

/// Individual content part in a multimodal message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text content
    Text {
        /// The text content
        text: String,
    },

    /// Image referenced by URL
    Image {
        /// Image URL
        url: String,
    },
}

impl ContentPart {
    /// Create a text content part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create an image content part from URL
    pub fn image_url(url: impl Into<String>) -> Self {
        Self::Image { url: url.into() }
    }
}

/// Message content: plain text, or a list of parts for multimodal turns.
///
/// Serialized untagged, so both `"hello"` and `[{"type": "text", "text": "hello"}]`
/// deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple text-only content.
    Text(String),

    /// Structured multimodal content with multiple parts.
    Parts(Vec<ContentPart>),
}

impl Default for MessageContent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        Self::Parts(parts)
    }
}

/// A single conversational turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Caller-supplied identifier, unique within a conversation thread
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Role of the message sender, with any tool-call metadata
    #[serde(flatten)]
    pub role: MessageRole,

    /// Message content
    #[serde(default)]
    pub content: MessageContent,

    /// Optional sender name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    /// Reserved id of the removal marker that clears the whole message list.
    pub const REMOVE_ALL: &'static str = "__remove_all__";

    /// Create a new message with the given role and content
    pub fn new(role: MessageRole, content: impl Into<MessageContent>) -> Self {
        Self {
            id: None,
            role,
            content: content.into(),
            name: None,
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a human message
    pub fn human(content: impl Into<MessageContent>) -> Self {
        Self::new(MessageRole::Human, content)
    }

    /// Create an AI message without tool calls
    pub fn ai(content: impl Into<MessageContent>) -> Self {
        Self::new(
            MessageRole::Ai {
                tool_calls: Vec::new(),
            },
            content,
        )
    }

    /// Create a tool message answering the tool call `tool_call_id`
    pub fn tool(content: impl Into<MessageContent>, tool_call_id: impl Into<String>) -> Self {
        Self::new(
            MessageRole::Tool {
                tool_call_id: tool_call_id.into(),
            },
            content,
        )
    }

    /// Create a removal marker for the message with the given id
    pub fn remove(id: impl Into<String>) -> Self {
        Self::new(MessageRole::Remove, "").with_id(id)
    }

    /// Create a removal marker that clears the whole message list
    pub fn remove_all() -> Self {
        Self::remove(Self::REMOVE_ALL)
    }

    /// Set the message ID
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the message name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach tool calls to an AI message. Other roles are left unchanged.
    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCall>) -> Self {
        if let MessageRole::Ai { tool_calls: calls } = &mut self.role {
            *calls = tool_calls;
        }
        self
    }

    /// Ensure this message has an ID (generate one if missing)
    pub fn ensure_id(&mut self) {
        if self.id.is_none() {
            self.id = Some(Uuid::new_v4().to_string());
        }
    }

    /// Get the text content if this is a simple text message
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(s) => Some(s),
            MessageContent::Parts(_) => None,
        }
    }

    /// Concatenated text of this message, skipping non-text parts
    pub fn text_content(&self) -> String {
        match &self.content {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::Image { .. } => None,
                })
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    /// Tool calls requested by this message (empty unless it is an AI message)
    pub fn tool_calls(&self) -> &[ToolCall] {
        match &self.role {
            MessageRole::Ai { tool_calls } => tool_calls,
            _ => &[],
        }
    }

    /// Check if message has tool calls
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls().is_empty()
    }

    /// Id of the tool call this message answers, for tool messages
    pub fn tool_call_id(&self) -> Option<&str> {
        match &self.role {
            MessageRole::Tool { tool_call_id } => Some(tool_call_id),
            _ => None,
        }
    }

    /// Check if this is a system message
    pub fn is_system(&self) -> bool {
        matches!(self.role, MessageRole::System)
    }

    /// Check if this is a human message
    pub fn is_human(&self) -> bool {
        matches!(self.role, MessageRole::Human)
    }

    /// Check if this is an AI message
    pub fn is_ai(&self) -> bool {
        matches!(self.role, MessageRole::Ai { .. })
    }

    /// Check if this is a tool message
    pub fn is_tool(&self) -> bool {
        matches!(self.role, MessageRole::Tool { .. })
    }

    /// Check if this is a removal marker
    pub fn is_remove(&self) -> bool {
        matches!(self.role, MessageRole::Remove)
    }
}

/// The append-only message reducer used by hosts that persist transcripts.
///
/// Merges `right` into `left`:
/// - a removal marker with id [`Message::REMOVE_ALL`] discards everything in
///   `left` and everything in `right` before it
/// - any other removal marker deletes the message with that id
/// - a message whose id is already present replaces it in place
/// - everything else is appended (missing ids are generated)
///
/// # Example
///
/// ```rust
/// use langmem_core::messages::{add_messages, Message};
///
/// let history = vec![
///     Message::human("Question 1").with_id("1"),
///     Message::ai("Answer 1").with_id("2"),
/// ];
/// let update = vec![
///     Message::remove_all(),
///     Message::system("Summary of the conversation so far: ...").with_id("s"),
/// ];
///
/// let merged = add_messages(history, update);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].id.as_deref(), Some("s"));
/// ```
pub fn add_messages(left: Vec<Message>, right: Vec<Message>) -> Vec<Message> {
    let remove_all_idx = right
        .iter()
        .rposition(|m| m.is_remove() && m.id.as_deref() == Some(Message::REMOVE_ALL));

    let (mut merged, right): (Vec<Message>, Vec<Message>) = match remove_all_idx {
        Some(idx) => (Vec::new(), right.into_iter().skip(idx + 1).collect()),
        None => (left.into_iter().filter(|m| !m.is_remove()).collect(), right),
    };

    for m in merged.iter_mut() {
        m.ensure_id();
    }

    let mut merged_by_id: HashMap<String, usize> = merged
        .iter()
        .enumerate()
        .filter_map(|(i, m)| m.id.clone().map(|id| (id, i)))
        .collect();
    let mut ids_to_remove = HashSet::new();

    for mut m in right {
        m.ensure_id();
        let Some(id) = m.id.clone() else { continue };

        if m.is_remove() {
            if merged_by_id.contains_key(&id) {
                ids_to_remove.insert(id);
            }
            continue;
        }

        match merged_by_id.get(&id) {
            Some(&existing_idx) => {
                ids_to_remove.remove(&id);
                merged[existing_idx] = m;
            }
            None => {
                merged_by_id.insert(id, merged.len());
                merged.push(m);
            }
        }
    }

    merged
        .into_iter()
        .filter(|m| {
            m.id
                .as_ref()
                .map_or(true, |id| !ids_to_remove.contains(id))
        })
        .collect()
}
