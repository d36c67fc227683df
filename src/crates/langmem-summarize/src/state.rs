//! Running-summary state threaded between invocations.

use langmem_core::Message;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Reserved id of the synthetic summary message.
///
/// A `system` message carrying this id is recognized as a previously emitted
/// summary and regenerated instead of being preserved as the conversation's
/// own system prompt.
pub const SUMMARY_MESSAGE_ID: &str = "__running_summary__";

/// Compaction state carried from one call to the next.
///
/// Values are never mutated in place: every successful call that does new
/// work returns a fresh `RunningSummary`, and the id set only ever grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningSummary {
    /// Latest summary text, replaced wholesale on every round.
    pub summary: String,

    /// Ids of every message folded into `summary` so far.
    pub summarized_message_ids: BTreeSet<String>,
}

impl RunningSummary {
    /// Create a running summary
    pub fn new<I, S>(summary: impl Into<String>, summarized_message_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            summary: summary.into(),
            summarized_message_ids: summarized_message_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `id` has already been folded into the summary
    pub fn contains(&self, id: &str) -> bool {
        self.summarized_message_ids.contains(id)
    }

    /// A new running summary with `summary` as its text and `new_ids` added
    /// to the covered set.
    pub fn extended<I>(&self, summary: impl Into<String>, new_ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut summarized_message_ids = self.summarized_message_ids.clone();
        summarized_message_ids.extend(new_ids);
        Self {
            summary: summary.into(),
            summarized_message_ids,
        }
    }
}

/// Output of one engine invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SummarizationResult {
    /// Message sequence to present to the model from now on
    pub messages: Vec<Message>,

    /// Updated (or unchanged) running summary. `None` until the first round
    /// that actually summarizes.
    pub running_summary: Option<RunningSummary>,
}

/// Typed view of the `context` object the node persists in host state.
///
/// Entries other than `running_summary` belong to the host and are carried
/// through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummarizationContext {
    /// Running summary for this conversation thread
    #[serde(default)]
    pub running_summary: Option<RunningSummary>,

    /// Host-owned entries
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SummarizationContext {
    /// Create a context holding only a running summary
    pub fn new(running_summary: Option<RunningSummary>) -> Self {
        Self {
            running_summary,
            extra: Map::new(),
        }
    }
}
