//! History partitioning.
//!
//! Splits an incoming transcript into the pieces the rest of the engine works
//! with:
//!
//! ```text
//! [system?] [summary msg? + already summarized...] [to_summarize...] [kept_tail...]
//!  preserved            discarded                    sent to model     returned verbatim
//! ```
//!
//! The boundary between `to_summarize` and `kept_tail` never separates an
//! `ai` message from the `tool` messages answering its calls.

use crate::budget::{count_each, TokenBudget};
use crate::config::SummarizationConfig;
use crate::error::{Result, SummarizationError};
use crate::state::{RunningSummary, SUMMARY_MESSAGE_ID};
use langmem_core::{Message, TokenCounter};
use std::collections::HashSet;

/// A transcript split for one summarization round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    /// Leading system message, preserved unconditionally
    pub system_message: Option<Message>,

    /// Messages to fold into the summary this round. Empty when the window
    /// is within budget.
    pub to_summarize: Vec<Message>,

    /// Messages returned verbatim after the summary
    pub kept_tail: Vec<Message>,

    /// Ids of dangling tool responses dropped from `kept_tail`
    pub orphaned_ids: Vec<String>,
}

impl Partition {
    /// Whether this round has anything to summarize
    pub fn needs_summary(&self) -> bool {
        !self.to_summarize.is_empty()
    }

    /// Every id this round folds into the running summary
    pub fn summarized_ids(&self) -> impl Iterator<Item = String> + '_ {
        self.to_summarize
            .iter()
            .filter_map(|m| m.id.clone())
            .chain(self.orphaned_ids.iter().cloned())
    }
}

fn is_summary_message(message: &Message) -> bool {
    message.id.as_deref() == Some(SUMMARY_MESSAGE_ID)
}

/// Reject any message without an id, before anything else looks at the input.
pub fn ensure_message_ids(messages: &[Message]) -> Result<()> {
    match messages.iter().position(|m| m.id.is_none()) {
        Some(index) => Err(SummarizationError::MissingMessageId { index }),
        None => Ok(()),
    }
}

/// Split `messages` against the prior `running_summary`.
///
/// Removal markers are ignored. A previously emitted summary message is
/// discarded wherever it appears.
///
/// # Errors
///
/// - [`SummarizationError::MissingMessageId`] if any message has no id
/// - [`SummarizationError::AlreadySummarized`] if a message past the
///   summarized prefix reuses an id from `running_summary`
pub fn partition_messages(
    messages: &[Message],
    running_summary: Option<&RunningSummary>,
    counter: &dyn TokenCounter,
    config: &SummarizationConfig,
) -> Result<Partition> {
    ensure_message_ids(messages)?;

    let mut rest: Vec<&Message> = messages.iter().filter(|m| !m.is_remove()).collect();

    let leading_system = rest
        .first()
        .map_or(false, |m| m.is_system() && !is_summary_message(m));
    let system_message = if leading_system {
        Some(rest.remove(0).clone())
    } else {
        None
    };

    let already_summarized = |m: &Message| {
        running_summary.map_or(false, |rs| {
            m.id.as_deref().map_or(false, |id| rs.contains(id))
        })
    };

    let prefix_len = rest
        .iter()
        .position(|m| !(is_summary_message(m) || already_summarized(*m)))
        .unwrap_or(rest.len());

    let mut candidates = Vec::with_capacity(rest.len() - prefix_len);
    let mut requested: HashSet<&str> = HashSet::new();
    for &message in &rest[prefix_len..] {
        if is_summary_message(message) {
            continue;
        }
        requested.extend(message.tool_calls().iter().map(|call| call.id.as_str()));
        if already_summarized(message) {
            // an orphan dropped by an earlier round, resubmitted by the host
            if message
                .tool_call_id()
                .map_or(false, |call_id| !requested.contains(call_id))
            {
                continue;
            }
            return Err(SummarizationError::AlreadySummarized {
                id: message.id.clone().unwrap_or_default(),
            });
        }
        candidates.push(message.clone());
    }

    let budget = TokenBudget::new(config, counter, system_message.as_ref());
    let window_tokens = counter.count(&candidates);
    tracing::debug!(
        window_tokens,
        trigger_threshold = budget.trigger_threshold,
        remaining_budget = budget.remaining_budget,
        skipped = prefix_len,
        "Evaluated candidate window"
    );

    let extending = running_summary.is_some();
    if !budget.should_summarize(window_tokens) {
        return Ok(unsummarized(system_message, candidates, extending));
    }

    let Some(cutoff) = budget.find_cutoff(&count_each(counter, &candidates)) else {
        return Ok(unsummarized(system_message, candidates, extending));
    };

    let split_at = extend_over_tool_responses(&candidates, cutoff + 1);
    let mut kept_tail = candidates.split_off(split_at);
    let to_summarize = candidates;
    let orphaned_ids = drop_orphaned_tool_messages(&mut kept_tail);

    Ok(Partition {
        system_message,
        to_summarize,
        kept_tail,
        orphaned_ids,
    })
}

/// Partition for a round with nothing to summarize.
///
/// Once a summary exists, tool responses whose call was folded into it are
/// dropped from the window too. Without one the window passes through as is.
fn unsummarized(
    system_message: Option<Message>,
    mut candidates: Vec<Message>,
    extending: bool,
) -> Partition {
    let orphaned_ids = if extending {
        drop_orphaned_tool_messages(&mut candidates)
    } else {
        Vec::new()
    };
    Partition {
        system_message,
        kept_tail: candidates,
        orphaned_ids,
        ..Default::default()
    }
}

/// Move the split point past `tool` messages that answer calls requested
/// before it.
fn extend_over_tool_responses(messages: &[Message], mut split_at: usize) -> usize {
    let requested: HashSet<&str> = messages[..split_at]
        .iter()
        .flat_map(|m| m.tool_calls())
        .map(|call| call.id.as_str())
        .collect();

    while let Some(call_id) = messages.get(split_at).and_then(|m| m.tool_call_id()) {
        if !requested.contains(call_id) {
            break;
        }
        split_at += 1;
    }
    split_at
}

/// Remove `tool` messages whose call was not requested earlier in `tail`,
/// returning their ids.
fn drop_orphaned_tool_messages(tail: &mut Vec<Message>) -> Vec<String> {
    let mut requested: HashSet<String> = HashSet::new();
    let mut orphaned_ids = Vec::new();

    tail.retain(|m| {
        requested.extend(m.tool_calls().iter().map(|call| call.id.clone()));
        match m.tool_call_id() {
            Some(call_id) if !requested.contains(call_id) => {
                orphaned_ids.extend(m.id.clone());
                false
            }
            _ => true,
        }
    });

    if !orphaned_ids.is_empty() {
        tracing::warn!(
            orphaned = ?orphaned_ids,
            "Dropping tool messages without a matching tool call"
        );
    }
    orphaned_ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use langmem_core::{MessageCountCounter, ToolCall};
    use serde_json::json;

    fn numbered(n: usize) -> Vec<Message> {
        (1..=n)
            .map(|i| {
                let m = if i % 2 == 1 {
                    Message::human(format!("Message {}", i))
                } else {
                    Message::ai(format!("Response {}", i))
                };
                m.with_id(i.to_string())
            })
            .collect()
    }

    fn ids(messages: &[Message]) -> Vec<&str> {
        messages.iter().filter_map(|m| m.id.as_deref()).collect()
    }

    #[test]
    fn test_missing_id_is_rejected_with_index() {
        let messages = vec![Message::human("Message 1").with_id("1"), Message::ai("Response")];
        let config = SummarizationConfig::new(10).with_max_summary_tokens(1);

        let err = partition_messages(&messages, None, &MessageCountCounter, &config).unwrap_err();
        assert!(matches!(err, SummarizationError::MissingMessageId { index: 1 }));
    }

    #[test]
    fn test_under_budget_keeps_everything() {
        let messages = numbered(3);
        let config = SummarizationConfig::new(10).with_max_summary_tokens(1);

        let partition = partition_messages(&messages, None, &MessageCountCounter, &config).unwrap();
        assert!(!partition.needs_summary());
        assert_eq!(partition.kept_tail, messages);
    }

    #[test]
    fn test_basic_split() {
        let messages = numbered(9);
        let config = SummarizationConfig::new(6).with_max_summary_tokens(1);

        let partition = partition_messages(&messages, None, &MessageCountCounter, &config).unwrap();
        assert_eq!(ids(&partition.to_summarize), vec!["1", "2", "3", "4", "5", "6"]);
        assert_eq!(ids(&partition.kept_tail), vec!["7", "8", "9"]);
    }

    #[test]
    fn test_system_message_is_detached() {
        let mut messages = vec![Message::system("You are a helpful assistant.").with_id("0")];
        messages.extend(numbered(9));
        let config = SummarizationConfig::new(6).with_max_summary_tokens(1);

        let partition = partition_messages(&messages, None, &MessageCountCounter, &config).unwrap();
        assert_eq!(partition.system_message.as_ref(), Some(&messages[0]));
        assert_eq!(ids(&partition.to_summarize), vec!["1", "2", "3", "4", "5", "6"]);
        assert_eq!(ids(&partition.kept_tail), vec!["7", "8", "9"]);
    }

    #[test]
    fn test_summary_message_is_not_the_system_message() {
        let summary = RunningSummary::new("so far", ["1", "2"]);
        let messages = vec![
            Message::system("Summary of the conversation so far: so far").with_id(SUMMARY_MESSAGE_ID),
            Message::human("Message 3").with_id("3"),
        ];
        let config = SummarizationConfig::new(6).with_max_summary_tokens(1);

        let partition =
            partition_messages(&messages, Some(&summary), &MessageCountCounter, &config).unwrap();
        assert!(partition.system_message.is_none());
        assert_eq!(ids(&partition.kept_tail), vec!["3"]);
    }

    #[test]
    fn test_reused_id_after_prefix_is_rejected() {
        let summary = RunningSummary::new("so far", ["1", "2"]);
        let mut messages = numbered(3);
        messages.push(Message::ai("Response 2").with_id("4"));
        messages.push(Message::human("Message 3").with_id("1"));
        let config = SummarizationConfig::new(5).with_max_summary_tokens(1);

        let err = partition_messages(&messages, Some(&summary), &MessageCountCounter, &config)
            .unwrap_err();
        assert!(matches!(err, SummarizationError::AlreadySummarized { id } if id == "1"));
    }

    #[test]
    fn test_tool_responses_follow_their_call() {
        let messages = vec![
            Message::human("Message 1").with_id("1"),
            Message::ai("")
                .with_tool_calls(vec![
                    ToolCall::new("1", "tool_1", json!({"arg1": "value1"})),
                    ToolCall::new("2", "tool_2", json!({"arg1": "value1"})),
                ])
                .with_id("2"),
            Message::tool("Call tool 1", "1").with_name("tool_1").with_id("3"),
            Message::tool("Call tool 2", "2").with_name("tool_2").with_id("4"),
            Message::ai("Response 1").with_id("5"),
            Message::human("Message 2").with_id("6"),
        ];
        let config = SummarizationConfig::new(6)
            .with_max_summary_tokens(1)
            .with_max_tokens_before_summary(2);

        let partition = partition_messages(&messages, None, &MessageCountCounter, &config).unwrap();
        assert_eq!(ids(&partition.to_summarize), vec!["1", "2", "3", "4"]);
        assert_eq!(ids(&partition.kept_tail), vec!["5", "6"]);
    }

    #[test]
    fn test_orphaned_tool_messages_are_dropped() {
        let messages = vec![
            Message::human("a").with_id("1"),
            Message::ai("b").with_id("2"),
            Message::human("c").with_id("3"),
            Message::tool("stale", "missing_call").with_id("4"),
            Message::human("d").with_id("5"),
        ];
        let config = SummarizationConfig::new(4)
            .with_max_summary_tokens(1)
            .with_max_tokens_before_summary(3);

        let partition = partition_messages(&messages, None, &MessageCountCounter, &config).unwrap();
        assert_eq!(ids(&partition.to_summarize), vec!["1", "2", "3"]);
        assert_eq!(ids(&partition.kept_tail), vec!["5"]);
        assert_eq!(partition.orphaned_ids, vec!["4".to_string()]);
        assert_eq!(
            partition.summarized_ids().collect::<Vec<_>>(),
            vec!["1", "2", "3", "4"]
        );
    }

    #[test]
    fn test_late_tool_response_is_dropped_under_budget() {
        let summary = RunningSummary::new("so far", ["1", "2", "3", "4"]);
        let messages = vec![
            Message::system("Summary of the conversation so far: so far").with_id(SUMMARY_MESSAGE_ID),
            Message::human("Message 3").with_id("5"),
            Message::tool("late", "c1").with_id("6"),
        ];
        let config = SummarizationConfig::new(6).with_max_summary_tokens(1);

        let partition =
            partition_messages(&messages, Some(&summary), &MessageCountCounter, &config).unwrap();
        assert!(!partition.needs_summary());
        assert_eq!(ids(&partition.kept_tail), vec!["5"]);
        assert_eq!(partition.orphaned_ids, vec!["6".to_string()]);
    }

    #[test]
    fn test_resubmitted_orphan_is_skipped() {
        let summary = RunningSummary::new("so far", ["1", "2", "6"]);
        let messages = vec![
            Message::human("Message 1").with_id("1"),
            Message::ai("Response 1").with_id("2"),
            Message::human("Message 2").with_id("5"),
            Message::tool("late", "c1").with_id("6"),
            Message::ai("Response 2").with_id("7"),
        ];
        let config = SummarizationConfig::new(6).with_max_summary_tokens(1);

        let partition =
            partition_messages(&messages, Some(&summary), &MessageCountCounter, &config).unwrap();
        assert_eq!(ids(&partition.kept_tail), vec!["5", "7"]);
        assert!(partition.orphaned_ids.is_empty());
    }

    #[test]
    fn test_orphans_pass_through_without_prior_summary() {
        let messages = vec![
            Message::human("Message 1").with_id("1"),
            Message::tool("stray", "c1").with_id("2"),
        ];
        let config = SummarizationConfig::new(6).with_max_summary_tokens(1);

        let partition = partition_messages(&messages, None, &MessageCountCounter, &config).unwrap();
        assert_eq!(partition.kept_tail, messages);
        assert!(partition.orphaned_ids.is_empty());
    }

    #[test]
    fn test_removal_markers_are_ignored() {
        let mut messages = vec![Message::remove_all()];
        messages.extend(numbered(3));
        let config = SummarizationConfig::new(10).with_max_summary_tokens(1);

        let partition = partition_messages(&messages, None, &MessageCountCounter, &config).unwrap();
        assert_eq!(ids(&partition.kept_tail), vec!["1", "2", "3"]);
    }
}
