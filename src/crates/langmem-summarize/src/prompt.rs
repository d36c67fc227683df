//! Summary prompt construction.
//!
//! Two modes:
//!
//! - **create** (no prior summary): `to_summarize` + the initial instruction
//! - **extend** (prior summary): `to_summarize` + an instruction embedding the
//!   prior summary text and asking the model to extend it
//!
//! Since `to_summarize` never contains already-summarized messages, an extend
//! prompt only ever carries the marginal new content.

use crate::config::SummarizationConfig;
use crate::state::RunningSummary;
use langmem_core::{ChatRequest, Message, TokenCounter};

/// Build the request sent to the model for one summarization round.
///
/// The messages are trimmed to [`prompt_token_limit`] when needed; see
/// [`trim_to_limit`].
pub fn build_summary_prompt(
    to_summarize: &[Message],
    running_summary: Option<&RunningSummary>,
    counter: &dyn TokenCounter,
    config: &SummarizationConfig,
) -> ChatRequest {
    let limit = prompt_token_limit(config, running_summary.is_some());
    let mut messages = trim_to_limit(to_summarize, counter, limit);

    let instruction = match running_summary {
        Some(rs) => config.prompts.render_existing(&rs.summary),
        None => config.prompts.initial.clone(),
    };
    messages.push(Message::human(instruction));

    ChatRequest::new(messages).with_max_tokens(config.max_summary_tokens)
}

/// Largest message payload sent to the model. Extend mode leaves
/// `max_summary_tokens` of room for the prior summary in the instruction.
pub fn prompt_token_limit(config: &SummarizationConfig, extending: bool) -> usize {
    if extending {
        config.max_tokens.saturating_sub(config.max_summary_tokens)
    } else {
        config.max_tokens
    }
}

/// Keep the longest suffix of `messages` that fits `limit`, starting at its
/// first `human` message.
///
/// Returns `messages` unchanged if they already fit, or if trimming would
/// leave nothing to summarize.
pub fn trim_to_limit(messages: &[Message], counter: &dyn TokenCounter, limit: usize) -> Vec<Message> {
    if counter.count(messages) <= limit {
        return messages.to_vec();
    }

    let mut start = messages.len();
    let mut used = 0;
    for (i, message) in messages.iter().enumerate().rev() {
        let tokens = counter.count(std::slice::from_ref(message));
        if used + tokens > limit {
            break;
        }
        used += tokens;
        start = i;
    }

    let trimmed = messages[start..]
        .iter()
        .position(Message::is_human)
        .map(|offset| &messages[start + offset..])
        .unwrap_or_default();

    if trimmed.is_empty() {
        tracing::warn!(
            messages = messages.len(),
            limit,
            "Summary prompt exceeds the token limit; sending it untrimmed"
        );
        return messages.to_vec();
    }

    tracing::debug!(
        dropped = messages.len() - trimmed.len(),
        limit,
        "Trimmed summary prompt"
    );
    trimmed.to_vec()
}
