//! Engine entry points.
//!
//! [`summarize_messages`] and [`asummarize_messages`] run the same pipeline:
//!
//! ```text
//! validate ─→ partition ─→ (over budget?) ─→ build prompt ─→ model ─→ assemble
//!                               │ no
//!                               └──────────────────────────────────→ assemble unchanged
//! ```
//!
//! The only difference is how the model call is awaited. Everything before
//! and after it is synchronous, so cancelling the async twin while it waits
//! on the model leaves no trace and the call can simply be retried.

use crate::assemble::{assemble_summarized, assemble_unchanged};
use crate::config::SummarizationConfig;
use crate::error::Result;
use crate::partition::{partition_messages, Partition};
use crate::prompt::build_summary_prompt;
use crate::state::{RunningSummary, SummarizationResult};
use langmem_core::{ChatModel, ChatRequest, ChatResponse, Message, TokenCounter};

enum Round {
    Done(SummarizationResult),
    Pending {
        partition: Partition,
        request: ChatRequest,
    },
}

fn prepare_round(
    messages: &[Message],
    running_summary: Option<&RunningSummary>,
    token_counter: &dyn TokenCounter,
    config: &SummarizationConfig,
) -> Result<Round> {
    config.validate()?;
    let partition = partition_messages(messages, running_summary, token_counter, config)?;

    if !partition.needs_summary() {
        tracing::debug!(kept = partition.kept_tail.len(), "Window within budget");
        return Ok(Round::Done(assemble_unchanged(
            partition,
            running_summary,
            &config.prompts,
        )));
    }

    tracing::info!(
        to_summarize = partition.to_summarize.len(),
        kept = partition.kept_tail.len(),
        orphaned = partition.orphaned_ids.len(),
        extending = running_summary.is_some(),
        "Summarizing conversation history"
    );
    let request = build_summary_prompt(
        &partition.to_summarize,
        running_summary,
        token_counter,
        config,
    );
    Ok(Round::Pending { partition, request })
}

fn finish_round(
    partition: Partition,
    response: ChatResponse,
    running_summary: Option<&RunningSummary>,
    config: &SummarizationConfig,
) -> Result<SummarizationResult> {
    let summary = response.text()?;
    Ok(assemble_summarized(
        partition,
        summary,
        running_summary,
        &config.prompts,
    ))
}

/// Compact `messages`, calling `model` if the window is over budget.
///
/// `running_summary` is the value returned by the previous call for this
/// conversation thread, or `None` on the first call. It is never modified;
/// the updated state is returned in the result.
///
/// # Errors
///
/// - [`MissingMessageId`](crate::SummarizationError::MissingMessageId) if any
///   message lacks an id (checked before anything else)
/// - [`AlreadySummarized`](crate::SummarizationError::AlreadySummarized) if
///   stale history is resubmitted
/// - [`Configuration`](crate::SummarizationError::Configuration) for
///   inconsistent budgets
/// - [`Model`](crate::SummarizationError::Model) if the model fails or
///   returns no text
///
/// # Example
///
/// ```rust,ignore
/// use langmem_summarize::{summarize_messages, SummarizationConfig};
/// use langmem_core::MessageCountCounter;
///
/// let config = SummarizationConfig::new(6).with_max_summary_tokens(1);
/// let result = summarize_messages(&messages, None, &model, &MessageCountCounter, &config)?;
///
/// // thread the state into the next call
/// let next = summarize_messages(
///     &more_messages,
///     result.running_summary.as_ref(),
///     &model,
///     &MessageCountCounter,
///     &config,
/// )?;
/// ```
#[tracing::instrument(
    skip_all,
    fields(messages = messages.len(), extending = running_summary.is_some())
)]
pub fn summarize_messages(
    messages: &[Message],
    running_summary: Option<&RunningSummary>,
    model: &dyn ChatModel,
    token_counter: &dyn TokenCounter,
    config: &SummarizationConfig,
) -> Result<SummarizationResult> {
    match prepare_round(messages, running_summary, token_counter, config)? {
        Round::Done(result) => Ok(result),
        Round::Pending { partition, request } => {
            let response = model.chat(request)?;
            finish_round(partition, response, running_summary, config)
        }
    }
}

/// Async twin of [`summarize_messages`]. The model call is the only
/// suspension point.
#[tracing::instrument(
    skip_all,
    fields(messages = messages.len(), extending = running_summary.is_some())
)]
pub async fn asummarize_messages(
    messages: &[Message],
    running_summary: Option<&RunningSummary>,
    model: &dyn ChatModel,
    token_counter: &dyn TokenCounter,
    config: &SummarizationConfig,
) -> Result<SummarizationResult> {
    match prepare_round(messages, running_summary, token_counter, config)? {
        Round::Done(result) => Ok(result),
        Round::Pending { partition, request } => {
            let response = model.achat(request).await?;
            finish_round(partition, response, running_summary, config)
        }
    }
}
