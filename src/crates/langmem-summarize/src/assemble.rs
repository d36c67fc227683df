//! Result assembly.
//!
//! Output layout is always
//! `[preserved system message?] + [summary message?] + [kept tail]`.

use crate::config::SummaryPrompts;
use crate::partition::Partition;
use crate::state::{RunningSummary, SummarizationResult, SUMMARY_MESSAGE_ID};
use langmem_core::Message;

/// Render `summary` as the synthetic summary message.
pub fn summary_message(prompts: &SummaryPrompts, summary: &str) -> Message {
    Message::system(prompts.render_final(summary)).with_id(SUMMARY_MESSAGE_ID)
}

/// Assemble the output of a round that produced `summary`.
///
/// The returned running summary covers every id of the prior one, every
/// message in `to_summarize` and every dropped orphan.
pub fn assemble_summarized(
    partition: Partition,
    summary: String,
    prior: Option<&RunningSummary>,
    prompts: &SummaryPrompts,
) -> SummarizationResult {
    let new_ids: Vec<String> = partition.summarized_ids().collect();
    let running_summary = match prior {
        Some(prior) => prior.extended(summary, new_ids),
        None => RunningSummary::new(summary, new_ids),
    };

    SummarizationResult {
        messages: layout(
            partition.system_message,
            Some(summary_message(prompts, &running_summary.summary)),
            partition.kept_tail,
        ),
        running_summary: Some(running_summary),
    }
}

/// Assemble the output of a round with nothing new to summarize.
///
/// Without a prior summary the window is returned as is; otherwise the
/// existing summary is re-rendered in front of it, and any orphans dropped
/// from the window are added to its ids.
pub fn assemble_unchanged(
    partition: Partition,
    prior: Option<&RunningSummary>,
    prompts: &SummaryPrompts,
) -> SummarizationResult {
    let running_summary = match prior {
        Some(prior) if !partition.orphaned_ids.is_empty() => {
            Some(prior.extended(prior.summary.clone(), partition.orphaned_ids))
        }
        _ => prior.cloned(),
    };

    SummarizationResult {
        messages: layout(
            partition.system_message,
            running_summary
                .as_ref()
                .map(|rs| summary_message(prompts, &rs.summary)),
            partition.kept_tail,
        ),
        running_summary,
    }
}

fn layout(
    system_message: Option<Message>,
    summary: Option<Message>,
    kept_tail: Vec<Message>,
) -> Vec<Message> {
    system_message
        .into_iter()
        .chain(summary)
        .chain(kept_tail)
        .collect()
}
