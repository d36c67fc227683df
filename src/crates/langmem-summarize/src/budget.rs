//! Token budget evaluation.
//!
//! All arithmetic is in the units of the supplied [`TokenCounter`]. Two limits
//! matter:
//!
//! - the **trigger threshold** decides whether a round runs at all
//! - the **remaining budget** is what the kept tail may occupy once space for
//!   the summary and the preserved system message is reserved

use crate::config::SummarizationConfig;
use langmem_core::{Message, TokenCounter};

/// Budget limits resolved for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudget {
    /// A candidate window above this size triggers summarization.
    pub trigger_threshold: usize,

    /// Largest kept tail allowed after summarization.
    pub remaining_budget: usize,
}

impl TokenBudget {
    /// Resolve the limits for `config`, reserving room for the preserved
    /// leading system message if there is one.
    pub fn new(
        config: &SummarizationConfig,
        counter: &dyn TokenCounter,
        system_message: Option<&Message>,
    ) -> Self {
        let system_tokens = system_message
            .map(|m| counter.count(std::slice::from_ref(m)))
            .unwrap_or(0);

        Self {
            trigger_threshold: config.trigger_threshold(),
            remaining_budget: config
                .max_tokens
                .saturating_sub(config.max_summary_tokens)
                .saturating_sub(system_tokens),
        }
    }

    /// Whether a window of `window_tokens` must be compacted.
    pub fn should_summarize(&self, window_tokens: usize) -> bool {
        window_tokens > self.trigger_threshold
    }

    /// Largest kept tail a round may leave behind.
    ///
    /// Bounded by the trigger threshold as well, so the tail alone never
    /// triggers another round when resubmitted unchanged.
    pub fn tail_limit(&self) -> usize {
        self.remaining_budget.min(self.trigger_threshold)
    }

    /// First index whose inclusive prefix is at least the trigger threshold
    /// while the rest of the window fits [`tail_limit`](Self::tail_limit).
    ///
    /// `per_message` holds the token count of each candidate message.
    pub fn find_cutoff(&self, per_message: &[usize]) -> Option<usize> {
        let total = per_message
            .iter()
            .fold(0usize, |acc, tokens| acc.saturating_add(*tokens));
        let tail_limit = self.tail_limit();
        let mut prefix = 0usize;
        for (i, tokens) in per_message.iter().enumerate() {
            prefix = prefix.saturating_add(*tokens);
            if prefix >= self.trigger_threshold && total - prefix <= tail_limit {
                return Some(i);
            }
        }
        None
    }
}

/// Token count of each message on its own.
pub fn count_each(counter: &dyn TokenCounter, messages: &[Message]) -> Vec<usize> {
    messages
        .iter()
        .map(|m| counter.count(std::slice::from_ref(m)))
        .collect()
}
