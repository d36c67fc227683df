//! Summarization configuration
//!
//! [`SummarizationConfig`] bundles the token budgets and prompt templates that
//! drive one engine invocation. It can be built in code, deserialized from a
//! host's own configuration file, or loaded from environment variables:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `{PREFIX}MAX_TOKENS` | `max_tokens` |
//! | `{PREFIX}MAX_TOKENS_BEFORE_SUMMARY` | `max_tokens_before_summary` |
//! | `{PREFIX}MAX_SUMMARY_TOKENS` | `max_summary_tokens` |
//!
//! ```rust
//! use langmem_summarize::SummarizationConfig;
//!
//! let config = SummarizationConfig::new(6)
//!     .with_max_summary_tokens(1)
//!     .with_max_tokens_before_summary(8);
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.trigger_threshold(), 8);
//! ```

use crate::error::{Result, SummarizationError};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Default environment variable prefix
pub const DEFAULT_ENV_PREFIX: &str = "LANGMEM_";

/// Instruction templates sent to the model and used to render the summary.
///
/// `existing` must contain the `{existing_summary}` placeholder and `final_prompt`
/// the `{summary}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    /// Instruction appended after the messages when no summary exists yet.
    pub initial: String,
    /// Instruction appended after the new messages when extending a summary.
    pub existing: String,
    /// Content of the synthetic summary message.
    pub final_prompt: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            initial: "Create a summary of the conversation above:".to_string(),
            existing: "This is summary of the conversation so far: {existing_summary}\n\n\
                       Extend this summary by taking into account the new messages above:"
                .to_string(),
            final_prompt: "Summary of the conversation so far: {summary}".to_string(),
        }
    }
}

impl SummaryPrompts {
    /// Render the extend instruction for `existing_summary`.
    pub fn render_existing(&self, existing_summary: &str) -> String {
        self.existing.replace("{existing_summary}", existing_summary)
    }

    /// Render the summary message content for `summary`.
    pub fn render_final(&self, summary: &str) -> String {
        self.final_prompt.replace("{summary}", summary)
    }
}

/// Token budgets and prompts for one summarization call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizationConfig {
    /// Budget the output window (summary, reserved summary space and kept
    /// tail combined) must fit under.
    pub max_tokens: usize,

    /// Window size that triggers summarization. Defaults to `max_tokens`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens_before_summary: Option<usize>,

    /// Space reserved for the generated summary. Also passed to the model as
    /// its generation limit.
    pub max_summary_tokens: usize,

    /// Instruction templates
    #[serde(default)]
    pub prompts: SummaryPrompts,
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 256,
            max_tokens_before_summary: None,
            max_summary_tokens: 128,
            prompts: SummaryPrompts::default(),
        }
    }
}

impl SummarizationConfig {
    /// Create a configuration with the given output budget.
    ///
    /// `max_summary_tokens` starts at half of `max_tokens`.
    pub fn new(max_tokens: usize) -> Self {
        Self {
            max_tokens,
            max_summary_tokens: max_tokens / 2,
            ..Default::default()
        }
    }

    /// Set the threshold that triggers summarization
    pub fn with_max_tokens_before_summary(mut self, max_tokens_before_summary: usize) -> Self {
        self.max_tokens_before_summary = Some(max_tokens_before_summary);
        self
    }

    /// Set the space reserved for the summary
    pub fn with_max_summary_tokens(mut self, max_summary_tokens: usize) -> Self {
        self.max_summary_tokens = max_summary_tokens;
        self
    }

    /// Replace the prompt templates
    pub fn with_prompts(mut self, prompts: SummaryPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Threshold the unsummarized window is compared against.
    pub fn trigger_threshold(&self) -> usize {
        self.max_tokens_before_summary.unwrap_or(self.max_tokens)
    }

    /// Check budget consistency and prompt placeholders.
    pub fn validate(&self) -> Result<()> {
        if self.max_summary_tokens >= self.max_tokens {
            return Err(SummarizationError::Configuration(format!(
                "max_summary_tokens ({}) must be less than max_tokens ({})",
                self.max_summary_tokens, self.max_tokens
            )));
        }
        if !self.prompts.existing.contains("{existing_summary}") {
            return Err(SummarizationError::Configuration(
                "existing summary prompt must contain {existing_summary}".to_string(),
            ));
        }
        if !self.prompts.final_prompt.contains("{summary}") {
            return Err(SummarizationError::Configuration(
                "final prompt must contain {summary}".to_string(),
            ));
        }
        Ok(())
    }

    /// Load budgets from `{prefix}MAX_TOKENS`, `{prefix}MAX_TOKENS_BEFORE_SUMMARY`
    /// and `{prefix}MAX_SUMMARY_TOKENS`, falling back to defaults for unset
    /// variables. The result is validated.
    pub fn from_env(prefix: &str) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            max_tokens: get_env_parse(&build_env_key(prefix, "max_tokens"))?
                .unwrap_or(defaults.max_tokens),
            max_tokens_before_summary: get_env_parse(&build_env_key(
                prefix,
                "max_tokens_before_summary",
            ))?,
            max_summary_tokens: get_env_parse(&build_env_key(prefix, "max_summary_tokens"))?
                .unwrap_or(defaults.max_summary_tokens),
            prompts: defaults.prompts,
        };
        config.validate()?;
        Ok(config)
    }
}

fn build_env_key(prefix: &str, name: &str) -> String {
    format!("{}{}", prefix, name.to_uppercase())
}

fn get_env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = match env::var(key) {
        Ok(val) => val,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            return Err(SummarizationError::Configuration(format!(
                "Environment variable {} contains invalid UTF-8",
                key
            )))
        }
    };
    raw.trim().parse::<T>().map(Some).map_err(|e| {
        SummarizationError::Configuration(format!(
            "Failed to parse environment variable {}: {}",
            key, e
        ))
    })
}
