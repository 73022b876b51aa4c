use std::env;

use anyhow::{Context, Result, bail};

use crate::context::{
    DEFAULT_RECENT_MESSAGES, SUMMARY_EXCERPT_CHARS, SUMMARY_UPDATE_THRESHOLD, SummaryPolicy,
};

pub const ENV_CONTEXT_WINDOW: &str = "CHAT_CONTEXT_WINDOW";
pub const ENV_SUMMARY_THRESHOLD: &str = "CHAT_SUMMARY_THRESHOLD";
pub const ENV_SUMMARY_EXCERPT_CHARS: &str = "CHAT_SUMMARY_EXCERPT_CHARS";

/// Context and summary tuning, read from the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextConfig {
    pub context_window: usize,
    pub summary_threshold: usize,
    pub summary_excerpt_chars: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            context_window: DEFAULT_RECENT_MESSAGES,
            summary_threshold: SUMMARY_UPDATE_THRESHOLD,
            summary_excerpt_chars: SUMMARY_EXCERPT_CHARS,
        }
    }
}

impl ContextConfig {
    /// Read `CHAT_CONTEXT_WINDOW`, `CHAT_SUMMARY_THRESHOLD` and `CHAT_SUMMARY_EXCERPT_CHARS`
    ///
    /// Unset variables keep their defaults. Set variables must be positive integers.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ContextConfig::from_env`] with a caller-supplied variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            context_window: read_positive(&lookup, ENV_CONTEXT_WINDOW, defaults.context_window)?,
            summary_threshold: read_positive(
                &lookup,
                ENV_SUMMARY_THRESHOLD,
                defaults.summary_threshold,
            )?,
            summary_excerpt_chars: read_positive(
                &lookup,
                ENV_SUMMARY_EXCERPT_CHARS,
                defaults.summary_excerpt_chars,
            )?,
        })
    }

    pub fn summary_policy(&self) -> SummaryPolicy {
        SummaryPolicy::new(self.summary_threshold, self.summary_excerpt_chars)
    }
}

fn read_positive<F>(lookup: &F, key: &str, default: usize) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    let value: usize = raw
        .trim()
        .parse()
        .with_context(|| format!("{} must be a positive integer, got {:?}", key, raw))?;
    if value == 0 {
        bail!("{} must be greater than zero", key);
    }

    Ok(value)
}
