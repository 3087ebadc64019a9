use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::design::DesignState;
use crate::scoring::RecommendPolicy;
use crate::tui::Theme;

pub const DEFAULT_THINKING_DELAY: &str = "900ms";

/// Longest accepted thinking delay.
pub const MAX_THINKING_DELAY: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The human's current design. Defaults to the baseline configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<DesignState>,

    /// Recommendation rule when nothing scores strictly higher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommend_policy: Option<RecommendPolicy>,

    /// Pause before the AI answer is shown, e.g. "900ms" or "2s". "0s" disables it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_delay: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl Config {
    pub fn design(&self) -> DesignState {
        self.design.unwrap_or_default()
    }

    pub fn recommend_policy(&self) -> RecommendPolicy {
        self.recommend_policy.unwrap_or_default()
    }

    pub fn theme(&self) -> Theme {
        self.theme.unwrap_or_default()
    }

    pub fn thinking_delay(&self) -> Result<Duration> {
        let raw = self
            .thinking_delay
            .as_deref()
            .unwrap_or(DEFAULT_THINKING_DELAY);
        humantime::parse_duration(raw.trim())
            .with_context(|| format!("invalid thinking_delay '{}'", raw))
    }
}
