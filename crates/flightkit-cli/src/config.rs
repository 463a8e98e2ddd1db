//! CLI configuration from environment.

use anyhow::{Context, Result};
use flightkit_core::NavRules;
use std::env;
use std::path::PathBuf;

const DEFAULT_LOG_DIRECTIVE: &str = "flightkit_core=info";
const DEFAULT_SEGMENTS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Tracing directive added on top of `RUST_LOG`
    pub log_directive: String,
    /// JSON file overriding the default calculator thresholds
    pub rules_path: Option<PathBuf>,
    /// Segment count used by `segment` when none is given
    pub default_segments: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            log_directive: lookup("FLIGHTKIT_LOG")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_DIRECTIVE.to_string()),
            rules_path: lookup("FLIGHTKIT_RULES")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            default_segments: lookup("FLIGHTKIT_SEGMENTS")
                .and_then(|s| s.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(DEFAULT_SEGMENTS),
        }
    }

    pub fn load_rules(&self) -> Result<NavRules> {
        let Some(path) = &self.rules_path else {
            return Ok(NavRules::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading rules file {}", path.display()))?;
        let rules = serde_json::from_str(&text)
            .with_context(|| format!("parsing rules file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded navigation rules");
        Ok(rules)
    }
}
