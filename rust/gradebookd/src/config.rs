use anyhow::{bail, Result};

use gradebookd::UNGRADED_MARKER;

pub const LOG_VAR: &str = "GRADEBOOKD_LOG";
pub const MARKER_VAR: &str = "GRADEBOOKD_UNGRADED_MARKER";

/// Startup settings for the sidecar, read once from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct SidecarConfig {
    /// Default `tracing` filter; `RUST_LOG` still wins when set.
    pub log_filter: String,
    pub ungraded_marker: String,
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            ungraded_marker: UNGRADED_MARKER.to_string(),
        }
    }
}

impl SidecarConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = lookup(LOG_VAR) {
            let v = v.trim();
            if !v.is_empty() {
                cfg.log_filter = v.to_string();
            }
        }
        if let Some(v) = lookup(MARKER_VAR) {
            if v.is_empty() {
                bail!("{} must not be empty", MARKER_VAR);
            }
            cfg.ungraded_marker = v;
        }
        Ok(cfg)
    }
}
