//! Booking service configuration.

use anyhow::Context;

/// Environment variable overriding [`ServiceConfig::max_conflict_retries`].
pub const MAX_CONFLICT_RETRIES_VAR: &str = "SEATLEDGER_MAX_CONFLICT_RETRIES";

const DEFAULT_MAX_CONFLICT_RETRIES: u32 = 3;

/// Tuning for [`crate::BookingService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// How many times a fetch-mutate-save cycle is retried after losing an
    /// optimistic concurrency race. Zero disables retries.
    pub max_conflict_retries: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: DEFAULT_MAX_CONFLICT_RETRIES,
        }
    }
}

impl ServiceConfig {
    /// Load from process environment, falling back to defaults for unset keys.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (environment, config map, tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(MAX_CONFLICT_RETRIES_VAR) {
            config.max_conflict_retries = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid {MAX_CONFLICT_RETRIES_VAR}: '{raw}'"))?;
        }

        Ok(config)
    }
}
