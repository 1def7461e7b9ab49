use std::path::Path;

use serde::{Deserialize, Serialize};
use tally_events::BusConfig;

/// Errors loading a [`TallyConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for a [`Tally`](crate::Tally) instance.
///
/// Every key is optional in TOML; missing keys take their defaults and
/// unknown keys are rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TallyConfig {
    /// Keep per-identity running totals so balance queries skip the full
    /// scan. Results are identical either way.
    pub cache_balances: bool,
    /// Buffer size of each notification subscriber.
    pub channel_capacity: usize,
    /// Number of recent notifications retained for late readers.
    pub history_limit: usize,
}

impl Default for TallyConfig {
    fn default() -> Self {
        let bus = BusConfig::default();
        Self {
            cache_balances: true,
            channel_capacity: bus.channel_capacity,
            history_limit: bus.history_limit,
        }
    }
}

impl TallyConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub(crate) fn bus_config(&self) -> BusConfig {
        BusConfig {
            // tokio's broadcast channel panics on zero capacity.
            channel_capacity: self.channel_capacity.max(1),
            history_limit: self.history_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = TallyConfig::default();
        assert!(c.cache_balances);
        assert_eq!(c.channel_capacity, 1024);
        assert_eq!(c.history_limit, 4096);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(TallyConfig::from_toml_str("").unwrap(), TallyConfig::default());
    }

    #[test]
    fn partial_toml_overrides_some_keys() {
        let c = TallyConfig::from_toml_str("cache_balances = false\nhistory_limit = 10\n").unwrap();
        assert!(!c.cache_balances);
        assert_eq!(c.history_limit, 10);
        assert_eq!(c.channel_capacity, 1024);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            TallyConfig::from_toml_str("currency = \"EUR\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let c = TallyConfig {
            channel_capacity: 0,
            ..Default::default()
        };
        assert_eq!(c.bus_config().channel_capacity, 1);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        std::fs::write(&path, "channel_capacity = 16\n").unwrap();
        assert_eq!(TallyConfig::load(&path).unwrap().channel_capacity, 16);
        assert!(matches!(
            TallyConfig::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
