use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use validator::Validate;

const DEFAULT_PROCUREMENT_CODE_PREFIX: &str = "PR";
const DEFAULT_TRANSFER_CODE_PREFIX: &str = "TR";
const DEFAULT_EVENT_BUFFER_SIZE: usize = 64;

/// Engine configuration: document-number prefixes and event channel sizing.
/// Values come from defaults overridden by `STOCKFLOW_*` environment
/// variables.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Prefix for generated procurement request codes (e.g. "PR-1a2b...").
    #[serde(default = "default_procurement_code_prefix")]
    #[validate(length(min = 1))]
    pub procurement_code_prefix: String,

    /// Prefix for generated transfer request codes.
    #[serde(default = "default_transfer_code_prefix")]
    #[validate(length(min = 1))]
    pub transfer_code_prefix: String,

    /// Capacity of the workflow event channel.
    #[serde(default = "default_event_buffer_size")]
    #[validate(range(min = 1))]
    pub event_buffer_size: usize,
}

fn default_procurement_code_prefix() -> String {
    DEFAULT_PROCUREMENT_CODE_PREFIX.to_string()
}

fn default_transfer_code_prefix() -> String {
    DEFAULT_TRANSFER_CODE_PREFIX.to_string()
}

fn default_event_buffer_size() -> usize {
    DEFAULT_EVENT_BUFFER_SIZE
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            procurement_code_prefix: default_procurement_code_prefix(),
            transfer_code_prefix: default_transfer_code_prefix(),
            event_buffer_size: default_event_buffer_size(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from the environment, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("STOCKFLOW"))
            .build()?;

        let engine: EngineConfig = config.try_deserialize()?;
        engine
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = EngineConfig::default();
        assert_eq!(config.procurement_code_prefix, "PR");
        assert_eq!(config.transfer_code_prefix, "TR");
        assert!(config.event_buffer_size >= 1);
        assert!(config.validate().is_ok());
    }
}
