// Adapter configuration, loaded with the `config` crate

use config::{Config, ConfigError, Environment, Source};
use serde::{Deserialize, Serialize};

/// Environment variable prefix (`TXMAN_CLOSE_ON_ROLLBACK=true`)
pub const ENV_PREFIX: &str = "TXMAN";

/// Construction-time settings for [`crate::EntityManagerTransactional`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionalConfig {
    /// Close the entity manager after a successful rollback
    pub close_on_rollback: bool,
}

impl TransactionalConfig {
    /// Load from a single configuration source; missing keys fall back to defaults
    pub fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    /// Load from `TXMAN_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};
    use std::collections::HashMap;

    #[test]
    fn test_default_keeps_manager_open() {
        assert!(!TransactionalConfig::default().close_on_rollback);
    }

    #[test]
    fn test_from_json_source() {
        let source = File::from_str(r#"{ "close_on_rollback": true }"#, FileFormat::Json);
        let cfg = TransactionalConfig::from_source(source).unwrap();
        assert!(cfg.close_on_rollback);
    }

    #[test]
    fn test_missing_key_uses_default() {
        let source = File::from_str("{}", FileFormat::Json);
        let cfg = TransactionalConfig::from_source(source).unwrap();
        assert_eq!(cfg, TransactionalConfig::default());
    }

    #[test]
    fn test_environment_source() {
        // Explicit source map instead of the process environment (tests run in parallel)
        let mut vars = HashMap::new();
        vars.insert("TXMAN_CLOSE_ON_ROLLBACK".to_string(), "true".to_string());
        let source = Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(Some(vars));

        let cfg = TransactionalConfig::from_source(source).unwrap();
        assert!(cfg.close_on_rollback);
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let source = File::from_str(r#"{ "close_on_rollback": "sometimes" }"#, FileFormat::Json);
        assert!(TransactionalConfig::from_source(source).is_err());
    }

    #[test]
    fn test_serde_json_roundtrip_shape() {
        let cfg: TransactionalConfig = serde_json::from_str(r#"{"close_on_rollback":true}"#).unwrap();
        assert!(cfg.close_on_rollback);
        assert_eq!(
            serde_json::to_string(&cfg).unwrap(),
            r#"{"close_on_rollback":true}"#
        );
    }
}
