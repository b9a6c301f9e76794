//! Planner configuration.

use crate::dialect::Dialect;
use assocjoin_core::{ConfigError, Error, Result};
use serde::{Deserialize, Serialize};

/// Settings shared by the planner and the reference SQL renderer.
///
/// Usually built in code; [`PlannerConfig::from_json`] loads it from a settings file.
/// Missing JSON keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    /// Dialect used by the renderer for identifier quoting
    pub dialect: Dialect,
    /// Quote table names when rendering joins
    pub quote_identifiers: bool,
    /// Reject aliases that are not plain SQL identifiers at append time
    pub validate_aliases: bool,
    /// Log a warning when more than one later join could bridge a many-to-many collection
    pub warn_on_ambiguous_bridge: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            quote_identifiers: false,
            validate_aliases: false,
            warn_on_ambiguous_bridge: true,
        }
    }
}

impl PlannerConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            Error::Config(ConfigError {
                message: format!("invalid planner configuration: {e}"),
                source: Some(Box::new(e)),
            })
        })
    }

    /// Set the SQL dialect.
    #[must_use]
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Enable or disable identifier quoting.
    #[must_use]
    pub fn quote_identifiers(mut self, value: bool) -> Self {
        self.quote_identifiers = value;
        self
    }

    /// Enable or disable alias validation.
    #[must_use]
    pub fn validate_aliases(mut self, value: bool) -> Self {
        self.validate_aliases = value;
        self
    }

    /// Enable or disable the ambiguous-bridge warning.
    #[must_use]
    pub fn warn_on_ambiguous_bridge(mut self, value: bool) -> Self {
        self.warn_on_ambiguous_bridge = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::new();
        assert_eq!(config.dialect, Dialect::Postgres);
        assert!(!config.quote_identifiers);
        assert!(!config.validate_aliases);
        assert!(config.warn_on_ambiguous_bridge);
    }

    #[test]
    fn test_builder_chain() {
        let config = PlannerConfig::new()
            .dialect(Dialect::Mysql)
            .quote_identifiers(true)
            .validate_aliases(true)
            .warn_on_ambiguous_bridge(false);
        assert_eq!(config.dialect, Dialect::Mysql);
        assert!(config.quote_identifiers);
        assert!(config.validate_aliases);
        assert!(!config.warn_on_ambiguous_bridge);
    }

    #[test]
    fn test_from_json_partial() {
        let config = PlannerConfig::from_json(r#"{"dialect": "sqlite", "validate_aliases": true}"#)
            .unwrap();
        assert_eq!(config.dialect, Dialect::Sqlite);
        assert!(config.validate_aliases);
        assert!(!config.quote_identifiers);
        assert!(config.warn_on_ambiguous_bridge);
    }

    #[test]
    fn test_from_json_rejects_unknown_keys() {
        let err = PlannerConfig::from_json(r#"{"dialekt": "sqlite"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().starts_with("Configuration error: invalid planner configuration"));
    }
}
