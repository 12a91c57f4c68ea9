//! Runtime configuration read from the Lambda environment.

pub const REFLECT_STATUS_VAR: &str = "DISPATCH_REFLECT_STATUS";
pub const LOG_REQUEST_BODY_VAR: &str = "DISPATCH_LOG_REQUEST_BODY";
pub const LOG_FILTER_VAR: &str = "DISPATCH_LOG";

pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Map error kinds onto HTTP statuses instead of answering 200 for
    /// every outcome.
    pub reflect_status: bool,
    /// Log the raw request body before parsing.
    pub log_request_body: bool,
    pub log_filter: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            reflect_status: false,
            log_request_body: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a boolean (true/false/1/0/yes/no), got '{value}'")]
    InvalidBool { name: &'static str, value: String },
}

impl DispatchConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source; unset or blank
    /// variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Ok(Self {
            reflect_status: match lookup(REFLECT_STATUS_VAR) {
                Some(value) => parse_bool(REFLECT_STATUS_VAR, &value)?,
                None => defaults.reflect_status,
            },
            log_request_body: match lookup(LOG_REQUEST_BODY_VAR) {
                Some(value) => parse_bool(LOG_REQUEST_BODY_VAR, &value)?,
                None => defaults.log_request_body,
            },
            log_filter: lookup(LOG_FILTER_VAR).unwrap_or(defaults.log_filter),
        })
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = DispatchConfig::from_lookup(lookup_from(&[])).expect("config should load");
        assert_eq!(config, DispatchConfig::default());
        assert!(!config.reflect_status);
        assert!(config.log_request_body);
    }

    #[test]
    fn reads_overrides() {
        let config = DispatchConfig::from_lookup(lookup_from(&[
            (REFLECT_STATUS_VAR, "YES"),
            (LOG_REQUEST_BODY_VAR, "0"),
            (LOG_FILTER_VAR, "dynamo_dispatch_lambda=debug"),
        ]))
        .expect("config should load");

        assert!(config.reflect_status);
        assert!(!config.log_request_body);
        assert_eq!(config.log_filter, "dynamo_dispatch_lambda=debug");
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = DispatchConfig::from_lookup(lookup_from(&[(REFLECT_STATUS_VAR, "  ")]))
            .expect("config should load");
        assert!(!config.reflect_status);
    }

    #[test]
    fn rejects_unparseable_booleans() {
        let error = DispatchConfig::from_lookup(lookup_from(&[(REFLECT_STATUS_VAR, "maybe")]))
            .expect_err("invalid bool should fail");
        assert_eq!(
            error.to_string(),
            "DISPATCH_REFLECT_STATUS must be a boolean (true/false/1/0/yes/no), got 'maybe'"
        );
    }
}
