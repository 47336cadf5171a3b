use crate::config::toml_config::ServiceConfig;
use crate::domain::model::PrivacyMode;
use crate::utils::error::{Result, SearchError};

pub const ENV_API_KEY: &str = "PERPLEXITY_API_KEY";
pub const ENV_BASE_URL: &str = "PERPLEXITY_BASE_URL";
pub const ENV_MODEL: &str = "PERPLEXITY_MODEL";
pub const ENV_HOST: &str = "SEARCH_HOST";
pub const ENV_PORT: &str = "SEARCH_PORT";
pub const ENV_PRIVACY_MODE: &str = "PRIVACY_MODE";

impl ServiceConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from any variable source; empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.perplexity.api_key = Some(key);
        }
        if let Some(url) = get(ENV_BASE_URL) {
            self.perplexity.base_url = url;
        }
        if let Some(model) = get(ENV_MODEL) {
            self.perplexity.model = model;
        }
        if let Some(host) = get(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = get(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| SearchError::InvalidConfigValueError {
                    field: ENV_PORT.to_string(),
                    value: port.clone(),
                    reason: "expected a port number".to_string(),
                })?;
        }
        if let Some(mode) = get(ENV_PRIVACY_MODE) {
            self.privacy.mode = mode.parse::<PrivacyMode>().map_err(|reason| {
                SearchError::InvalidConfigValueError {
                    field: ENV_PRIVACY_MODE.to_string(),
                    value: mode.clone(),
                    reason,
                }
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let mut config = ServiceConfig::default();
        config
            .apply_overrides(lookup(&[
                (ENV_API_KEY, "pplx-env"),
                (ENV_BASE_URL, "http://127.0.0.1:9000"),
                (ENV_MODEL, "sonar-pro"),
                (ENV_HOST, "0.0.0.0"),
                (ENV_PORT, "9200"),
                (ENV_PRIVACY_MODE, "reject"),
            ]))
            .unwrap();

        assert_eq!(config.api_key().unwrap(), "pplx-env");
        assert_eq!(config.perplexity.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.perplexity.model, "sonar-pro");
        assert_eq!(config.bind_address(), "0.0.0.0:9200");
        assert_eq!(config.privacy.mode, PrivacyMode::Reject);
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let mut config = ServiceConfig::default();
        config
            .apply_overrides(lookup(&[(ENV_MODEL, "  "), (ENV_PORT, "")]))
            .unwrap();

        assert_eq!(config.perplexity.model, "sonar");
        assert_eq!(config.server.port, 8088);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let mut config = ServiceConfig::default();
        let err = config
            .apply_overrides(lookup(&[(ENV_PORT, "eighty")]))
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfigValueError { ref field, .. } if field == ENV_PORT));

        let err = config
            .apply_overrides(lookup(&[(ENV_PRIVACY_MODE, "strip")]))
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfigValueError { .. }));
    }
}
