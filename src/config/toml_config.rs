use crate::core::search::MAX_FORECAST_DAYS;
use crate::domain::model::PrivacyMode;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SearchError};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_required_field,
    validate_substituted, validate_url, Validate,
};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an agricultural assistant providing current, \
general information for farmers. Always cite sources.";

/// Smallest `privacy.max_query_chars` that still fits a real question.
const MIN_QUERY_LIMIT: usize = 16;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub perplexity: PerplexityConfig,
    pub privacy: PrivacyConfig,
    pub search: SearchDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8088,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerplexityConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
    pub health_timeout_seconds: u64,
    pub system_prompt: String,
}

impl Default for PerplexityConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.perplexity.ai".to_string(),
            api_key: None,
            model: "sonar".to_string(),
            temperature: 0.2,
            max_tokens: 1000,
            timeout_seconds: 30,
            health_timeout_seconds: 5,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacyConfig {
    pub mode: PrivacyMode,
    pub max_query_chars: usize,
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self {
            mode: PrivacyMode::Redact,
            max_query_chars: 2000,
        }
    }
}

/// Fallbacks for topic helpers called without a market or region.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    pub default_market: String,
    pub default_region: String,
    pub default_forecast_days: u32,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            default_market: "Croatia".to_string(),
            default_region: "Croatia".to_string(),
            default_forecast_days: 7,
        }
    }
}

impl ServiceConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SearchError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;

        toml::from_str(&processed).map_err(|e| SearchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SearchError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn api_key(&self) -> Result<&str> {
        validate_required_field("perplexity.api_key", &self.perplexity.api_key).map(String::as_str)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;

        let perplexity = &self.perplexity;
        validate_url("perplexity.base_url", &perplexity.base_url)?;
        let api_key = self.api_key()?;
        validate_non_empty_string("perplexity.api_key", api_key)?;
        validate_substituted("perplexity.api_key", api_key)?;
        validate_non_empty_string("perplexity.model", &perplexity.model)?;
        validate_substituted("perplexity.model", &perplexity.model)?;
        validate_range("perplexity.temperature", perplexity.temperature, 0.0, 2.0)?;
        validate_positive_number("perplexity.max_tokens", perplexity.max_tokens as usize, 1)?;
        validate_positive_number(
            "perplexity.timeout_seconds",
            perplexity.timeout_seconds as usize,
            1,
        )?;
        validate_positive_number(
            "perplexity.health_timeout_seconds",
            perplexity.health_timeout_seconds as usize,
            1,
        )?;
        validate_non_empty_string("perplexity.system_prompt", &perplexity.system_prompt)?;

        validate_positive_number(
            "privacy.max_query_chars",
            self.privacy.max_query_chars,
            MIN_QUERY_LIMIT,
        )?;

        validate_non_empty_string("search.default_market", &self.search.default_market)?;
        validate_non_empty_string("search.default_region", &self.search.default_region)?;
        validate_range(
            "search.default_forecast_days",
            self.search.default_forecast_days,
            1,
            MAX_FORECAST_DAYS,
        )?;

        Ok(())
    }
}

impl ConfigProvider for ServiceConfig {
    fn system_prompt(&self) -> &str {
        &self.perplexity.system_prompt
    }

    fn privacy_mode(&self) -> PrivacyMode {
        self.privacy.mode
    }

    fn max_query_chars(&self) -> usize {
        self.privacy.max_query_chars
    }

    fn default_market(&self) -> &str {
        &self.search.default_market
    }

    fn default_region(&self) -> &str {
        &self.search.default_region
    }

    fn default_forecast_days(&self) -> u32 {
        self.search.default_forecast_days
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
