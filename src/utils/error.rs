use crate::domain::model::RedactionKind;
use thiserror::Error;

/// `error` value of a response refused by the privacy filter.
pub const PRIVACY_VIOLATION: &str = "privacy_violation";
/// `error` value of a response refused for an empty or oversized query.
pub const INVALID_QUERY: &str = "invalid_query";

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Malformed upstream response: {message}")]
    MalformedResponse { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Query contains personal or farm-identifying data: {}", format_kinds(.kinds))]
    PrivacyViolation { kinds: Vec<RedactionKind> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Upstream,
    Configuration,
    Input,
    Privacy,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

fn format_kinds(kinds: &[RedactionKind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl SearchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SearchError::ApiError(_) => ErrorCategory::Network,
            SearchError::UpstreamStatus { .. } | SearchError::MalformedResponse { .. } => {
                ErrorCategory::Upstream
            }
            SearchError::ConfigError { .. }
            | SearchError::MissingConfigError { .. }
            | SearchError::InvalidConfigValueError { .. }
            | SearchError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            SearchError::ValidationError { .. } => ErrorCategory::Input,
            SearchError::PrivacyViolation { .. } => ErrorCategory::Privacy,
            SearchError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Privacy => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Short reason placed in the `error` field of a degraded response.
    pub fn short_reason(&self) -> String {
        match self {
            SearchError::ApiError(e) if e.is_timeout() => "timeout".to_string(),
            SearchError::ApiError(e) if e.is_connect() => "connection failed".to_string(),
            SearchError::ApiError(_) => "request failed".to_string(),
            SearchError::UpstreamStatus { status, .. } => format!("API error: {}", status),
            SearchError::MalformedResponse { message } => format!("malformed response: {}", message),
            SearchError::PrivacyViolation { .. } => PRIVACY_VIOLATION.to_string(),
            SearchError::ValidationError { .. } => INVALID_QUERY.to_string(),
            other => other.to_string(),
        }
    }

    /// Fallback text returned to consumers in place of an answer.
    pub fn user_friendly_message(&self) -> &'static str {
        match self {
            SearchError::UpstreamStatus { .. } | SearchError::MalformedResponse { .. } => {
                "Unable to fetch current information"
            }
            SearchError::PrivacyViolation { .. } => {
                "Query contains personal or farm-specific data and was not forwarded"
            }
            SearchError::ValidationError { .. } => {
                "Query must be a non-empty general agricultural question"
            }
            SearchError::ConfigError { .. }
            | SearchError::MissingConfigError { .. }
            | SearchError::InvalidConfigValueError { .. }
            | SearchError::ConfigValidationError { .. } => "Service is misconfigured",
            _ => "Search service temporarily unavailable",
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check network connectivity to the knowledge API and try again later",
            ErrorCategory::Upstream => "Verify the API key and model name, then retry",
            ErrorCategory::Configuration => "Fix the configuration file or environment variables",
            ErrorCategory::Input => "Send a shorter, non-empty question",
            ErrorCategory::Privacy => "Remove names, contact details, IDs and exact locations from the question",
            ErrorCategory::System => "Check file permissions and service logs",
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
