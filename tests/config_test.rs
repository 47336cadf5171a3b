use agri_web_search::config::ServiceConfig;
use agri_web_search::domain::ports::ConfigProvider;
use agri_web_search::utils::validation::Validate;
use agri_web_search::{PrivacyMode, SearchError};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_service_config_from_file() {
    std::env::set_var("AGRI_SEARCH_IT_API_KEY", "pplx-it");
    let file = write_config(
        r#"
[server]
port = 8181

[perplexity]
api_key = "${AGRI_SEARCH_IT_API_KEY}"
base_url = "http://127.0.0.1:9999"
system_prompt = "Answer briefly about farming."

[privacy]
mode = "reject"

[search]
default_region = "Mediterranean"
"#,
    );

    let config = ServiceConfig::from_file(file.path()).unwrap();
    std::env::remove_var("AGRI_SEARCH_IT_API_KEY");

    assert!(config.validate().is_ok());
    assert_eq!(config.bind_address(), "127.0.0.1:8181");
    assert_eq!(config.api_key().unwrap(), "pplx-it");
    assert_eq!(config.system_prompt(), "Answer briefly about farming.");
    assert_eq!(config.privacy_mode(), PrivacyMode::Reject);
    assert_eq!(config.default_region(), "Mediterranean");
    assert_eq!(config.default_market(), "Croatia");
}

#[test]
fn test_missing_file_is_io_error() {
    let err = ServiceConfig::from_file("/nonexistent/agri-web-search.toml").unwrap_err();
    assert!(matches!(err, SearchError::IoError(_)));
}

#[test]
fn test_invalid_values_fail_validation() {
    let file = write_config(
        r#"
[perplexity]
api_key = "pplx-it"
max_tokens = 0
"#,
    );

    let config = ServiceConfig::from_file(file.path()).unwrap();
    match config.validate() {
        Err(SearchError::InvalidConfigValueError { field, .. }) => {
            assert_eq!(field, "perplexity.max_tokens")
        }
        other => panic!("expected invalid value error, got {:?}", other),
    }
}
