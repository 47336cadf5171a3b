pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::PerplexityClient;
pub use config::ServiceConfig;
pub use crate::core::{privacy::PrivacyFilter, search::ExternalSearch};
pub use domain::model::{PrivacyMode, RedactionKind, SearchResponse, SearchType};
pub use utils::error::{Result, SearchError};
