pub mod answer;
pub mod privacy;
pub mod query;
pub mod search;

pub use crate::domain::ports::{ConfigProvider, KnowledgeProvider};
pub use crate::utils::error::Result;
