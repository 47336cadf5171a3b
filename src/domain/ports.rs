use crate::domain::model::{KnowledgeAnswer, KnowledgeRequest, PrivacyMode};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// External knowledge API the forwarder talks to.
#[async_trait]
pub trait KnowledgeProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn ask(&self, request: &KnowledgeRequest) -> Result<KnowledgeAnswer>;
    async fn health_check(&self) -> Result<bool>;
}

#[async_trait]
impl<T: KnowledgeProvider + ?Sized> KnowledgeProvider for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn ask(&self, request: &KnowledgeRequest) -> Result<KnowledgeAnswer> {
        (**self).ask(request).await
    }

    async fn health_check(&self) -> Result<bool> {
        (**self).health_check().await
    }
}

pub trait ConfigProvider: Send + Sync {
    fn system_prompt(&self) -> &str;
    fn privacy_mode(&self) -> PrivacyMode;
    fn max_query_chars(&self) -> usize;
    fn default_market(&self) -> &str;
    fn default_region(&self) -> &str;
    fn default_forecast_days(&self) -> u32;
}
