use crate::core::answer::AnswerParser;
use crate::core::privacy::PrivacyFilter;
use crate::core::query;
use crate::domain::model::{KnowledgeRequest, SearchResponse, SearchType};
use crate::domain::ports::{ConfigProvider, KnowledgeProvider};
use crate::utils::error::{ErrorCategory, Result, SearchError};

pub const MAX_FORECAST_DAYS: u32 = 16;

/// Forwards general agricultural questions to a knowledge provider.
///
/// Queries are sanitized by the [`PrivacyFilter`] before anything leaves the
/// process, and every failure collapses into a degraded [`SearchResponse`]
/// instead of an error.
pub struct ExternalSearch<P: KnowledgeProvider, C: ConfigProvider> {
    provider: P,
    config: C,
    privacy: PrivacyFilter,
    parser: AnswerParser,
}

impl<P: KnowledgeProvider, C: ConfigProvider> ExternalSearch<P, C> {
    pub fn new(provider: P, config: C) -> Result<Self> {
        let privacy = PrivacyFilter::new(config.privacy_mode())?;
        Ok(Self {
            provider,
            config,
            privacy,
            parser: AnswerParser::new()?,
        })
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn search(&self, query: &str, search_type: SearchType) -> SearchResponse {
        match self.try_search(query, search_type).await {
            Ok(response) => response,
            Err(e) => {
                match e.category() {
                    ErrorCategory::Privacy | ErrorCategory::Input => {
                        tracing::warn!(search_type = %search_type, "Query refused: {}", e)
                    }
                    _ => tracing::error!(
                        search_type = %search_type,
                        provider = self.provider.name(),
                        "External search error: {}",
                        e
                    ),
                }
                degrade(search_type, &e)
            }
        }
    }

    async fn try_search(&self, query: &str, search_type: SearchType) -> Result<SearchResponse> {
        self.validate_query(query)?;

        let sanitized = self.privacy.sanitize(query)?;
        if !sanitized.redactions.is_empty() {
            tracing::warn!(
                kinds = ?sanitized.redactions,
                "Stripped identifying data from query"
            );
        }

        let request = KnowledgeRequest {
            system_prompt: self.config.system_prompt().to_string(),
            user_prompt: query::enhance_query(&sanitized.text, search_type),
        };
        tracing::info!(
            search_type = %search_type,
            query_chars = sanitized.text.chars().count(),
            provider = self.provider.name(),
            "Forwarding query"
        );
        tracing::debug!("Sanitized prompt: {}", request.user_prompt);

        let answer = self.provider.ask(&request).await?;
        let content = answer.content.trim();
        if content.is_empty() {
            return Err(SearchError::MalformedResponse {
                message: "empty answer".to_string(),
            });
        }

        let sources = self.parser.extract_sources(content, &answer.citations);
        tracing::debug!("Answer received ({} chars, {} sources)", content.len(), sources.len());

        Ok(SearchResponse::answered(
            search_type,
            content.to_string(),
            sources,
            sanitized.redactions,
        ))
    }

    fn validate_query(&self, query: &str) -> Result<()> {
        let chars = query.trim().chars().count();
        if chars == 0 {
            return Err(SearchError::ValidationError {
                message: "query is empty".to_string(),
            });
        }
        let max = self.config.max_query_chars();
        if chars > max {
            return Err(SearchError::ValidationError {
                message: format!("query is {} characters, limit is {}", chars, max),
            });
        }
        Ok(())
    }

    pub async fn get_weather_forecast(&self, location: &str, days: Option<u32>) -> SearchResponse {
        let days = days.unwrap_or_else(|| self.config.default_forecast_days());
        if let Err(e) = require("location", location) {
            return degrade(SearchType::Weather, &e);
        }
        if !(1..=MAX_FORECAST_DAYS).contains(&days) {
            let e = SearchError::ValidationError {
                message: format!("days must be between 1 and {}, got {}", MAX_FORECAST_DAYS, days),
            };
            return degrade(SearchType::Weather, &e);
        }

        let mut result = self
            .search(&query::weather_query(location, days), SearchType::Weather)
            .await;
        if let Some(answer) = result.answer.as_deref().filter(|_| result.success) {
            result.weather_data = Some(self.parser.parse_weather(answer));
        }
        result
    }

    pub async fn get_market_prices(&self, commodity: &str, market: Option<&str>) -> SearchResponse {
        if let Err(e) = require("commodity", commodity) {
            return degrade(SearchType::Prices, &e);
        }
        let market = non_blank(market).unwrap_or_else(|| self.config.default_market());

        let mut result = self
            .search(&query::market_price_query(commodity, market), SearchType::Prices)
            .await;
        if let Some(answer) = result.answer.as_deref().filter(|_| result.success) {
            result.price_data = Some(self.parser.parse_price(answer, commodity));
        }
        result
    }

    pub async fn get_agricultural_news(
        &self,
        topic: Option<&str>,
        region: Option<&str>,
    ) -> SearchResponse {
        let region = non_blank(region).unwrap_or_else(|| self.config.default_region());

        let mut result = self
            .search(&query::news_query(topic, region), SearchType::News)
            .await;
        if let Some(answer) = result.answer.as_deref().filter(|_| result.success) {
            result.news_items = Some(self.parser.parse_news(answer));
        }
        result
    }

    pub async fn get_pest_disease_alerts(&self, region: &str, crops: &[String]) -> SearchResponse {
        if let Err(e) = require("region", region) {
            return degrade(SearchType::Alerts, &e);
        }
        if crops.iter().all(|c| c.trim().is_empty()) {
            let e = SearchError::ValidationError {
                message: "at least one crop is required".to_string(),
            };
            return degrade(SearchType::Alerts, &e);
        }

        let mut result = self
            .search(&query::pest_alert_query(region, crops), SearchType::Alerts)
            .await;
        if let Some(answer) = result.answer.as_deref().filter(|_| result.success) {
            result.alerts = Some(self.parser.parse_alerts(answer));
        }
        result
    }

    /// Reachability of the knowledge provider; failures are logged and reported as `false`.
    pub async fn health_check(&self) -> bool {
        match self.provider.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::error!("External search health check failed: {}", e);
                false
            }
        }
    }
}

fn degrade(search_type: SearchType, error: &SearchError) -> SearchResponse {
    let mut response =
        SearchResponse::degraded(search_type, error.short_reason(), error.user_friendly_message());
    if let SearchError::PrivacyViolation { kinds } = error {
        response.redactions = kinds.clone();
    }
    response
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SearchError::ValidationError {
            message: format!("{} is required", field),
        });
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
