use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    General,
    Weather,
    Prices,
    News,
    Alerts,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::General => "general",
            SearchType::Weather => "weather",
            SearchType::Prices => "prices",
            SearchType::News => "news",
            SearchType::Alerts => "alerts",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SearchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(SearchType::General),
            "weather" => Ok(SearchType::Weather),
            "prices" => Ok(SearchType::Prices),
            "news" => Ok(SearchType::News),
            "alerts" => Ok(SearchType::Alerts),
            other => Err(format!(
                "unknown search type '{}' (expected general, weather, prices, news or alerts)",
                other
            )),
        }
    }
}

/// Category of identifying data removed from (or refused in) a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedactionKind {
    Email,
    Phone,
    NationalId,
    Iban,
    Coordinates,
    ParcelId,
    FarmRegistryId,
    PersonalName,
    StreetAddress,
}

impl RedactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedactionKind::Email => "email",
            RedactionKind::Phone => "phone",
            RedactionKind::NationalId => "national_id",
            RedactionKind::Iban => "iban",
            RedactionKind::Coordinates => "coordinates",
            RedactionKind::ParcelId => "parcel_id",
            RedactionKind::FarmRegistryId => "farm_registry_id",
            RedactionKind::PersonalName => "personal_name",
            RedactionKind::StreetAddress => "street_address",
        }
    }
}

/// What happens to a query that contains identifying data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyMode {
    #[default]
    Redact,
    Reject,
}

impl std::str::FromStr for PrivacyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redact" => Ok(PrivacyMode::Redact),
            "reject" => Ok(PrivacyMode::Reject),
            other => Err(format!("unknown privacy mode '{}' (expected redact or reject)", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub search_type: SearchType,
}

/// Prompt pair handed to a knowledge provider. Only sanitized text ends up here.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeRequest {
    pub system_prompt: String,
    pub user_prompt: String,
}

#[derive(Debug, Clone, Default)]
pub struct KnowledgeAnswer {
    pub content: String,
    pub citations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub day: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub summary: String,
    pub forecast: Vec<ForecastDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agricultural_impact: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTrend {
    Rising,
    Falling,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceData {
    pub commodity: String,
    pub current_price: Option<f64>,
    pub currency: String,
    pub unit: String,
    pub trend: PriceTrend,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PestAlert {
    pub name: String,
    pub severity: AlertSeverity,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub search_type: SearchType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redactions: Vec<RedactionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_data: Option<WeatherData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_data: Option<PriceData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news_items: Option<Vec<NewsItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alerts: Option<Vec<PestAlert>>,
}

impl SearchResponse {
    pub fn answered(
        search_type: SearchType,
        answer: String,
        sources: Vec<String>,
        redactions: Vec<RedactionKind>,
    ) -> Self {
        Self {
            success: true,
            search_type,
            answer: Some(answer),
            sources,
            redactions,
            error: None,
            message: None,
            timestamp: Utc::now(),
            weather_data: None,
            price_data: None,
            news_items: None,
            alerts: None,
        }
    }

    pub fn degraded(search_type: SearchType, error: String, message: &str) -> Self {
        Self {
            success: false,
            search_type,
            answer: None,
            sources: Vec::new(),
            redactions: Vec::new(),
            error: Some(error),
            message: Some(message.to_string()),
            timestamp: Utc::now(),
            weather_data: None,
            price_data: None,
            news_items: None,
            alerts: None,
        }
    }

    /// Answer text for successful responses, fallback message otherwise.
    pub fn text(&self) -> &str {
        self.answer
            .as_deref()
            .or(self.message.as_deref())
            .unwrap_or_default()
    }
}
