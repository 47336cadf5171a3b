use crate::domain::model::{SearchRequest, SearchResponse};
use crate::server::AppState;
use crate::utils::error::{INVALID_QUERY, PRIVACY_VIOLATION};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    pub location: String,
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PriceParams {
    pub commodity: String,
    pub market: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewsParams {
    pub topic: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AlertParams {
    pub region: String,
    #[serde(default)]
    pub crops: Vec<String>,
}

type Reply = (StatusCode, Json<SearchResponse>);

/// Degraded answers are still a successful exchange; only refusals get 4xx.
fn reply(response: SearchResponse) -> Reply {
    let status = match response.error.as_deref() {
        Some(PRIVACY_VIOLATION) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(INVALID_QUERY) => StatusCode::BAD_REQUEST,
        _ => StatusCode::OK,
    };
    (status, Json(response))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let available = state.health_check().await;
    Json(json!({
        "status": "ok",
        "provider": state.provider_name(),
        "provider_available": available
    }))
}

pub async fn search(State(state): State<AppState>, Json(request): Json<SearchRequest>) -> Reply {
    reply(state.search(&request.query, request.search_type).await)
}

pub async fn weather(State(state): State<AppState>, Json(params): Json<WeatherParams>) -> Reply {
    reply(state.get_weather_forecast(&params.location, params.days).await)
}

pub async fn prices(State(state): State<AppState>, Json(params): Json<PriceParams>) -> Reply {
    reply(
        state
            .get_market_prices(&params.commodity, params.market.as_deref())
            .await,
    )
}

pub async fn news(State(state): State<AppState>, Json(params): Json<NewsParams>) -> Reply {
    reply(
        state
            .get_agricultural_news(params.topic.as_deref(), params.region.as_deref())
            .await,
    )
}

pub async fn alerts(State(state): State<AppState>, Json(params): Json<AlertParams>) -> Reply {
    reply(
        state
            .get_pest_disease_alerts(&params.region, &params.crops)
            .await,
    )
}
