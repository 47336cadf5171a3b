use agri_web_search::config::ServiceConfig;
use agri_web_search::domain::model::SearchType;
use agri_web_search::domain::ports::KnowledgeProvider;
use agri_web_search::utils::{logger, validation::Validate};
use agri_web_search::{ExternalSearch, PerplexityClient, SearchResponse};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Deserialize;
use std::sync::Arc;

type Search = ExternalSearch<Arc<dyn KnowledgeProvider>, ServiceConfig>;

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Request {
    Search {
        query: String,
        #[serde(default)]
        search_type: SearchType,
    },
    Weather {
        location: String,
        days: Option<u32>,
    },
    Prices {
        commodity: String,
        market: Option<String>,
    },
    News {
        topic: Option<String>,
        region: Option<String>,
    },
    Alerts {
        region: String,
        #[serde(default)]
        crops: Vec<String>,
    },
}

async fn function_handler(
    search: Arc<Search>,
    event: LambdaEvent<Request>,
) -> Result<SearchResponse, Error> {
    tracing::info!(request_id = %event.context.request_id, "Handling web search invocation");

    let response = match event.payload {
        Request::Search { query, search_type } => search.search(&query, search_type).await,
        Request::Weather { location, days } => search.get_weather_forecast(&location, days).await,
        Request::Prices { commodity, market } => {
            search.get_market_prices(&commodity, market.as_deref()).await
        }
        Request::News { topic, region } => {
            search
                .get_agricultural_news(topic.as_deref(), region.as_deref())
                .await
        }
        Request::Alerts { region, crops } => search.get_pest_disease_alerts(&region, &crops).await,
    };

    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_json_logger(false);

    let config = ServiceConfig::from_env()?;
    config.validate()?;

    let provider: Arc<dyn KnowledgeProvider> = Arc::new(PerplexityClient::new(&config.perplexity)?);
    let search = Arc::new(ExternalSearch::new(provider, config)?);

    run(service_fn(move |event: LambdaEvent<Request>| {
        let search = search.clone();
        async move { function_handler(search, event).await }
    }))
    .await
}
