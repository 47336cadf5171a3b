use crate::server::handlers::{alerts, health, news, prices, search, weather};
use crate::server::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search", post(search))
        .route("/weather", post(weather))
        .route("/prices", post(prices))
        .route("/news", post(news))
        .route("/alerts", post(alerts))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
