use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::routes::call_weather;
use crate::weather_client::WeatherClient;

// Anything that goes in here must be a handle or pointer that can be cloned.
// The underlying state itself should be shared.
#[derive(Clone)]
pub struct AppState {
    pub weather: WeatherClient,
}

impl AppState {
    pub fn new(weather: WeatherClient) -> AppState {
        AppState { weather }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/CallWeather", get(call_weather::get_weather))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
