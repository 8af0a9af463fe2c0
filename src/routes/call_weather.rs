use axum::extract::State;

use crate::app::AppState;
use crate::error::WeatherError;

/// `GET /CallWeather`: relays the downstream forecast body as plain text.
pub async fn get_weather(State(state): State<AppState>) -> Result<String, WeatherError> {
    state.weather.fetch_forecast().await
}
