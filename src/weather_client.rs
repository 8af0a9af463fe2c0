use std::time::Duration;

use log::debug;
use reqwest::{Client, Url};

use crate::error::WeatherError;

pub fn build_http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).build()
}

/// Handle to the downstream weather service.
///
/// Wraps a client built once at startup; cloning shares its connection pool.
#[derive(Clone, Debug)]
pub struct WeatherClient {
    client: Client,
    forecast_url: Url,
}

impl WeatherClient {
    pub fn new(client: Client, forecast_url: Url) -> WeatherClient {
        WeatherClient {
            client,
            forecast_url,
        }
    }

    pub fn forecast_url(&self) -> &Url {
        &self.forecast_url
    }

    /// Issues a single GET to the forecast url and returns the body as text.
    ///
    /// A non-success status counts as a failure, the body of such a response
    /// is discarded.
    pub async fn fetch_forecast(&self) -> Result<String, WeatherError> {
        let url = self.forecast_url.as_str();
        debug!("Fetching forecast from {}", url);
        let response = self
            .client
            .get(self.forecast_url.clone())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| WeatherError::new(url, err))?;
        let body = response
            .text()
            .await
            .map_err(|err| WeatherError::new(url, err))?;
        debug!("Weather service answered with {} bytes", body.len());
        Ok(body)
    }
}
