use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use thiserror::Error;

/// The downstream weather service could not produce a forecast.
///
/// Connect failures, timeouts, non-success statuses and body read errors all
/// end up here; callers only ever see a 502.
#[derive(Debug, Error)]
#[error("call to weather service at {url} failed: {source}")]
pub struct WeatherError {
    pub url: String,
    #[source]
    pub source: reqwest::Error,
}

impl WeatherError {
    pub fn new(url: impl Into<String>, source: reqwest::Error) -> WeatherError {
        WeatherError {
            url: url.into(),
            source,
        }
    }
}

impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        error!("Error encountered while processing request: {}", self);
        (StatusCode::BAD_GATEWAY, "weather service unavailable").into_response()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid weather url {url:?}: {reason}")]
    WeatherUrl { url: String, reason: String },
    #[error("invalid listen address {0:?}")]
    ListenAddress(String),
    #[error("timeout must be at least one second")]
    Timeout,
    #[error("tls needs both a key file and a cert file")]
    IncompleteTls,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not build http client")]
    HttpClient(#[source] reqwest::Error),
    #[error("could not load tls certificate {cert_file_path} / key {key_file_path}")]
    Tls {
        cert_file_path: String,
        key_file_path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not listen for SIGTERM")]
    Signal(#[source] std::io::Error),
    #[error("server failed")]
    Serve(#[from] std::io::Error),
}
