use std::fs::read_to_string;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use reqwest::Url;
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_WEATHER_URL: &str = "http://weather-service/WeatherForecast";
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:3000";
// Same as the default HttpClient timeout of the service this one replaces.
pub const DEFAULT_TIMEOUT_SECS: u64 = 100;

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Optional TOML file, overridden by flags and environment.
    #[arg(long, env = "CALLER_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(short, long, env = "LISTEN_ADDRESS")]
    pub listen_address: Option<String>,

    #[arg(short, long, env = "WEATHER_URL")]
    pub weather_url: Option<String>,

    #[arg(short, long, env = "WEATHER_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    #[arg(short, long, env = "KEY_FILE_PATH")]
    pub key_file_path: Option<String>,

    #[arg(short, long, env = "CERT_FILE_PATH")]
    pub cert_file_path: Option<String>,
}

#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub listen_address: Option<String>,
    pub weather_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub key_file_path: Option<String>,
    pub cert_file_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TlsConfig {
    pub key_file_path: String,
    pub cert_file_path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub listen_address: SocketAddr,
    pub weather_url: Url,
    pub timeout: Duration,
    pub tls: Option<TlsConfig>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<FileConfig, ConfigError> {
        let display = path.display().to_string();
        let content = read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }
}

impl Config {
    pub fn from_args(args: Args) -> Result<Config, ConfigError> {
        let file = match &args.config {
            Some(path) => {
                log::info!("reading config from {}", path.display());
                FileConfig::load(path)?
            }
            None => FileConfig::default(),
        };
        Config::merge(args, file)
    }

    /// Flags and environment win over the file, the file wins over defaults.
    pub fn merge(args: Args, file: FileConfig) -> Result<Config, ConfigError> {
        let listen_address = args
            .listen_address
            .or(file.listen_address)
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDRESS.to_string());
        let listen_address = listen_address
            .parse()
            .map_err(|_| ConfigError::ListenAddress(listen_address))?;

        let weather_url = parse_weather_url(
            &args
                .weather_url
                .or(file.weather_url)
                .unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string()),
        )?;

        let timeout_secs = args
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::Timeout);
        }

        let tls = match (
            args.key_file_path.or(file.key_file_path),
            args.cert_file_path.or(file.cert_file_path),
        ) {
            (Some(key_file_path), Some(cert_file_path)) => Some(TlsConfig {
                key_file_path,
                cert_file_path,
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        Ok(Config {
            listen_address,
            weather_url,
            timeout: Duration::from_secs(timeout_secs),
            tls,
        })
    }
}

fn parse_weather_url(url: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::WeatherUrl {
        url: url.to_string(),
        reason,
    };
    let parsed = Url::parse(url).map_err(|err| invalid(err.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(invalid(format!("unsupported scheme {scheme}"))),
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(parsed)
}
