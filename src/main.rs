use std::process::ExitCode;
use std::time::Duration;

use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;

use app::{AppState, create_app};
use config::{Args, Config};
use error::StartupError;
use weather_client::{WeatherClient, build_http_client};

mod app;
mod config;
mod error;
mod routes;
mod weather_client;

const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", error_chain(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), StartupError> {
    let config = Config::from_args(args)?;

    let client = build_http_client(config.timeout).map_err(StartupError::HttpClient)?;
    let weather = WeatherClient::new(client, config.weather_url);
    log::info!(
        "forwarding to {} with a {}s timeout",
        weather.forecast_url(),
        config.timeout.as_secs()
    );
    let app = create_app(AppState::new(weather));

    let handle = Handle::new();
    // Registered before binding so a SIGTERM right after startup is not lost.
    let terminate = terminate_signal()?;
    tokio::spawn(shutdown_on_signal(handle.clone(), terminate));

    let addr = config.listen_address;
    log::info!("listening on {}", addr);
    if let Some(tls) = config.tls {
        log::info!(
            "using tls with key file {} and cert file {}",
            tls.key_file_path,
            tls.cert_file_path
        );
        let rustls_config = RustlsConfig::from_pem_file(&tls.cert_file_path, &tls.key_file_path)
            .await
            .map_err(|source| StartupError::Tls {
                cert_file_path: tls.cert_file_path.clone(),
                key_file_path: tls.key_file_path.clone(),
                source,
            })?;
        axum_server::bind_rustls(addr, rustls_config)
            .handle(handle)
            .serve(app.into_make_service())
            .await?;
    } else {
        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await?;
    }
    log::info!("server stopped");
    Ok(())
}

#[cfg(unix)]
fn terminate_signal() -> Result<impl Future<Output = ()>, StartupError> {
    let mut signal = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .map_err(StartupError::Signal)?;
    Ok(async move {
        signal.recv().await;
    })
}

#[cfg(not(unix))]
fn terminate_signal() -> Result<impl Future<Output = ()>, StartupError> {
    Ok(std::future::pending::<()>())
}

async fn shutdown_on_signal(handle: Handle, terminate: impl Future<Output = ()>) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::warn!("could not listen for ctrl-c: {}", err);
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutting down");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE_PERIOD));
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
