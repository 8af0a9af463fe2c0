//! Stand-in for the weather service, for running the caller locally.

use std::net::SocketAddr;
use std::process::ExitCode;

use axum::{Router, extract::State, routing::get};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "127.0.0.1:3001")]
    listen_address: SocketAddr,

    #[arg(short, long, default_value = "Sunny, 25C")]
    forecast: String,
}

async fn get_forecast(State(forecast): State<String>) -> String {
    log::info!("Got forecast request");
    forecast
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let app = Router::new()
        .route("/WeatherForecast", get(get_forecast))
        .with_state(args.forecast);

    log::info!("listening on {}", args.listen_address);
    match axum_server::bind(args.listen_address)
        .serve(app.into_make_service())
        .await
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("Failed to serve on {} ({})", args.listen_address, err);
            ExitCode::FAILURE
        }
    }
}
