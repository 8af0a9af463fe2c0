use std::net::TcpListener;
use std::process::{Child, Command};
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};

const STARTUP_TIMEOUT: Duration = Duration::from_secs(20);

/// A local address nothing listens on at the time of the call.
fn free_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Could not bind ephemeral port");
    listener
        .local_addr()
        .expect("Listener has an address")
        .to_string()
}

struct TestProcess {
    process: Child,
}

impl TestProcess {
    async fn spawn(executable: &str, args: &[&str], probe_url: &str) -> Self {
        let server = TestProcess {
            process: Command::new(executable)
                .args(args)
                .spawn()
                .expect("Could not start process"),
        };
        let started = Instant::now();
        while Client::new().get(probe_url).send().await.is_err() {
            assert!(
                started.elapsed() < STARTUP_TIMEOUT,
                "{executable} did not start listening"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        server
    }

    async fn caller(listen_address: &str, weather_url: &str) -> Self {
        TestProcess::spawn(
            env!("CARGO_BIN_EXE_caller-service"),
            &[
                "--listen-address",
                listen_address,
                "--weather-url",
                weather_url,
                "--timeout-secs",
                "5",
            ],
            &format!("http://{listen_address}/"),
        )
        .await
    }

    async fn fake_weather(listen_address: &str, forecast: &str) -> Self {
        TestProcess::spawn(
            env!("CARGO_BIN_EXE_fakeweather"),
            &["--listen-address", listen_address, "--forecast", forecast],
            &format!("http://{listen_address}/WeatherForecast"),
        )
        .await
    }
}

impl Drop for TestProcess {
    fn drop(&mut self) {
        self.process.kill().expect("Failed to send kill signal");
        self.process.wait().expect("Process failed to stop");
    }
}

#[tokio::test]
async fn relays_forecast_from_fake_weather_service() {
    let weather_address = free_address();
    let caller_address = free_address();
    let _weather = TestProcess::fake_weather(&weather_address, "Hail, -3C").await;
    let _caller = TestProcess::caller(
        &caller_address,
        &format!("http://{weather_address}/WeatherForecast"),
    )
    .await;

    let res = Client::new()
        .get(format!("http://{caller_address}/CallWeather"))
        .send()
        .await
        .expect("Could not send request");

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "Hail, -3C");
}

#[tokio::test]
async fn unreachable_weather_service_is_not_ok() {
    let weather_address = free_address();
    let caller_address = free_address();
    let _caller = TestProcess::caller(
        &caller_address,
        &format!("http://{weather_address}/WeatherForecast"),
    )
    .await;

    let res = Client::new()
        .get(format!("http://{caller_address}/CallWeather"))
        .send()
        .await
        .expect("Could not send request");

    assert_ne!(res.status(), StatusCode::OK);
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
}

#[test]
fn invalid_weather_url_fails_startup() {
    let status = Command::new(env!("CARGO_BIN_EXE_caller-service"))
        .args([
            "--listen-address",
            free_address().as_str(),
            "--weather-url",
            "not a url",
        ])
        .status()
        .expect("Could not start process");

    assert!(!status.success());
}

#[cfg(unix)]
#[test]
fn stops_on_sigterm() {
    let address = free_address();
    let mut process = Command::new(env!("CARGO_BIN_EXE_caller-service"))
        .args(["--listen-address", address.as_str()])
        .spawn()
        .expect("Could not start process");

    let started = Instant::now();
    while std::net::TcpStream::connect(&address).is_err() {
        assert!(started.elapsed() < STARTUP_TIMEOUT, "caller did not start listening");
        std::thread::sleep(Duration::from_millis(10));
    }

    Command::new("kill")
        .args(["-s", "TERM", &process.id().to_string()])
        .status()
        .expect("Failed to send signal");

    let status = process.wait().expect("caller failed to stop");
    assert!(status.success());
}
