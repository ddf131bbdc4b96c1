#![allow(non_snake_case)]

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::process;
use std::sync::Arc;

use availabilityGrid::cli;
use availabilityGrid::clients::schedule_source_client::ScheduleSourceClient;
use availabilityGrid::config::{
    AppConfig, DEFAULT_HOST, DEFAULT_PORT, GridSettings, ScheduleSourceConfig,
};
use availabilityGrid::handlers::state::AppState;
use availabilityGrid::runtime;
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_RUN_MODE: &str = "cli";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => match AppConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("Unable to read config file {}", e);
                process::exit(1);
            }
        },
        Err(_) => AppConfig::default(),
    };

    let get_prop = |key: &str| -> Option<String> {
        config.get(key).or_else(|| env::var(key).ok())
    };

    let run_mode = get_prop("RUN_MODE").unwrap_or(DEFAULT_RUN_MODE.to_string());
    let args = match run_mode.as_str() {
        "api" => None,
        "cli" => Some(cli::parse_args()),
        _ => {
            error!("Invalid run mode {}", run_mode);
            process::exit(1);
        }
    };

    let settings = GridSettings::from_lookup(get_prop).unwrap_or_else(|e| {
        error!("Invalid grid settings: {}", e);
        process::exit(1);
    });
    let source = ScheduleSourceConfig::from_lookup(get_prop).unwrap_or_else(|e| {
        error!("Schedule source is not configured: {}", e);
        process::exit(1);
    });
    let provider = Arc::new(ScheduleSourceClient::new(source));

    if let Some(args) = args {
        cli::run(args, provider.as_ref(), settings).await;
        return;
    }

    let host = get_prop("HOST").unwrap_or(DEFAULT_HOST.to_string());
    let port = get_prop("PORT")
        .map(|p| p.parse::<u16>())
        .transpose()
        .unwrap_or_else(|e| {
            error!("PORT must be a number: {}", e);
            process::exit(1);
        })
        .unwrap_or(DEFAULT_PORT);
    let ip: IpAddr = host.parse().unwrap_or_else(|e| {
        error!("HOST must be an IP address: {}", e);
        process::exit(1);
    });
    runtime::run_api(AppState::new(provider, settings), SocketAddr::new(ip, port)).await;
}
