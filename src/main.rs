// src/main.rs
use std::process::ExitCode;

use polls::config::Config;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    polls::init_tracing();

    let config = Config::load();
    info!(port = config.port, "Starting polls server...");

    match polls::start_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server failed: {e}");
            ExitCode::FAILURE
        }
    }
}
