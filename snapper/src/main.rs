mod capture;
mod listener;

use capture::SnapshotCapturer;
use listener::Trigger;
use std::path::PathBuf;
use timelapse_common::config::Config;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Built-in defaults target a printer on localhost; a TOML path overrides them.
    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(config_path) => match Config::load(&config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config from {}: {e}", config_path.display());
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.parse().unwrap_or_default()),
        )
        .init();

    let websocket_url = config.websocket_url();
    let snapshot_url = config.snapshot_url();
    let base_dir = &config.snapshot.base_dir;

    info!(
        websocket_url,
        snapshot_url,
        base_dir = %base_dir.display(),
        marker = config.trigger.marker,
        timeout_secs = config.snapshot.timeout_secs,
        "starting timelapse snapper"
    );

    if let Err(e) = capture::ensure_base_dir(base_dir).await {
        error!(error = %e, path = %base_dir.display(), "failed to create frame directory");
        std::process::exit(1);
    }

    let capturer = match SnapshotCapturer::new(&snapshot_url, base_dir, config.snapshot_timeout())
    {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "failed to set up snapshot capturer");
            std::process::exit(1);
        }
    };
    let trigger = Trigger::new(&config.trigger.marker);

    let channel = match listener::connect(&websocket_url).await {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "failed to connect to control channel");
            std::process::exit(1);
        }
    };

    // No reconnect: a dropped channel ends the process and the supervisor restarts it.
    tokio::select! {
        result = listener::run(channel, &trigger, &capturer) => match result {
            Ok(()) => info!("control channel closed, exiting"),
            Err(e) => {
                error!(error = %e, "control channel failed, exiting");
                std::process::exit(1);
            }
        },
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, exiting");
        }
    }
}
