use std::process::ExitCode;

use slabfinder::config::{self, SlabFinderConfig};
use slabfinder::error::{ErrorContext, SlabError};
use slabfinder::logging;
use slabfinder::shutdown::ShutdownCoordinator;
use slabfinder::vendors::{cosmos, stonebasyx};
use slabfinder::SlabWatcher;
use tracing::{error, info};

const INIT_CONFIG_FLAG: &str = "--init-config";

/// Write a config file with every default spelled out, keeping any
/// values already set
fn init_config() -> Result<(), SlabError> {
    let mut current = config::load_config()?;
    let defaults = SlabFinderConfig {
        snapshot_path: Some(current.snapshot_path()?.display().to_string()),
        webhook_file: Some(current.webhook_file()?.display().to_string()),
        poll_interval_secs: Some(current.poll_interval().as_secs()),
        min_length: Some(current.min_length()),
        request_timeout_secs: Some(current.request_timeout().as_secs()),
        retention_days: current.retention_days,
        notify_username: Some(current.notify_username().to_string()),
        stonebasyx_pages: Some(
            current
                .stonebasyx_pages
                .take()
                .unwrap_or_else(stonebasyx::default_pages),
        ),
        cosmos_pages: Some(current.cosmos_pages.take().unwrap_or_else(cosmos::default_pages)),
    };
    config::save_config(&defaults).context("Writing default config")?;
    println!("Wrote {}", config::get_config_file_path()?.display());
    Ok(())
}

async fn watch() -> Result<(), SlabError> {
    let config = config::load_config()?;
    let mut watcher = SlabWatcher::from_config(&config)?;

    let shutdown = ShutdownCoordinator::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if signal.is_ok() {
                    info!("Ctrl-C received; finishing current cycle");
                    trigger.shutdown();
                }
            }
            _ = trigger.wait() => {}
        }
    });

    info!(
        interval_secs = watcher.settings().poll_interval.as_secs(),
        min_length = watcher.settings().min_length,
        "Watching vendor inventories"
    );
    watcher.run(&shutdown).await
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = logging::init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = if std::env::args().nth(1).as_deref() == Some(INIT_CONFIG_FLAG) {
        init_config()
    } else {
        watch().await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("slabwatcher: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
