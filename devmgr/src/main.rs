//! Device Manager - Entry Point
//!
//! Serves the device inventory API until SIGINT/SIGTERM.

use std::collections::HashMap;
use std::env;

use anyhow::Context;
use devmgr::app::options::AppOptions;
use devmgr::app::run::run;
use devmgr::filesys::file::File;
use devmgr::logs::{init_logging, LogLevel, LogOptions};
use devmgr::storage::layout::StorageLayout;
use devmgr::storage::settings::Settings;
use devmgr::utils::version_info;

use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // --key=value
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to render version info: {e}"),
        }
        return;
    }

    if let Err(e) = start(&cli_args).await {
        error!("{:#}", e);
        eprintln!("devmgr: {:#}", e);
        std::process::exit(1);
    }
}

async fn start(cli_args: &HashMap<String, String>) -> anyhow::Result<()> {
    let layout = StorageLayout::default();

    let settings = load_settings(cli_args, &layout).await?;

    let log_level = match cli_args.get("log-level") {
        Some(level) => level.parse::<LogLevel>().map_err(anyhow::Error::msg)?,
        None => settings.log_level,
    };
    let log_dir = if settings.log_to_file {
        let dir = layout.logs_dir();
        dir.create().await.context("failed to create logs directory")?;
        Some(dir.path().to_path_buf())
    } else {
        None
    };
    let log_options = LogOptions {
        log_level,
        json_format: settings.log_json,
        log_dir,
    };
    let _log_guard = init_logging(log_options).context("failed to initialize logging")?;

    let mut options = AppOptions::from_settings(&settings, &layout);
    if let Some(host) = cli_args.get("host") {
        options.server.host = host.clone();
    }
    if let Some(port) = cli_args.get("port") {
        options.server.port = port
            .parse()
            .with_context(|| format!("invalid --port value: {}", port))?;
    }

    info!("Running device manager with options: {:?}", options);
    run(options, await_shutdown_signal())
        .await
        .context("device manager stopped with an error")
}

/// Read the settings file named by `--config`, or the layout default
///
/// A missing default file means default settings; a missing explicit file is
/// an error.
async fn load_settings(
    cli_args: &HashMap<String, String>,
    layout: &StorageLayout,
) -> anyhow::Result<Settings> {
    let (settings_file, explicit) = match cli_args.get("config") {
        Some(path) => (File::new(path), true),
        None => (layout.settings_file(), false),
    };

    if !explicit && !settings_file.exists().await {
        return Ok(Settings::default());
    }

    settings_file
        .read_json::<Settings>()
        .await
        .with_context(|| {
            format!(
                "unable to read settings file {}",
                settings_file.path().display()
            )
        })
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
            _ => {
                error!("Failed to install signal handlers, falling back to Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
        info!("Ctrl+C received, shutting down...");
    }
}
