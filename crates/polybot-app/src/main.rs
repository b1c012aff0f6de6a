// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Polybot — caption-driven grayscale image filters and object detection
//
// Entry point. Initialises logging, loads configuration, and runs one request
// from the command line.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use polybot_core::error::{PolybotError, Result};
use polybot_core::human_errors::humanize_error;
use polybot_detect::{DetectionClient, summarize_objects};

use polybot_app::services::config_dir::load_config;
use polybot_app::services::dispatch::{Dispatcher, ProcessRequest};

#[derive(Debug, Parser)]
#[command(name = "polybot", version, about = "Caption-driven image filters")]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/polybot/config.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Filter a photo according to its caption.
    Process {
        /// Photo to filter.
        image: PathBuf,
        /// Instruction, e.g. "blur", "rotate", "salt and pepper".
        #[arg(long)]
        caption: Option<String>,
        /// Second photo for `concat`.
        #[arg(long = "with")]
        companion: Option<PathBuf>,
    },
    /// Ask the detection service for objects in a stored image.
    Detect {
        /// Image name as known to the detection service.
        img_name: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Polybot starting");

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "request failed");
            eprintln!("{}", humanize_error(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Process {
            image,
            caption,
            companion,
        } => {
            let dispatcher = Dispatcher::new(config);
            let request = ProcessRequest {
                image,
                caption,
                companion,
            };
            // Filters are CPU-bound; keep them off the async workers.
            let output = tokio::task::spawn_blocking(move || dispatcher.handle(&request))
                .await
                .map_err(|e| PolybotError::Io(std::io::Error::other(e)))??;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                for path in output.paths() {
                    println!("{}", path.display());
                }
            }
        }
        Command::Detect { img_name } => {
            let client = DetectionClient::from_config(&config.detection)?;
            let summary = client.predict(&img_name).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summarize_objects(&summary.labels));
            }
        }
    }
    Ok(())
}
