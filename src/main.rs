use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use gustwatch::report::{DisplayReport, OutcomeReport};
use gustwatch::{GustError, GustWatchConfig, Monitor, web};

/// Wind gust monitor for the configured properties
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to load from (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch gusts for a property name or postcode and print the dashboard
    Check {
        /// Property name or UK postcode
        property: String,
    },
    /// List the monitored properties
    Properties,
    /// Serve the Met Office proxy and the JSON dashboard API
    Serve {
        /// Port to listen on, overriding the configuration
        #[arg(long)]
        port: Option<u16>,
    },
}

fn init_tracing(config: &GustWatchConfig, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gustwatch={level},tower_http={level},warn")));

    // Logs go to stderr so reports on stdout stay clean
    let fmt_layer = match config.logging.format.as_str() {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

async fn check(config: &GustWatchConfig, property: &str) -> Result<ExitCode> {
    let monitor = Monitor::from_config(config).context("Failed to set up clients")?;

    match monitor.search(property).await {
        Ok(outcome) => {
            print!("{}", OutcomeReport(&outcome));
            Ok(ExitCode::SUCCESS)
        }
        Err(GustError::Superseded) => Ok(ExitCode::FAILURE),
        Err(_) => {
            let state = monitor.display().await;
            print!(
                "{}",
                DisplayReport {
                    state: &state,
                    horizon: config.monitor.forecast_horizon,
                }
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

fn list_properties(config: &GustWatchConfig) {
    for property in &config.properties {
        match &property.forecast_location {
            Some(location) => println!(
                "{} ({}), forecast for {}",
                property.name, property.postcode, location
            ),
            None => println!("{} ({})", property.name, property.postcode),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let mut config =
        GustWatchConfig::load_from_path(args.config).context("Failed to load configuration")?;
    init_tracing(&config, args.verbose);

    match args.command {
        Command::Check { property } => check(&config, &property).await,
        Command::Properties => {
            list_properties(&config);
            Ok(ExitCode::SUCCESS)
        }
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
                config.validate()?;
            }
            web::run(&config).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
