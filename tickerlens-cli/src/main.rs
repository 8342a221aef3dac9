//! TickerLens CLI: price rows with technical indicators, as JSON.
//!
//! Commands:
//! - `data`: load a stock, apply the indicators named in `--params`, print rows
//! - `tickers`: list the stock names the configured loader can resolve
//!
//! Logs go to stderr (`RUST_LOG`, default `info`); stdout carries only JSON.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tickerlens_runner::{DataService, ServiceConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tickerlens",
    about = "TickerLens CLI: stock prices enriched with technical indicators"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a stock and print its rows with the requested indicators.
    Data {
        /// Stock display name (e.g., Palantir, Nvidia, Paypal).
        #[arg(long)]
        stock: String,

        /// Indicator parameters as a JSON object, e.g. '{"MA": 20, "RSI": 14}'.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Path to a TOML service config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory with `{CODE}_raw.csv` files. Overrides the config file.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Where to write the processed CSV. Overrides the config file.
        #[arg(long)]
        artifact: Option<PathBuf>,

        /// Skip writing the processed CSV.
        #[arg(long, default_value_t = false, conflicts_with = "artifact")]
        no_artifact: bool,

        /// Pretty-print the JSON output.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// List known stock names.
    Tickers {
        /// Path to a TOML service config.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Data {
            stock,
            params,
            config,
            data_dir,
            artifact,
            no_artifact,
            pretty,
        } => run_data(&stock, &params, config, data_dir, artifact, no_artifact, pretty),
        Commands::Tickers { config } => run_tickers(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<ServiceConfig> {
    match path {
        Some(path) => ServiceConfig::load(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ServiceConfig::default()),
    }
}

fn run_data(
    stock: &str,
    params: &str,
    config: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    artifact: Option<PathBuf>,
    no_artifact: bool,
    pretty: bool,
) -> Result<()> {
    let mut config = load_config(config)?;
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    if let Some(path) = artifact {
        config.artifact_path = path;
        config.write_artifact = true;
    }
    if no_artifact {
        config.write_artifact = false;
    }
    debug!(?config, "effective service config");

    let service = DataService::from_config(&config);
    let rows = service
        .fetch(stock, params)
        .map_err(|e| {
            let kind = e.kind();
            anyhow::Error::new(e).context(format!("[{kind:?}] request for '{stock}' failed"))
        })?;

    let json = if pretty {
        serde_json::to_string_pretty(&rows)
    } else {
        serde_json::to_string(&rows)
    }
    .context("failed to serialize rows")?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").context("failed to write to stdout")?;
    Ok(())
}

fn run_tickers(config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    let service = DataService::from_config(&config);

    let mut stdout = std::io::stdout().lock();
    for name in service.tickers() {
        writeln!(stdout, "{name}").context("failed to write to stdout")?;
    }
    Ok(())
}
