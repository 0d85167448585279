//! httpstat-probe
//!
//! Probes the fixed `/200` and `/503` endpoints of an httpstat-style service
//! and reports what came back.
//!
//! ```text
//!   CLI args ──▶ config (file + overrides) ──▶ transport::from_config
//!                                                   │
//!                                                   ▼
//!   stdout ◀── ProbeReport ◀── Checker ◀── HttpstatApi::probe(endpoint, handler)
//! ```
//!
//! Exit status is 0 when every probe completed at the transport level,
//! whatever the status codes were, and 1 otherwise.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use httpstat_probe::config::{load_config, validate_config, ConfigError, ProbeConfig, TransportKind};
use httpstat_probe::observability::init_logging;
use httpstat_probe::{Checker, Endpoint, HttpstatApi};

#[derive(Parser)]
#[command(name = "httpstat-probe")]
#[command(about = "Probe the /200 and /503 endpoints of an httpstat-style service", long_about = None)]
struct Cli {
    /// TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL override (absolute, no trailing slash).
    #[arg(short = 'u', long)]
    base_url: Option<String>,

    /// Transport override.
    #[arg(short, long, value_enum)]
    transport: Option<TransportKind>,

    /// Print reports as a JSON array.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe GET /200
    #[command(name = "get200")]
    Get200,
    /// Probe GET /503
    #[command(name = "get503")]
    Get503,
    /// Probe both endpoints concurrently
    All,
}

impl Commands {
    fn endpoints(&self) -> &'static [Endpoint] {
        match self {
            Commands::Get200 => &[Endpoint::Ok],
            Commands::Get503 => &[Endpoint::ServiceUnavailable],
            Commands::All => &Endpoint::ALL,
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<ProbeConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProbeConfig::default(),
    };

    if let Some(base_url) = &cli.base_url {
        config.client.base_url = base_url.clone();
    }
    if let Some(transport) = cli.transport {
        config.client.transport = transport;
    }

    // Overrides bypass the loader, so check again
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    init_logging(&config.observability);

    tracing::info!(
        base_url = %config.client.base_url,
        transport = ?config.client.transport,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let api = HttpstatApi::from_config(&config)?;
    let checker = Checker::new(api);

    let endpoints = cli.command.endpoints();
    let reports = checker.run(endpoints).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{}", report);
        }
    }

    let all_reachable = reports.len() == endpoints.len() && reports.iter().all(|r| r.is_reachable());
    if all_reachable {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
