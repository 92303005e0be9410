//! Exposes the command line application.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use netainfo_service::aggregation::AggregationKey;
use netainfo_service::config::Config;
use netainfo_service::metrics;
use netainfo_service::service::DashboardService;

use crate::endpoints::ChartsResponse;
use crate::healthcheck;
use crate::logging;
use crate::server;

/// netainfo commands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Run the web server.
    Run,

    /// Print the chart figures for one filter selection as JSON.
    Aggregate {
        /// The election year.
        #[arg(long)]
        year: String,

        /// The grouping dimension, `State` or `Party`.
        #[arg(long, default_value = "State")]
        dimension: String,

        /// The result filter, `Winners` (`Yes`), `Losers` (`No`) or `All`.
        #[arg(long, default_value = "All")]
        result: String,

        /// Reads candidates from this CSV file instead of the configured dataset.
        #[arg(long, value_name = "FILE")]
        dataset: Option<PathBuf>,
    },

    /// Check the health of a running server.
    Healthcheck {
        /// The address of the server, defaults to the configured `bind` address.
        #[arg(long)]
        addr: Option<SocketAddr>,

        /// Request timeout in seconds.
        #[arg(long, default_value_t = 10)]
        timeout: u64,
    },
}

/// Command line interface parser.
#[derive(Debug, Parser)]
#[command(bin_name = "netainfo", version, about)]
struct Cli {
    /// Path to your configuration file.
    #[arg(long, short, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// Returns the path to the configuration file.
    fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }
}

/// Runs the main application.
pub fn execute() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::get(cli.config()).context("failed loading config")?;

    let _sentry = sentry::init(sentry::ClientOptions {
        dsn: config.sentry_dsn.clone(),
        release: sentry::release_name!(),
        ..Default::default()
    });

    // SAFETY: This is called at the very beginning, before any other threads are spawned.
    unsafe { logging::init_logging(&config) };

    if let Some(ref statsd) = config.metrics.statsd {
        let mut tags = config.metrics.custom_tags.clone();
        if let Some(ref tag) = config.metrics.hostname_tag {
            if let Some(hostname) = hostname::get().ok().and_then(|s| s.into_string().ok()) {
                tags.insert(tag.clone(), hostname);
            }
        }
        metrics::configure_statsd(&config.metrics.prefix, statsd.as_str(), tags)
            .context("failed to configure statsd")?;
    }

    match cli.command {
        Command::Run => server::run(config)?,
        Command::Aggregate {
            year,
            dimension,
            result,
            dataset,
        } => {
            if let Some(dataset) = dataset {
                config.dataset = dataset;
            }
            let key = AggregationKey::parse(&year, &dimension, &result)?;
            aggregate(&config, key)?;
        }
        Command::Healthcheck { addr, timeout } => {
            healthcheck::healthcheck(&config, addr, timeout)?
        }
    }

    Ok(())
}

/// Computes the figures for `key` and prints them to stdout.
fn aggregate(config: &Config, key: AggregationKey) -> Result<()> {
    let service = DashboardService::create(config).context("failed to load dataset")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let figures = runtime.block_on(service.on_filters_changed(key));

    let response = ChartsResponse { key, figures };
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
