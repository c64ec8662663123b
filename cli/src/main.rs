/*!

This is the command line interface for sharing clusters and cluster overrides between projects.
Each subcommand applies, reads or deletes one sharing document and records what it applied in a
local state file.

!*/

mod cluster;
mod cluster_override;
mod lifecycle;
mod single;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use sharing_agent::clients::RestClient;
use sharing_agent::BootstrapData;
use sharing_model::constants::DEFAULT_OPERATION_TIMEOUT;
use std::time::Duration;

/// The command line interface for sharing platform resources between projects.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// Set logging verbosity [trace|debug|info|warn|error]. If the environment variable `RUST_LOG`
    /// is present, it overrides the default logging behavior. See https://docs.rs/env_logger/latest
    #[clap(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
    /// Path to the provider config file. Also can be passed with the RAFAY_PROVIDER_CONFIG
    /// environment variable. Defaults to ~/.rafay/cli/config.json.
    #[clap(long = "config")]
    config: Option<String>,
    /// Do not verify the platform's TLS certificate.
    #[clap(long = "ignore-insecure-tls-error")]
    ignore_insecure_tls_error: bool,
    /// Make every call as this user, using the user's API key.
    #[clap(long = "as-user")]
    as_user: Option<String>,
    /// Give up on the operation after this many seconds.
    #[clap(long = "timeout-secs", default_value_t = DEFAULT_OPERATION_TIMEOUT.as_secs())]
    timeout_secs: u64,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Parser)]
enum Command {
    /// Share a cluster with all projects or with a list of projects.
    Cluster(cluster::Cluster),
    /// Share a cluster override with all projects or with a list of projects.
    Override(cluster_override::Override),
    /// Share a cluster with one project, moving it when the project changes.
    Single(single::Single),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logger(args.log_level);
    let timeout = Duration::from_secs(args.timeout_secs);
    let result = match tokio::time::timeout(timeout, run(args)).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "Operation timed out after {} seconds",
            timeout.as_secs()
        )),
    };
    if let Err(e) = result {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let data = BootstrapData::from_config_path(args.config.as_deref())
        .context("Unable to load the provider config")?
        .ignore_insecure_tls_error(args.ignore_insecure_tls_error)
        .as_user(args.as_user)
        .user_agent(concat!("sharectl/", env!("CARGO_PKG_VERSION")));
    let client = RestClient::new(&data).await.context(format!(
        "Unable to create a client for '{}'",
        data.config.rest_endpoint
    ))?;
    match args.command {
        Command::Cluster(cluster) => cluster.run(client).await,
        Command::Override(cluster_override) => cluster_override.run(client).await,
        Command::Single(single) => single.run(client).await,
    }
}

/// Initialize the logger with the value passed by `--log-level` (or its default) when the
/// `RUST_LOG` environment variable is not present. If present, the `RUST_LOG` environment variable
/// overrides `--log-level`/`level`.
fn init_logger(level: LevelFilter) {
    match std::env::var(env_logger::DEFAULT_FILTER_ENV).ok() {
        Some(_) => {
            // RUST_LOG exists; env_logger will use it.
            Builder::from_default_env().init();
        }
        None => {
            // RUST_LOG does not exist; use the level for this program and its libraries only.
            Builder::new()
                .filter(Some(env!("CARGO_CRATE_NAME")), level)
                .filter(Some("sharing_agent"), level)
                .filter(Some("sharing_model"), level)
                .init();
        }
    }
}
