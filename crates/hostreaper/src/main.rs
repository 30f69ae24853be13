//! hostreaper daemon
//!
//! Polls the fleet-management API and pushes hosts whose agent is stuck
//! reconnecting through deactivate, remove and purge.

use std::ffi::OsString;

use clap::Parser;
use color_eyre::Result;
use eyre::WrapErr;
use hostreaper_client::RancherClient;
use hostreaper_core::{Reaper, ReaperConfig};
use tracing::{error, info};

mod logging;

/// Reconnecting host cleanup daemon
///
/// Connection settings come from `CATTLE_URL`, `CATTLE_ACCESS_KEY`,
/// `CATTLE_SECRET_KEY` (or their `RANCHER_*` equivalents),
/// `RANCHER_API_TIMEOUT` and `HOST_REMOVAL_INTERVAL`.
#[derive(Parser, Debug)]
#[command(name = "hostreaper", version, about)]
struct Args {
    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Run a single cleanup cycle and exit
    #[arg(long)]
    once: bool,
}

/// Boolean flags that also accept the single-dash and `-flag=<bool>` forms
const BOOL_FLAGS: &[&str] = &["debug", "once", "json-logs"];

/// Accept single-dash long flags such as `-debug` and `-debug=false`
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter().filter_map(normalize_arg).collect()
}

/// `None` drops a flag that was explicitly set to false
fn normalize_arg(arg: OsString) -> Option<OsString> {
    let text = match arg.into_string() {
        Ok(text) => text,
        Err(arg) => return Some(arg),
    };
    let Some(body) = text.strip_prefix("--").or_else(|| text.strip_prefix('-')) else {
        return Some(text.into());
    };
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };
    if !BOOL_FLAGS.contains(&name) {
        return Some(text.into());
    }

    let enabled = match value {
        None => Some(true),
        Some(value) => parse_bool(value),
    };
    match enabled {
        Some(true) => Some(format!("--{name}").into()),
        Some(false) => None,
        // Left as-is so clap reports it
        None => Some(text.into()),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse_from(normalize_args(std::env::args_os()));
    logging::init(args.debug, args.json_logs)?;

    if let Err(err) = run(&args).await {
        error!(error = %format!("{err:#}"), "fatal error, exiting");
        return Err(err);
    }
    Ok(())
}

async fn run(args: &Args) -> Result<()> {
    let config =
        ReaperConfig::from_env().wrap_err("Unable to load configuration from environment")?;

    let client = RancherClient::connect(config.client_opts())
        .await
        .wrap_err("Unable to initialize fleet api client")?;

    info!(
        endpoint = %client.base_url(),
        interval = ?config.interval,
        timeout = ?config.timeout,
        "hostreaper starting"
    );

    let reaper = Reaper::new(client, config.interval);

    if args.once {
        reaper.run_once().await.wrap_err("Cleanup cycle failed")?;
        return Ok(());
    }

    let cycles = reaper
        .run_until(shutdown_signal())
        .await
        .wrap_err("Cleanup cycle failed")?;
    info!(cycles, "hostreaper stopped");
    Ok(())
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
