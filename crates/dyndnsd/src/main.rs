// # dyndnsd - DDNS Reconciler Daemon
//
// The dyndnsd daemon is a thin integration layer over `dyndns-core`:
//
// 1. Parse CLI flags
// 2. Load (or bootstrap) the JSON configuration file
// 3. Set up logging
// 4. Construct the gateway and resolver
// 5. Run the reconciliation loop
//
// All decision logic lives in `dyndns-core`; nothing here retries, decides
// or talks to the network directly.
//
// ## Configuration
//
// Configuration is a JSON file (default `config.json`, override with
// `--config`):
//
// ```json
// {
//   "accessKey": "your_access_key",
//   "accessSecret": "your_access_secret",
//   "domainName": "example.com",
//   "hostPrefix": "*",
//   "recordType": "A",
//   "ipLookupEndpoint": "https://api.ipify.org/?format=json",
//   "pollIntervalSecs": 60,
//   "logFileName": "dyndns.log"
// }
// ```
//
// When the file does not exist, a template is written and the process exits
// so the operator can fill in credentials.
//
// Log verbosity is controlled by `DYNDNS_LOG_LEVEL` (trace, debug, info,
// warn, error; default info).

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use dyndns_core::{CycleOutcome, DdnsConfig, ReconcileOutcome, Reconciler, UpdateEngine};
use dyndns_ip_http::HttpIpResolver;
use dyndns_provider_dnspod::DnspodGateway;

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown, template generation or operator interrupt
/// - 1: Configuration or startup error
/// - 2: Runtime error
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "dyndnsd",
    version,
    about = "Keep a DNS address record pointed at this machine's public IP"
)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Run a single reconciliation cycle and exit (cron-style usage)
    #[arg(long)]
    oneshot: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // First run: write a template and let the operator fill in credentials.
    if !cli.config.exists() {
        return match DdnsConfig::template().write(&cli.config) {
            Ok(()) => {
                println!(
                    "Default configuration file '{}' created. \
                     Edit it with your credentials and domain name.",
                    cli.config.display()
                );
                DaemonExitCode::CleanShutdown.into()
            }
            Err(e) => {
                eprintln!("failed to write configuration template: {e}");
                DaemonExitCode::ConfigError.into()
            }
        };
    }

    let config = match DdnsConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {e}");
            return DaemonExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("configuration validation error: {e}");
        return DaemonExitCode::ConfigError.into();
    }

    if let Err(e) = init_tracing(config.log_file_name.as_deref()) {
        eprintln!("failed to initialize logging: {e:#}");
        return DaemonExitCode::ConfigError.into();
    }

    // Gateway construction is startup-fatal; nothing network-facing runs yet.
    let gateway = match DnspodGateway::new(&config.access_key, &config.access_secret) {
        Ok(gateway) => gateway,
        Err(e) => {
            error!(error = %e, "failed to construct DNS gateway");
            return DaemonExitCode::ConfigError.into();
        }
    };

    info!(config = %cli.config.display(), domain = %config.domain_name, "starting dyndnsd");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "failed to create tokio runtime");
            return DaemonExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run_daemon(config, gateway, cli.oneshot).await {
            Ok(()) => DaemonExitCode::CleanShutdown,
            Err(e) => {
                error!("daemon error: {e:#}");
                DaemonExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Wire up the engine and run it (forever, or for one cycle in oneshot mode).
async fn run_daemon(config: DdnsConfig, gateway: DnspodGateway, oneshot: bool) -> Result<()> {
    let resolver = HttpIpResolver::new(config.ip_lookup_endpoint.clone());
    let reconciler = Reconciler::new(
        config.domain_name.clone(),
        config.host_prefix.clone(),
        config.record_type.clone(),
    );

    let engine = UpdateEngine::new(
        Box::new(resolver),
        Box::new(gateway),
        reconciler,
        config.poll_interval(),
    );

    if oneshot {
        return match engine.run_once().await {
            CycleOutcome::Completed(ReconcileOutcome::Failed(reason)) => {
                Err(anyhow::Error::new(reason).context("reconciliation failed"))
            }
            CycleOutcome::Completed(_) => Ok(()),
            CycleOutcome::Skipped(e) => {
                Err(anyhow::Error::new(e).context("public IP resolution failed"))
            }
        };
    }

    engine.run().await;
    Ok(())
}

/// Initialize the global tracing subscriber.
///
/// With a configured log file the daemon appends there (no ANSI colors);
/// otherwise it logs to stderr like any foreground service. An uncreatable
/// log path is a startup failure.
fn init_tracing(log_file: Option<&str>) -> Result<()> {
    let level = log_level();

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file '{path}'"))?;

            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("failed to set tracing subscriber")?;
        }
        None => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("failed to set tracing subscriber")?;
        }
    }

    Ok(())
}

fn log_level() -> Level {
    match std::env::var("DYNDNS_LOG_LEVEL")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
