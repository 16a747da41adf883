//! GuardIQ daemon: entry point for running the VIP verification service.

use anyhow::Context;
use clap::Parser;
use guardiq_rpc::{RpcServer, ServiceConfig};
use guardiq_store_lmdb::LmdbEnvironment;
use guardiq_types::SystemClock;
use guardiq_utils::{init_logging, LogFormat};
use guardiq_verification::{GateFailurePolicy, VerificationPipeline};
use std::path::PathBuf;
use std::sync::Arc;

/// Named databases in the LMDB environment.
const MAX_DBS: u32 = 8;

#[derive(Parser)]
#[command(name = "guardiq-daemon", about = "GuardIQ VIP verification service")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "GUARDIQ_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to bind the HTTP server to.
    #[arg(long, env = "GUARDIQ_HOST")]
    host: Option<String>,

    /// HTTP port.
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Data directory for the LMDB environment.
    #[arg(long, env = "GUARDIQ_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Allowed CORS origins (comma-separated, "*" for any).
    #[arg(long, env = "GUARDIQ_CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Vec<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "GUARDIQ_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "GUARDIQ_LOG_LEVEL")]
    log_level: Option<String>,

    /// What to do when the suspicious-activity lookup fails.
    #[arg(long, value_enum, env = "GUARDIQ_GATE_FAILURE_POLICY")]
    gate_failure_policy: Option<GatePolicyArg>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum GatePolicyArg {
    /// Let the caller through to classification.
    FailOpen,
    /// Block the caller.
    FailClosed,
}

impl From<GatePolicyArg> for GateFailurePolicy {
    fn from(arg: GatePolicyArg) -> Self {
        match arg {
            GatePolicyArg::FailOpen => GateFailurePolicy::FailOpen,
            GatePolicyArg::FailClosed => GateFailurePolicy::FailClosed,
        }
    }
}

#[derive(Clone, Copy, clap::Subcommand)]
enum Command {
    /// Serve the HTTP API until interrupted.
    Serve,
}

impl Cli {
    /// Layer CLI flags and env vars over the file (or default) config.
    fn apply(self, mut config: ServiceConfig) -> ServiceConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if !self.cors_origins.is_empty() {
            config.cors_origins = self.cors_origins;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(policy) = self.gate_failure_policy {
            config.gate_failure_policy = policy.into();
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => Some(
            ServiceConfig::from_toml_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
        ),
        None => None,
    };
    let loaded_from = cli.config.clone();
    let command = cli.command;
    let config = cli.apply(file_config.unwrap_or_default());

    init_logging(config.log_format, &config.log_level);
    if let Some(path) = loaded_from {
        tracing::info!("Loaded config from {}", path.display());
    }

    match command {
        Command::Serve => serve(config).await?,
    }

    Ok(())
}

async fn serve(config: ServiceConfig) -> anyhow::Result<()> {
    tracing::info!(
        "Starting GuardIQ VIP API on {}:{} (data: {}, gate: {:?})",
        config.host,
        config.port,
        config.data_dir.display(),
        config.gate_failure_policy,
    );

    let env = LmdbEnvironment::open(&config.data_dir, MAX_DBS, config.map_size)
        .with_context(|| format!("failed to open LMDB at {}", config.data_dir.display()))?;
    let store = Arc::new(env.audit_store(config.activity_policy(), Arc::new(SystemClock)));
    let pipeline = VerificationPipeline::from_backend(store, Arc::new(SystemClock))
        .with_gate_policy(config.gate_failure_policy);

    RpcServer::new(config, Arc::new(pipeline))
        .start(shutdown_signal())
        .await?;

    tracing::info!("GuardIQ daemon exited cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server");
}
