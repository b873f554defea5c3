//! visabot REST API entry point.
//!
//! Binary name: `visabot`
//!
//! Parses CLI arguments, loads `.env` and configuration, opens the chat session once,
//! and serves the API until Ctrl+C / SIGTERM. A missing API key is logged
//! but never stops the server from starting.

use std::path::PathBuf;

use clap::Parser;

use visabot_api::http::router::build_router;
use visabot_api::state::AppState;
use visabot_infra::config::load_config;
use visabot_infra::llm::init_relay;
use visabot_infra::secret::env::load_dotenv;
use visabot_observe::tracing_setup::{LogFormat, init_tracing};
use visabot_types::config::RelayConfig;

/// Visa-assistant chat relay.
#[derive(Debug, Parser)]
#[command(name = "visabot", version, about)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, env = "VISABOT_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind.
    #[arg(long, env = "VISABOT_HOST")]
    host: Option<String>,

    /// Port to bind.
    #[arg(long, env = "VISABOT_PORT")]
    port: Option<u16>,

    /// Model identifier.
    #[arg(long, env = "VISABOT_MODEL")]
    model: Option<String>,

    /// Deadline for one remote call, in seconds.
    #[arg(long, env = "VISABOT_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Log output format (pretty or json).
    #[arg(long, env = "VISABOT_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Layer command-line and environment overrides on top of `config`.
    fn apply_overrides(&self, mut config: RelayConfig) -> RelayConfig {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_secs = secs;
        }
        config
    }

    fn default_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "info",
            1 => "info,visabot=debug,visabot_api=debug,visabot_core=debug,visabot_infra=debug",
            _ => "trace",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_format, cli.default_filter())
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    load_dotenv(None);
    let config = cli.apply_overrides(load_config(cli.config.as_deref()).await);

    let relay = init_relay(&config);
    let state = AppState::new(relay);
    let router = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        "visabot listening on http://{addr} (model={}, timeout={}s, Ctrl+C to stop)",
        config.model,
        config.request_timeout_secs
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
