mod chain;
mod producers;

use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use fluxd_consensus::params::{chain_params, Network};
use fluxd_metrics::{
    DashboardRenderer, MetricsConfig, MetricsRegistry, MetricsScreenUi, RefreshScheduler,
    UiInterface,
};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::chain::SimNode;
use crate::producers::{spawn_producers, ProducerSettings};

const DEFAULT_MINERS: usize = 2;
const DEFAULT_NETWORK_HEIGHT: i32 = 2_000;

/// Runs a simulated node with the live metrics screen attached.
#[derive(Parser, Debug)]
#[command(name = "fluxd-simnode", version)]
struct Cli {
    /// mainnet, testnet or regtest
    #[arg(long, default_value = "regtest")]
    network: String,

    /// Redraw a persistent screen in place (default: when stdout is a terminal)
    #[arg(long, value_name = "BOOL")]
    metricsui: Option<bool>,

    /// Seconds between redraws (default: 1 on a terminal, 600 otherwise)
    #[arg(long, value_name = "SECS")]
    metricsrefreshtime: Option<u64>,

    /// Run the simulated miners
    #[arg(long)]
    gen: bool,

    /// Solver name shown on the screen
    #[arg(long, default_value = fluxd_metrics::config::DEFAULT_SOLVER)]
    equihashsolver: String,

    /// Number of simulated mining threads
    #[arg(long, default_value_t = DEFAULT_MINERS)]
    miners: usize,

    /// Height the simulated network starts at
    #[arg(long, default_value_t = DEFAULT_NETWORK_HEIGHT)]
    network_height: i32,

    /// Log filter, e.g. info or fluxd_metrics=debug (default: warn under the persistent screen)
    #[arg(long)]
    log_level: Option<String>,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let network = Network::parse(&cli.network)
        .ok_or_else(|| format!("unknown network '{}'", cli.network))?;
    let config = metrics_config(&cli);
    init_logging(cli.log_level.as_deref(), config.screen)?;

    let registry = Arc::new(MetricsRegistry::new(RefreshScheduler::new(
        config.refresh_interval,
    )));
    registry.mark_start_time();
    let node = Arc::new(SimNode::new(chain_params(network)));
    let ui: Arc<dyn UiInterface> = Arc::new(MetricsScreenUi::new(Arc::clone(&registry)));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let producers = spawn_producers(
        Arc::clone(&registry),
        Arc::clone(&node),
        Arc::clone(&ui),
        &ProducerSettings {
            miners: cli.miners,
            mining: config.mining,
            network_height: cli.network_height,
        },
        &shutdown_rx,
    )?;

    let renderer = DashboardRenderer::new(Arc::clone(&registry), node, config);
    let screen = thread::Builder::new()
        .name("fluxd-metrics-screen".to_string())
        .spawn(move || {
            let mut stdout = io::stdout();
            renderer.run(&mut stdout, shutdown_rx)
        })
        .map_err(|err| format!("failed to spawn metrics screen: {err}"))?;

    tokio::signal::ctrl_c()
        .await
        .map_err(|err| format!("failed to listen for ctrl-c: {err}"))?;
    info!("shutdown requested");
    let _ = shutdown_tx.send(true);

    let screen_result = tokio::task::spawn_blocking(move || screen.join())
        .await
        .map_err(|err| err.to_string())?
        .map_err(|_| "metrics screen thread panicked".to_string())?;
    producers.join();
    screen_result.map_err(|err| err.to_string())
}

fn metrics_config(cli: &Cli) -> MetricsConfig {
    let mut config = MetricsConfig::detect();
    if let Some(screen) = cli.metricsui {
        config.screen = screen;
    }
    if let Some(secs) = cli.metricsrefreshtime {
        config.refresh_interval = Duration::from_secs(secs.max(1));
    }
    config.mining = cli.gen;
    config.solver = cli.equihashsolver.clone();
    config.ansi = !cli.no_color;
    config
}

fn init_logging(level: Option<&str>, screen: bool) -> Result<(), String> {
    let default = if screen { "warn" } else { "info" };
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).map_err(|err| format!("invalid --log-level: {err}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| format!("failed to install logger: {err}"))
}
