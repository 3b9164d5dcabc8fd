//! Threads that play the parts of the node feeding the metrics screen.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use fluxd_consensus::{hash256_to_hex, Hash256};
use fluxd_metrics::{ActiveChain, MessageKind, MetricsRegistry, NodeView, UiInterface, DONE_LOADING};
use rand::Rng;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::chain::SimNode;

const INIT_STEPS: &[&str] = &[
    "Loading block index...",
    "Verifying blocks...",
    "Loading wallet...",
    "Rescanning...",
    "Activating best chain...",
];
const INIT_STEP_DELAY: Duration = Duration::from_millis(700);
const NETWORK_TICK: Duration = Duration::from_millis(250);
const SYNC_BATCH: i32 = 25;
const SOLVER_RUN: Duration = Duration::from_millis(40);
const MINED_QUEUE: usize = 64;
const MAX_PEERS: usize = 8;
const REORG_ODDS: f64 = 0.02;

/// Handles to every producer; joined on shutdown.
pub struct Producers {
    handles: Vec<JoinHandle<()>>,
}

impl Producers {
    pub fn join(self) {
        for handle in self.handles {
            if handle.join().is_err() {
                warn!("producer thread panicked");
            }
        }
    }
}

pub struct ProducerSettings {
    pub miners: usize,
    pub mining: bool,
    /// Height the simulated network is at when the node starts.
    pub network_height: i32,
}

pub fn spawn_producers(
    registry: Arc<MetricsRegistry>,
    node: Arc<SimNode>,
    ui: Arc<dyn UiInterface>,
    settings: &ProducerSettings,
    shutdown: &watch::Receiver<bool>,
) -> Result<Producers, String> {
    let (mined_tx, mined_rx) = bounded::<Hash256>(MINED_QUEUE);
    let mut handles = Vec::new();

    handles.push(spawn_named("sim-init", {
        let registry = Arc::clone(&registry);
        let ui = Arc::clone(&ui);
        let shutdown = shutdown.clone();
        move || run_init(&registry, ui.as_ref(), &shutdown)
    })?);

    handles.push(spawn_named("sim-network", {
        let registry = Arc::clone(&registry);
        let node = Arc::clone(&node);
        let ui = Arc::clone(&ui);
        let shutdown = shutdown.clone();
        let network_height = settings.network_height;
        move || run_network(&registry, &node, ui.as_ref(), &mined_rx, network_height, &shutdown)
    })?);

    handles.push(spawn_named("sim-validation", {
        let registry = Arc::clone(&registry);
        let node = Arc::clone(&node);
        let shutdown = shutdown.clone();
        move || run_validation(&registry, &node, &shutdown)
    })?);

    if settings.mining {
        for worker in 0..settings.miners {
            handles.push(spawn_named(&format!("sim-miner-{worker}"), {
                let registry = Arc::clone(&registry);
                let node = Arc::clone(&node);
                let mined_tx = mined_tx.clone();
                let shutdown = shutdown.clone();
                move || run_miner(&registry, &node, &mined_tx, &shutdown)
            })?);
        }
    }

    Ok(Producers { handles })
}

fn spawn_named(
    name: &str,
    body: impl FnOnce() + Send + 'static,
) -> Result<JoinHandle<()>, String> {
    thread::Builder::new()
        .name(name.to_string())
        .spawn(body)
        .map_err(|err| format!("failed to spawn {name}: {err}"))
}

fn run_init(registry: &MetricsRegistry, ui: &dyn UiInterface, shutdown: &watch::Receiver<bool>) {
    for step in INIT_STEPS {
        if *shutdown.borrow() {
            return;
        }
        ui.init_message(step);
        thread::sleep(INIT_STEP_DELAY);
    }
    ui.init_message(DONE_LOADING);
    info!(uptime_ms = registry.uptime().as_millis() as u64, "node finished loading");
}

fn run_network(
    registry: &MetricsRegistry,
    node: &SimNode,
    ui: &dyn UiInterface,
    mined_rx: &Receiver<Hash256>,
    network_height: i32,
    shutdown: &watch::Receiver<bool>,
) {
    let mut rng = rand::thread_rng();
    let spacing = node.chain_params().consensus.pow_target_spacing.max(1);
    let block_interval = Duration::from_secs(spacing as u64);
    let mut since_last_block = Duration::ZERO;
    node.set_best_known_height(network_height);

    while !*shutdown.borrow() {
        let peers = node.connection_count();
        let drift: i64 = rng.gen_range(-1..=2);
        node.set_peers((peers as i64 + drift).clamp(0, MAX_PEERS as i64) as usize);
        node.set_network_sol_ps(rng.gen_range(900_000..1_100_000));

        match mined_rx.recv_timeout(NETWORK_TICK) {
            Ok(hash) => {
                let height = node.lock_chain().connect(hash, unix_time_secs());
                node.set_best_known_height(height);
                registry.track_mined_block(hash);
                debug!(height, block = %hash256_to_hex(&hash), "connected locally mined block");
                since_last_block = Duration::ZERO;
                continue;
            }
            Err(RecvTimeoutError::Timeout) => {}
            // No miners attached.
            Err(RecvTimeoutError::Disconnected) => thread::sleep(NETWORK_TICK),
        }

        if node.connection_count() == 0 {
            continue;
        }

        if node.is_initial_block_download() {
            let mut chain = node.lock_chain();
            let target = node.best_known_height();
            let batch_end = (chain.height() + SYNC_BATCH).min(target);
            while chain.height() < batch_end {
                let time = chain.tip_time() + spacing;
                chain.connect(rng.gen(), time);
            }
            continue;
        }

        since_last_block += NETWORK_TICK;
        if since_last_block < block_interval {
            continue;
        }
        since_last_block = Duration::ZERO;

        if rng.gen_bool(REORG_ODDS) {
            let dropped = node.lock_chain().disconnect_tip();
            if let Some(hash) = dropped {
                ui.message_box(
                    &format!("Chain tip {} was replaced by a competing block", hash256_to_hex(&hash)),
                    "",
                    MessageKind::Warning,
                );
            }
        }
        let height = node.lock_chain().connect(rng.gen(), unix_time_secs());
        node.set_best_known_height(height);
    }
}

fn run_validation(registry: &MetricsRegistry, node: &SimNode, shutdown: &watch::Receiver<bool>) {
    let mut rng = rand::thread_rng();
    while !*shutdown.borrow() {
        thread::sleep(Duration::from_millis(rng.gen_range(50..400)));
        if node.connection_count() > 0 {
            registry.transactions_validated.increment();
        }
    }
}

fn run_miner(
    registry: &MetricsRegistry,
    node: &SimNode,
    mined_tx: &Sender<Hash256>,
    shutdown: &watch::Receiver<bool>,
) {
    let mut rng = rand::thread_rng();
    let mut active = false;

    while !*shutdown.borrow() {
        let can_mine = registry.is_loaded()
            && node.connection_count() > 0
            && !node.is_initial_block_download();
        if can_mine != active {
            if can_mine {
                registry.mining_timer.start();
            } else {
                registry.mining_timer.stop();
            }
            active = can_mine;
        }
        if !active {
            thread::sleep(NETWORK_TICK);
            continue;
        }

        thread::sleep(SOLVER_RUN);
        registry.solver_runs.increment();
        for _ in 0..rng.gen_range(1..=3) {
            registry.solution_target_checks.increment();
        }
        if rng.gen_bool(0.002) && mined_tx.send(rng.gen()).is_err() {
            break;
        }
    }

    if active {
        registry.mining_timer.stop();
    }
}

fn unix_time_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
