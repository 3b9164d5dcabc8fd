#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fluxd_consensus::params::{chain_params, ChainParams, Network};
use fluxd_consensus::Hash256;
use fluxd_metrics::{ActiveChain, MetricsConfig, MetricsRegistry, NodeView, RefreshScheduler};

#[derive(Default)]
pub struct FakeChain {
    pub height: i32,
    pub tip_median_time: i64,
    pub blocks: HashMap<Hash256, i32>,
}

impl ActiveChain for FakeChain {
    fn height(&self) -> i32 {
        self.height
    }

    fn tip_median_time(&self) -> i64 {
        self.tip_median_time
    }

    fn block_height(&self, hash: &Hash256) -> Option<i32> {
        self.blocks.get(hash).copied()
    }
}

pub struct FakeNode {
    pub chain: Mutex<FakeChain>,
    pub connections: AtomicUsize,
    pub initial_block_download: AtomicBool,
    pub params: ChainParams,
}

impl FakeNode {
    pub fn new(height: i32) -> Self {
        Self {
            chain: Mutex::new(FakeChain {
                height,
                ..FakeChain::default()
            }),
            connections: AtomicUsize::new(8),
            initial_block_download: AtomicBool::new(false),
            params: chain_params(Network::Regtest),
        }
    }

    pub fn confirm(&self, hash: Hash256, height: i32) {
        self.chain.lock().expect("chain lock").blocks.insert(hash, height);
    }

    pub fn set_height(&self, height: i32) {
        self.chain.lock().expect("chain lock").height = height;
    }
}

impl NodeView for FakeNode {
    fn with_active_chain<R>(&self, f: impl FnOnce(&dyn ActiveChain) -> R) -> R {
        let chain = self.chain.lock().expect("chain lock");
        f(&*chain)
    }

    fn connection_count(&self) -> usize {
        self.connections.load(Ordering::Relaxed)
    }

    fn network_sol_ps(&self) -> i64 {
        1234
    }

    fn is_initial_block_download(&self) -> bool {
        self.initial_block_download.load(Ordering::Relaxed)
    }

    fn chain_params(&self) -> &ChainParams {
        &self.params
    }
}

pub fn registry() -> Arc<MetricsRegistry> {
    Arc::new(MetricsRegistry::new(RefreshScheduler::with_grace(
        Duration::from_secs(600),
        Duration::ZERO,
    )))
}

pub fn rolling_config(mining: bool) -> MetricsConfig {
    MetricsConfig {
        tty: false,
        screen: false,
        refresh_interval: Duration::from_secs(600),
        mining,
        solver: "tromp".to_string(),
        ansi: false,
    }
}
