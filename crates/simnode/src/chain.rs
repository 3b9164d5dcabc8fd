//! In-memory chain and peer state standing in for a real node.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use fluxd_consensus::constants::MEDIAN_TIME_SPAN;
use fluxd_consensus::params::ChainParams;
use fluxd_consensus::Hash256;
use fluxd_metrics::{ActiveChain, NodeView};

/// Blocks behind the best known height before the node counts as synced.
const IBD_SLACK: i32 = 6;

#[derive(Clone, Copy, Debug)]
struct ChainEntry {
    hash: Hash256,
    time: i64,
}

#[derive(Debug, Default)]
pub struct SimChain {
    entries: Vec<ChainEntry>,
    index: HashMap<Hash256, i32>,
}

impl SimChain {
    pub fn with_genesis(hash: Hash256, time: i64) -> Self {
        let mut chain = Self::default();
        chain.connect(hash, time);
        chain
    }

    pub fn connect(&mut self, hash: Hash256, time: i64) -> i32 {
        let height = self.entries.len() as i32;
        self.entries.push(ChainEntry { hash, time });
        self.index.insert(hash, height);
        height
    }

    /// Drops the tip, returning its hash. Genesis is never disconnected.
    pub fn disconnect_tip(&mut self) -> Option<Hash256> {
        if self.entries.len() <= 1 {
            return None;
        }
        let entry = self.entries.pop()?;
        self.index.remove(&entry.hash);
        Some(entry.hash)
    }

    pub fn tip_time(&self) -> i64 {
        self.entries.last().map(|entry| entry.time).unwrap_or_default()
    }
}

impl ActiveChain for SimChain {
    fn height(&self) -> i32 {
        self.entries.len() as i32 - 1
    }

    fn tip_median_time(&self) -> i64 {
        let span = MEDIAN_TIME_SPAN as usize;
        let start = self.entries.len().saturating_sub(span);
        let mut times: Vec<i64> = self.entries[start..].iter().map(|entry| entry.time).collect();
        if times.is_empty() {
            return 0;
        }
        times.sort_unstable();
        times[times.len() / 2]
    }

    fn block_height(&self, hash: &Hash256) -> Option<i32> {
        let height = *self.index.get(hash)?;
        let entry = self.entries.get(height as usize)?;
        (entry.hash == *hash).then_some(height)
    }
}

pub struct SimNode {
    chain: Mutex<SimChain>,
    peers: AtomicUsize,
    best_known_height: AtomicI32,
    network_sol_ps: AtomicI64,
    params: ChainParams,
}

impl SimNode {
    pub fn new(params: ChainParams) -> Self {
        let genesis = SimChain::with_genesis([0u8; 32], params.genesis_time);
        Self {
            chain: Mutex::new(genesis),
            peers: AtomicUsize::new(0),
            best_known_height: AtomicI32::new(0),
            network_sol_ps: AtomicI64::new(0),
            params,
        }
    }

    pub fn lock_chain(&self) -> MutexGuard<'_, SimChain> {
        self.chain.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_peers(&self, peers: usize) {
        self.peers.store(peers, Ordering::Relaxed);
    }

    pub fn set_best_known_height(&self, height: i32) {
        self.best_known_height.fetch_max(height, Ordering::Relaxed);
    }

    pub fn best_known_height(&self) -> i32 {
        self.best_known_height.load(Ordering::Relaxed)
    }

    pub fn set_network_sol_ps(&self, value: i64) {
        self.network_sol_ps.store(value, Ordering::Relaxed);
    }

    pub fn height(&self) -> i32 {
        self.lock_chain().height()
    }
}

impl NodeView for SimNode {
    fn with_active_chain<R>(&self, f: impl FnOnce(&dyn ActiveChain) -> R) -> R {
        let chain = self.lock_chain();
        f(&*chain)
    }

    fn connection_count(&self) -> usize {
        self.peers.load(Ordering::Relaxed)
    }

    fn network_sol_ps(&self) -> i64 {
        self.network_sol_ps.load(Ordering::Relaxed)
    }

    fn is_initial_block_download(&self) -> bool {
        self.height() + IBD_SLACK < self.best_known_height()
    }

    fn chain_params(&self) -> &ChainParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::{SimChain, SimNode};
    use fluxd_consensus::params::{chain_params, Network};
    use fluxd_metrics::{ActiveChain, NodeView};

    #[test]
    fn disconnected_blocks_leave_the_active_chain() {
        let mut chain = SimChain::with_genesis([0; 32], 100);
        chain.connect([1; 32], 200);
        chain.connect([2; 32], 300);
        assert_eq!(chain.height(), 2);
        assert_eq!(chain.block_height(&[2; 32]), Some(2));

        assert_eq!(chain.disconnect_tip(), Some([2; 32]));
        assert_eq!(chain.block_height(&[2; 32]), None);
        assert_eq!(chain.block_height(&[1; 32]), Some(1));
    }

    #[test]
    fn genesis_stays_put() {
        let mut chain = SimChain::with_genesis([0; 32], 100);
        assert_eq!(chain.disconnect_tip(), None);
        assert_eq!(chain.height(), 0);
    }

    #[test]
    fn median_time_uses_the_last_eleven_blocks() {
        let mut chain = SimChain::with_genesis([0; 32], 0);
        for i in 1u8..=20 {
            chain.connect([i; 32], i64::from(i) * 10);
        }
        // Times 100..=200 in steps of 10; the median is 150.
        assert_eq!(chain.tip_median_time(), 150);
    }

    #[test]
    fn syncing_until_close_to_best_known() {
        let node = SimNode::new(chain_params(Network::Regtest));
        node.set_best_known_height(100);
        assert!(node.is_initial_block_download());
        {
            let mut chain = node.lock_chain();
            for i in 1..=95u8 {
                chain.connect([i; 32], i64::from(i));
            }
        }
        assert!(!node.is_initial_block_download());
    }
}
