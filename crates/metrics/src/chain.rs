//! Narrow views of node state consumed by the metrics screen.

use fluxd_consensus::params::ChainParams;
use fluxd_consensus::Hash256;

/// Read access to the active chain while the node's chain lock is held.
pub trait ActiveChain {
    fn height(&self) -> i32;
    fn tip_median_time(&self) -> i64;
    /// Height of `hash` if it is known and on the active chain.
    fn block_height(&self, hash: &Hash256) -> Option<i32>;
}

pub trait NodeView: Send + Sync {
    /// Runs `f` with the chain lock held.
    fn with_active_chain<R>(&self, f: impl FnOnce(&dyn ActiveChain) -> R) -> R;
    fn connection_count(&self) -> usize;
    /// Network solution rate estimated over recent blocks.
    fn network_sol_ps(&self) -> i64;
    fn is_initial_block_download(&self) -> bool;
    fn chain_params(&self) -> &ChainParams;
}
