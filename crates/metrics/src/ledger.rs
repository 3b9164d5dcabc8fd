//! Locally mined blocks and their maturity.

use std::sync::{Mutex, PoisonError};

use fluxd_consensus::constants::COINBASE_MATURITY;
use fluxd_consensus::money::Amount;
use fluxd_consensus::params::ConsensusParams;
use fluxd_consensus::{block_subsidy, hash256_to_hex, Hash256};
use tracing::debug;

use crate::chain::ActiveChain;
use crate::counter::Counter;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Reconciliation {
    pub mined: u64,
    pub orphaned: u64,
    pub immature: Amount,
    pub mature: Amount,
}

#[derive(Debug, Default)]
pub struct TrackedBlockLedger {
    blocks: Mutex<Vec<Hash256>>,
    mined: Counter,
}

impl TrackedBlockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_mined(&self, hash: Hash256) {
        let mut blocks = self.blocks.lock().unwrap_or_else(PoisonError::into_inner);
        self.mined.increment();
        blocks.push(hash);
    }

    pub fn mined_count(&self) -> u64 {
        self.mined.get()
    }

    pub fn tracked(&self) -> usize {
        self.blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Classifies every tracked block against `chain` and totals subsidies.
    ///
    /// This is a write: blocks that are unknown or off the active chain are
    /// dropped from the ledger for good and counted as orphans from then on.
    /// Call it from inside [`NodeView::with_active_chain`] so the chain stays
    /// put while the ledger lock is held.
    ///
    /// [`NodeView::with_active_chain`]: crate::chain::NodeView::with_active_chain
    pub fn reconcile(&self, chain: &dyn ActiveChain, params: &ConsensusParams) -> Reconciliation {
        let mut blocks = self.blocks.lock().unwrap_or_else(PoisonError::into_inner);
        let tip_height = chain.height();
        let mut immature: Amount = 0;
        let mut mature: Amount = 0;

        blocks.retain(|hash| {
            let Some(height) = chain.block_height(hash) else {
                debug!(block = %hash256_to_hex(hash), "mined block left the active chain");
                return false;
            };
            let subsidy = block_subsidy(height, params);
            if (COINBASE_MATURITY - (tip_height - height)).max(0) > 0 {
                immature += subsidy;
            } else {
                mature += subsidy;
            }
            true
        });

        let mined = self.mined.get();
        Reconciliation {
            mined,
            orphaned: mined.saturating_sub(blocks.len() as u64),
            immature,
            mature,
        }
    }
}
