mod common;

use std::thread;

use fluxd_consensus::constants::COINBASE_MATURITY;
use fluxd_consensus::money::COIN;
use fluxd_metrics::{NodeView, TrackedBlockLedger};

use common::FakeNode;

fn reconcile(ledger: &TrackedBlockLedger, node: &FakeNode) -> fluxd_metrics::Reconciliation {
    let params = node.chain_params().consensus.clone();
    node.with_active_chain(|chain| ledger.reconcile(chain, &params))
}

#[test]
fn unknown_block_becomes_a_permanent_orphan() {
    let node = FakeNode::new(20);
    let ledger = TrackedBlockLedger::new();
    ledger.record_mined([0xaa; 32]);

    let report = reconcile(&ledger, &node);
    assert_eq!(report.mined, 1);
    assert_eq!(report.orphaned, 1);
    assert_eq!(ledger.tracked(), 0);

    // Showing up on the chain later does not bring it back.
    node.confirm([0xaa; 32], 20);
    let report = reconcile(&ledger, &node);
    assert_eq!(report.orphaned, 1);
    assert_eq!(report.immature, 0);
}

#[test]
fn confirmed_block_matures_and_stays_tracked() {
    let node = FakeNode::new(20);
    let ledger = TrackedBlockLedger::new();
    let hash = [0xbb; 32];
    node.confirm(hash, 20);
    ledger.record_mined(hash);

    let report = reconcile(&ledger, &node);
    assert_eq!(report.orphaned, 0);
    assert_eq!(report.immature, 150 * COIN);
    assert_eq!(report.mature, 0);

    node.set_height(20 + COINBASE_MATURITY - 1);
    let report = reconcile(&ledger, &node);
    assert_eq!(report.immature, 150 * COIN);

    node.set_height(20 + COINBASE_MATURITY);
    let report = reconcile(&ledger, &node);
    assert_eq!(report.immature, 0);
    assert_eq!(report.mature, 150 * COIN);
    assert_eq!(ledger.tracked(), 1);
}

#[test]
fn concurrent_miners_and_reconciliation_agree_on_totals() {
    let node = FakeNode::new(500);
    let ledger = TrackedBlockLedger::new();

    thread::scope(|scope| {
        for worker in 0u8..4 {
            let ledger = &ledger;
            let node = &node;
            scope.spawn(move || {
                for i in 0u8..50 {
                    let mut hash = [0u8; 32];
                    hash[0] = worker;
                    hash[1] = i;
                    if i % 2 == 0 {
                        node.confirm(hash, 100 + i32::from(i));
                    }
                    ledger.record_mined(hash);
                }
            });
        }
        scope.spawn(|| {
            for _ in 0..20 {
                let report = reconcile(&ledger, &node);
                assert!(report.orphaned <= report.mined);
            }
        });
    });

    let report = reconcile(&ledger, &node);
    assert_eq!(report.mined, 200);
    assert_eq!(report.orphaned, 100);
    assert_eq!(ledger.tracked(), 100);
}
