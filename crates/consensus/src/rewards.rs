//! Block subsidy schedule.

use crate::money::{Amount, COIN};
use crate::params::ConsensusParams;

pub fn block_subsidy(height: i32, params: &ConsensusParams) -> Amount {
    let mut subsidy = 150 * COIN;

    if height < params.subsidy_slow_start_interval / 2 {
        subsidy /= params.subsidy_slow_start_interval as Amount;
        subsidy *= height as Amount;
        return subsidy;
    }
    if height < params.subsidy_slow_start_interval {
        subsidy /= params.subsidy_slow_start_interval as Amount;
        subsidy *= (height + 1) as Amount;
        return subsidy;
    }

    let shift = params.subsidy_slow_start_shift();
    let halvings = (height - shift) / params.subsidy_halving_interval;
    if halvings >= 64 {
        return 0;
    }

    subsidy >>= halvings;
    subsidy
}
