//! Network height estimation from checkpoint data.

use fluxd_consensus::constants::MEDIAN_TIME_SPAN;
use fluxd_consensus::params::ChainParams;

#[derive(Clone, Copy, Debug)]
pub struct HeightEstimateInput {
    pub height: i32,
    pub tip_median_time: i64,
    pub last_checkpoint_height: i32,
    pub last_checkpoint_time: i64,
    pub genesis_time: i64,
    pub target_spacing: i64,
    pub now: i64,
}

/// Estimates the current network height, rounded to the nearest ten.
///
/// The target spacing is averaged with the spacing observed against the
/// last checkpoint (from above or below depending on where the median-time
/// block sits) and the result is extrapolated from the tip's median time.
pub fn estimate_network_height(input: &HeightEstimateInput) -> i32 {
    let median_height = if input.height > MEDIAN_TIME_SPAN {
        input.height - (1 + (MEDIAN_TIME_SPAN - 1) / 2)
    } else {
        input.height / 2
    };

    let checkpoint_spacing = if median_height > input.last_checkpoint_height {
        (input.tip_median_time - input.last_checkpoint_time) as f64
            / f64::from(median_height - input.last_checkpoint_height)
    } else {
        (input.last_checkpoint_time - input.genesis_time) as f64
            / f64::from(input.last_checkpoint_height)
    };
    let average_spacing = (input.target_spacing as f64 + checkpoint_spacing) / 2.0;

    let ahead = (input.now - input.tip_median_time) as f64 / average_spacing;
    let net_height = if ahead.is_finite() {
        (f64::from(median_height) + ahead) as i32
    } else {
        median_height
    };
    (net_height.saturating_add(5) / 10) * 10
}

/// [`estimate_network_height`] with checkpoint data taken from `params`.
pub fn estimate_from_params(height: i32, tip_median_time: i64, params: &ChainParams, now: i64) -> i32 {
    estimate_network_height(&HeightEstimateInput {
        height,
        tip_median_time,
        last_checkpoint_height: params.checkpoints.last_checkpoint_height,
        last_checkpoint_time: params.checkpoints.last_checkpoint_time,
        genesis_time: params.genesis_time,
        target_spacing: params.consensus.pow_target_spacing,
        now,
    })
}
