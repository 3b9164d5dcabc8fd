//! Consensus-wide constants the reporting layer depends on.

/// Coinbase transaction outputs can only be spent after this number of new blocks.
pub const COINBASE_MATURITY: i32 = 100;
/// Number of blocks whose timestamps feed the median-time-past of a tip.
pub const MEDIAN_TIME_SPAN: i32 = 11;
