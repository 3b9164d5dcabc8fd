//! Per-network chain parameters.

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Network {
    Mainnet,
    Testnet,
    Regtest,
}

impl Network {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "mainnet" | "main" => Some(Self::Mainnet),
            "testnet" | "test" => Some(Self::Testnet),
            "regtest" => Some(Self::Regtest),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ConsensusParams {
    /// Target block spacing in seconds.
    pub pow_target_spacing: i64,
    pub subsidy_slow_start_interval: i32,
    pub subsidy_halving_interval: i32,
}

impl ConsensusParams {
    pub fn subsidy_slow_start_shift(&self) -> i32 {
        self.subsidy_slow_start_interval / 2
    }
}

/// The most recent hardcoded checkpoint, used to estimate network height.
#[derive(Clone, Copy, Debug)]
pub struct CheckpointData {
    pub last_checkpoint_height: i32,
    pub last_checkpoint_time: i64,
}

#[derive(Clone, Debug)]
pub struct ChainParams {
    pub network: Network,
    pub currency_units: &'static str,
    pub genesis_time: i64,
    pub checkpoints: CheckpointData,
    pub consensus: ConsensusParams,
}

pub fn chain_params(network: Network) -> ChainParams {
    match network {
        Network::Mainnet => ChainParams {
            network,
            currency_units: "FLUX",
            genesis_time: 1_516_980_000,
            checkpoints: CheckpointData {
                last_checkpoint_height: 1_500_000,
                last_checkpoint_time: 1_697_000_000,
            },
            consensus: ConsensusParams {
                pow_target_spacing: 120,
                subsidy_slow_start_interval: 5_000,
                subsidy_halving_interval: 655_350,
            },
        },
        Network::Testnet => ChainParams {
            network,
            currency_units: "TESTFLUX",
            genesis_time: 1_582_228_940,
            checkpoints: CheckpointData {
                last_checkpoint_height: 100_000,
                last_checkpoint_time: 1_596_000_000,
            },
            consensus: ConsensusParams {
                pow_target_spacing: 120,
                subsidy_slow_start_interval: 5_000,
                subsidy_halving_interval: 655_350,
            },
        },
        Network::Regtest => ChainParams {
            network,
            currency_units: "REGFLUX",
            genesis_time: 1_296_688_602,
            checkpoints: CheckpointData {
                last_checkpoint_height: 1,
                last_checkpoint_time: 1_296_688_722,
            },
            consensus: ConsensusParams {
                pow_target_spacing: 2,
                subsidy_slow_start_interval: 0,
                subsidy_halving_interval: 150,
            },
        },
    }
}
