//! Live metrics screen for a full node.
//!
//! Producer threads (validation, mining workers, init, UI events) update a
//! shared [`MetricsRegistry`]; a single [`DashboardRenderer`] thread prints
//! a frame every refresh interval, or sooner when a producer asks for one.

pub mod chain;
pub mod config;
pub mod counter;
pub mod estimate;
pub mod ledger;
pub mod messages;
pub mod refresh;
pub mod registry;
pub mod screen;
pub mod shared;
pub mod text;
pub mod timer;
pub mod ui;

pub use chain::{ActiveChain, NodeView};
pub use config::MetricsConfig;
pub use counter::Counter;
pub use estimate::{estimate_from_params, estimate_network_height, HeightEstimateInput};
pub use ledger::{Reconciliation, TrackedBlockLedger};
pub use messages::{MessageEntry, MessageKind, MessageQueue, MESSAGE_CAPACITY};
pub use refresh::{RefreshScheduler, Tick};
pub use registry::{MetricsRegistry, DONE_LOADING};
pub use screen::{DashboardRenderer, Frame, ScreenError};
pub use shared::SharedScalar;
pub use timer::IntervalTimer;
pub use ui::{MetricsScreenUi, UiInterface};
