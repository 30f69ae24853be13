//! hostreaper-core: Configuration and the host cleanup cycle
//!
//! Hosts whose agent is stuck reconnecting are pushed through
//! deactivate, remove and purge, one stage after the other, on every tick
//! of a fixed-interval timer.

pub mod config;
pub mod cycle;
pub mod error;
pub mod reaper;
pub mod stage;

pub use config::ReaperConfig;
pub use cycle::{CycleReport, HostFailure, StageReport, run_cycle, run_stage};
pub use error::CoreError;
pub use reaper::Reaper;
pub use stage::Stage;
