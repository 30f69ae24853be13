//! The three removal stages and the host states they act on

use std::fmt;

use hostreaper_api::{HostAction, HostFilter, HostState};

/// One step of the removal pipeline
///
/// `active+reconnecting --deactivate--> inactive+reconnecting --remove-->
/// removed+reconnecting --purge--> gone`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Deactivate,
    Remove,
    Purge,
}

impl Stage {
    /// Stages in the order a cycle runs them
    pub const ALL: [Stage; 3] = [Stage::Deactivate, Stage::Remove, Stage::Purge];

    /// State a host must be in to be picked up by this stage
    #[must_use]
    pub fn source_state(self) -> HostState {
        match self {
            Stage::Deactivate => HostState::Active,
            Stage::Remove => HostState::Inactive,
            Stage::Purge => HostState::Removed,
        }
    }

    /// Action requested on each matching host
    #[must_use]
    pub fn action(self) -> HostAction {
        match self {
            Stage::Deactivate => HostAction::Deactivate,
            Stage::Remove => HostAction::Remove,
            Stage::Purge => HostAction::Purge,
        }
    }

    /// Reconnecting hosts in this stage's source state
    #[must_use]
    pub fn filter(self) -> HostFilter {
        HostFilter::reconnecting(&self.source_state())
    }

    /// Verb used in progress logs
    #[must_use]
    pub fn past_tense(self) -> &'static str {
        match self {
            Stage::Deactivate => "Deactivated",
            Stage::Remove => "Removed",
            Stage::Purge => "Purged",
        }
    }

    /// What could not be done to a host, for failure logs
    #[must_use]
    pub fn failure_subject(self) -> &'static str {
        match self {
            Stage::Deactivate => "deactivate reconnecting host",
            Stage::Remove => "remove inactive host",
            Stage::Purge => "purge host",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action().as_str())
    }
}
