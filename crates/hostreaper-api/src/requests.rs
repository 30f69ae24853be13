//! Request types for the API

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::host::{AgentState, HostState};

/// Lifecycle action that can be requested on a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostAction {
    Deactivate,
    Remove,
    Purge,
}

impl HostAction {
    /// Action name as used in the host's `actions` map
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HostAction::Deactivate => "deactivate",
            HostAction::Remove => "remove",
            HostAction::Purge => "purge",
        }
    }
}

impl fmt::Display for HostAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equality filter for collection queries
///
/// Each condition is sent as one `field=value` query pair, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostFilter {
    conditions: Vec<(String, String)>,
}

impl HostFilter {
    /// Create an empty filter matching every host
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `field == value` condition
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    /// Hosts in `state` whose agent is reconnecting
    #[must_use]
    pub fn reconnecting(state: &HostState) -> Self {
        Self::new()
            .with("state", state.as_str())
            .with("agentState", AgentState::Reconnecting.as_str())
    }

    /// Conditions as `(field, value)` pairs
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.conditions
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Look up the value required for `field`
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.pairs().find(|(k, _)| *k == field).map(|(_, v)| v)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl fmt::Display for HostFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, value) in self.pairs() {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{field}={value}")?;
            first = false;
        }
        Ok(())
    }
}
