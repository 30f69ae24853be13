//! Host resource as returned by the control plane

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::requests::HostAction;

/// Lifecycle state of a host
///
/// Unknown values are kept verbatim in `Other` so a new control-plane
/// state never breaks decoding of a whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HostState {
    Active,
    Inactive,
    Removed,
    Purged,
    Other(String),
}

impl HostState {
    /// Wire representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            HostState::Active => "active",
            HostState::Inactive => "inactive",
            HostState::Removed => "removed",
            HostState::Purged => "purged",
            HostState::Other(s) => s,
        }
    }
}

impl From<String> for HostState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "active" => HostState::Active,
            "inactive" => HostState::Inactive,
            "removed" => HostState::Removed,
            "purged" => HostState::Purged,
            _ => HostState::Other(s),
        }
    }
}

impl From<HostState> for String {
    fn from(state: HostState) -> Self {
        match state {
            HostState::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection state of the host's management agent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgentState {
    Active,
    Reconnecting,
    Disconnected,
    Other(String),
}

impl AgentState {
    /// Wire representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            AgentState::Active => "active",
            AgentState::Reconnecting => "reconnecting",
            AgentState::Disconnected => "disconnected",
            AgentState::Other(s) => s,
        }
    }
}

impl From<String> for AgentState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "active" => AgentState::Active,
            "reconnecting" => AgentState::Reconnecting,
            "disconnected" => AgentState::Disconnected,
            _ => AgentState::Other(s),
        }
    }
}

impl From<AgentState> for String {
    fn from(state: AgentState) -> Self {
        match state {
            AgentState::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compute node registered with the control plane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    /// Opaque resource id
    pub id: String,
    /// User-assigned name
    #[serde(default)]
    pub name: Option<String>,
    /// Hostname reported by the agent
    #[serde(default)]
    pub hostname: Option<String>,
    /// Lifecycle state
    pub state: HostState,
    /// Agent connection state, absent for hosts without an agent
    #[serde(default)]
    pub agent_state: Option<AgentState>,
    /// Available actions, name to action URL
    #[serde(default)]
    pub actions: BTreeMap<String, String>,
    /// Related resource links
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

impl Host {
    /// URL to POST for `action`, if the host currently offers it
    #[must_use]
    pub fn action_url(&self, action: HostAction) -> Option<&str> {
        self.actions.get(action.as_str()).map(String::as_str)
    }

    /// Best human-readable label: name, then hostname, then id
    #[must_use]
    pub fn display_name(&self) -> &str {
        [self.name.as_deref(), self.hostname.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or(&self.id)
    }

    /// Whether the agent is currently reconnecting
    #[must_use]
    pub fn is_reconnecting(&self) -> bool {
        self.agent_state == Some(AgentState::Reconnecting)
    }
}
