//! hostreaper-api: Wire types for the fleet-management API
//!
//! Contains the host resource, list envelopes and filter/action types
//! shared by the client and the cleanup cycle.

pub mod host;
pub mod requests;
pub mod responses;

pub use host::{AgentState, Host, HostState};
pub use requests::{HostAction, HostFilter};
pub use responses::{ApiRoot, Collection};
