//! hostreaper-client: HTTP client for the fleet-management API
//!
//! Lists hosts by filter and requests lifecycle actions on them. The
//! [`HostApi`] trait is what the cleanup cycle is written against;
//! [`RancherClient`] is the HTTP implementation.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use hostreaper_api::{HostAction, HostFilter, HostState};
//! use hostreaper_client::{ClientOpts, HostApi, RancherClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RancherClient::connect(ClientOpts {
//!     url: "http://rancher:8080/v1".into(),
//!     access_key: "access".into(),
//!     secret_key: "secret".into(),
//!     timeout: Some(Duration::from_secs(10)),
//! })
//! .await?;
//!
//! let filter = HostFilter::reconnecting(&HostState::Active);
//! for host in client.list_hosts(&filter).await? {
//!     client.perform(&host, HostAction::Deactivate).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
pub mod traits;

pub use error::{ClientError, Result};
pub use http::{ClientOpts, RancherClient};
pub use traits::HostApi;
