//! Fleet API trait

use std::sync::Arc;

use async_trait::async_trait;
use hostreaper_api::{Host, HostAction, HostFilter};

use crate::error::Result;

/// The two calls the cleanup cycle needs from the control plane
#[async_trait]
pub trait HostApi: Send + Sync {
    /// List hosts matching every condition in `filter`
    async fn list_hosts(&self, filter: &HostFilter) -> Result<Vec<Host>>;

    /// Request a lifecycle action on `host`
    async fn perform(&self, host: &Host, action: HostAction) -> Result<()>;
}

#[async_trait]
impl<T: HostApi + ?Sized> HostApi for Arc<T> {
    async fn list_hosts(&self, filter: &HostFilter) -> Result<Vec<Host>> {
        (**self).list_hosts(filter).await
    }

    async fn perform(&self, host: &Host, action: HostAction) -> Result<()> {
        (**self).perform(host, action).await
    }
}
