//! Response types for the API

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// List envelope returned by collection endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection<T> {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
    pub data: Vec<T>,
}

/// API root document, used to discover collection URLs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiRoot {
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

impl ApiRoot {
    /// Hosts collection URL, if the root advertises one
    #[must_use]
    pub fn hosts_link(&self) -> Option<&str> {
        self.links.get("hosts").map(String::as_str)
    }
}
