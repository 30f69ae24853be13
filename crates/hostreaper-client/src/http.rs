//! HTTP client for the fleet-management API

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use hostreaper_api::{ApiRoot, Collection, Host, HostAction, HostFilter};

use crate::error::{ClientError, Result};
use crate::traits::HostApi;

/// Connection options for [`RancherClient`]
#[derive(Clone, PartialEq, Eq)]
pub struct ClientOpts {
    /// API base URL, e.g. `http://rancher:8080/v1`
    pub url: String,
    /// API access key, sent as the basic-auth user
    pub access_key: String,
    /// API secret key, sent as the basic-auth password
    pub secret_key: String,
    /// Per-request timeout, `None` for no limit
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ClientOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOpts")
            .field("url", &self.url)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP client for the control plane's host resources
#[derive(Clone)]
pub struct RancherClient {
    client: Client,
    base_url: Url,
    hosts_url: Url,
    access_key: String,
    secret_key: String,
}

impl fmt::Debug for RancherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RancherClient")
            .field("base_url", &self.base_url.as_str())
            .field("hosts_url", &self.hosts_url.as_str())
            .field("access_key", &self.access_key)
            .finish_non_exhaustive()
    }
}

impl RancherClient {
    /// Create a client without contacting the API
    ///
    /// # Errors
    /// Returns an error if the URL is empty or invalid, or the underlying
    /// HTTP client cannot be built.
    ///
    /// # Example
    /// ```no_run
    /// use std::time::Duration;
    /// use hostreaper_client::{ClientOpts, RancherClient};
    ///
    /// let client = RancherClient::new(ClientOpts {
    ///     url: "http://rancher:8080/v1".into(),
    ///     access_key: String::new(),
    ///     secret_key: String::new(),
    ///     timeout: Some(Duration::from_secs(10)),
    /// })?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(opts: ClientOpts) -> Result<Self> {
        let mut base_url = Url::parse(&opts.url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let hosts_url = base_url.join("hosts")?;

        let mut builder = Client::builder();
        if let Some(timeout) = opts.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url,
            hosts_url,
            access_key: opts.access_key,
            secret_key: opts.secret_key,
        })
    }

    /// Create a client and verify the API answers
    ///
    /// Fetches the API root and takes the hosts collection URL from its
    /// links when present.
    ///
    /// # Errors
    /// Returns an error if the client cannot be built or the API root
    /// cannot be fetched.
    pub async fn connect(opts: ClientOpts) -> Result<Self> {
        let mut client = Self::new(opts)?;
        let root: ApiRoot = client.get(client.base_url.clone()).await?;
        if let Some(link) = root.hosts_link() {
            client.hosts_url = Url::parse(link)?;
        }
        debug!(hosts_url = %client.hosts_url, "connected to fleet API");
        Ok(client)
    }

    /// API base URL
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Hosts collection URL
    #[must_use]
    pub fn hosts_url(&self) -> &Url {
        &self.hosts_url
    }

    /// Attach credentials when an access key is configured
    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        if self.access_key.is_empty() {
            request
        } else {
            request.basic_auth(&self.access_key, Some(&self.secret_key))
        }
    }

    /// Send a request and turn non-2xx statuses into errors
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self
            .authed(request)
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, message });
        }

        Ok(response)
    }

    /// Perform a GET request and deserialize the response
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.send(self.client.get(url)).await?;
        let body = response.bytes().await.map_err(ClientError::from_transport)?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Collection URL for `filter`
    fn hosts_query(&self, filter: &HostFilter) -> Url {
        let mut url = self.hosts_url.clone();
        if !filter.is_empty() {
            let mut query = url.query_pairs_mut();
            for (field, value) in filter.pairs() {
                query.append_pair(field, value);
            }
        }
        url
    }

    /// List hosts matching `filter`
    ///
    /// # Errors
    /// Returns an error if the request fails or the API returns an error.
    #[instrument(skip(self, filter), fields(filter = %filter), level = "debug")]
    pub async fn fetch_hosts(&self, filter: &HostFilter) -> Result<Vec<Host>> {
        let collection: Collection<Host> = self.get(self.hosts_query(filter)).await?;
        debug!(count = collection.data.len(), "listed hosts");
        Ok(collection.data)
    }

    /// POST `action` to the host's advertised action URL
    ///
    /// # Errors
    /// Returns [`ClientError::ActionUnavailable`] without a request when the
    /// host does not offer `action`, otherwise any request or API error.
    #[instrument(skip(self, host), fields(host = %host.id), level = "debug")]
    pub async fn post_action(&self, host: &Host, action: HostAction) -> Result<()> {
        let Some(link) = host.action_url(action) else {
            return Err(ClientError::ActionUnavailable {
                action: action.to_string(),
                host: host.id.clone(),
            });
        };
        let url = Url::parse(link)?;

        self.send(self.client.post(url).json(&serde_json::json!({})))
            .await?;
        debug!("action accepted");
        Ok(())
    }
}

#[async_trait]
impl HostApi for RancherClient {
    async fn list_hosts(&self, filter: &HostFilter) -> Result<Vec<Host>> {
        self.fetch_hosts(filter).await
    }

    async fn perform(&self, host: &Host, action: HostAction) -> Result<()> {
        self.post_action(host, action).await
    }
}
