//! Daemon configuration loaded from the environment
//!
//! Every setting can come from one of several variable names so both the
//! container-injected `CATTLE_*` names and the standalone `RANCHER_*` names
//! work. The first alias that is set and non-empty wins.

use std::fmt;
use std::num::ParseIntError;
use std::time::Duration;

use hostreaper_client::ClientOpts;
use tracing::debug;

use crate::error::CoreError;

/// Default per-request API timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default delay between cleanup cycles in seconds
pub const DEFAULT_INTERVAL_SECS: u64 = 30;

/// API base URL
pub const ENDPOINT_VARS: &[&str] = &["CATTLE_URL", "RANCHER_API_ENDPOINT"];
/// API access key
pub const ACCESS_KEY_VARS: &[&str] = &["CATTLE_ACCESS_KEY", "RANCHER_ACCESS_KEY"];
/// API secret key
pub const SECRET_KEY_VARS: &[&str] = &["CATTLE_SECRET_KEY", "RANCHER_SECRET_KEY"];
/// Per-request timeout, seconds
pub const TIMEOUT_VARS: &[&str] = &["RANCHER_API_TIMEOUT"];
/// Cleanup interval, seconds
pub const INTERVAL_VARS: &[&str] = &["HOST_REMOVAL_INTERVAL", "RANCHER_REMOVAL_INTERVAL"];

/// Connection and scheduling settings, fixed at startup
#[derive(Clone, PartialEq, Eq)]
pub struct ReaperConfig {
    /// Control-plane API base URL
    pub endpoint: String,
    /// API access key
    pub access_key: String,
    /// API secret key
    pub secret_key: String,
    /// Timeout applied to each API call, `None` for no limit
    pub timeout: Option<Duration>,
    /// Period of the cleanup timer
    pub interval: Duration,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
        }
    }
}

impl fmt::Debug for ReaperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaperConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("interval", &self.interval)
            .finish()
    }
}

impl ReaperConfig {
    /// Load from the process environment
    ///
    /// # Errors
    /// Returns an error if a numeric setting is not an integer or the
    /// interval is not positive.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using `lookup` to resolve variable names
    ///
    /// # Errors
    /// Returns an error if a numeric setting is not an integer or the
    /// interval is not positive.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some((var, value)) = first_set(&lookup, ENDPOINT_VARS) {
            debug!(var, "endpoint configured");
            config.endpoint = value;
        }
        if let Some((var, value)) = first_set(&lookup, ACCESS_KEY_VARS) {
            debug!(var, "access key configured");
            config.access_key = value;
        }
        if let Some((var, value)) = first_set(&lookup, SECRET_KEY_VARS) {
            debug!(var, "secret key configured");
            config.secret_key = value;
        }
        if let Some((var, value)) = first_set(&lookup, TIMEOUT_VARS) {
            // Zero or negative disables the per-call limit
            let secs = parse_secs(var, &value)?;
            config.timeout = positive_secs(secs);
        }
        if let Some((var, value)) = first_set(&lookup, INTERVAL_VARS) {
            let secs = parse_secs(var, &value)?;
            config.interval = positive_secs(secs)
                .ok_or_else(|| CoreError::Config(format!("{var} must be positive, got {secs}")))?;
        }

        debug!(config = ?config, "environment variables loaded");
        Ok(config)
    }

    /// Options for building the API client
    #[must_use]
    pub fn client_opts(&self) -> ClientOpts {
        ClientOpts {
            url: self.endpoint.clone(),
            access_key: self.access_key.clone(),
            secret_key: self.secret_key.clone(),
            timeout: self.timeout,
        }
    }
}

/// First alias that is present and non-empty
fn first_set<F>(lookup: &F, vars: &[&'static str]) -> Option<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    vars.iter()
        .find_map(|var| lookup(var).filter(|v| !v.is_empty()).map(|v| (*var, v)))
}

fn positive_secs(secs: i64) -> Option<Duration> {
    u64::try_from(secs)
        .ok()
        .filter(|s| *s > 0)
        .map(Duration::from_secs)
}

fn parse_secs(var: &str, value: &str) -> Result<i64, CoreError> {
    value
        .parse()
        .map_err(|source: ParseIntError| CoreError::InvalidNumber {
            var: var.to_string(),
            value: value.to_string(),
            source,
        })
}
