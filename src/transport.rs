//! HTTP transport abstraction
//!
//! The catalog client and the archive fetcher never talk to the network
//! directly. They receive a [`Transport`] so callers can swap in proxies,
//! authentication headers or in-memory fakes without touching the core.

use crate::config::HttpConfig;
use crate::error::{RtfetchError, RtfetchResult};
use std::io::Read;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Failure reported by a transport for a single GET
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("GET {url} failed: {reason}")]
pub struct TransportError {
    pub url: String,
    pub reason: String,
}

impl TransportError {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Blocking GET capability returning the response body as a stream
pub trait Transport: Send + Sync {
    /// Issue a GET and return the body. Non-success statuses are errors.
    fn get(&self, url: &str) -> Result<Box<dyn Read>, TransportError>;
}

/// Transport backed by a `ureq` agent
pub struct UreqTransport {
    agent: ureq::Agent,
    name: &'static str,
}

impl UreqTransport {
    /// Build the transport used for catalog queries
    pub fn catalog(http: &HttpConfig) -> RtfetchResult<Self> {
        Self::build("catalog", http, http.catalog_timeout_secs)
    }

    /// Build the transport used for artifact downloads
    pub fn download(http: &HttpConfig) -> RtfetchResult<Self> {
        Self::build("download", http, http.download_timeout_secs)
    }

    fn build(name: &'static str, http: &HttpConfig, timeout_secs: u64) -> RtfetchResult<Self> {
        let proxy = match http.proxy.as_deref() {
            Some(proxy) => Some(ureq::Proxy::new(proxy).map_err(|e| {
                RtfetchError::InvalidProxy {
                    proxy: proxy.to_string(),
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        // 0 disables the timeout
        let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let config = ureq::Agent::config_builder()
            .user_agent(http.user_agent.as_str())
            .timeout_global(timeout)
            .proxy(proxy)
            .build();

        Ok(Self {
            agent: ureq::Agent::new_with_config(config),
            name,
        })
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str) -> Result<Box<dyn Read>, TransportError> {
        debug!("{} transport: GET {}", self.name, url);

        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| TransportError::new(url, e.to_string()))?;

        Ok(Box::new(response.into_body().into_reader()))
    }
}
