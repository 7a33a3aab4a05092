//! HTTPS reachability probing.
//!
//! Uses the curl crate (libcurl) to send one HEAD request to
//! `https://{host}/`. Any HTTP response, 4xx and 5xx included, proves the host
//! answers over TLS; only transport failures (resolve, connect, TLS, timeout)
//! mark it unreachable.

mod classify;

pub use classify::{classify_curl_error, FailureKind, ProbeError};

use std::time::Duration;

use crate::config::ReplaceConfig;

/// Something that can tell whether a host answers over HTTPS.
///
/// Implementations block; async callers go through `spawn_blocking`.
pub trait ReachabilityProbe: Send + Sync {
    /// Probe `host` over HTTPS. `Ok(status)` means an HTTP response arrived.
    fn probe(&self, host: &str) -> Result<u32, ProbeError>;
}

/// libcurl-backed probe.
#[derive(Debug, Clone)]
pub struct CurlProbe {
    connect_timeout: Duration,
    timeout: Duration,
}

impl CurlProbe {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        Self {
            connect_timeout,
            timeout,
        }
    }

    pub fn from_config(cfg: &ReplaceConfig) -> Self {
        Self::new(
            Duration::from_secs(cfg.probe_connect_timeout_secs),
            Duration::from_secs(cfg.probe_timeout_secs),
        )
    }

    /// Sends a HEAD request to `url` and returns the response code.
    ///
    /// Redirects are not followed: the first response is the answer.
    pub fn head_status(&self, url: &str) -> Result<u32, ProbeError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(|e| ProbeError::from_curl(url, e))?;
        easy.nobody(true).map_err(|e| ProbeError::from_curl(url, e))?; // HEAD request
        easy.follow_location(false)
            .map_err(|e| ProbeError::from_curl(url, e))?;
        easy.connect_timeout(self.connect_timeout)
            .map_err(|e| ProbeError::from_curl(url, e))?;
        easy.timeout(self.timeout)
            .map_err(|e| ProbeError::from_curl(url, e))?;

        easy.perform().map_err(|e| ProbeError::from_curl(url, e))?;

        easy.response_code()
            .map_err(|e| ProbeError::from_curl(url, e))
    }
}

impl Default for CurlProbe {
    fn default() -> Self {
        Self::from_config(&ReplaceConfig::default())
    }
}

impl ReachabilityProbe for CurlProbe {
    fn probe(&self, host: &str) -> Result<u32, ProbeError> {
        let url = probe_url(host);
        let status = self.head_status(&url)?;
        tracing::debug!(%url, status, "https probe answered");
        Ok(status)
    }
}

/// The URL probed for a host.
pub fn probe_url(host: &str) -> String {
    format!("https://{host}/")
}
