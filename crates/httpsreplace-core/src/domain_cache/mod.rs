//! Per-run host reachability cache.
//!
//! Each distinct host is probed at most once per run; scan and upgrade share
//! the same cache when they run in one process.

mod entry;

pub use entry::Reachability;

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;

use crate::probe::ReachabilityProbe;

#[derive(Default)]
pub struct DomainCache {
    entries: HashMap<String, Reachability>,
    probes_issued: usize,
}

impl DomainCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entry for a normalized host, if already probed.
    pub fn get(&self, host: &str) -> Option<&Reachability> {
        self.entries.get(host)
    }

    /// Cached result for `host`, probing it first if needed.
    ///
    /// The blocking probe runs on tokio's blocking pool; probes are issued
    /// one at a time.
    pub async fn check(
        &mut self,
        host: &str,
        probe: &Arc<dyn ReachabilityProbe>,
    ) -> Result<&Reachability> {
        if !self.entries.contains_key(host) {
            let outcome = tokio::task::spawn_blocking({
                let probe = Arc::clone(probe);
                let host = host.to_string();
                move || probe.probe(&host)
            })
            .await
            .context("probe task join")?;
            self.probes_issued += 1;

            let entry = match outcome {
                Ok(status) => Reachability::answered(host, status),
                Err(e) => {
                    tracing::info!(host, kind = e.kind.as_str(), "host not reachable over https: {}", e);
                    Reachability::failed(host, e.kind)
                }
            };
            self.entries.insert(host.to_string(), entry);
        }
        self.entries
            .get(host)
            .ok_or_else(|| anyhow::anyhow!("domain cache lost entry for {host}"))
    }

    /// Network probes issued so far in this run.
    pub fn probes_issued(&self) -> usize {
        self.probes_issued
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{FailureKind, ProbeError};
    use std::sync::Mutex;

    struct Scripted {
        calls: Mutex<Vec<String>>,
    }

    impl ReachabilityProbe for Scripted {
        fn probe(&self, host: &str) -> Result<u32, ProbeError> {
            self.calls.lock().unwrap().push(host.to_string());
            if host.ends_with(".unavailable") {
                Err(ProbeError::from_curl(
                    &crate::probe::probe_url(host),
                    curl::Error::new(6),
                ))
            } else {
                Ok(404)
            }
        }
    }

    fn scripted() -> (Arc<Scripted>, Arc<dyn ReachabilityProbe>) {
        let s = Arc::new(Scripted {
            calls: Mutex::new(Vec::new()),
        });
        let dynp: Arc<dyn ReachabilityProbe> = s.clone();
        (s, dynp)
    }

    #[tokio::test]
    async fn probes_each_host_once() {
        let (calls, probe) = scripted();
        let mut cache = DomainCache::new();
        for _ in 0..3 {
            let r = cache.check("cdn.example.com", &probe).await.unwrap();
            assert!(r.reachable);
        }
        assert_eq!(cache.probes_issued(), 1);
        assert_eq!(calls.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn error_status_still_counts_as_reachable() {
        let (_, probe) = scripted();
        let mut cache = DomainCache::new();
        let r = cache.check("cdn.example.com", &probe).await.unwrap();
        assert!(r.reachable);
        assert_eq!(r.status, Some(404));
    }

    #[tokio::test]
    async fn transport_failure_is_cached_as_unreachable() {
        let (calls, probe) = scripted();
        let mut cache = DomainCache::new();
        let r = cache.check("intentionally.unavailable", &probe).await.unwrap();
        assert!(!r.reachable);
        assert_eq!(r.failure, Some(FailureKind::Resolve));
        cache.check("intentionally.unavailable", &probe).await.unwrap();
        assert_eq!(calls.calls.lock().unwrap().len(), 1);
        assert_eq!(cache.len(), 1);
    }
}
