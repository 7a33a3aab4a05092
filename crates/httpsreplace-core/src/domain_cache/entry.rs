//! Per-host reachability entry.

use std::time::SystemTime;

use crate::probe::FailureKind;

/// Outcome of the HTTPS probe for one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reachability {
    pub host: String,
    pub reachable: bool,
    /// HTTP status when the host answered.
    pub status: Option<u32>,
    /// Transport failure when it did not.
    pub failure: Option<FailureKind>,
    pub probed_at: SystemTime,
}

impl Reachability {
    pub(super) fn answered(host: &str, status: u32) -> Self {
        Self {
            host: host.to_string(),
            reachable: true,
            status: Some(status),
            failure: None,
            probed_at: SystemTime::now(),
        }
    }

    pub(super) fn failed(host: &str, failure: FailureKind) -> Self {
        Self {
            host: host.to_string(),
            reachable: false,
            status: None,
            failure: Some(failure),
            probed_at: SystemTime::now(),
        }
    }
}
