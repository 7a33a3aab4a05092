//! Classify curl failures of the reachability probe.

/// Why an HTTPS probe got no HTTP response at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Resolve,
    Connect,
    Tls,
    Timeout,
    Other,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Resolve => "resolve",
            FailureKind::Connect => "connect",
            FailureKind::Tls => "tls",
            FailureKind::Timeout => "timeout",
            FailureKind::Other => "other",
        }
    }
}

/// Transport-level probe failure. Any HTTP status is a success, so there is
/// no HTTP variant here.
#[derive(Debug, thiserror::Error)]
#[error("{kind:?} failure probing {url}: {source}")]
pub struct ProbeError {
    pub url: String,
    pub kind: FailureKind,
    #[source]
    pub source: curl::Error,
}

impl ProbeError {
    pub fn from_curl(url: &str, source: curl::Error) -> Self {
        Self {
            url: url.to_string(),
            kind: classify_curl_error(&source),
            source,
        }
    }
}

/// Map a curl error onto a failure kind.
pub fn classify_curl_error(e: &curl::Error) -> FailureKind {
    if e.is_operation_timedout() {
        return FailureKind::Timeout;
    }
    if e.is_couldnt_resolve_host() || e.is_couldnt_resolve_proxy() {
        return FailureKind::Resolve;
    }
    if e.is_ssl_connect_error()
        || e.is_peer_failed_verification()
        || e.is_ssl_certproblem()
        || e.is_ssl_cipher()
        || e.is_ssl_cacert()
        || e.is_ssl_cacert_badfile()
    {
        return FailureKind::Tls;
    }
    if e.is_couldnt_connect()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return FailureKind::Connect;
    }
    FailureKind::Other
}
