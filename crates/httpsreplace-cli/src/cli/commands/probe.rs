//! `httpsreplace probe` – one HTTPS reachability check.

use anyhow::{Context, Result};
use httpsreplace_core::probe::{probe_url, CurlProbe, ReachabilityProbe};
use httpsreplace_core::renames::normalize_host;

pub async fn run_probe(probe: &CurlProbe, host: &str) -> Result<()> {
    let host = normalize_host(host).with_context(|| format!("invalid host: {host}"))?;
    let url = probe_url(&host);
    let probe = probe.clone();
    let target = host.clone();
    let result = tokio::task::spawn_blocking(move || probe.probe(&target))
        .await
        .context("probe task panicked")?;
    match result {
        Ok(status) => println!("{url} answered HTTP {status}: links to {host} can be upgraded."),
        Err(e) => println!(
            "{url} unreachable ({}): links to {host} stay on http. {}",
            e.kind.as_str(),
            e.source
        ),
    }
    Ok(())
}
