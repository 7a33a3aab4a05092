//! Report: which external hosts would stay on http.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

use super::{UrlFinder, Verdict};
use crate::links::find_http_links;

/// One external `http://` link seen during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundLink {
    pub table: String,
    pub column: String,
    pub rowid: i64,
    pub url: String,
    pub host: String,
    pub reachable: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// Hosts that failed the HTTPS probe → number of links pointing at them.
    pub unreachable: BTreeMap<String, usize>,
    /// Every external link found, reachable or not.
    pub links: Vec<FoundLink>,
    pub probes_issued: usize,
}

impl UrlFinder {
    /// Count external `http://` links per host whose host does not answer
    /// over HTTPS.
    ///
    /// Local links and renamed hosts are neither probed nor reported; anchors
    /// and plain-text URLs are never candidates.
    pub async fn scan_for_http_links(&mut self) -> Result<ScanReport> {
        let mut report = ScanReport::default();
        let probes_before = self.cache.probes_issued();

        for column in self.columns().await? {
            tracing::debug!(table = %column.table, column = %column.column, "searching");
            for row in self.db.candidate_rows(&column).await? {
                for link in find_http_links(&row.content) {
                    if self.verdict(&link) != Verdict::External {
                        continue;
                    }
                    let reachable = self.cache.check(&link.host, &self.probe).await?.reachable;
                    if !reachable {
                        *report.unreachable.entry(link.host.clone()).or_insert(0) += 1;
                    }
                    report.links.push(FoundLink {
                        table: column.table.clone(),
                        column: column.column.clone(),
                        rowid: row.rowid,
                        url: link.url,
                        host: link.host,
                        reachable,
                    });
                }
            }
        }

        report.probes_issued = self.cache.probes_issued() - probes_before;
        tracing::info!(
            links = report.links.len(),
            unreachable_hosts = report.unreachable.len(),
            probes = report.probes_issued,
            "scan finished"
        );
        Ok(report)
    }
}
