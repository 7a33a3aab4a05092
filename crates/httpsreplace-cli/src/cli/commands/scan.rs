//! `httpsreplace scan` – report hosts that would stay on http.

use anyhow::Result;
use httpsreplace_core::finder::{ScanReport, UrlFinder};

pub async fn run_scan(finder: &mut UrlFinder, json: bool, detail: bool) -> Result<()> {
    let report = finder.scan_for_http_links().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    print!("{}", render_report(&report, detail));
    Ok(())
}

pub(crate) fn render_report(report: &ScanReport, detail: bool) -> String {
    let mut out = String::new();
    if detail && !report.links.is_empty() {
        out.push_str(&format!("{:<30} {:<8} {:<5} {}\n", "FIELD", "ROW", "HTTPS", "URL"));
        for l in &report.links {
            out.push_str(&format!(
                "{:<30} {:<8} {:<5} {}\n",
                format!("{}.{}", l.table, l.column),
                l.rowid,
                if l.reachable { "yes" } else { "no" },
                l.url
            ));
        }
        out.push('\n');
    }
    if report.unreachable.is_empty() {
        out.push_str("No external http hosts are unreachable over https.\n");
    } else {
        out.push_str(&format!("{:<40} {}\n", "HOST", "LINKS"));
        for (host, count) in &report.unreachable {
            out.push_str(&format!("{:<40} {}\n", host, count));
        }
    }
    out.push_str(&format!("{} probe(s) issued.\n", report.probes_issued));
    out
}
