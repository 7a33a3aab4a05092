//! `httpsreplace upgrade` – rewrite eligible links in place.

use anyhow::Result;
use httpsreplace_core::finder::UrlFinder;

pub async fn run_upgrade(finder: &mut UrlFinder) -> Result<()> {
    let mut stdout = std::io::stdout();
    let outcome = finder.upgrade_http_links(&mut stdout).await?;
    if !outcome.changed {
        println!("No http links needed upgrading.");
    } else {
        println!(
            "Upgraded {} link(s) in {} row(s) with {} statement(s); {} probe(s) issued.",
            outcome.links_upgraded,
            outcome.rows_updated,
            outcome.statements,
            finder.probes_issued()
        );
    }
    Ok(())
}
