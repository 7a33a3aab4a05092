//! `httpsreplace columns` – list searched text columns.

use anyhow::Result;
use httpsreplace_core::content_db::ContentDb;
use httpsreplace_core::finder::FinderOptions;

pub async fn run_columns(db: &ContentDb, options: &FinderOptions) -> Result<()> {
    let columns = db.text_columns(&options.exclusions).await?;
    if columns.is_empty() {
        println!("No text columns to search.");
        return Ok(());
    }
    println!("{:<50} {}", "COLUMN", "TYPE");
    for c in columns {
        println!("{:<50} {}", format!("{}.{}", c.table, c.column), c.declared_type);
    }
    Ok(())
}
