//! Schema introspection: which columns can hold HTML.

use anyhow::{Context, Result};
use sqlx::Row;
use std::collections::HashSet;

use super::db::ContentDb;

/// A text-bearing column of a rowid table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextColumn {
    pub table: String,
    pub column: String,
    pub declared_type: String,
}

/// Tables and single columns that are never searched.
///
/// Entries are `table` or `table.column`, compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    tables: HashSet<String>,
    columns: HashSet<(String, String)>,
}

impl Exclusions {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Self::default();
        for entry in entries {
            let entry = entry.as_ref().trim().to_lowercase();
            if entry.is_empty() {
                continue;
            }
            match entry.split_once('.') {
                Some((table, column)) => {
                    out.columns.insert((table.to_string(), column.to_string()));
                }
                None => {
                    out.tables.insert(entry);
                }
            }
        }
        out
    }

    pub fn excludes_table(&self, table: &str) -> bool {
        let table = table.to_lowercase();
        table.starts_with("sqlite_") || self.tables.contains(&table)
    }

    pub fn excludes(&self, table: &str, column: &str) -> bool {
        self.excludes_table(table)
            || self
                .columns
                .contains(&(table.to_lowercase(), column.to_lowercase()))
    }
}

/// Long text: TEXT/CLOB affinity, or a CHAR/VARCHAR wider than 255
/// (or with no width). Short varchars hold identifiers, not HTML.
pub fn is_text_bearing(declared_type: &str) -> bool {
    let upper = declared_type.trim().to_ascii_uppercase();
    if upper.contains("CHAR") {
        let width = upper
            .split_once('(')
            .and_then(|(_, rest)| rest.split([')', ',']).next())
            .and_then(|n| n.trim().parse::<u64>().ok());
        return width.map_or(true, |n| n > 255);
    }
    upper.contains("TEXT") || upper.contains("CLOB")
}

impl ContentDb {
    /// Names of ordinary rowid tables whose `rowid` is not shadowed by a
    /// declared column, sorted.
    pub async fn tables(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT name, sql FROM sqlite_master
            WHERE type = 'table' AND name NOT LIKE 'sqlite\_%' ESCAPE '\'
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("list tables")?;

        let mut tables = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.get("name");
            let sql: Option<String> = row.get("sql");
            let without_rowid = sql
                .map(|s| s.to_ascii_uppercase().contains("WITHOUT ROWID"))
                .unwrap_or(false);
            if without_rowid {
                tracing::debug!(table = %name, "skipping WITHOUT ROWID table");
                continue;
            }
            if self.shadows_rowid(&name).await? {
                tracing::warn!(table = %name, "skipping table with a column named rowid, oid or _rowid_");
                continue;
            }
            tables.push(name);
        }
        Ok(tables)
    }

    /// True if a declared column hides the `rowid` alias that rows are
    /// addressed by.
    async fn shadows_rowid(&self, table: &str) -> Result<bool> {
        let shadowing: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM pragma_table_info(?1) \
             WHERE lower(name) IN ('rowid', 'oid', '_rowid_')",
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("columns of {table}"))?;
        Ok(shadowing > 0)
    }

    /// Every text-bearing column outside `exclusions`, ordered by table then
    /// column position.
    pub async fn text_columns(&self, exclusions: &Exclusions) -> Result<Vec<TextColumn>> {
        let mut out = Vec::new();
        for table in self.tables().await? {
            if exclusions.excludes_table(&table) {
                tracing::debug!(table = %table, "table excluded");
                continue;
            }
            let columns = sqlx::query("SELECT name, type FROM pragma_table_info(?1) ORDER BY cid")
                .bind(&table)
                .fetch_all(&self.pool)
                .await
                .with_context(|| format!("columns of {table}"))?;
            for row in columns {
                let column: String = row.get("name");
                let declared_type: String = row.get("type");
                if !is_text_bearing(&declared_type) || exclusions.excludes(&table, &column) {
                    continue;
                }
                out.push(TextColumn {
                    table: table.clone(),
                    column,
                    declared_type,
                });
            }
        }
        Ok(out)
    }
}
