//! SQLite-backed content database handle.

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;

use super::batch::{quote_ident, UpdateBatch};
use super::schema::TextColumn;

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// One row of a text column that may contain links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRow {
    pub rowid: i64,
    pub content: String,
}

/// Handle to the content database being upgraded.
///
/// A single connection: the tool is a one-shot sequential job and every
/// write for a run goes through one transaction.
#[derive(Clone)]
pub struct ContentDb {
    pub(crate) pool: Pool<Sqlite>,
}

impl ContentDb {
    /// Open an existing database file. Fails if it does not exist.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let uri = path_to_sqlite_uri(path) + "?mode=rw";
        Self::connect(&uri)
            .await
            .with_context(|| format!("open content database: {}", path.display()))
    }

    /// Open (or create) the database at a path. Creates parent dirs if needed.
    pub async fn create_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        Self::connect(&uri)
            .await
            .with_context(|| format!("create content database: {}", path.display()))
    }

    async fn connect(uri: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(uri)
            .await?;
        Ok(Self { pool })
    }

    /// Underlying pool, for callers that seed or inspect content directly.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Text rows of `column` that contain `http://` (ASCII case-insensitive).
    pub async fn candidate_rows(&self, column: &TextColumn) -> Result<Vec<ContentRow>> {
        let col = quote_ident(&column.column);
        let sql = format!(
            "SELECT rowid AS rid, {col} AS content FROM {table} \
             WHERE typeof({col}) = 'text' AND {col} LIKE '%http://%' ORDER BY rowid",
            table = quote_ident(&column.table),
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("scan {}.{}", column.table, column.column))?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let rowid: i64 = row.get("rid");
            match row.try_get::<String, _>("content") {
                Ok(content) => out.push(ContentRow { rowid, content }),
                Err(e) => tracing::warn!(
                    table = %column.table,
                    column = %column.column,
                    rowid,
                    "skipping row that is not valid UTF-8 text: {e}"
                ),
            }
        }
        Ok(out)
    }

    /// Execute all batches in one transaction. `on_statement` sees each
    /// statement's SQL text and affected row count after it runs; an error
    /// from either the database or the callback rolls the whole run back.
    pub async fn apply_batches<F>(&self, batches: &[UpdateBatch], mut on_statement: F) -> Result<u64>
    where
        F: FnMut(&UpdateBatch, &str, u64) -> Result<()>,
    {
        let mut tx = self.pool.begin().await?;
        let mut total = 0u64;
        for batch in batches {
            if batch.rows.is_empty() {
                continue;
            }
            let sql = batch.sql();
            let mut query = sqlx::query(&sql);
            for row in &batch.rows {
                query = query.bind(row.rowid).bind(&row.content);
            }
            let affected = query
                .execute(&mut *tx)
                .await
                .with_context(|| format!("update {}.{}", batch.table, batch.column))?
                .rows_affected();
            on_statement(batch, &sql, affected)?;
            total += affected;
        }
        tx.commit().await?;
        Ok(total)
    }
}

#[cfg(test)]
/// Open an in-memory database for tests (no disk I/O).
pub(crate) async fn open_memory() -> Result<ContentDb> {
    ContentDb::connect("sqlite::memory:").await
}
