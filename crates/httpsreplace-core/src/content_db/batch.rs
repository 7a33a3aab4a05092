//! Batched UPDATE statements: one per (table, column) group.

/// Largest group one statement can carry: two bind parameters per row must
/// stay within SQLite's default limit of 32766.
pub const MAX_ROWS_PER_STATEMENT: usize = 16_383;

/// New content for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowUpdate {
    pub rowid: i64,
    pub content: String,
}

/// Rewrites for one (table, column), executed as a single statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBatch {
    pub table: String,
    pub column: String,
    pub rows: Vec<RowUpdate>,
}

impl UpdateBatch {
    /// Split `rows` into batches of at most `max_rows` rows each, with
    /// `max_rows` clamped to `1..=MAX_ROWS_PER_STATEMENT`.
    pub fn chunked(table: &str, column: &str, rows: Vec<RowUpdate>, max_rows: usize) -> Vec<Self> {
        let max_rows = max_rows.clamp(1, MAX_ROWS_PER_STATEMENT);
        let mut out = Vec::with_capacity(rows.len().div_ceil(max_rows));
        let mut rows = rows.into_iter().peekable();
        while rows.peek().is_some() {
            out.push(Self {
                table: table.to_string(),
                column: column.to_string(),
                rows: rows.by_ref().take(max_rows).collect(),
            });
        }
        out
    }

    /// SQL text. Parameters are bound as (rowid, content) pairs in row order:
    /// `?1`/`?2` for the first row, `?3`/`?4` for the second, and so on.
    ///
    /// `UPDATE "t" SET "c" = CASE rowid WHEN ?1 THEN ?2 ... END WHERE rowid IN (?1, ...)`
    pub fn sql(&self) -> String {
        let mut cases = String::new();
        let mut ids = Vec::with_capacity(self.rows.len());
        for i in 0..self.rows.len() {
            let id_param = 2 * i + 1;
            cases.push_str(&format!(" WHEN ?{} THEN ?{}", id_param, id_param + 1));
            ids.push(format!("?{id_param}"));
        }
        let col = quote_ident(&self.column);
        format!(
            "UPDATE {} SET {} = CASE rowid{} END WHERE rowid IN ({})",
            quote_ident(&self.table),
            col,
            cases,
            ids.join(", ")
        )
    }
}

/// Double-quote an SQL identifier so reserved words (`where`, `order`) work.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
