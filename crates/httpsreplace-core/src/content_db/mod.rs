//! Content database access (SQLite via sqlx).
//!
//! Discovers text-bearing columns, pulls rows that might hold `http://`
//! links, and writes rewritten content back in batched UPDATE statements.

mod batch;
mod db;
mod schema;

pub use batch::{quote_ident, RowUpdate, UpdateBatch, MAX_ROWS_PER_STATEMENT};
pub use db::{ContentDb, ContentRow};
pub use schema::{is_text_bearing, Exclusions, TextColumn};

#[cfg(test)]
pub(crate) use db::open_memory;
