//! Rewrite eligible links in place, one batched UPDATE per (table, column).

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::Write;

use super::{UrlFinder, Verdict};
use crate::content_db::{RowUpdate, TextColumn, UpdateBatch};
use crate::links::{find_http_links, rewrite_links, LinkMatch};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeOutcome {
    /// True if any row was rewritten.
    pub changed: bool,
    pub statements: usize,
    pub rows_updated: u64,
    pub links_upgraded: usize,
}

impl UrlFinder {
    /// Upgrade every eligible `http://` link to `https://` across all
    /// searched columns, applying renames first.
    ///
    /// Each executed statement's SQL is written to `progress`; nothing is
    /// written when nothing changes. Any database error aborts the run and
    /// rolls back every statement of it.
    pub async fn upgrade_http_links<W: Write>(&mut self, progress: &mut W) -> Result<UpgradeOutcome> {
        if !self.site.is_https {
            tracing::warn!(site = %self.site.url, "site root is not https; local links are left alone");
        }

        let mut outcome = UpgradeOutcome::default();
        let mut batches = Vec::new();

        for column in self.columns().await? {
            let (updates, links) = self.rewrite_column(&column).await?;
            if updates.is_empty() {
                continue;
            }
            tracing::info!(
                table = %column.table,
                column = %column.column,
                rows = updates.len(),
                links,
                "rewriting"
            );
            outcome.links_upgraded += links;
            batches.extend(UpdateBatch::chunked(
                &column.table,
                &column.column,
                updates,
                self.options.max_rows_per_statement,
            ));
        }

        if batches.is_empty() {
            tracing::info!("no http links needed upgrading");
            return Ok(outcome);
        }

        let mut statements = 0usize;
        let rows = self
            .db
            .apply_batches(&batches, |batch, sql, affected| {
                statements += 1;
                writeln!(
                    progress,
                    "{sql}; -- {affected} row(s) in {}.{}",
                    batch.table, batch.column
                )
                .context("write progress")
            })
            .await?;

        outcome.statements = statements;
        outcome.rows_updated = rows;
        outcome.changed = rows > 0;
        tracing::info!(
            statements = outcome.statements,
            rows = outcome.rows_updated,
            links = outcome.links_upgraded,
            "upgrade finished"
        );
        Ok(outcome)
    }

    /// New content for every row of `column` that has at least one
    /// upgradeable link, plus the number of links rewritten.
    async fn rewrite_column(&mut self, column: &TextColumn) -> Result<(Vec<RowUpdate>, usize)> {
        let mut updates = Vec::new();
        let mut upgraded = 0usize;

        for row in self.db.candidate_rows(column).await? {
            let links = find_http_links(&row.content);
            if links.is_empty() {
                continue;
            }

            let mut replacements: HashMap<usize, String> = HashMap::new();
            for (i, link) in links.iter().enumerate() {
                if let Some(new_url) = self.replacement_for(link).await? {
                    replacements.insert(i, new_url);
                }
            }
            if replacements.is_empty() {
                continue;
            }

            let mut index = 0usize;
            let rewritten = rewrite_links(&row.content, &links, |_| {
                let r = replacements.get(&index).cloned();
                index += 1;
                r
            });
            if let Some(content) = rewritten {
                upgraded += replacements.len();
                updates.push(RowUpdate {
                    rowid: row.rowid,
                    content,
                });
            }
        }
        Ok((updates, upgraded))
    }

    /// The https URL for `link`, or None if it must stay on http.
    async fn replacement_for(&mut self, link: &LinkMatch) -> Result<Option<String>> {
        Ok(match self.verdict(link) {
            Verdict::LocalHttp => None,
            Verdict::Local => Some(link.upgraded(None)),
            Verdict::Renamed(new_host) => Some(link.upgraded(Some(&new_host))),
            Verdict::External if !self.options.verify_reachability => Some(link.upgraded(None)),
            Verdict::External => {
                let reachable = self.cache.check(&link.host, &self.probe).await?.reachable;
                reachable.then(|| link.upgraded(None))
            }
        })
    }
}
