//! CLI for httpsreplace.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use httpsreplace_core::config::{self, ReplaceConfig};
use httpsreplace_core::content_db::ContentDb;
use httpsreplace_core::finder::{FinderOptions, UrlFinder};
use httpsreplace_core::links::SiteRoot;
use httpsreplace_core::probe::CurlProbe;
use httpsreplace_core::renames::RenameMap;
use std::path::PathBuf;
use std::sync::Arc;

use commands::{run_columns, run_completions, run_man, run_probe, run_scan, run_upgrade};

/// Top-level CLI for httpsreplace.
#[derive(Debug, Parser)]
#[command(name = "httpsreplace")]
#[command(
    about = "Find and upgrade http:// resource links in stored site content",
    long_about = None
)]
pub struct Cli {
    /// SQLite content database (overrides `database` in the config file).
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Public URL of the site, e.g. https://lms.example.org (overrides `site_root`).
    #[arg(long, global = true, value_name = "URL")]
    pub site_root: Option<String>,

    /// JSON file of host renames: {"old.host": "new.host"}.
    #[arg(long, global = true, value_name = "FILE")]
    pub renames: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Report external hosts whose http:// links cannot be upgraded.
    Scan {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
        /// List every external link found, not just the failing hosts.
        #[arg(long)]
        detail: bool,
    },

    /// Rewrite eligible http:// links to https:// in place.
    Upgrade {
        /// Required: content is modified in place. Back up the database first.
        #[arg(long)]
        confirm: bool,
        /// Upgrade external links without probing their hosts.
        #[arg(long)]
        skip_probe: bool,
    },

    /// Probe one host over HTTPS and print the outcome.
    Probe {
        /// Bare host name, e.g. cdn.example.org.
        host: String,
    },

    /// List the text columns that scan and upgrade search.
    Columns,

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },

    /// Print the man page (roff).
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match &cli.command {
            CliCommand::Completions { shell } => return run_completions(*shell),
            CliCommand::Man => return run_man(),
            _ => {}
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let overrides = cli_overrides(&cli);

        match cli.command {
            CliCommand::Scan { json, detail } => {
                let mut finder = build_finder(&overrides, &cfg, false).await?;
                run_scan(&mut finder, json, detail).await?;
            }
            CliCommand::Upgrade {
                confirm,
                skip_probe,
            } => {
                if !confirm {
                    anyhow::bail!(
                        "upgrade modifies content in place; back up the database and re-run with --confirm"
                    );
                }
                let mut finder = build_finder(&overrides, &cfg, skip_probe).await?;
                run_upgrade(&mut finder).await?;
            }
            CliCommand::Probe { host } => run_probe(&CurlProbe::from_config(&cfg), &host).await?,
            CliCommand::Columns => {
                let db = open_db(overrides.db.as_ref(), &cfg).await?;
                run_columns(&db, &FinderOptions::from_config(&cfg)).await?;
            }
            CliCommand::Completions { .. } | CliCommand::Man => {}
        }

        Ok(())
    }
}

/// Global flags that override config values.
#[derive(Debug, Clone, Default)]
pub(crate) struct Overrides {
    pub db: Option<PathBuf>,
    pub site_root: Option<String>,
    pub renames: Option<PathBuf>,
}

fn cli_overrides(cli: &Cli) -> Overrides {
    Overrides {
        db: cli.db.clone(),
        site_root: cli.site_root.clone(),
        renames: cli.renames.clone(),
    }
}

async fn open_db(flag: Option<&PathBuf>, cfg: &ReplaceConfig) -> Result<ContentDb> {
    let path = flag.or(cfg.database.as_ref()).context(
        "no content database: pass --db PATH or set `database` in the config file",
    )?;
    ContentDb::open_at(path).await
}

/// Inline `[renames]` from the config, overridden by the rename file
/// (`--renames` first, then `renames_file`).
pub(crate) fn resolve_renames(overrides: &Overrides, cfg: &ReplaceConfig) -> Result<RenameMap> {
    let mut renames = RenameMap::from_pairs(&cfg.renames).context("config [renames]")?;
    if let Some(path) = overrides.renames.as_ref().or(cfg.renames_file.as_ref()) {
        renames.merge(RenameMap::load_json_file(path)?);
    }
    Ok(renames)
}

pub(crate) fn resolve_site(overrides: &Overrides, cfg: &ReplaceConfig) -> Result<SiteRoot> {
    let url = overrides
        .site_root
        .as_deref()
        .or(cfg.site_root.as_deref())
        .context("no site root: pass --site-root URL or set `site_root` in the config file")?;
    SiteRoot::parse(url)
}

async fn build_finder(
    overrides: &Overrides,
    cfg: &ReplaceConfig,
    skip_probe: bool,
) -> Result<UrlFinder> {
    let site = resolve_site(overrides, cfg)?;
    let renames = resolve_renames(overrides, cfg)?;
    let mut options = FinderOptions::from_config(cfg);
    if skip_probe {
        options.verify_reachability = false;
    }
    let db = open_db(overrides.db.as_ref(), cfg).await?;
    tracing::info!(
        site = %site.url,
        renames = renames.len(),
        verify = options.verify_reachability,
        "starting"
    );
    Ok(UrlFinder::new(db, site, Arc::new(CurlProbe::from_config(cfg)))
        .with_renames(renames)
        .with_options(options))
}

#[cfg(test)]
mod tests;
