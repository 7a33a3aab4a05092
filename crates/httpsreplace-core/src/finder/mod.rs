//! URL finder: report and upgrade `http://` resource links in stored HTML.
//!
//! A link is upgraded to https when its host is this site (and the site is
//! https), when the operator renamed the host, or when the host answers an
//! HTTPS HEAD probe. Probes are cached per run so each host is probed once.

mod scan;
mod upgrade;

pub use scan::{FoundLink, ScanReport};
pub use upgrade::UpgradeOutcome;

use anyhow::Result;
use std::sync::Arc;

use crate::config::ReplaceConfig;
use crate::content_db::{ContentDb, Exclusions, TextColumn};
use crate::domain_cache::DomainCache;
use crate::links::{LinkMatch, SiteRoot};
use crate::probe::ReachabilityProbe;
use crate::renames::RenameMap;

/// Run options, usually built from the config file.
#[derive(Debug, Clone)]
pub struct FinderOptions {
    pub verify_reachability: bool,
    pub max_rows_per_statement: usize,
    pub exclusions: Exclusions,
}

impl FinderOptions {
    pub fn from_config(cfg: &ReplaceConfig) -> Self {
        Self {
            verify_reachability: cfg.verify_reachability,
            max_rows_per_statement: cfg.max_rows_per_statement,
            exclusions: Exclusions::new(&cfg.exclusions),
        }
    }
}

impl Default for FinderOptions {
    fn default() -> Self {
        Self::from_config(&ReplaceConfig::default())
    }
}

/// How a single link is treated before any probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// Points at this site while the site is plain http: leave alone.
    LocalHttp,
    /// Points at this https site: upgrade without probing.
    Local,
    /// Host is renamed: upgrade to the new host without probing.
    Renamed(String),
    /// Someone else's host: reachability decides.
    External,
}

pub struct UrlFinder {
    db: ContentDb,
    site: SiteRoot,
    renames: RenameMap,
    probe: Arc<dyn ReachabilityProbe>,
    cache: DomainCache,
    options: FinderOptions,
}

impl UrlFinder {
    pub fn new(db: ContentDb, site: SiteRoot, probe: Arc<dyn ReachabilityProbe>) -> Self {
        Self {
            db,
            site,
            renames: RenameMap::new(),
            probe,
            cache: DomainCache::new(),
            options: FinderOptions::default(),
        }
    }

    pub fn with_renames(mut self, renames: RenameMap) -> Self {
        self.renames = renames;
        self
    }

    pub fn with_options(mut self, options: FinderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn site(&self) -> &SiteRoot {
        &self.site
    }

    pub fn renames(&self) -> &RenameMap {
        &self.renames
    }

    /// Network probes issued so far by this finder.
    pub fn probes_issued(&self) -> usize {
        self.cache.probes_issued()
    }

    /// Columns that scan and upgrade will search.
    pub async fn columns(&self) -> Result<Vec<TextColumn>> {
        self.db.text_columns(&self.options.exclusions).await
    }

    pub(crate) fn verdict(&self, link: &LinkMatch) -> Verdict {
        if self.site.is_local(&link.host) {
            return if self.site.is_https {
                Verdict::Local
            } else {
                Verdict::LocalHttp
            };
        }
        if let Some(new_host) = self.renames.get(&link.host) {
            return Verdict::Renamed(new_host.to_string());
        }
        Verdict::External
    }
}
