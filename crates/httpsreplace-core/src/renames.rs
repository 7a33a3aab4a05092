//! Operator rename map: `old.host` → `new.host`.
//!
//! A renamed host is upgraded without probing; the operator has vouched that
//! the new host serves the same content over https.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum RenameError {
    #[error("rename map must be a JSON object of host to host: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid host {host:?} in rename map")]
    InvalidHost { host: String },
}

/// Normalized host → replacement host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameMap {
    entries: BTreeMap<String, String>,
}

impl RenameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `{"old.host": "new.host", ...}`.
    pub fn from_json(json: &str) -> Result<Self, RenameError> {
        let raw: BTreeMap<String, String> = serde_json::from_str(json)?;
        Self::from_pairs(raw)
    }

    /// Read and parse a JSON rename file.
    pub fn load_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("read rename map: {}", path.display()))?;
        Self::from_json(&data).with_context(|| format!("parse rename map: {}", path.display()))
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, RenameError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut map = Self::new();
        for (from, to) in pairs {
            map.insert(from.as_ref(), to.as_ref())?;
        }
        Ok(map)
    }

    pub fn insert(&mut self, from: &str, to: &str) -> Result<(), RenameError> {
        let from = normalize_host(from)?;
        let to = normalize_host(to)?;
        self.entries.insert(from, to);
        Ok(())
    }

    /// Entries of `other` override entries of `self`.
    pub fn merge(&mut self, other: RenameMap) {
        self.entries.extend(other.entries);
    }

    /// Replacement for a normalized host, if any.
    pub fn get(&self, host: &str) -> Option<&str> {
        self.entries.get(host).map(String::as_str)
    }

    pub fn contains(&self, host: &str) -> bool {
        self.entries.contains_key(host)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lowercase + IDNA through the URL parser. Bare hosts only: no scheme, path,
/// port or whitespace.
pub fn normalize_host(raw: &str) -> Result<String, RenameError> {
    let invalid = || RenameError::InvalidHost {
        host: raw.to_string(),
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains(|c: char| c.is_whitespace() || "/:?#@".contains(c)) {
        return Err(invalid());
    }
    let parsed = url::Url::parse(&format!("http://{trimmed}/")).map_err(|_| invalid())?;
    parsed
        .host_str()
        .map(str::to_lowercase)
        .filter(|h| !h.is_empty())
        .ok_or_else(invalid)
}
