use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Tables the upgrade never touches. They hold serialized or audit data where
/// a blind text rewrite would corrupt state or history.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "block_instances",
    "config",
    "config_log",
    "config_plugins",
    "events_queue",
    "files",
    "filter_config",
    "grade_grades_history",
    "grade_items_history",
    "log",
    "logstore_standard_log",
    "repository_instance_config",
    "sessions",
    "upgrade_log",
    "grade_import_values",
    "grade_import_newitem",
];

/// Global configuration loaded from `~/.config/httpsreplace/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaceConfig {
    /// Path to the SQLite content database. The CLI `--db` flag wins.
    pub database: Option<PathBuf>,
    /// Public URL of the site (e.g. "https://lms.example.org"). Links to this
    /// host are treated as local.
    pub site_root: Option<String>,
    /// Connect timeout for the HTTPS HEAD probe, in seconds.
    pub probe_connect_timeout_secs: u64,
    /// Total timeout for the HTTPS HEAD probe, in seconds.
    pub probe_timeout_secs: u64,
    /// Probe external hosts before upgrading their links. When false every
    /// matched link is upgraded without network traffic.
    pub verify_reachability: bool,
    /// Upper bound on rows rewritten by one UPDATE statement. Values above
    /// 16383 are capped so the bind parameters fit SQLite's limit.
    pub max_rows_per_statement: usize,
    /// Tables (`table`) or single columns (`table.column`) never searched.
    pub exclusions: Vec<String>,
    /// Optional JSON file with `{"old.host": "new.host"}` renames.
    pub renames_file: Option<PathBuf>,
    /// Inline renames; entries from `renames_file` override these.
    pub renames: BTreeMap<String, String>,
}

impl Default for ReplaceConfig {
    fn default() -> Self {
        Self {
            database: None,
            site_root: None,
            probe_connect_timeout_secs: 3,
            probe_timeout_secs: 5,
            verify_reachability: true,
            max_rows_per_statement: 500,
            exclusions: DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
            renames_file: None,
            renames: BTreeMap::new(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("httpsreplace")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ReplaceConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ReplaceConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ReplaceConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ReplaceConfig::default();
        assert_eq!(cfg.probe_connect_timeout_secs, 3);
        assert_eq!(cfg.probe_timeout_secs, 5);
        assert!(cfg.verify_reachability);
        assert_eq!(cfg.max_rows_per_statement, 500);
        assert!(cfg.exclusions.iter().any(|t| t == "config"));
        assert!(cfg.database.is_none());
        assert!(cfg.renames.is_empty());
    }

    #[test]
    fn config_toml_roundtrip_keeps_exclusions() {
        let cfg = ReplaceConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ReplaceConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.exclusions, cfg.exclusions);
        assert_eq!(parsed.max_rows_per_statement, cfg.max_rows_per_statement);
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let toml = r#"
            database = "/srv/c.db"
            site_root = "https://lms.example.org"
        "#;
        let cfg: ReplaceConfig = toml::from_str(toml).unwrap();
        let defaults = ReplaceConfig::default();
        assert_eq!(cfg.site_root.as_deref(), Some("https://lms.example.org"));
        assert_eq!(cfg.probe_connect_timeout_secs, 3);
        assert_eq!(cfg.probe_timeout_secs, 5);
        assert!(cfg.verify_reachability);
        assert_eq!(cfg.max_rows_per_statement, 500);
        assert_eq!(cfg.exclusions, defaults.exclusions);
        assert!(cfg.renames.is_empty());
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            database = "/srv/lms/content.db"
            site_root = "https://lms.example.org"
            probe_connect_timeout_secs = 1
            probe_timeout_secs = 2
            verify_reachability = false
            max_rows_per_statement = 50
            exclusions = ["sessions", "course.fullname"]

            [renames]
            "example.com" = "secure.example.com"
        "#;
        let cfg: ReplaceConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            cfg.database.as_deref(),
            Some(std::path::Path::new("/srv/lms/content.db"))
        );
        assert_eq!(cfg.site_root.as_deref(), Some("https://lms.example.org"));
        assert!(!cfg.verify_reachability);
        assert_eq!(cfg.max_rows_per_statement, 50);
        assert_eq!(cfg.exclusions, vec!["sessions", "course.fullname"]);
        assert_eq!(
            cfg.renames.get("example.com").map(String::as_str),
            Some("secure.example.com")
        );
        assert!(cfg.renames_file.is_none());
    }
}
