use super::*;
use clap::Parser;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_scan() {
    match parse(&["httpsreplace", "scan"]).command {
        CliCommand::Scan { json, detail } => {
            assert!(!json);
            assert!(!detail);
        }
        _ => panic!("expected Scan"),
    }
}

#[test]
fn cli_parse_scan_json_detail() {
    match parse(&["httpsreplace", "scan", "--json", "--detail"]).command {
        CliCommand::Scan { json, detail } => {
            assert!(json);
            assert!(detail);
        }
        _ => panic!("expected Scan"),
    }
}

#[test]
fn cli_parse_upgrade_defaults_to_unconfirmed() {
    match parse(&["httpsreplace", "upgrade"]).command {
        CliCommand::Upgrade {
            confirm,
            skip_probe,
        } => {
            assert!(!confirm);
            assert!(!skip_probe);
        }
        _ => panic!("expected Upgrade"),
    }
}

#[test]
fn cli_parse_upgrade_confirm_skip_probe() {
    match parse(&["httpsreplace", "upgrade", "--confirm", "--skip-probe"]).command {
        CliCommand::Upgrade {
            confirm,
            skip_probe,
        } => {
            assert!(confirm);
            assert!(skip_probe);
        }
        _ => panic!("expected Upgrade"),
    }
}

#[test]
fn cli_parse_probe() {
    match parse(&["httpsreplace", "probe", "cdn.example.org"]).command {
        CliCommand::Probe { host } => assert_eq!(host, "cdn.example.org"),
        _ => panic!("expected Probe"),
    }
}

#[test]
fn cli_parse_columns() {
    assert!(matches!(
        parse(&["httpsreplace", "columns"]).command,
        CliCommand::Columns
    ));
}

#[test]
fn cli_parse_completions() {
    match parse(&["httpsreplace", "completions", "bash"]).command {
        CliCommand::Completions { shell } => assert_eq!(shell, clap_complete::Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_parse_global_flags_after_subcommand() {
    let cli = parse(&[
        "httpsreplace",
        "scan",
        "--db",
        "/srv/site.db",
        "--site-root",
        "https://lms.example.org",
        "--renames",
        "renames.json",
    ]);
    assert_eq!(cli.db, Some(PathBuf::from("/srv/site.db")));
    assert_eq!(cli.site_root.as_deref(), Some("https://lms.example.org"));
    assert_eq!(cli.renames, Some(PathBuf::from("renames.json")));
}

#[test]
fn cli_rejects_missing_subcommand() {
    assert!(Cli::try_parse_from(["httpsreplace"]).is_err());
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}

#[test]
fn site_flag_overrides_config() {
    let cfg = ReplaceConfig {
        site_root: Some("http://old.example.org".to_string()),
        ..Default::default()
    };
    let overrides = Overrides {
        site_root: Some("https://lms.example.org/".to_string()),
        ..Default::default()
    };
    let site = resolve_site(&overrides, &cfg).unwrap();
    assert_eq!(site.host, "lms.example.org");
    assert!(site.is_https);

    let from_cfg = resolve_site(&Overrides::default(), &cfg).unwrap();
    assert!(!from_cfg.is_https);
}

#[test]
fn missing_site_root_is_an_error() {
    let err = resolve_site(&Overrides::default(), &ReplaceConfig::default()).unwrap_err();
    assert!(format!("{err:#}").contains("--site-root"));
}

#[test]
fn rename_file_wins_over_inline_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("renames.json");
    std::fs::write(&path, r#"{"a.example.com": "file.example.com"}"#).unwrap();

    let mut cfg = ReplaceConfig::default();
    cfg.renames
        .insert("a.example.com".to_string(), "inline.example.com".to_string());
    cfg.renames
        .insert("b.example.com".to_string(), "b2.example.com".to_string());
    let overrides = Overrides {
        renames: Some(path),
        ..Default::default()
    };

    let map = resolve_renames(&overrides, &cfg).unwrap();
    assert_eq!(map.get("a.example.com"), Some("file.example.com"));
    assert_eq!(map.get("b.example.com"), Some("b2.example.com"));
}

#[test]
fn bad_rename_file_is_an_error() {
    let overrides = Overrides {
        renames: Some(PathBuf::from("/nonexistent/renames.json")),
        ..Default::default()
    };
    assert!(resolve_renames(&overrides, &ReplaceConfig::default()).is_err());
}
