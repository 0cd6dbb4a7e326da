use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use vault_kv_mv::cli::Args;
use vault_kv_mv::{Config, LogLevel};

fn parse(argv: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("vault-kv-mv").chain(argv.iter().copied())).unwrap()
}

#[test]
fn two_positionals_are_source_and_destination() {
    let args = parse(&["secret/old/", "secret/new"]);
    assert_eq!(
        args.paths(),
        Some(("secret/old/".to_string(), "secret/new".to_string()))
    );
}

#[test]
fn paths_are_trimmed_and_leading_slash_dropped() {
    let args = parse(&[" /secret/foo ", "'secret/bar/'"]);
    assert_eq!(
        args.paths(),
        Some(("secret/foo".to_string(), "secret/bar/".to_string()))
    );
}

#[test]
fn positionals_are_required_unless_printing_config() {
    assert!(Args::try_parse_from(["vault-kv-mv"]).is_err());
    assert!(Args::try_parse_from(["vault-kv-mv", "secret/a"]).is_err());
    assert!(Args::try_parse_from(["vault-kv-mv", "a", "b", "c"]).is_err());

    let args = Args::try_parse_from(["vault-kv-mv", "--print-config"]).unwrap();
    assert!(args.print_config);
    assert_eq!(args.paths(), None);
}

#[test]
fn timeout_flag_accepts_seconds_with_optional_suffix() {
    assert_eq!(parse(&["--timeout", "7", "a", "b"]).timeout, Some(Duration::from_secs(7)));
    assert_eq!(parse(&["--timeout", "7s", "a", "b"]).timeout, Some(Duration::from_secs(7)));
    assert!(Args::try_parse_from(["vault-kv-mv", "--timeout", "0", "a", "b"]).is_err());
    assert!(Args::try_parse_from(["vault-kv-mv", "--timeout", "soon", "a", "b"]).is_err());
}

#[test]
fn debug_flag_wins_over_log_level() {
    assert_eq!(parse(&["-d", "--log-level", "quiet", "a", "b"]).effective_log_level(), Some(LogLevel::Debug));
    assert_eq!(parse(&["--log-level", "quiet", "a", "b"]).effective_log_level(), Some(LogLevel::Quiet));
    assert_eq!(parse(&["--log-level", "loud", "a", "b"]).effective_log_level(), None);
}

#[test]
fn overrides_replace_only_given_values() {
    let mut cfg = Config {
        address: "https://file:8200".into(),
        namespace: Some("from-env".into()),
        ..Config::default()
    };
    parse(&["--address", "http://cli:8200", "--skip-verify", "--log-file", "/tmp/x.log", "a", "b"])
        .apply_overrides(&mut cfg);

    assert_eq!(cfg.address, "http://cli:8200");
    assert_eq!(cfg.namespace.as_deref(), Some("from-env"));
    assert!(cfg.skip_verify);
    assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/x.log")));
    assert_eq!(cfg.log_level, LogLevel::Normal);
}
