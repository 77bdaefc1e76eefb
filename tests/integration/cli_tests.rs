//! CLI integration tests.
//!
//! Tests for argument parsing and command dispatch against the built-in
//! rules.

use clap::Parser;
use rulekit::cli::args::{Args, Command, OutputFormat};
use rulekit::cli::{execute, exit_code, EXIT_INVALID};
use rulekit::rules::{breaking, lint};
use rulekit::wire;
use rulekit::EngineConfig;
use std::io::Cursor;

fn run(argv: &[&str], stdin: &str) -> rulekit::Result<String> {
    let args = Args::try_parse_from(argv).unwrap();
    execute(&args, &EngineConfig::default(), &mut Cursor::new(stdin.as_bytes()))
}

const CHECK_REQUEST: &str = r#"{
    "files": [
        {"name": "a.proto", "package": "acme.v2", "is_syntax_unspecified": true},
        {"name": "b.proto", "package": "acme.v1"}
    ],
    "against_files": [
        {"name": "a.proto", "package": "acme.v1"},
        {"name": "old.proto", "package": "acme.v1"}
    ],
    "rule_ids": ["SYNTAX_SPECIFIED", "FILE_SAME_PACKAGE", "FILE_NO_DELETE"]
}"#;

#[test]
fn test_version_command() {
    let args = Args::try_parse_from(["rulekit", "version"]).unwrap();
    assert!(matches!(args.command, Command::Version));
    let output = run(&["rulekit", "version", "--format", "text"], "").unwrap();
    assert!(output.starts_with("rulekit "));
    assert!(output.contains("Rules: 5 (2 default) in 2 categories"));
}

#[test]
fn test_default_format_is_json() {
    let args = Args::try_parse_from(["rulekit", "info"]).unwrap();
    if std::env::var("RULEKIT_FORMAT").is_err() {
        assert_eq!(args.format, OutputFormat::Json);
    }
}

#[test]
fn test_check_reads_request_from_stdin() {
    let output = run(&["rulekit", "check", "--format", "json"], CHECK_REQUEST).unwrap();
    let response: wire::CheckResponse = serde_json::from_str(&output).unwrap();
    let found: Vec<(&str, &str)> = response
        .annotations
        .iter()
        .map(|a| (a.rule_id.as_str(), a.message.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            (breaking::FILE_NO_DELETE, "Previously present file \"old.proto\" was deleted."),
            (breaking::FILE_SAME_PACKAGE, "Package changed from \"acme.v1\" to \"acme.v2\"."),
            (lint::SYNTAX_SPECIFIED, "Syntax should be specified for file \"a.proto\"."),
        ]
    );
}

#[test]
fn test_check_reads_request_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("request.json");
    std::fs::write(&path, CHECK_REQUEST).unwrap();
    let path = path.to_string_lossy().to_string();
    let output = run(
        &["rulekit", "check", "--input", &path, "--format", "text"],
        "ignored",
    )
    .unwrap();
    assert_eq!(output.lines().count(), 3);
    assert!(output.contains("a.proto:1:1:Syntax should be specified for file \"a.proto\". (SYNTAX_SPECIFIED)"));
}

#[test]
fn test_check_with_unknown_rule_exits_invalid() {
    let err = run(
        &["rulekit", "check", "--format", "json"],
        r#"{"files": [{"name": "a.proto"}], "rule_ids": ["NO_SUCH_RULE"]}"#,
    )
    .unwrap_err();
    assert_eq!(exit_code(&err), EXIT_INVALID);
}

#[test]
fn test_check_with_duplicate_files_exits_invalid() {
    let err = run(
        &["rulekit", "check", "--format", "json"],
        r#"{"files": [{"name": "a.proto"}, {"name": "a.proto"}]}"#,
    )
    .unwrap_err();
    assert_eq!(exit_code(&err), EXIT_INVALID);
}

#[test]
fn test_list_rules_pages() {
    let output = run(&["rulekit", "list-rules", "--page-size", "2", "--format", "json"], "").unwrap();
    let page: wire::ListRulesResponse = serde_json::from_str(&output).unwrap();
    let ids: Vec<&str> = page.rules.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec![breaking::FILE_NO_DELETE, breaking::FILE_NO_REMOVE]);
    assert_eq!(page.next_page_token, breaking::FILE_SAME_PACKAGE);

    let output = run(
        &[
            "rulekit",
            "list-rules",
            "--page-size",
            "2",
            "--page-token",
            breaking::FILE_SAME_PACKAGE,
            "--format",
            "json",
        ],
        "",
    )
    .unwrap();
    let page: wire::ListRulesResponse = serde_json::from_str(&output).unwrap();
    assert_eq!(page.rules.len(), 2);
    assert_eq!(page.next_page_token, lint::SYNTAX_SPECIFIED);
}

#[test]
fn test_list_all_categories() {
    let output = run(&["rulekit", "list-categories", "--all", "--format", "json"], "").unwrap();
    let page: wire::ListCategoriesResponse = serde_json::from_str(&output).unwrap();
    let ids: Vec<&str> = page.categories.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["BASIC", "FILE"]);
    assert!(page.next_page_token.is_empty());
}

#[test]
fn test_unknown_page_token_exits_invalid() {
    let err = run(&["rulekit", "list-rules", "--page-token", "NOPE"], "").unwrap_err();
    assert_eq!(exit_code(&err), EXIT_INVALID);
}

#[test]
fn test_info_reports_license() {
    let output = run(&["rulekit", "info", "--format", "json"], "").unwrap();
    let info: wire::GetPluginInfoResponse = serde_json::from_str(&output).unwrap();
    assert_eq!(
        info.license.map(|l| l.spdx_license_id),
        Some("Apache-2.0".to_string())
    );
    assert!(!info.documentation.is_empty());
}
