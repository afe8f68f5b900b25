use std::{env, fs, iter, path::PathBuf};

use clap::Parser;
use serde_json::json;
use test_log::test;

use crate::{
    command::{decode_document, Cli, Command},
    config::Config,
};

fn parse(args: &[&str]) -> Result<Command, clap::Error> {
    Cli::try_parse_from(iter::once("ztcodec").chain(args.iter().copied())).map(|cli| cli.command)
}

#[test]
fn parses_commands() {
    assert_eq!(
        parse(&["rules", "rules.json"]).unwrap(),
        Command::Rules {
            path: PathBuf::from("rules.json")
        }
    );
    assert_eq!(
        parse(&["pool", "10.0.0.0/24"]).unwrap(),
        Command::Pool {
            cidr: "10.0.0.0/24".to_owned()
        }
    );
    assert_eq!(
        parse(&["cidr", "10.0.0.1", "10.0.0.254"]).unwrap(),
        Command::Cidr {
            first: "10.0.0.1".to_owned(),
            last: "10.0.0.254".to_owned()
        }
    );
}

#[test]
fn rejects_unknown_commands() {
    assert!(parse(&[]).is_err());
    assert!(parse(&["compile", "rules.txt"]).is_err());
    assert!(parse(&["cidr", "10.0.0.1", "10.0.0.2", "10.0.0.3"]).is_err());

    let err = parse(&["pool"]).unwrap_err();
    assert!(err.to_string().contains("<CIDR>"));
}

#[test]
fn cli_definition_is_consistent() {
    <Cli as clap::CommandFactory>::command().debug_assert();
}

#[test]
fn pool_command() {
    let command = Command::Pool {
        cidr: "10.0.0.0/24".to_owned(),
    };
    let out = command.run().unwrap();

    assert_eq!(out, json!({"ipRangeStart": "10.0.0.1", "ipRangeEnd": "10.0.0.254"}));
}

#[test]
fn pool_command_rejects_bad_prefix() {
    let command = Command::Pool {
        cidr: "10.0.0.0/33".to_owned(),
    };
    let err = command.run().unwrap_err();

    assert!(err.to_string().contains("33"));
}

#[test]
fn cidr_command() {
    let command = Command::Cidr {
        first: "10.0.0.1".to_owned(),
        last: "10.0.0.254".to_owned(),
    };
    let out = command.run().unwrap();

    assert_eq!(out, json!("10.0.0.0/24"));
}

#[test]
fn rules_command_reads_a_file() {
    let path = env::temp_dir().join(format!("ztcodec-rules-{}.json", std::process::id()));
    let document = r#"[{"type": "ACTION_DROP", "not": false}, {"type": "ACTION_ACCEPT"}]"#;
    fs::write(&path, document).unwrap();

    let out = Command::Rules { path: path.clone() }.run().unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(
        out,
        json!([{"type": "ACTION_DROP", "not": false}, {"type": "ACTION_ACCEPT", "not": false}])
    );
}

#[test]
fn rules_command_missing_file() {
    let command = Command::Rules {
        path: PathBuf::from("/nonexistent/rules.json"),
    };
    let err = command.run().unwrap_err();

    assert!(err.to_string().starts_with("Reading /nonexistent/rules.json"));
}

#[test]
fn document_shapes() {
    let rule = json!({"type": "ACTION_ACCEPT", "not": false});

    let list = decode_document(&json!([rule])).unwrap();
    let set = decode_document(&json!({"rules": [rule]})).unwrap();
    let output = decode_document(&json!({"config": {"rules": [rule]}})).unwrap();

    assert_eq!(list, json!([rule]));
    assert_eq!(set["rules"], json!([rule]));
    assert_eq!(output["config"]["rules"], json!([rule]));
    assert_eq!(output["tagsByName"], json!({}));
}

#[test]
fn document_errors_surface() {
    let document = json!([{"type": "ACTION_ACCEPT"}, {"type": "BOGUS_KIND"}]);
    let err = decode_document(&document).unwrap_err();

    assert_eq!(err.to_string(), "Rule #1: Unknown rule type: BOGUS_KIND");
}

#[test]
fn config_defaults() {
    let config = <Config as traits::json::JsonSync>::new();

    assert_eq!(config.level(), tracing::Level::INFO);
    assert!(config.render(&json!({"a": 1})).unwrap().contains('\n'));

    let compact = Config {
        log_level: "debug".to_owned(),
        pretty: false,
    };

    assert_eq!(compact.level(), tracing::Level::DEBUG);
    assert_eq!(compact.render(&json!({"a": 1})).unwrap(), r#"{"a":1}"#);
}
