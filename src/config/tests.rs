use super::{apply_config, load_config_file, types::ConfigFile};
use clap::{CommandFactory, FromArgMatches};
use std::time::Duration;
use tempfile::tempdir;

use crate::args::{OutputFormat, TesterArgs};

fn parse_with_matches(cli: &[&str]) -> Result<(TesterArgs, clap::ArgMatches), String> {
    let matches = TesterArgs::command()
        .try_get_matches_from(cli)
        .map_err(|err| format!("parse failed: {}", err))?;
    let args = TesterArgs::from_arg_matches(&matches)
        .map_err(|err| format!("from matches failed: {}", err))?;
    Ok((args, matches))
}

#[test]
fn parse_toml_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("barrage.toml");
    let content = r#"
url = "http://localhost:3000"
requests = 500
concurrency = 25
timeout = "750ms"
connect_timeout = 2
output_format = "json"
"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.url.as_deref() != Some("http://localhost:3000") {
        return Err("Unexpected url".to_owned());
    }
    if config.requests != Some(500) {
        return Err("Unexpected requests".to_owned());
    }
    if config.concurrent != Some(25) {
        return Err("Expected concurrency alias to populate concurrent".to_owned());
    }
    if config.output_format != Some(OutputFormat::Json) {
        return Err("Unexpected output format".to_owned());
    }
    Ok(())
}

#[test]
fn parse_json_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("barrage.json");
    let content = r#"{
  "url": "http://localhost:3000",
  "requests": 10,
  "concurrent": 2,
  "display": true
}"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.concurrent != Some(2) || config.display != Some(true) {
        return Err("Unexpected config values".to_owned());
    }
    Ok(())
}

#[test]
fn rejects_unknown_extension() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("barrage.yaml");
    std::fs::write(&path, "url: x").map_err(|err| format!("write failed: {}", err))?;
    if load_config_file(&path).is_ok() {
        return Err("Expected unsupported extension error".to_owned());
    }
    Ok(())
}

#[test]
fn rejects_unknown_fields() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("barrage.toml");
    std::fs::write(&path, "rate = 5\n").map_err(|err| format!("write failed: {}", err))?;
    if load_config_file(&path).is_ok() {
        return Err("Expected unknown field error".to_owned());
    }
    Ok(())
}

#[test]
fn apply_config_fills_unset_values() -> Result<(), String> {
    let (mut args, matches) = parse_with_matches(&["barrage"])?;
    let config = ConfigFile {
        url: Some("http://example.test/".to_owned()),
        requests: Some(40),
        concurrent: Some(4),
        timeout: Some(super::types::DurationValue::Text("2s".to_owned())),
        ..ConfigFile::default()
    };
    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;

    if args.url.as_deref() != Some("http://example.test/") {
        return Err("Expected url from config".to_owned());
    }
    if args.requests != 40 || args.concurrent.get() != 4 {
        return Err("Expected counts from config".to_owned());
    }
    if args.request_timeout != Duration::from_secs(2) {
        return Err("Expected timeout from config".to_owned());
    }
    Ok(())
}

#[test]
fn apply_config_keeps_cli_values() -> Result<(), String> {
    let (mut args, matches) = parse_with_matches(&["barrage", "-n", "7", "-c", "3"])?;
    let config = ConfigFile {
        requests: Some(40),
        concurrent: Some(4),
        ..ConfigFile::default()
    };
    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;

    if args.requests != 7 || args.concurrent.get() != 3 {
        return Err("CLI values should win over config".to_owned());
    }
    Ok(())
}

#[test]
fn apply_config_rejects_zero_concurrency() -> Result<(), String> {
    let (mut args, matches) = parse_with_matches(&["barrage"])?;
    let config = ConfigFile {
        concurrent: Some(0),
        ..ConfigFile::default()
    };
    if apply_config(&mut args, &matches, &config).is_ok() {
        return Err("Expected zero concurrency to be rejected".to_owned());
    }
    Ok(())
}

#[test]
fn apply_config_rejects_zero_timeout() -> Result<(), String> {
    let (mut args, matches) = parse_with_matches(&["barrage"])?;
    let config = ConfigFile {
        timeout: Some(super::types::DurationValue::Seconds(0)),
        ..ConfigFile::default()
    };
    if apply_config(&mut args, &matches, &config).is_ok() {
        return Err("Expected zero timeout to be rejected".to_owned());
    }
    Ok(())
}
