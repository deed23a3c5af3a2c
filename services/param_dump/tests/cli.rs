//! End-to-end runs of the kinfu-param-dump binary

use std::fs;
use std::process::Command;

use tempfile::tempdir;

fn dump() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kinfu-param-dump"));
    cmd.arg("--no-env");
    cmd
}

#[test]
fn test_defaults_as_json() {
    let output = dump().args(["--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["kinfu_response_topic"], "/kinfu_response_topic");
    assert_eq!(json["request_action_name"], "/kinfu_output/actions/request");
    assert_eq!(
        json["kinfu_output_request_action_magic"],
        "KINFU_OUTPUT_ACTION_MAGIC_SOURCE_NAME"
    );
    assert_eq!(json["kinfu_request_topic"], "/kinfu_request_topic");
}

#[test]
fn test_config_file_and_override() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("kinfu_output.toml");
    fs::write(&path, "kinfu_response_topic = \"/from_file\"\n").unwrap();

    let output = dump()
        .arg("--config")
        .arg(&path)
        .args(["--set", "kinfu_request_topic=/from_cli"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("kinfu_response_topic = /from_file (file "));
    assert!(stdout.contains("kinfu_request_topic = /from_cli (override)"));
}

#[test]
fn test_check_magic() {
    let ok = dump()
        .args(["--check-magic", "KINFU_OUTPUT_ACTION_MAGIC_SOURCE_NAME"])
        .output()
        .unwrap();
    assert!(ok.status.success());

    let mismatch = dump().args(["--check-magic", "WRONG"]).output().unwrap();
    assert!(!mismatch.status.success());
    let stderr = String::from_utf8(mismatch.stderr).unwrap();
    assert!(stderr.contains("Action magic mismatch"));
}

#[test]
fn test_invalid_override_fails() {
    let output = dump().args(["--set", "kinfu_request_topic"]).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Invalid --set override"));
}

#[test]
fn test_list() {
    let output = dump().arg("--list").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 4);
    assert!(stdout.contains("response_topic"));
}

#[test]
fn test_env_prefix_overrides() {
    let prefix = "KINFU_PARAM_DUMP_CLI_TEST";
    let output = Command::new(env!("CARGO_BIN_EXE_kinfu-param-dump"))
        .args(["--env-prefix", prefix, "--format", "json"])
        .env(format!("{}_KINFU_RESPONSE_TOPIC", prefix), "/from_env")
        .env(
            format!("{}_KINFU_OUTPUT_REQUEST_ACTION_MAGIC", prefix),
            "ENV$MAGIC",
        )
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["kinfu_response_topic"], "/from_env");
    assert_eq!(json["kinfu_output_request_action_magic"], "ENV$MAGIC");
    assert_eq!(json["kinfu_request_topic"], "/kinfu_request_topic");
}

#[test]
fn test_no_env_ignores_prefix() {
    let prefix = "KINFU_PARAM_DUMP_CLI_NO_ENV_TEST";
    let output = dump()
        .args(["--env-prefix", prefix, "--format", "json"])
        .env(format!("{}_KINFU_RESPONSE_TOPIC", prefix), "/from_env")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["kinfu_response_topic"], "/kinfu_response_topic");
}

#[test]
fn test_list_as_json() {
    let output = dump().args(["--list", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let params = json["params"].as_array().unwrap();
    assert_eq!(params.len(), 4);
    assert_eq!(params[1]["key"], "request_action_name");
}
