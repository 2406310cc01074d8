/*!
 * Command line tests against the built ittconv binary
 */

use std::fs;
use std::process::{Command, Output};

use anyhow::Result;

use crate::common;

fn ittconv(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ittconv"))
        .args(args)
        .env_remove("ITTCONV_LOG_LEVEL")
        .output()
        .expect("failed to run ittconv binary")
}

/// Test that WebVTT is written to stdout by default
#[test]
fn test_cli_withInputOnly_shouldPrintVtt() {
    let input = common::test_resource_path("valid_input.itt");
    let output = ittconv(&[input.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("WEBVTT\n\n"));
    assert!(stdout.contains("This is the second subtitle"));
}

/// Test that TTML is written to the requested file
#[test]
fn test_cli_withTtmlFormatAndOutput_shouldWriteFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("out.ttml");
    let input = common::test_resource_path("shifted.itt");

    let output = ittconv(&[
        input.to_str().unwrap(),
        "-f",
        "ttml",
        "-o",
        target.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let written = fs::read_to_string(&target)?;
    assert!(written.contains("<tt xmlns"));
    assert!(written.contains("Letzte Zeile"));
    Ok(())
}

/// Test that a parse failure exits non-zero and writes nothing
#[test]
fn test_cli_withMissingFrameRate_shouldFailWithoutOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("out.vtt");
    let input = common::test_resource_path("no_framerate.itt");

    let output = ittconv(&[input.to_str().unwrap(), "-o", target.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("frameRate attribute missing"));
    assert!(!target.exists());
    Ok(())
}

/// Test that a missing input file is reported
#[test]
fn test_cli_withMissingInput_shouldFail() {
    let output = ittconv(&["no_such_file_12345.itt"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Input file does not exist"));
}

/// Test that the config file selects the output format
#[test]
fn test_cli_withConfigFile_shouldUseConfiguredFormat() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::create_test_file(temp_dir.path(), "conf.json", r#"{"format": "ttml"}"#)?;
    let input = common::test_resource_path("valid_input.itt");

    let output = ittconv(&[input.to_str().unwrap(), "-c", config.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("<?xml"));
    Ok(())
}

/// Test that the log level can come from the environment
#[test]
fn test_cli_withLogLevelFromEnv_shouldEmitDebug() {
    let input = common::test_resource_path("valid_input.itt");
    let output = Command::new(env!("CARGO_BIN_EXE_ittconv"))
        .arg(input.to_str().unwrap())
        .env("ITTCONV_LOG_LEVEL", "debug")
        .output()
        .expect("failed to run ittconv binary");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("DEBUG"));
    assert!(stderr.contains("Computed effective frame rate 24"));
}

/// Test that shell completions are generated
#[test]
fn test_cli_withCompletions_shouldPrintScript() {
    let output = ittconv(&["completions", "bash"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("ittconv"));
}
