/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use ittconv::app_config::{Config, LogLevel, OutputFormat};
use log::LevelFilter;

use crate::common;

/// Test that a complete config file is loaded
#[test]
fn test_load_withValidFile_shouldReadAllSections() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
  "log_level": "warn",
  "format": "ttml",
  "ttml": { "validate": false, "indent": 4 },
  "vtt": { "sort_cues": false, "cue_settings": false, "style_block": false }
}"#,
    )?;

    let config = Config::load(&path)?;

    assert_eq!(config.log_level, LogLevel::Warn);
    assert_eq!(config.format, OutputFormat::Ttml);
    assert!(!config.ttml.validate);
    assert_eq!(config.ttml.indent, 4);
    assert!(!config.vtt.sort_cues);
    assert!(!config.vtt.cue_settings);
    assert!(!config.vtt.style_block);
    Ok(())
}

/// Test that a missing config file is reported with its path
#[test]
fn test_load_withMissingFile_shouldFail() {
    let error = Config::load("does_not_exist_12345.json").unwrap_err();
    assert!(format!("{:#}", error).contains("does_not_exist_12345.json"));
}

/// Test that invalid JSON is rejected
#[test]
fn test_load_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ format: ")?;
    assert!(Config::load(&path).is_err());
    Ok(())
}

/// Test that validation runs on load
#[test]
fn test_load_withOversizedIndent_shouldFailValidation() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", r#"{"ttml": {"indent": 12}}"#)?;
    let error = Config::load(&path).unwrap_err();
    assert!(format!("{:#}", error).contains("at most 8"));
    Ok(())
}

/// Test that log levels map onto log filters
#[test]
fn test_logLevel_toLevelFilter_shouldMatch() {
    assert_eq!(LogLevel::default().to_level_filter(), LevelFilter::Info);
    assert_eq!(LogLevel::Trace.to_level_filter(), LevelFilter::Trace);
    assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
}

/// Test that the config serializes back to lowercase enum names
#[test]
fn test_serialize_withDefaults_shouldUseLowercaseNames() -> Result<()> {
    let json = serde_json::to_string(&Config::default())?;
    assert!(json.contains(r#""log_level":"info""#));
    assert!(json.contains(r#""format":"vtt""#));
    Ok(())
}
