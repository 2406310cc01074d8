/*!
 * Tests for file utility functions
 */

use std::fs;
use anyhow::Result;
use ittconv::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.itt", "<tt/>")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.itt"));
}

/// Test that a byte order mark is removed on read
#[test]
fn test_read_input_withBom_shouldStripIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "bom.itt", "\u{feff}<tt/>")?;

    assert_eq!(FileManager::read_input(&test_file)?, "<tt/>");

    Ok(())
}

/// Test that reading a missing input fails
#[test]
fn test_read_input_withMissingFile_shouldFail() {
    assert!(FileManager::read_input("missing_input_12345.itt").is_err());
}

/// Test that write_output creates parent directories
#[test]
fn test_write_output_withNestedPath_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("out").join("nested").join("result.vtt");

    FileManager::write_output(Some(&target), "WEBVTT\n\n")?;

    assert_eq!(fs::read_to_string(&target)?, "WEBVTT\n\n");

    Ok(())
}

/// Test that ensure_dir is idempotent
#[test]
fn test_ensure_dir_withExistingDir_shouldSucceed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    FileManager::ensure_dir(temp_dir.path())?;
    FileManager::ensure_dir(temp_dir.path().join("fresh"))?;
    assert!(temp_dir.path().join("fresh").is_dir());
    Ok(())
}
