use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

// @module: File utilities for the converter binary

/// UTF-8 byte order mark as it appears at the start of decoded text
const BOM: char = '\u{feff}';

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Read an ITT source file, dropping a leading byte order mark
    pub fn read_input<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        if !Self::file_exists(path) {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", path));
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {:?}", path))?;
        Ok(match content.strip_prefix(BOM) {
            Some(stripped) => stripped.to_string(),
            None => content,
        })
    }

    /// Write rendered output to `path`, or to stdout when no path is given
    pub fn write_output<P: AsRef<Path>>(path: Option<P>, content: &str) -> Result<()> {
        let Some(path) = path else {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")?;
            return Ok(());
        };

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent)?;
        }
        fs::write(path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path))?;
        Ok(())
    }
}
