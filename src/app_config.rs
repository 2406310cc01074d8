use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles loading and validating converter settings. Every
/// field has a default so a partial JSON file is accepted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Output format used when none is given on the command line
    #[serde(default)]
    pub format: OutputFormat,

    /// TTML output settings
    #[serde(default)]
    pub ttml: TtmlOptions,

    /// WebVTT output settings
    #[serde(default)]
    pub vtt: VttOptions,
}

/// Output format
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    // @format: WebVTT
    #[default]
    Vtt,
    // @format: TTML
    Ttml,
}

impl OutputFormat {
    // @returns: Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Vtt => "vtt",
            Self::Ttml => "ttml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "vtt" | "webvtt" => Ok(Self::Vtt),
            "ttml" => Ok(Self::Ttml),
            _ => Err(anyhow!("Invalid output format: {}", s)),
        }
    }
}

/// TTML output settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TtmlOptions {
    // @field: Run the structural check on generated output
    #[serde(default = "default_validate")]
    pub validate: bool,

    // @field: Spaces per indentation level
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl Default for TtmlOptions {
    fn default() -> Self {
        Self {
            validate: default_validate(),
            indent: default_indent(),
        }
    }
}

/// WebVTT output settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct VttOptions {
    // @field: Order cues by begin time
    #[serde(default = "default_true")]
    pub sort_cues: bool,

    // @field: Derive cue settings from regions
    #[serde(default = "default_true")]
    pub cue_settings: bool,

    // @field: Emit a STYLE block for colored styles
    #[serde(default = "default_true")]
    pub style_block: bool,
}

impl Default for VttOptions {
    fn default() -> Self {
        Self {
            sort_cues: true,
            cue_settings: true,
            style_block: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

/// Largest accepted TTML indentation
pub const MAX_INDENT: usize = 8;

fn default_validate() -> bool {
    true
}

fn default_indent() -> usize {
    2
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load a configuration file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ttml.indent > MAX_INDENT {
            return Err(anyhow!(
                "TTML indent must be at most {} spaces, got {}",
                MAX_INDENT,
                self.ttml.indent
            ));
        }

        Ok(())
    }
}
