// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use ittconv::app_config::{self, Config, OutputFormat};
use ittconv::diagnostics::Diagnostics;
use ittconv::file_utils::FileManager;

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Vtt,
    Ttml,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Vtt => OutputFormat::Vtt,
            CliOutputFormat::Ttml => OutputFormat::Ttml,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for ittconv
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Convert ITT subtitles to WebVTT or TTML
#[derive(Parser, Debug)]
#[command(name = "ittconv", version, about, args_conflicts_with_subcommands = true)]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// ITT file to convert
    #[arg(value_name = "INPUT_FILE")]
    input_file: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: Option<PathBuf>,

    /// Output format [default: vtt]
    #[arg(short, long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Configuration file path
    #[arg(short, long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, env = "ITTCONV_LOG_LEVEL")]
    log_level: Option<CliLogLevel>,

    /// Skip the structural check of generated TTML
    #[arg(long)]
    no_validate: bool,
}

// @struct: Colored stderr logger handed to the library
struct TerminalLogger {
    level: LevelFilter,
}

impl TerminalLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        TerminalLogger { level }
    }

    // @returns: ANSI color code and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("31", "ERROR"),
            Level::Warn => ("33", "WARN "),
            Level::Info => ("32", "INFO "),
            Level::Debug => ("36", "DEBUG"),
            Level::Trace => ("35", "TRACE"),
        }
    }
}

impl Log for TerminalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[1;{}m{} {} {}\x1B[0m",
                color,
                now,
                tag,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> ExitCode {
    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "ittconv", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    match run_convert(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_convert(options: CommandLineOptions) -> Result<()> {
    let input_file = options
        .input_file
        .ok_or_else(|| anyhow!("INPUT_FILE is required when no subcommand is specified"))?;

    // Command line values override the config file
    let mut config = match &options.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(log_level) = options.log_level {
        config.log_level = log_level.into();
    }
    if let Some(format) = options.format {
        config.format = format.into();
    }
    if options.no_validate {
        config.ttml.validate = false;
    }

    let logger = Arc::new(TerminalLogger::new(config.log_level.to_level_filter()));
    let diagnostics = Diagnostics::new(logger);
    diagnostics.debug(format_args!("Using configuration {:?}", config));

    let source = FileManager::read_input(&input_file)?;
    let output = ittconv::convert(&source, config.format, &config, &diagnostics)
        .with_context(|| format!("Failed to convert {:?}", input_file))?;

    FileManager::write_output(options.output.as_deref(), &output)?;
    if let Some(path) = &options.output {
        diagnostics.info(format_args!(
            "Converted {:?} to {} at {:?}",
            input_file, config.format, path
        ));
    }
    diagnostics.flush();
    Ok(())
}
