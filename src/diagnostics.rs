/*!
 * Injected logging for the library.
 *
 * The library never touches the process-wide `log` facade. Callers hand a
 * `Diagnostics` value (any `log::Log` implementation behind an `Arc`) to the
 * parser through its options; the default discards everything.
 */

use std::fmt;
use std::sync::Arc;

use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

/// Default target used for records emitted by the library
pub const DEFAULT_TARGET: &str = "ittconv";

/// Handle to an injected log sink
#[derive(Clone)]
pub struct Diagnostics {
    sink: Arc<dyn Log>,
    target: &'static str,
}

impl Diagnostics {
    /// Forward records to `sink`
    pub fn new(sink: Arc<dyn Log>) -> Self {
        Self {
            sink,
            target: DEFAULT_TARGET,
        }
    }

    /// Drop every record
    pub fn silent() -> Self {
        Self::new(Arc::new(SilentLogger))
    }

    /// Same sink, different target
    pub fn with_target(mut self, target: &'static str) -> Self {
        self.target = target;
        self
    }

    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        let metadata = Metadata::builder().level(level).target(self.target).build();
        if self.sink.enabled(&metadata) {
            self.sink.log(
                &Record::builder()
                    .metadata(metadata)
                    .args(args)
                    .build(),
            );
        }
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    pub fn flush(&self) {
        self.sink.flush();
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::silent()
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

// @struct: Sink that accepts nothing
struct SilentLogger;

impl Log for SilentLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        false
    }

    fn log(&self, _record: &Record) {}

    fn flush(&self) {}
}

/// One captured log record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// Sink that keeps records in memory, for tests and for callers that want
/// to inspect recovered problems after a parse.
#[derive(Debug)]
pub struct MemoryLogger {
    level: LevelFilter,
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of everything recorded so far
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Messages recorded at warning level
    pub fn warnings(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.level == Level::Warn)
            .map(|entry| entry.message.clone())
            .collect()
    }

    /// Drop recorded entries so the logger can be reused
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Log for MemoryLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.entries.lock().push(LogEntry {
                level: record.level(),
                target: record.target().to_string(),
                message: record.args().to_string(),
            });
        }
    }

    fn flush(&self) {}
}
