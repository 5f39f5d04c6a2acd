//! Line-oriented event logging with independently removable sinks.
//!
//! An [`EventLogger`] is a handle to a table of sinks. Cloning the handle shares
//! the table, so a clone installed as the process-wide logger of the [`log`]
//! crate (see [`EventLogger::install`]) writes to the same sinks as the original.
//!
//! ```no_run
//! use log::{Level, LevelFilter};
//! use mlg_core::logger::{EventLogger, LineFormat};
//!
//! let logger = EventLogger::new();
//! let console = logger.add_stderr(LineFormat::default(), LevelFilter::Info);
//! let file = logger
//!     .add_file("run.log", LineFormat::parse("{level}: {message}"), LevelFilter::Debug)
//!     .unwrap();
//! logger.log(Level::Info, format_args!("goes to both sinks"));
//! logger.remove(console);
//! logger.log(Level::Debug, format_args!("goes to run.log only"));
//! logger.remove(file);
//! ```
mod format;
mod sink;

pub use format::{LineFormat, DEFAULT_FORMAT, TIME_FORMAT};
pub use sink::SinkTarget;

use crate::error::MlgError;
use log::{Level, LevelFilter, Log, Metadata, Record};
use sink::Sink;
use std::{
    fmt,
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

static AUTOINIT_STDERR: AtomicBool = AtomicBool::new(true);

/// Enables or disables the stderr sink that every new run attaches.
///
/// The flag is process-wide. It is on by default. The standard error stream
/// always counts as attached, so this flag alone decides whether the sink is
/// added.
pub fn set_autoinit_stderr(enabled: bool) {
    AUTOINIT_STDERR.store(enabled, Ordering::SeqCst);
}

/// Whether new runs attach a stderr sink.
///
/// There is no separate check for a live stderr; it is always treated as live.
pub fn autoinit_stderr() -> bool {
    AUTOINIT_STDERR.load(Ordering::SeqCst)
}

/// Identifies a sink of an [`EventLogger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinkId(usize);

#[derive(Default)]
struct SinkTable {
    next_id: usize,
    sinks: Vec<(SinkId, Sink)>,
}

/// Dispatches log records to every registered sink.
#[derive(Clone, Default)]
pub struct EventLogger {
    table: Arc<Mutex<SinkTable>>,
}

impl EventLogger {
    /// Creates a logger without sinks.
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, SinkTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn register(&self, sink: Sink) -> SinkId {
        let mut table = self.table();
        let id = SinkId(table.next_id);
        table.next_id += 1;
        table.sinks.push((id, sink));
        id
    }

    /// Adds a sink writing to the standard error stream.
    pub fn add_stderr(&self, format: LineFormat, level: LevelFilter) -> SinkId {
        self.register(Sink::stderr(format, level))
    }

    /// Adds a sink appending to the file at `path`.
    ///
    /// The file is created if needed; its parent directory must exist.
    pub fn add_file(
        &self,
        path: impl AsRef<Path>,
        format: LineFormat,
        level: LevelFilter,
    ) -> Result<SinkId, MlgError> {
        let sink = Sink::file(path.as_ref(), format, level)?;
        Ok(self.register(sink))
    }

    /// Removes one sink. Returns `false` if it was already removed.
    pub fn remove(&self, id: SinkId) -> bool {
        let mut table = self.table();
        match table.sinks.iter().position(|(i, _)| *i == id) {
            Some(ix) => {
                let (_, sink) = table.sinks.remove(ix);
                sink.flush();
                true
            }
            None => false,
        }
    }

    /// Removes every sink and returns how many there were.
    pub fn remove_all(&self) -> usize {
        let sinks = std::mem::take(&mut self.table().sinks);
        for (_, sink) in sinks.iter() {
            sink.flush();
        }
        sinks.len()
    }

    /// Number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.table().sinks.len()
    }

    /// Targets and levels of the registered sinks, in registration order.
    pub fn sinks(&self) -> Vec<(SinkId, SinkTarget, LevelFilter)> {
        self.table()
            .sinks
            .iter()
            .map(|(id, sink)| (*id, sink.target().clone(), sink.level()))
            .collect()
    }

    /// Emits one event.
    pub fn log(&self, level: Level, args: fmt::Arguments) {
        Log::log(
            self,
            &Record::builder()
                .args(args)
                .level(level)
                .target("mlg")
                .build(),
        );
    }

    /// Registers a clone of this logger as the logger of the [`log`] crate.
    ///
    /// This can be done once per process.
    pub fn install(&self) -> Result<(), MlgError> {
        log::set_boxed_logger(Box::new(self.clone()))
            .map_err(|e| MlgError::GlobalLoggerError(e.to_string()))?;
        log::set_max_level(LevelFilter::Trace);
        Ok(())
    }
}

impl Log for EventLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.table().sinks.iter().any(|(_, s)| s.enabled(metadata))
    }

    fn log(&self, record: &Record) {
        for (_, sink) in self.table().sinks.iter() {
            sink.log(record);
        }
    }

    fn flush(&self) {
        for (_, sink) in self.table().sinks.iter() {
            sink.flush();
        }
    }
}
