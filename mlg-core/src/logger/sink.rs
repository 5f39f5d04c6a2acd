use super::format::LineFormat;
use crate::error::MlgError;
use env_logger::{Builder, Logger, Target, WriteStyle};
use log::{LevelFilter, Log, Metadata, Record};
use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
};

/// Where a sink writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkTarget {
    /// The standard error stream of the process.
    Stderr,

    /// A file, opened for appending.
    File(PathBuf),
}

/// One destination of an [`EventLogger`](super::EventLogger).
///
/// Rendering and filtering are done by an [`env_logger::Logger`] that owns the
/// stream.
pub(super) struct Sink {
    target: SinkTarget,
    level: LevelFilter,
    logger: Logger,
}

impl Sink {
    pub(super) fn stderr(format: LineFormat, level: LevelFilter) -> Self {
        Self {
            target: SinkTarget::Stderr,
            level,
            logger: build(Target::Stderr, WriteStyle::Auto, format, level),
        }
    }

    pub(super) fn file(path: &Path, format: LineFormat, level: LevelFilter) -> Result<Self, MlgError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| MlgError::sink_attach(path, e))?;

        Ok(Self {
            target: SinkTarget::File(path.to_path_buf()),
            level,
            logger: build(Target::Pipe(Box::new(file)), WriteStyle::Never, format, level),
        })
    }

    pub(super) fn target(&self) -> &SinkTarget {
        &self.target
    }

    pub(super) fn level(&self) -> LevelFilter {
        self.level
    }

    pub(super) fn enabled(&self, metadata: &Metadata) -> bool {
        self.logger.enabled(metadata)
    }

    pub(super) fn log(&self, record: &Record) {
        self.logger.log(record);
    }

    pub(super) fn flush(&self) {
        self.logger.flush();
    }
}

fn build(target: Target, style: WriteStyle, format: LineFormat, level: LevelFilter) -> Logger {
    Builder::new()
        .target(target)
        .write_style(style)
        .filter_level(level)
        .format(move |buf, record| format.render(buf, record))
        .build()
}
