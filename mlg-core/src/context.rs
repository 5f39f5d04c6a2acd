//! The run context: one run directory with its event logger and metric recorder.
mod config;
pub use config::RunConfig;

use crate::{
    config::Config,
    error::MlgError,
    identity::{RecordParams, RunIdentity},
    layout::RunLayout,
    logger::{autoinit_stderr, EventLogger, LineFormat, SinkId},
    record::{Record, Recorder},
    snapshot::dump_config,
};
use chrono::{DateTime, Local};
use log::{Level, LevelFilter};
use std::{fmt::Display, path::Path};

/// Level of the sinks attached by [`RunContext`].
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Debug;

/// Construction stages of a [`RunContext`].
///
/// Stages are passed strictly in order. A failure at any stage aborts
/// construction; there is no way to resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunState {
    /// Nothing done yet.
    Uninitialized,
    /// The run name is known.
    IdentityResolved,
    /// The run directory and its subdirectories exist.
    LayoutCreated,
    /// `parameter.json` is written, or skipped without arguments.
    ConfigSnapshotted,
    /// Logger sinks and the metric recorder are open.
    RecordersAttached,
    /// The context can be used.
    Ready,
}

impl RunState {
    fn next(self) -> Self {
        let next = match self {
            Self::Uninitialized => Self::IdentityResolved,
            Self::IdentityResolved => Self::LayoutCreated,
            Self::LayoutCreated => Self::ConfigSnapshotted,
            Self::ConfigSnapshotted => Self::RecordersAttached,
            Self::RecordersAttached | Self::Ready => Self::Ready,
        };
        log::trace!("{:?} -> {:?}", self, next);
        next
    }
}

/// A run of an experiment.
///
/// Construction does, in this order:
///
/// 1. resolve the [`RunIdentity`] from the current time and the selected arguments,
/// 2. create the [`RunLayout`] under [`RunConfig::log_root`],
/// 3. write the arguments to `parameter.json`,
/// 4. attach an [`EventLogger`] with a sink on `log.log` (and on stderr when
///    [`autoinit_stderr`] is on) and open the metric recorder on the run root.
///
/// The context is a scoped handle: [`RunContext::shutdown`], or dropping it,
/// removes its logger sinks and flushes the recorder. Nothing is registered in
/// process-wide exit hooks. [`EventLogger::install`] on [`RunContext::logger`]
/// is the only way a run touches process-wide state, besides the stderr stream.
///
/// ```no_run
/// use mlg_core::{record::NullRecorder, Config, RunConfig, RunContext};
/// use serde_json::json;
///
/// let args = Config::new(json!({"model": {"lr": 0.01}}));
/// let config = RunConfig::default().record_param(["model.lr"]);
/// let mut run = RunContext::new(&config, Some(&args), |_| Ok(NullRecorder::default())).unwrap();
///
/// run.info("training started");
/// run.add_scalar("loss", 0.3, 1).unwrap();
/// println!("checkpoints go to {:?}", run.ckpt_dir());
/// run.shutdown().unwrap();
/// ```
pub struct RunContext<R: Recorder> {
    identity: RunIdentity,
    layout: RunLayout,
    logger: EventLogger,
    sinks: Vec<SinkId>,
    recorder: R,
    state: RunState,
    closed: bool,
}

impl<R: Recorder> RunContext<R> {
    /// Creates a run started now.
    ///
    /// `open_recorder` receives the run root and opens the metric recorder on it.
    pub fn new<F>(config: &RunConfig, args: Option<&Config>, open_recorder: F) -> Result<Self, MlgError>
    where
        F: FnOnce(&Path) -> Result<R, MlgError>,
    {
        Self::new_at(config, args, &Local::now(), open_recorder)
    }

    /// Creates a run started at `now`.
    pub fn new_at<F>(
        config: &RunConfig,
        args: Option<&Config>,
        now: &DateTime<Local>,
        open_recorder: F,
    ) -> Result<Self, MlgError>
    where
        F: FnOnce(&Path) -> Result<R, MlgError>,
    {
        let state = RunState::Uninitialized;

        let record_param = config.param_paths();
        let identity = RunIdentity::resolve(record_param.as_deref(), args, now)?;
        let state = state.next();

        let layout = RunLayout::create(&config.log_root, &identity)?;
        let state = state.next();

        dump_config(args, layout.root())?;
        let state = state.next();

        let logger = EventLogger::new();
        let (sinks, recorder) = match attach(&logger, &layout, open_recorder) {
            Ok(attached) => attached,
            Err(e) => {
                logger.remove_all();
                return Err(e);
            }
        };
        let state = state.next().next();
        log::info!("Run directory: {:?}", layout.root());

        Ok(Self {
            identity,
            layout,
            logger,
            sinks,
            recorder,
            state,
            closed: false,
        })
    }

    /// Identity of the run.
    pub fn identity(&self) -> &RunIdentity {
        &self.identity
    }

    /// Arguments embedded in the name of the run directory.
    pub fn record_params(&self) -> &RecordParams {
        self.identity.params()
    }

    /// Paths of the run directory.
    pub fn layout(&self) -> &RunLayout {
        &self.layout
    }

    /// The run root.
    pub fn exp_dir(&self) -> &Path {
        self.layout.root()
    }

    /// Directory for checkpoints of models, data, etc.
    pub fn ckpt_dir(&self) -> &Path {
        self.layout.checkpoint_dir()
    }

    /// Directory for intermediate results.
    pub fn result_dir(&self) -> &Path {
        self.layout.result_dir()
    }

    /// The event logger of the run.
    ///
    /// Sinks added through this handle are not removed by
    /// [`RunContext::shutdown`].
    pub fn logger(&self) -> &EventLogger {
        &self.logger
    }

    /// The metric recorder.
    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    /// The metric recorder.
    pub fn recorder_mut(&mut self) -> &mut R {
        &mut self.recorder
    }

    /// Construction stage; always [`RunState::Ready`] for a constructed context.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Emits one event to the sinks of the run.
    pub fn log(&self, level: Level, msg: impl Display) {
        self.logger.log(level, format_args!("{}", msg));
    }

    /// Emits an event at [`Level::Trace`].
    pub fn trace(&self, msg: impl Display) {
        self.log(Level::Trace, msg);
    }

    /// Emits an event at [`Level::Debug`].
    pub fn debug(&self, msg: impl Display) {
        self.log(Level::Debug, msg);
    }

    /// Emits an event at [`Level::Info`].
    pub fn info(&self, msg: impl Display) {
        self.log(Level::Info, msg);
    }

    /// Emits an event at [`Level::Warn`].
    pub fn warn(&self, msg: impl Display) {
        self.log(Level::Warn, msg);
    }

    /// Emits an event at [`Level::Error`].
    pub fn error(&self, msg: impl Display) {
        self.log(Level::Error, msg);
    }

    /// Records a scalar value at `step`.
    pub fn add_scalar(&mut self, tag: &str, value: f32, step: usize) -> Result<(), MlgError> {
        self.recorder.write(step, Record::from_scalar(tag, value))
    }

    /// Records every value of `record` at `step`.
    pub fn write(&mut self, step: usize, record: Record) -> Result<(), MlgError> {
        self.recorder.write(step, record)
    }

    /// Flushes the recorder and the logger sinks.
    pub fn flush(&mut self) -> Result<(), MlgError> {
        log::Log::flush(&self.logger);
        self.recorder.flush()
    }

    /// Removes the sinks of the run and flushes the recorder.
    pub fn shutdown(mut self) -> Result<(), MlgError> {
        self.close()
    }

    fn close(&mut self) -> Result<(), MlgError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        for id in self.sinks.drain(..) {
            self.logger.remove(id);
        }
        self.recorder.flush()
    }
}

impl<R: Recorder> Drop for RunContext<R> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Failed to close run {}: {}", self.identity, e);
        }
    }
}

fn attach<R, F>(
    logger: &EventLogger,
    layout: &RunLayout,
    open_recorder: F,
) -> Result<(Vec<SinkId>, R), MlgError>
where
    F: FnOnce(&Path) -> Result<R, MlgError>,
{
    let mut sinks = Vec::new();
    if autoinit_stderr() {
        sinks.push(logger.add_stderr(LineFormat::default(), DEFAULT_LEVEL));
    }
    sinks.push(logger.add_file(layout.log_file(), LineFormat::default(), DEFAULT_LEVEL)?);
    let recorder = open_recorder(layout.root())?;
    Ok((sinks, recorder))
}
