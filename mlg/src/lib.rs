//! Experiment-run bookkeeping: run directories, text logs and Tensorboard metrics.
//!
//! [`create_run`] derives a run directory from the start time and selected run
//! arguments, saves the arguments, and attaches a text logger and a
//! [`TensorboardRecorder`] to it.
//!
//! ```no_run
//! use mlg::{create_run, Config, RunConfig};
//! use serde_json::json;
//!
//! fn main() -> Result<(), mlg::MlgError> {
//!     let args = Config::new(json!({"model": {"lr": 0.01}, "env": "Pendulum-v1"}));
//!     let config = RunConfig::default().record_param(["model.lr"]);
//!
//!     // logs/<timestamp>&model-lr=0.01/
//!     let mut run = create_run(&config, Some(&args))?;
//!     for step in 0..100 {
//!         run.add_scalar("loss", (-0.1 * step as f32).exp(), step)?;
//!         if step % 10 == 0 {
//!             run.info(format!("step {}", step));
//!         }
//!     }
//!     run.shutdown()
//! }
//! ```
pub use mlg_core::{
    config, error, identity, layout, logger, record, snapshot, Config, MlgError, ParamPath,
    RecordParams, RunConfig, RunContext, RunIdentity, RunLayout, RunState,
};
pub use mlg_tensorboard::TensorboardRecorder;

use chrono::{DateTime, Local};

/// A run writing metrics with a [`TensorboardRecorder`] on the run root.
pub type IntegratedLogger = RunContext<TensorboardRecorder>;

/// Creates a run started now. See [`RunContext`] for what is created.
pub fn create_run(config: &RunConfig, args: Option<&Config>) -> Result<IntegratedLogger, MlgError> {
    RunContext::new(config, args, |dir| TensorboardRecorder::new(dir))
}

/// Creates a run started at `now`.
pub fn create_run_at(
    config: &RunConfig,
    args: Option<&Config>,
    now: &DateTime<Local>,
) -> Result<IntegratedLogger, MlgError> {
    RunContext::new_at(config, args, now, |dir| TensorboardRecorder::new(dir))
}
