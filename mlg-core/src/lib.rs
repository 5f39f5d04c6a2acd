#![warn(missing_docs)]
//! Run directories, event logging and metric recording for iterative experiments.
//!
//! A [`RunContext`] derives a run directory from the start time and selected run
//! arguments, creates it with its `checkpoint` and `result` subdirectories, saves
//! the arguments to `parameter.json`, and attaches a text logger and a metric
//! recorder to it:
//!
//! ```text
//! <log_root>/<timestamp>[&label=value]*/
//!     log.log
//!     parameter.json
//!     checkpoint/
//!     result/
//! ```
pub mod config;
pub mod error;
pub mod identity;
pub mod layout;
pub mod logger;
pub mod record;
pub mod snapshot;

mod context;
pub use config::{Config, ParamPath};
pub use context::{RunConfig, RunContext, RunState, DEFAULT_LEVEL};
pub use error::MlgError;
pub use identity::{RecordParams, RunIdentity};
pub use layout::RunLayout;
