//! Named, step-indexed values and the recorders that persist them.
//!
//! A [`Record`] holds key-value pairs of [`RecordValue`]s. A [`Recorder`] takes a
//! record together with the step counter it belongs to, e.g., the number of
//! optimization steps so far, and writes it somewhere for later visualization.
//!
//! ```rust
//! use mlg_core::record::{BufferedRecorder, Record, RecordValue, Recorder};
//!
//! let mut recorder = BufferedRecorder::new();
//! for step in 0..3 {
//!     let mut record = Record::from_scalar("loss", 1.0 / (step + 1) as f32);
//!     record.insert("phase", RecordValue::String("train".to_string()));
//!     recorder.write(step, record).unwrap();
//! }
//! assert_eq!(recorder.len(), 3);
//! ```
//!
//! Recorders in this crate:
//!
//! * [`BufferedRecorder`] - keeps records in memory
//! * [`NullRecorder`] - discards all records
//!
//! The `mlg-tensorboard` crate provides a recorder writing TFRecord event files.
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
