//! Metric recorder writing TFRecord event files for Tensorboard.
//!
//! ```no_run
//! use mlg_core::record::{Record, Recorder};
//! use mlg_tensorboard::TensorboardRecorder;
//!
//! let mut recorder = TensorboardRecorder::new("logs/run").unwrap();
//! recorder.write(1, Record::from_scalar("loss", 0.5)).unwrap();
//! recorder.flush().unwrap();
//! ```
use mlg_core::{
    record::{Record, RecordValue, Recorder},
    MlgError,
};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tensorboard_rs::summary_writer::SummaryWriter;

/// Write records to TFRecord.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    logdir: PathBuf,
    ignore_unsupported_value: bool,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`, which must be an existing directory.
    /// Values that cannot be shown in Tensorboard are skipped.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Result<Self, MlgError> {
        Self::open(logdir.as_ref(), true)
    }

    /// Construct a [`TensorboardRecorder`] with checking unsupported record value.
    ///
    /// [`Recorder::write`] fails with [`MlgError::RecordValueTypeError`] on values
    /// other than [`RecordValue::Scalar`], [`RecordValue::Array2`],
    /// [`RecordValue::DateTime`] and [`RecordValue::String`].
    pub fn new_with_check_unsupported_value<P: AsRef<Path>>(logdir: P) -> Result<Self, MlgError> {
        Self::open(logdir.as_ref(), false)
    }

    fn open(logdir: &Path, ignore_unsupported_value: bool) -> Result<Self, MlgError> {
        if !logdir.is_dir() {
            return Err(MlgError::SinkAttachError {
                path: logdir.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
            });
        }
        check_writable(logdir)?;
        log::debug!("Open tensorboard writer in {:?}", logdir);

        Ok(Self {
            writer: SummaryWriter::new(logdir),
            logdir: logdir.to_path_buf(),
            ignore_unsupported_value,
        })
    }

    /// Directory of the event files.
    pub fn logdir(&self) -> &Path {
        &self.logdir
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [`Record`] into a TFRecord.
    ///
    /// [`RecordValue::Scalar`] is written as a scalar and [`RecordValue::Array2`] as
    /// a grey-scale image normalized to `[0, 255]`. [`RecordValue::DateTime`] and
    /// [`RecordValue::String`] are discarded.
    fn write(&mut self, step: usize, record: Record) -> Result<(), MlgError> {
        for (k, v) in record.iter() {
            match v {
                RecordValue::Scalar(v) => self.writer.add_scalar(k, *v, step),
                RecordValue::Array2(data, shape) => {
                    let (data, shape) = to_grey_image(data, shape);
                    self.writer.add_image(k, data.as_slice(), &shape, step)
                }
                RecordValue::DateTime(_) | RecordValue::String(_) => {}
                v => {
                    if !self.ignore_unsupported_value {
                        return Err(MlgError::RecordValueTypeError(format!(
                            "{} ('{}') is not supported by Tensorboard",
                            v.type_name(),
                            k
                        )));
                    }
                }
            };
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), MlgError> {
        self.writer.flush();
        Ok(())
    }
}

/// `SummaryWriter` panics when it cannot create its event file, so fail early
/// with an error instead.
fn check_writable(logdir: &Path) -> Result<(), MlgError> {
    let path = logdir.join(format!(".tfevents-check-{}", std::process::id()));
    let to_err = |source| MlgError::SinkAttachError {
        path: logdir.to_path_buf(),
        source,
    };
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(to_err)?;
    fs::remove_file(&path).map_err(to_err)
}

/// Channel-major RGB bytes with equal channels.
fn to_grey_image(data: &[f32], shape: &[usize; 2]) -> (Vec<u8>, [usize; 3]) {
    let min = data.iter().fold(f32::MAX, |m, v| v.min(m));
    let max = data.iter().fold(f32::MIN, |m, v| v.max(m));
    let scale = if max > min { max - min } else { 1.0 };
    let channel = data
        .iter()
        .map(|&e| ((e - min) / scale * 255f32) as u8)
        .collect::<Vec<_>>();

    let mut bytes = Vec::with_capacity(channel.len() * 3);
    for _ in 0..3 {
        bytes.extend_from_slice(&channel);
    }
    (bytes, [3, shape[0], shape[1]])
}
