use super::{Record, Recorder};
use crate::error::MlgError;

/// Buffered recorder.
///
/// Keeps every written record in memory, with its step. Useful in tests and for
/// inspecting what a run would have recorded.
#[derive(Debug, Default)]
pub struct BufferedRecorder {
    buf: Vec<(usize, Record)>,
    n_flushes: usize,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the steps and records.
    pub fn iter(&self) -> std::slice::Iter<'_, (usize, Record)> {
        self.buf.iter()
    }

    /// Number of records written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of times [`Recorder::flush`] was called.
    pub fn n_flushes(&self) -> usize {
        self.n_flushes
    }
}

impl Recorder for BufferedRecorder {
    /// Write a [`Record`] to the buffer.
    fn write(&mut self, step: usize, record: Record) -> Result<(), MlgError> {
        self.buf.push((step, record));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), MlgError> {
        self.n_flushes += 1;
        Ok(())
    }
}
