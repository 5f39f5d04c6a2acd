use super::Record;
use crate::error::MlgError;

/// Writes records to an output destination with [`Recorder::write`].
pub trait Recorder {
    /// Writes the values in `record`, tagged with `step`.
    fn write(&mut self, step: usize, record: Record) -> Result<(), MlgError>;

    /// Persists values buffered by the recorder, if any.
    fn flush(&mut self) -> Result<(), MlgError> {
        Ok(())
    }
}
