use super::{Record, Recorder};
use crate::error::MlgError;

/// A recorder that ignores any record. This struct is used just for debugging.
#[derive(Debug, Default)]
pub struct NullRecorder {}

impl Recorder for NullRecorder {
    /// Discard the given record.
    fn write(&mut self, _step: usize, _record: Record) -> Result<(), MlgError> {
        Ok(())
    }
}
