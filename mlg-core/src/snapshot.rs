//! Snapshot of the run arguments in `parameter.json`.
use crate::{config::Config, error::MlgError, layout::PARAMETER_FILE};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Writes `config` to `<run_root>/parameter.json`, indented by four spaces.
///
/// Does nothing when `config` is `None`. The run root must already exist.
pub fn dump_config(config: Option<&Config>, run_root: &Path) -> Result<(), MlgError> {
    let config = match config {
        Some(config) => config,
        None => return Ok(()),
    };

    let path = run_root.join(PARAMETER_FILE);
    let err = |source| MlgError::SerializationError {
        path: Some(path.clone()),
        source,
    };

    let file = File::create(&path).map_err(|e| err(serde_json::Error::io(e)))?;
    let mut writer = BufWriter::new(file);
    let mut ser =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    config.as_value().serialize(&mut ser).map_err(err)?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| err(serde_json::Error::io(e)))?;

    log::debug!("Saved run arguments to {:?}", &path);
    Ok(())
}

/// Reads back the arguments saved in a run directory.
pub fn load_snapshot(run_root: impl AsRef<Path>) -> anyhow::Result<Config> {
    Config::load(run_root.as_ref().join(PARAMETER_FILE))
}
