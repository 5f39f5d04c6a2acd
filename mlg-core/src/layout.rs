//! Directory skeleton of a run.
use crate::{error::MlgError, identity::RunIdentity};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Subdirectory for model parameters, data and other checkpoints.
pub const CHECKPOINT_DIR: &str = "checkpoint";

/// Subdirectory for intermediate results.
pub const RESULT_DIR: &str = "result";

/// Text log of a run, in the run root.
pub const LOG_FILE: &str = "log.log";

/// Snapshot of the run arguments, in the run root.
pub const PARAMETER_FILE: &str = "parameter.json";

/// Paths of a run directory.
///
/// ```text
/// <log_root>/<identity>/
///     log.log
///     parameter.json
///     checkpoint/
///     result/
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    root: PathBuf,
    checkpoint_dir: PathBuf,
    result_dir: PathBuf,
}

impl RunLayout {
    /// Creates the run root and its `checkpoint` and `result` subdirectories.
    ///
    /// Missing parents of `log_root` are created. Fails with
    /// [`MlgError::DirectoryCollision`] if the run root already exists, before
    /// anything is written. Directories created before a later failure are left
    /// in place.
    pub fn create(log_root: impl AsRef<Path>, identity: &RunIdentity) -> Result<Self, MlgError> {
        let root = log_root.as_ref().join(identity.name());
        if root.exists() {
            return Err(MlgError::DirectoryCollision(root));
        }

        let layout = Self {
            checkpoint_dir: root.join(CHECKPOINT_DIR),
            result_dir: root.join(RESULT_DIR),
            root,
        };
        for dir in [&layout.checkpoint_dir, &layout.result_dir] {
            fs::create_dir_all(dir).map_err(|source| MlgError::DirectoryCreateError {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        log::debug!("Created run directory {:?}", &layout.root);

        Ok(layout)
    }

    /// The run root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/checkpoint`.
    pub fn checkpoint_dir(&self) -> &Path {
        &self.checkpoint_dir
    }

    /// `<root>/result`.
    pub fn result_dir(&self) -> &Path {
        &self.result_dir
    }

    /// `<root>/log.log`.
    pub fn log_file(&self) -> PathBuf {
        self.root.join(LOG_FILE)
    }

    /// `<root>/parameter.json`.
    pub fn parameter_file(&self) -> PathBuf {
        self.root.join(PARAMETER_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ParamPath};
    use anyhow::Result;
    use chrono::{Local, TimeZone};
    use serde_json::json;
    use tempdir::TempDir;

    fn identity() -> Result<RunIdentity> {
        let args = Config::new(json!({"agent": {"tau": 0.005}}));
        let now = Local.with_ymd_and_hms(2023, 5, 6, 7, 8, 9).unwrap();
        let record_param = [ParamPath::parse("agent.tau")];
        Ok(RunIdentity::resolve(Some(&record_param[..]), Some(&args), &now)?)
    }

    #[test]
    fn test_create_layout() -> Result<()> {
        let tmp = TempDir::new("layout")?;
        let log_root = tmp.path().join("nested").join("logs");
        let layout = RunLayout::create(&log_root, &identity()?)?;

        assert_eq!(layout.root(), log_root.join("2023-05-06_07-08-09&agent-tau=0.005"));
        assert!(layout.checkpoint_dir().is_dir());
        assert!(layout.result_dir().is_dir());
        assert_eq!(layout.checkpoint_dir().parent(), Some(layout.root()));
        assert_eq!(layout.result_dir().parent(), Some(layout.root()));
        assert_eq!(fs::read_dir(layout.checkpoint_dir())?.count(), 0);
        assert_eq!(fs::read_dir(layout.result_dir())?.count(), 0);
        assert_eq!(layout.log_file(), layout.root().join("log.log"));
        assert_eq!(layout.parameter_file(), layout.root().join("parameter.json"));
        Ok(())
    }

    #[test]
    fn test_collision() -> Result<()> {
        let tmp = TempDir::new("layout")?;
        let identity = identity()?;
        let first = RunLayout::create(tmp.path(), &identity)?;
        let marker = first.result_dir().join("keep.txt");
        fs::write(&marker, "first run")?;

        match RunLayout::create(tmp.path(), &identity) {
            Err(MlgError::DirectoryCollision(path)) => assert_eq!(path, first.root()),
            res => panic!("expected a collision, got {:?}", res),
        }
        assert_eq!(fs::read_to_string(&marker)?, "first run");
        assert_eq!(fs::read_dir(first.root())?.count(), 2);
        Ok(())
    }

    #[test]
    fn test_log_root_is_a_file() -> Result<()> {
        let tmp = TempDir::new("layout")?;
        let log_root = tmp.path().join("logs");
        fs::write(&log_root, "not a directory")?;

        let res = RunLayout::create(&log_root, &identity()?);
        assert!(matches!(res, Err(MlgError::DirectoryCreateError { .. })));
        assert_eq!(fs::read_to_string(&log_root)?, "not a directory");
        Ok(())
    }
}
