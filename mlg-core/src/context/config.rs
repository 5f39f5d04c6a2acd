//! Configuration of [`RunContext`](super::RunContext).
use crate::config::ParamPath;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

/// Configuration of [`RunContext`](super::RunContext).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct RunConfig {
    /// The directory under which run directories are created.
    pub log_root: PathBuf,

    /// Dotted paths of run arguments embedded in the name of the run directory.
    pub record_param: Option<Vec<String>>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            log_root: PathBuf::from("logs"),
            record_param: None,
        }
    }
}

impl RunConfig {
    /// Sets the log root.
    pub fn log_root(mut self, log_root: impl Into<PathBuf>) -> Self {
        self.log_root = log_root.into();
        self
    }

    /// Sets the parameters embedded in the name of the run directory, in order.
    pub fn record_param<I, S>(mut self, record_param: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record_param = Some(record_param.into_iter().map(Into::into).collect());
        self
    }

    /// Parsed [`RunConfig::record_param`].
    pub fn param_paths(&self) -> Option<Vec<ParamPath>> {
        self.record_param
            .as_ref()
            .map(|ps| ps.iter().map(|p| ParamPath::parse(p)).collect())
    }

    /// Constructs [`RunConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RunConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_run_config() -> Result<()> {
        let config = RunConfig::default()
            .log_root("runs/atari")
            .record_param(["agent.lr", "env.name"]);

        let dir = TempDir::new("run_config")?;
        let path = dir.path().join("run_config.yaml");
        config.save(&path)?;
        assert_eq!(RunConfig::load(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_partial_yaml() -> Result<()> {
        let dir = TempDir::new("run_config")?;
        let path = dir.path().join("run_config.yaml");
        std::fs::write(&path, "record_param:\n  - model.lr\n")?;

        let config = RunConfig::load(&path)?;
        assert_eq!(config.log_root, PathBuf::from("logs"));
        assert_eq!(config.param_paths(), Some(vec![ParamPath::parse("model.lr")]));
        Ok(())
    }
}
