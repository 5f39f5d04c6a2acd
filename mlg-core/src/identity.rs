//! Run identity: the name of a run directory.
use crate::{
    config::{Config, ParamPath},
    error::MlgError,
};
use chrono::{DateTime, TimeZone};
use serde_json::Value;
use std::fmt;

/// Format of the timestamp heading every run name.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Parameters embedded in a run name, as `(label, value)` pairs in selector order.
pub type RecordParams = Vec<(String, Value)>;

/// Name of a run directory: `<timestamp>[&label=value]*`.
///
/// Two runs started in the same second with the same selected parameters get the
/// same identity. Creating the second one fails with
/// [`MlgError::DirectoryCollision`].
///
/// Values are embedded as they are. A string value containing a path separator,
/// like `ALE/Pong-v5`, makes the run root a nested directory below the log root
/// (`<log_root>/<timestamp>&env=ALE/Pong-v5`).
#[derive(Debug, Clone, PartialEq)]
pub struct RunIdentity {
    timestamp: String,
    params: RecordParams,
    name: String,
}

impl RunIdentity {
    /// Resolves the identity of a run started at `now`.
    ///
    /// Parameters are embedded only when both `record_param` and `args` are given.
    /// Every path must resolve in `args`, otherwise this fails with
    /// [`MlgError::ConfigPathError`].
    pub fn resolve<Tz>(
        record_param: Option<&[ParamPath]>,
        args: Option<&Config>,
        now: &DateTime<Tz>,
    ) -> Result<Self, MlgError>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        let params = match (record_param, args) {
            (Some(paths), Some(args)) => paths
                .iter()
                .map(|path| args.lookup(path).map(|v| (path.label(), v.clone())))
                .collect::<Result<RecordParams, MlgError>>()?,
            _ => RecordParams::new(),
        };

        let mut name = timestamp.clone();
        for (label, value) in params.iter() {
            name.push_str(&format!("&{}={}", label, param_value_to_string(value)));
        }

        Ok(Self {
            timestamp,
            params,
            name,
        })
    }

    /// The full directory name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The timestamp part of the name.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Parameters embedded in the name.
    pub fn params(&self) -> &RecordParams {
        &self.params
    }
}

impl fmt::Display for RunIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Text of a parameter value in a run name.
///
/// Strings are embedded without quotes. Other values use compact JSON.
pub fn param_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        v => v.to_string(),
    }
}
