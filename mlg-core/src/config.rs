//! Run arguments as an immutable tree, with dotted-path lookup.
//!
//! The tree is a [`serde_json::Value`]: mappings, sequences and scalars. Any
//! `impl Serialize` can be turned into a [`Config`], so the arguments of a run are
//! typically the caller's own parsed configuration struct.
use crate::error::MlgError;
use serde::Serialize;
use serde_json::Value;
use std::{fmt, fs::File, io::BufReader, path::Path, str::FromStr};

/// A dotted path into a [`Config`], e.g. `model.lr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamPath {
    segments: Vec<String>,
}

impl ParamPath {
    /// Splits `path` on `.`.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    /// Segments of the path.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments joined with `-`, used as the key in a run name.
    pub fn label(&self) -> String {
        self.segments.join("-")
    }
}

impl FromStr for ParamPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for ParamPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Arguments of a run.
///
/// Supplied once when a run is created and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Config(Value);

impl Config {
    /// Wraps a JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Converts any serializable value into a [`Config`].
    ///
    /// Fails with [`MlgError::SerializationError`] for values that have no JSON
    /// representation, such as maps with non-string keys.
    pub fn from_serialize<T: Serialize + ?Sized>(args: &T) -> Result<Self, MlgError> {
        serde_json::to_value(args)
            .map(Self)
            .map_err(|source| MlgError::SerializationError { path: None, source })
    }

    /// Loads arguments from a JSON file (`.json` extension) or a YAML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let rdr = BufReader::new(File::open(path)?);
        let value = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_reader(rdr)?,
            _ => serde_yaml::from_reader(rdr)?,
        };
        Ok(Self(value))
    }

    /// The underlying tree.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Resolves `path` by descending one segment at a time.
    ///
    /// A segment indexes a mapping by key, or a sequence when it parses as an
    /// unsigned integer. Anything else fails with [`MlgError::ConfigPathError`].
    pub fn lookup(&self, path: &ParamPath) -> Result<&Value, MlgError> {
        descend(&self.0, path.segments(), path)
    }

    /// Like [`Config::lookup`], taking the path as a dotted string.
    pub fn lookup_str(&self, path: &str) -> Result<&Value, MlgError> {
        self.lookup(&ParamPath::parse(path))
    }
}

impl From<Value> for Config {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn descend<'a>(value: &'a Value, rest: &[String], path: &ParamPath) -> Result<&'a Value, MlgError> {
    let (head, rest) = match rest.split_first() {
        Some(split) => split,
        None => return Ok(value),
    };

    let child = match value {
        Value::Object(map) => map
            .get(head)
            .ok_or_else(|| MlgError::config_path(path.to_string(), format!("missing key '{}'", head)))?,
        Value::Array(seq) => {
            let ix = head.parse::<usize>().map_err(|_| {
                MlgError::config_path(
                    path.to_string(),
                    format!("'{}' is not an index into a sequence", head),
                )
            })?;
            seq.get(ix).ok_or_else(|| {
                MlgError::config_path(
                    path.to_string(),
                    format!("index {} out of range for length {}", ix, seq.len()),
                )
            })?
        }
        scalar => {
            return Err(MlgError::config_path(
                path.to_string(),
                format!("cannot index {} with '{}'", kind(scalar), head),
            ))
        }
    };

    descend(child, rest, path)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
