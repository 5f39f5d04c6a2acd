//! Record values and the key-value container passed to recorders.
use crate::error::MlgError;
use chrono::prelude::{DateTime, Local};
use std::collections::{
    hash_map::{IntoIter, Iter, Keys},
    HashMap,
};

/// Represents possible types of values that can be stored in a [`Record`].
///
/// # Variants
///
/// * `Scalar(f32)` - A single floating-point value, typically a metric
/// * `DateTime(DateTime<Local>)` - A timestamp with local timezone
/// * `Array1(Vec<f32>)` - A 1-dimensional array
/// * `Array2(Vec<f32>, [usize; 2])` - A 2-dimensional array with its shape
/// * `Array3(Vec<f32>, [usize; 3])` - A 3-dimensional array with its shape
/// * `String(String)` - A text value
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, typically used for metrics like loss or accuracy.
    Scalar(f32),

    /// A timestamp with local timezone.
    DateTime(DateTime<Local>),

    /// A 1-dimensional array of floating-point values.
    Array1(Vec<f32>),

    /// A 2-dimensional array, row-major, with its shape.
    Array2(Vec<f32>, [usize; 2]),

    /// A 3-dimensional array, row-major, with its shape.
    Array3(Vec<f32>, [usize; 3]),

    /// A text value.
    String(String),
}

impl RecordValue {
    /// Name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "Scalar",
            Self::DateTime(_) => "DateTime",
            Self::Array1(_) => "Array1",
            Self::Array2(..) => "Array2",
            Self::Array3(..) => "Array3",
            Self::String(_) => "String",
        }
    }
}

/// A container for storing key-value pairs of various data types.
///
/// # Examples
///
/// ```rust
/// use mlg_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("loss", 0.5);
/// record.insert("accuracy", RecordValue::Scalar(0.95));
///
/// assert_eq!(record.get_scalar("loss").unwrap(), 0.5);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns an iterator over the keys in the record.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Returns an iterator that consumes the record.
    pub fn into_iter_in_record(self) -> IntoIter<String, RecordValue> {
        self.0.into_iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges two records, consuming both.
    ///
    /// Values of `record` overwrite values of `self` with the same key.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Merges another record into this one in place.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    fn get_typed<T>(
        &self,
        k: &str,
        expected: &str,
        f: impl FnOnce(&RecordValue) -> Option<T>,
    ) -> Result<T, MlgError> {
        match self.0.get(k) {
            Some(v) => f(v).ok_or_else(|| {
                MlgError::RecordValueTypeError(format!(
                    "'{}' is {}, not {}",
                    k,
                    v.type_name(),
                    expected
                ))
            }),
            None => Err(MlgError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a scalar value from the record.
    ///
    /// # Errors
    ///
    /// [`MlgError::RecordKeyError`] if the key does not exist,
    /// [`MlgError::RecordValueTypeError`] if the value is not a scalar.
    pub fn get_scalar(&self, k: &str) -> Result<f32, MlgError> {
        self.get_typed(k, "Scalar", |v| match v {
            RecordValue::Scalar(v) => Some(*v),
            _ => None,
        })
    }

    /// Gets a 1-dimensional array from the record.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, MlgError> {
        self.get_typed(k, "Array1", |v| match v {
            RecordValue::Array1(v) => Some(v.clone()),
            _ => None,
        })
    }

    /// Gets a 2-dimensional array and its shape from the record.
    pub fn get_array2(&self, k: &str) -> Result<(Vec<f32>, [usize; 2]), MlgError> {
        self.get_typed(k, "Array2", |v| match v {
            RecordValue::Array2(v, s) => Some((v.clone(), *s)),
            _ => None,
        })
    }

    /// Gets a 3-dimensional array and its shape from the record.
    pub fn get_array3(&self, k: &str) -> Result<(Vec<f32>, [usize; 3]), MlgError> {
        self.get_typed(k, "Array3", |v| match v {
            RecordValue::Array3(v, s) => Some((v.clone(), *s)),
            _ => None,
        })
    }

    /// Gets a string value from the record.
    pub fn get_string(&self, k: &str) -> Result<String, MlgError> {
        self.get_typed(k, "String", |v| match v {
            RecordValue::String(s) => Some(s.clone()),
            _ => None,
        })
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}
