//! Homogeneous one-dimensional data columns.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A column of input data, one value per person.
///
/// Serialized as a plain JSON array. On deserialization integers win over
/// floats, so `[1, 2]` becomes `Int` and `[1.5, 2]` becomes `Float`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Column {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Bool(Vec<bool>),
}

impl Column {
    pub fn int(values: impl IntoIterator<Item = i64>) -> Self {
        Column::Int(values.into_iter().collect())
    }

    pub fn float(values: impl IntoIterator<Item = f64>) -> Self {
        Column::Float(values.into_iter().collect())
    }

    pub fn bool(values: impl IntoIterator<Item = bool>) -> Self {
        Column::Bool(values.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Int(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Column::Int(_) => "integer",
            Column::Float(_) => "float",
            Column::Bool(_) => "boolean",
        }
    }

    /// Integer view of the column.
    ///
    /// `qname` only feeds the error message.
    pub fn as_int(&self, qname: &str) -> Result<&[i64]> {
        match self {
            Column::Int(v) => Ok(v),
            other => Err(Error::column_type(qname, "integer", other.type_name())),
        }
    }

    /// Repeat the whole column `reps` times: `[a, b]` tiled twice is `[a, b, a, b]`.
    pub fn tile(&self, reps: usize) -> Self {
        match self {
            Column::Int(v) => Column::Int(tile(v, reps)),
            Column::Float(v) => Column::Float(tile(v, reps)),
            Column::Bool(v) => Column::Bool(tile(v, reps)),
        }
    }
}

fn tile<T: Clone>(values: &[T], reps: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(values.len() * reps);
    for _ in 0..reps {
        out.extend_from_slice(values);
    }
    out
}

impl From<Vec<i64>> for Column {
    fn from(values: Vec<i64>) -> Self {
        Column::Int(values)
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Float(values)
    }
}

impl From<Vec<bool>> for Column {
    fn from(values: Vec<bool>) -> Self {
        Column::Bool(values)
    }
}
