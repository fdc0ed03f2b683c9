//! Loading analysis reports and reading fields out of them
//!
//! A report is whatever JSON the upstream pipeline produced. Nothing about
//! its shape is guaranteed, so every read goes through [`lookup`] and the
//! typed helpers built on it, each of which takes the default to use when
//! a key is missing or a value has the wrong type.

use crate::error::Result;
use serde_json::Value;
use std::path::Path;

/// A parsed analysis report. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Parse raw uploaded bytes. Any JSON value is accepted.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let root = serde_json::from_slice(bytes)?;
        Ok(Self { root })
    }

    /// Read and parse a report file. The extension is not checked.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_slice(&bytes)
    }

    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }
}

/// Follow `path` through nested objects.
///
/// Returns `None` as soon as a key is missing or an intermediate value is
/// not an object. An empty path returns `value` itself.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.as_object()?.get(*key))
}

/// Display text of a scalar at `path`, or `default`.
///
/// Strings come back verbatim and numbers as their JSON text (`85`, `85.5`).
/// Null, arrays and objects count as missing.
pub fn text_or(value: &Value, path: &[&str], default: &str) -> String {
    lookup(value, path)
        .and_then(scalar_text)
        .unwrap_or_else(|| default.to_string())
}

/// Numeric value at `path`, or `default` when absent or not a number.
pub fn number_or(value: &Value, path: &[&str], default: f64) -> f64 {
    lookup(value, path)
        .and_then(Value::as_f64)
        .unwrap_or(default)
}

/// Array at `path`; empty when absent or not an array.
pub fn array_at<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    lookup(value, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Whether a value counts as "present": non-zero, non-empty, or `true`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
