use crate::{Error, Result};
use ahash::AHashMap;
use serde_json::Value;

/// A single feature row: named `f64` columns in a fixed order.
#[derive(Debug, Clone, Default)]
pub struct FeatureRow {
    columns: Vec<String>,
    values: Vec<f64>,
    positions: AHashMap<String, usize>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            positions: AHashMap::with_capacity(capacity),
        }
    }

    /// Set `column` to `value`, appending the column if it is new
    pub fn set(&mut self, column: &str, value: f64) {
        match self.positions.get(column) {
            Some(&pos) => self.values[pos] = value,
            None => {
                self.positions.insert(column.to_string(), self.columns.len());
                self.columns.push(column.to_string());
                self.values.push(value);
            }
        }
    }

    #[inline]
    pub fn get(&self, column: &str) -> Option<f64> {
        self.positions.get(column).map(|&pos| self.values[pos])
    }

    #[inline]
    pub fn contains(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

impl PartialEq for FeatureRow {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns && self.values == other.values
    }
}

/// Convert a JSON input value to a number.
///
/// Numbers, booleans and strings holding a finite float are accepted.
pub fn to_number(column: &str, value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.filter(|n| n.is_finite()).ok_or_else(|| Error::InvalidType {
        column: column.to_string(),
        value: value.to_string(),
    })
}
