//! Feature schema definitions
//!
//! The schema fixes which input columns are required, which of them are
//! categorical and which are numeric, and the column order used when the
//! models were fitted.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Canonical feature layout fixed at training time.
///
/// `categorical_columns` and `numeric_columns` partition `feature_columns`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureSchema {
    /// Required input columns, in training order
    pub feature_columns: Vec<String>,

    /// Columns holding category names, label-encoded before inference
    pub categorical_columns: Vec<String>,

    /// Columns holding numbers, rescaled before inference
    pub numeric_columns: Vec<String>,
}

impl FeatureSchema {
    /// Create a schema; call [`FeatureSchema::validate`] before use
    pub fn new(
        feature_columns: Vec<String>,
        categorical_columns: Vec<String>,
        numeric_columns: Vec<String>,
    ) -> Self {
        Self {
            feature_columns,
            categorical_columns,
            numeric_columns,
        }
    }

    /// Check the partition invariant
    /// - no duplicate column names
    /// - categorical and numeric columns are disjoint
    /// - their union is exactly `feature_columns`
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.feature_columns.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        let mut seen = HashSet::new();
        for name in &self.feature_columns {
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::DuplicateColumn(name.clone()));
            }
        }

        for name in &self.categorical_columns {
            if self.numeric_columns.contains(name) {
                return Err(SchemaError::OverlappingColumn(name.clone()));
            }
        }

        for name in self.categorical_columns.iter().chain(&self.numeric_columns) {
            if !seen.contains(name.as_str()) {
                return Err(SchemaError::UnknownColumn(name.clone()));
            }
        }

        for name in &self.feature_columns {
            if !self.is_categorical(name) && !self.is_numeric(name) {
                return Err(SchemaError::UnclassifiedColumn(name.clone()));
            }
        }

        Ok(())
    }

    pub fn is_categorical(&self, column: &str) -> bool {
        self.categorical_columns.iter().any(|c| c == column)
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric_columns.iter().any(|c| c == column)
    }

    /// Required columns absent from `present`, in schema order
    pub fn missing_columns<F>(&self, mut present: F) -> Vec<String>
    where
        F: FnMut(&str) -> bool,
    {
        self.feature_columns
            .iter()
            .filter(|c| !present(c))
            .cloned()
            .collect()
    }

    pub fn n_features(&self) -> usize {
        self.feature_columns.len()
    }
}

/// Errors that can occur during schema validation
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema cannot be empty")]
    EmptySchema,

    #[error("Column '{0}' is listed more than once")]
    DuplicateColumn(String),

    #[error("Column '{0}' is both categorical and numeric")]
    OverlappingColumn(String),

    #[error("Column '{0}' is not a feature column")]
    UnknownColumn(String),

    #[error("Column '{0}' is neither categorical nor numeric")]
    UnclassifiedColumn(String),
}
