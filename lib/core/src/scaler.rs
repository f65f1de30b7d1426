//! Robust (median/IQR) scaling of numeric columns

use crate::row::FeatureRow;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A pre-fitted normalization applied to a subset of a row's columns.
pub trait Scaler: Send + Sync {
    /// Rescale `columns` of `row` in place; every other column is untouched
    fn transform(&self, row: &mut FeatureRow, columns: &[String]) -> Result<()>;
}

/// Fitted parameters of a robust scaler.
///
/// `center` holds per-column medians and `scale` per-column interquartile
/// ranges, both aligned with the numeric column order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RobustScaler {
    #[serde(default)]
    pub center: Vec<f64>,

    #[serde(default)]
    pub scale: Vec<f64>,

    #[serde(default = "default_true")]
    pub with_centering: bool,

    #[serde(default = "default_true")]
    pub with_scaling: bool,
}

fn default_true() -> bool {
    true
}

impl RobustScaler {
    pub fn new(center: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            center,
            scale,
            with_centering: true,
            with_scaling: true,
        }
    }

    /// Number of columns the scaler was fitted on
    pub fn n_features(&self) -> Option<usize> {
        match (self.with_centering, self.with_scaling) {
            (true, _) => Some(self.center.len()),
            (false, true) => Some(self.scale.len()),
            (false, false) => None,
        }
    }

    /// Check the fitted parameters cover `n_columns` columns
    pub fn check_width(&self, n_columns: usize) -> Result<()> {
        if self.with_centering && self.center.len() != n_columns {
            return Err(Error::InvalidDimension {
                expected: n_columns,
                actual: self.center.len(),
            });
        }
        if self.with_scaling && self.scale.len() != n_columns {
            return Err(Error::InvalidDimension {
                expected: n_columns,
                actual: self.scale.len(),
            });
        }
        Ok(())
    }

    #[inline]
    fn transform_value(&self, idx: usize, value: f64) -> f64 {
        let mut x = value;
        if self.with_centering {
            x -= self.center[idx];
        }
        if self.with_scaling {
            let scale = self.scale[idx];
            // Constant columns are fitted with a zero range
            x /= if scale == 0.0 { 1.0 } else { scale };
        }
        x
    }
}

impl Scaler for RobustScaler {
    fn transform(&self, row: &mut FeatureRow, columns: &[String]) -> Result<()> {
        self.check_width(columns.len())?;

        for (idx, column) in columns.iter().enumerate() {
            let value = row
                .get(column)
                .ok_or_else(|| Error::UnknownColumn(column.clone()))?;
            row.set(column, self.transform_value(idx, value));
        }
        Ok(())
    }
}
