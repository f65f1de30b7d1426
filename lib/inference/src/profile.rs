//! Human-readable summary of the processed preference row

use dogmatch_core::engineer::{
    columns, ENERGY_SCORE, FAMILY_COMPATIBILITY_SCORE, MAINTENANCE_SCORE, SIZE_SCORE,
};
use dogmatch_core::{round_to, FeatureRow};
use serde::Serialize;
use tracing::warn;

/// Summary scores of a user's preferences.
///
/// Each field is present only when its source column exists in the row.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_friendly: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_level: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_level: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub intelligence_level: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_preference: Option<f64>,
}

/// Extracts a [`UserProfile`]; never fails, unusable fields are omitted
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileSynthesizer;

impl ProfileSynthesizer {
    pub fn synthesize(&self, row: &FeatureRow) -> UserProfile {
        UserProfile {
            family_friendly: field(row, FAMILY_COMPATIBILITY_SCORE, 2),
            energy_level: field(row, ENERGY_SCORE, 2),
            maintenance_level: field(row, MAINTENANCE_SCORE, 2),
            intelligence_level: field(row, columns::INTELLIGENCE, 1),
            size_preference: field(row, SIZE_SCORE, 1),
        }
    }
}

fn field(row: &FeatureRow, column: &str, decimals: i32) -> Option<f64> {
    let value = row.get(column)?;
    if !value.is_finite() {
        warn!(column, value, "Non-finite profile value, omitting field");
        return None;
    }
    Some(round_to(value, decimals))
}
