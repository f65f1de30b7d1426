//! Derived feature synthesis
//!
//! Computes five scalar scores from a raw/encoded row before scaling. Each
//! score is only produced when all of its source columns are present; a
//! score whose inputs are missing or cannot be decoded is skipped, never
//! reported as an error.

use crate::encoder::CategoricalEncoder;
use crate::row::FeatureRow;
use tracing::{debug, warn};

/// Input column names the derived scores read from
pub mod columns {
    pub const SIZE: &str = "Size";
    pub const EXERCISE: &str = "Exercise Requirements (hrs/day)";
    pub const GOOD_WITH_CHILDREN: &str = "Good with Children";
    pub const INTELLIGENCE: &str = "Intelligence Rating (1-10)";
    pub const TRAINING_DIFFICULTY: &str = "Training Difficulty (1-10)";
    pub const SHEDDING: &str = "Shedding Level";
    pub const HEALTH_RISK: &str = "Health Issues Risk";
    pub const FRIENDLINESS: &str = "Friendly Rating (1-10)";
}

pub const FAMILY_COMPATIBILITY_SCORE: &str = "Family_Compatibility_Score";
pub const MAINTENANCE_SCORE: &str = "Maintenance_Score";
pub const ENERGY_SCORE: &str = "Energy_Score";
pub const INTELLIGENCE_TRAINING_RATIO: &str = "Intelligence_Training_Ratio";
pub const SIZE_SCORE: &str = "Size_Score";

/// Derived columns in the order they are appended to the model layout
pub const DERIVED_COLUMNS: [&str; 5] = [
    FAMILY_COMPATIBILITY_SCORE,
    MAINTENANCE_SCORE,
    ENERGY_SCORE,
    INTELLIGENCE_TRAINING_RATIO,
    SIZE_SCORE,
];

/// Weights keyed by category name, with a fallback for unlisted names
struct WeightTable {
    column: &'static str,
    weights: &'static [(&'static str, f64)],
    default: f64,
}

const CHILDREN_WEIGHTS: WeightTable = WeightTable {
    column: columns::GOOD_WITH_CHILDREN,
    weights: &[("yes", 1.0), ("with training", 0.5), ("no", 0.0)],
    default: 0.0,
};

const SHEDDING_WEIGHTS: WeightTable = WeightTable {
    column: columns::SHEDDING,
    weights: &[("low", 0.0), ("moderate", 0.5), ("high", 1.0), ("very high", 1.5)],
    default: 0.5,
};

const HEALTH_WEIGHTS: WeightTable = WeightTable {
    column: columns::HEALTH_RISK,
    weights: &[("low", 0.0), ("moderate", 0.5), ("high", 1.0)],
    default: 0.5,
};

const SIZE_WEIGHTS: WeightTable = WeightTable {
    column: columns::SIZE,
    weights: &[
        ("toy", 1.0),
        ("small", 1.0),
        ("small medium", 1.5),
        ("medium", 2.0),
        ("large", 3.0),
        ("giant", 4.0),
    ],
    default: 2.0,
};

impl WeightTable {
    fn weight_for(&self, name: &str) -> f64 {
        let key = canonical_name(name);
        self.weights
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, weight)| *weight)
            .unwrap_or(self.default)
    }
}

/// Lowercase, trim, and treat `-`, `_` and whitespace runs as one space
fn canonical_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The five derived scores; `None` when a score could not be computed
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedFeatures {
    pub family_compatibility: Option<f64>,
    pub maintenance: Option<f64>,
    pub energy: Option<f64>,
    pub intelligence_training_ratio: Option<f64>,
    pub size: Option<f64>,
}

impl DerivedFeatures {
    /// `(column, value)` pairs for the scores that were computed
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            (FAMILY_COMPATIBILITY_SCORE, self.family_compatibility),
            (MAINTENANCE_SCORE, self.maintenance),
            (ENERGY_SCORE, self.energy),
            (INTELLIGENCE_TRAINING_RATIO, self.intelligence_training_ratio),
            (SIZE_SCORE, self.size),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }

    pub fn write_to(&self, row: &mut FeatureRow) {
        for (name, value) in self.iter() {
            row.set(name, value);
        }
    }
}

/// Computes derived scores, decoding categorical codes through the encoder
#[derive(Debug, Clone, Copy)]
pub struct FeatureEngineer<'a> {
    encoder: &'a CategoricalEncoder,
}

impl<'a> FeatureEngineer<'a> {
    pub fn new(encoder: &'a CategoricalEncoder) -> Self {
        Self { encoder }
    }

    /// Compute every derived score whose source columns are present in `row`
    pub fn derive(&self, row: &FeatureRow) -> DerivedFeatures {
        use columns::*;

        let family_inputs = [GOOD_WITH_CHILDREN, FRIENDLINESS, TRAINING_DIFFICULTY];
        let family_compatibility = if has_all(row, &family_inputs) {
            self.weight(row, &CHILDREN_WEIGHTS).and_then(|children| {
                let friendliness = row.get(FRIENDLINESS)?;
                let training = row.get(TRAINING_DIFFICULTY)?;
                Some(children * 0.4 + friendliness * 0.1 + (10.0 - training) * 0.1)
            })
        } else {
            None
        };

        let maintenance = if has_all(row, &[SHEDDING, EXERCISE, HEALTH_RISK]) {
            let shedding = self.weight(row, &SHEDDING_WEIGHTS);
            let health = self.weight(row, &HEALTH_WEIGHTS);
            match (shedding, row.get(EXERCISE), health) {
                (Some(shedding), Some(exercise), Some(health)) => {
                    Some(shedding * 0.3 + exercise * 0.2 + health * 0.3)
                }
                _ => None,
            }
        } else {
            None
        };

        let energy = match (row.get(EXERCISE), row.get(INTELLIGENCE)) {
            (Some(exercise), Some(intelligence)) => Some(exercise * 0.4 + intelligence * 0.1),
            _ => None,
        };

        let intelligence_training_ratio =
            match (row.get(INTELLIGENCE), row.get(TRAINING_DIFFICULTY)) {
                (Some(intelligence), Some(training)) => Some(intelligence / (training + 1.0)),
                _ => None,
            };

        let size = if row.contains(SIZE) {
            self.weight(row, &SIZE_WEIGHTS)
        } else {
            None
        };

        let derived = DerivedFeatures {
            family_compatibility,
            maintenance,
            energy,
            intelligence_training_ratio,
            size,
        };
        debug!(computed = derived.iter().count(), "Derived features computed");
        derived
    }

    /// Look up the weight of the category encoded in `table.column`
    fn weight(&self, row: &FeatureRow, table: &WeightTable) -> Option<f64> {
        let code = row.get(table.column)?;
        if !self.encoder.contains(table.column) {
            warn!(
                column = table.column,
                "No encoder for weighted column, skipping derived feature"
            );
            return None;
        }
        if code < 0.0 || code.fract() != 0.0 {
            warn!(
                column = table.column,
                code,
                "Non-integral category code, skipping derived feature"
            );
            return None;
        }

        match self.encoder.decode(table.column, code as usize) {
            Ok(name) => Some(table.weight_for(name)),
            Err(e) => {
                warn!(
                    column = table.column,
                    error = %e,
                    "Could not decode category, skipping derived feature"
                );
                None
            }
        }
    }
}

fn has_all(row: &FeatureRow, columns: &[&str]) -> bool {
    columns.iter().all(|c| row.contains(c))
}
