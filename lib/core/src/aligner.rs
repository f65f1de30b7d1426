use crate::engineer::DERIVED_COLUMNS;
use crate::row::FeatureRow;

/// Reorders rows to the exact column layout the models were fitted on.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnAligner {
    layout: Vec<String>,
}

impl ColumnAligner {
    /// Layout is `feature_columns` followed by each derived column it lacks
    pub fn new(feature_columns: &[String]) -> Self {
        let mut layout = feature_columns.to_vec();
        for name in DERIVED_COLUMNS {
            if !layout.iter().any(|c| c == name) {
                layout.push(name.to_string());
            }
        }
        Self { layout }
    }

    pub fn layout(&self) -> &[String] {
        &self.layout
    }

    pub fn width(&self) -> usize {
        self.layout.len()
    }

    /// Reindex `row` to the layout. Absent columns become `0.0`, columns
    /// outside the layout are dropped.
    pub fn align(&self, row: &FeatureRow) -> FeatureRow {
        let mut aligned = FeatureRow::with_capacity(self.layout.len());
        for name in &self.layout {
            aligned.set(name, row.get(name).unwrap_or(0.0));
        }
        aligned
    }
}
