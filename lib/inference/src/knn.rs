//! Brute-force k-nearest-neighbour backends
//!
//! These implement the [`Classifier`] and [`SimilarityIndex`] capabilities
//! from fitted parameters exported at training time: the fitted rows, and
//! for the classifier the label of each row.

use crate::model::{Classifier, Neighbors, SimilarityIndex};
use dogmatch_core::{euclidean, Error, Result};
use serde::{Deserialize, Serialize};

/// How neighbour votes are weighted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Weighting {
    /// Every neighbour counts once
    #[default]
    Uniform,
    /// Neighbours count by inverse distance
    Distance,
}

/// k-NN classifier over the fitted rows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnnClassifier {
    #[serde(default = "default_classifier_type")]
    pub model_type: String,

    #[serde(default = "default_neighbors")]
    pub n_neighbors: usize,

    #[serde(default)]
    pub weights: Weighting,

    /// Group labels; `fit_labels` index into this list
    pub classes: Vec<String>,

    pub fit_rows: Vec<Vec<f64>>,

    pub fit_labels: Vec<usize>,
}

fn default_classifier_type() -> String {
    "KNeighborsClassifier".to_string()
}

fn default_neighbors() -> usize {
    5
}

impl KnnClassifier {
    /// Check the fitted parameters are consistent with each other
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.classes.is_empty() {
            return Err("classifier has no classes".to_string());
        }
        if self.n_neighbors == 0 {
            return Err("n_neighbors must be positive".to_string());
        }
        if self.fit_rows.is_empty() {
            return Err("classifier has no fitted rows".to_string());
        }
        if self.fit_rows.len() != self.fit_labels.len() {
            return Err(format!(
                "{} fitted rows but {} labels",
                self.fit_rows.len(),
                self.fit_labels.len()
            ));
        }
        if let Some(label) = self.fit_labels.iter().find(|&&l| l >= self.classes.len()) {
            return Err(format!("label {} is outside the {} classes", label, self.classes.len()));
        }
        check_uniform_width(&self.fit_rows)
    }

    pub fn n_features(&self) -> usize {
        self.fit_rows.first().map_or(0, Vec::len)
    }
}

impl Classifier for KnnClassifier {
    fn model_type(&self) -> &str {
        &self.model_type
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>> {
        let neighbors = nearest(&self.fit_rows, row, self.n_neighbors)?;
        let mut votes = vec![0.0f64; self.classes.len()];

        match self.weights {
            Weighting::Uniform => {
                for (idx, _) in neighbors.iter() {
                    votes[self.fit_labels[idx]] += 1.0;
                }
            }
            Weighting::Distance => {
                // Exact matches take all of the weight
                let exact = neighbors.distances.iter().any(|&d| d == 0.0);
                for (idx, distance) in neighbors.iter() {
                    let weight = match (exact, distance == 0.0) {
                        (true, true) => 1.0,
                        (true, false) => 0.0,
                        (false, _) => 1.0 / distance,
                    };
                    votes[self.fit_labels[idx]] += weight;
                }
            }
        }

        let total: f64 = votes.iter().sum();
        if !(total > 0.0) || !total.is_finite() {
            return Err(Error::Prediction(
                format!("degenerate neighbour votes (total {total})").into(),
            ));
        }
        for vote in &mut votes {
            *vote /= total;
        }
        Ok(votes)
    }
}

/// Exhaustive Euclidean nearest-neighbour index over the catalog rows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BruteForceIndex {
    #[serde(default = "default_index_type")]
    pub model_type: String,

    pub rows: Vec<Vec<f64>>,
}

fn default_index_type() -> String {
    "NearestNeighbors".to_string()
}

impl BruteForceIndex {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self {
            model_type: default_index_type(),
            rows,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.rows.is_empty() {
            return Err("index has no rows".to_string());
        }
        check_uniform_width(&self.rows)
    }

    pub fn n_features(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

impl SimilarityIndex for BruteForceIndex {
    fn model_type(&self) -> &str {
        &self.model_type
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn kneighbors(&self, row: &[f64], k: usize) -> Result<Neighbors> {
        nearest(&self.rows, row, k)
    }
}

/// The `k` rows closest to `query`, ascending by distance, ties by row order
fn nearest(rows: &[Vec<f64>], query: &[f64], k: usize) -> Result<Neighbors> {
    if let Some(first) = rows.first() {
        if first.len() != query.len() {
            return Err(Error::InvalidDimension {
                expected: first.len(),
                actual: query.len(),
            });
        }
    }

    let mut scored: Vec<(usize, f64)> = rows
        .iter()
        .enumerate()
        .map(|(idx, r)| (idx, euclidean(r, query)))
        .collect();

    // Stable sort keeps row order among equal distances
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    scored.truncate(k);

    Ok(Neighbors {
        distances: scored.iter().map(|(_, d)| *d).collect(),
        indices: scored.into_iter().map(|(idx, _)| idx).collect(),
    })
}

fn check_uniform_width(rows: &[Vec<f64>]) -> std::result::Result<(), String> {
    let width = rows.first().map_or(0, Vec::len);
    match rows.iter().position(|r| r.len() != width) {
        Some(pos) => Err(format!("row {} has width {}, expected {}", pos, rows[pos].len(), width)),
        None => Ok(()),
    }
}
