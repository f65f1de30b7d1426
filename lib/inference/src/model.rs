//! Capabilities the pipeline consumes from pre-trained model artifacts
//!
//! Any backend implementing these traits can be plugged into the
//! predictor. Both are queried read-only with an already normalized row.

use dogmatch_core::Result;
use parking_lot::Mutex;

/// A classifier returning one probability per group label.
pub trait Classifier {
    /// Backend name reported by the model info endpoint
    fn model_type(&self) -> &str;

    /// Group labels, in the order probabilities are returned
    fn classes(&self) -> &[String];

    /// Whether [`Classifier::predict_proba`] is meaningful for this backend
    fn supports_probabilities(&self) -> bool {
        true
    }

    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>>;
}

/// Nearest-neighbour search over the catalog rows.
pub trait SimilarityIndex {
    fn model_type(&self) -> &str;

    /// Number of indexed catalog rows
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `k` closest rows, distances ascending
    fn kneighbors(&self, row: &[f64], k: usize) -> Result<Neighbors>;
}

/// Result of a nearest-neighbour query. Both vectors have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neighbors {
    pub distances: Vec<f64>,
    pub indices: Vec<usize>,
}

impl Neighbors {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.distances.iter().copied())
    }
}

/// Serializes access to a classifier that is not safe for concurrent reads.
pub struct SerializedClassifier<C> {
    inner: Mutex<C>,
    model_type: String,
    classes: Vec<String>,
    supports_probabilities: bool,
}

impl<C: Classifier> SerializedClassifier<C> {
    pub fn new(inner: C) -> Self {
        Self {
            model_type: inner.model_type().to_string(),
            classes: inner.classes().to_vec(),
            supports_probabilities: inner.supports_probabilities(),
            inner: Mutex::new(inner),
        }
    }
}

impl<C: Classifier> Classifier for SerializedClassifier<C> {
    fn model_type(&self) -> &str {
        &self.model_type
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn supports_probabilities(&self) -> bool {
        self.supports_probabilities
    }

    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>> {
        self.inner.lock().predict_proba(row)
    }
}

/// Serializes access to an index that is not safe for concurrent reads.
pub struct SerializedIndex<I> {
    inner: Mutex<I>,
    model_type: String,
    len: usize,
}

impl<I: SimilarityIndex> SerializedIndex<I> {
    pub fn new(inner: I) -> Self {
        Self {
            model_type: inner.model_type().to_string(),
            len: inner.len(),
            inner: Mutex::new(inner),
        }
    }
}

impl<I: SimilarityIndex> SimilarityIndex for SerializedIndex<I> {
    fn model_type(&self) -> &str {
        &self.model_type
    }

    fn len(&self) -> usize {
        self.len
    }

    fn kneighbors(&self, row: &[f64], k: usize) -> Result<Neighbors> {
        self.inner.lock().kneighbors(row, k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Counts calls through a `Cell`, so it is neither `Sync` nor shareable
    struct CountingClassifier {
        classes: Vec<String>,
        calls: Cell<usize>,
    }

    impl Classifier for CountingClassifier {
        fn model_type(&self) -> &str {
            "Counting"
        }

        fn classes(&self) -> &[String] {
            &self.classes
        }

        fn predict_proba(&self, _row: &[f64]) -> Result<Vec<f64>> {
            self.calls.set(self.calls.get() + 1);
            Ok(vec![1.0 / self.classes.len() as f64; self.classes.len()])
        }
    }

    fn assert_send_sync<T: Send + Sync>(_: &T) {}

    #[test]
    fn test_serialized_classifier_is_shareable() {
        let classifier = SerializedClassifier::new(CountingClassifier {
            classes: vec!["Herding".to_string(), "Toy".to_string()],
            calls: Cell::new(0),
        });
        assert_send_sync(&classifier);

        assert_eq!(classifier.model_type(), "Counting");
        assert_eq!(classifier.classes().len(), 2);
        assert!(classifier.supports_probabilities());
        assert_eq!(classifier.predict_proba(&[0.0]).unwrap(), vec![0.5, 0.5]);
        assert_eq!(classifier.inner.lock().calls.get(), 1);
    }

    /// Nearest-first over fixed rows, counting calls through a `Cell`
    struct CountingIndex {
        rows: Vec<f64>,
        calls: Cell<usize>,
    }

    impl SimilarityIndex for CountingIndex {
        fn model_type(&self) -> &str {
            "CountingIndex"
        }

        fn len(&self) -> usize {
            self.rows.len()
        }

        fn kneighbors(&self, row: &[f64], k: usize) -> Result<Neighbors> {
            self.calls.set(self.calls.get() + 1);
            let mut order: Vec<(usize, f64)> = self
                .rows
                .iter()
                .map(|r| (r - row[0]).abs())
                .enumerate()
                .collect();
            order.sort_by(|a, b| a.1.total_cmp(&b.1));
            order.truncate(k);
            Ok(Neighbors {
                distances: order.iter().map(|&(_, d)| d).collect(),
                indices: order.iter().map(|&(i, _)| i).collect(),
            })
        }
    }

    #[test]
    fn test_serialized_index_is_shareable() {
        let index = SerializedIndex::new(CountingIndex {
            rows: vec![0.0, 5.0, 1.0],
            calls: Cell::new(0),
        });
        assert_send_sync(&index);

        assert_eq!(index.model_type(), "CountingIndex");
        assert_eq!(index.len(), 3);
        assert!(!index.is_empty());

        let neighbors = index.kneighbors(&[0.8], 2).unwrap();
        assert_eq!(neighbors.indices, vec![2, 0]);
        assert_eq!(neighbors.len(), 2);
        assert_eq!(index.inner.lock().calls.get(), 1);
    }

    #[test]
    fn test_neighbors_iter_pairs_indices_and_distances() {
        let neighbors = Neighbors {
            distances: vec![0.0, 1.5],
            indices: vec![3, 1],
        };
        assert_eq!(neighbors.iter().collect::<Vec<_>>(), vec![(3, 0.0), (1, 1.5)]);
        assert_eq!(neighbors.len(), 2);
    }
}
