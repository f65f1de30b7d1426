//! Hybrid ranking over a normalized row
//!
//! Two independent read-only queries against the same row: the classifier
//! ranks group labels by probability, and the similarity index ranks
//! catalog breeds by distance.

use crate::catalog::BreedCatalog;
use crate::model::{Classifier, SimilarityIndex};
use dogmatch_core::{round_to, Error, Result};
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::cmp::Reverse;
use tracing::debug;

/// A group label ranked by classifier probability
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupPrediction {
    pub group: String,
    /// Probability rounded to 4 decimals
    pub score: f64,
    /// 1-based
    pub rank: usize,
}

/// A catalog breed ranked by distance to the user's row
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BreedSuggestion {
    pub breed: String,
    pub group: Option<String>,
    /// Similarity relative to the closest match, rounded to 3 decimals
    pub similarity: f64,
    /// 1-based
    pub rank: usize,
}

/// Output of both ranking paths
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    pub groups: Vec<GroupPrediction>,
    pub breeds: Vec<BreedSuggestion>,
}

/// Runs the classifier and the similarity index against one row
#[derive(Clone, Copy)]
pub struct HybridRanker<'a> {
    classifier: &'a dyn Classifier,
    index: &'a dyn SimilarityIndex,
    catalog: &'a BreedCatalog,
}

impl<'a> HybridRanker<'a> {
    pub fn new(
        classifier: &'a dyn Classifier,
        index: &'a dyn SimilarityIndex,
        catalog: &'a BreedCatalog,
    ) -> Self {
        Self {
            classifier,
            index,
            catalog,
        }
    }

    pub fn rank(&self, row: &[f64], k: usize) -> Result<Ranking> {
        Ok(Ranking {
            groups: self.group_predictions(row, k)?,
            breeds: self.breed_suggestions(row, k)?,
        })
    }

    /// The `k` most probable groups, descending; ties keep label order.
    ///
    /// Empty when the classifier has no probability capability.
    pub fn group_predictions(&self, row: &[f64], k: usize) -> Result<Vec<GroupPrediction>> {
        if !self.classifier.supports_probabilities() {
            debug!("Classifier has no probabilities, skipping grouped predictions");
            return Ok(Vec::new());
        }

        let probas = self.classifier.predict_proba(row)?;
        let classes = self.classifier.classes();
        if probas.len() != classes.len() {
            return Err(Error::InvalidDimension {
                expected: classes.len(),
                actual: probas.len(),
            });
        }

        let mut order: Vec<usize> = (0..probas.len()).collect();
        // Stable, so equal probabilities keep the classifier's label order
        order.sort_by_key(|&idx| Reverse(OrderedFloat(probas[idx])));

        Ok(order
            .into_iter()
            .take(k)
            .enumerate()
            .map(|(pos, idx)| GroupPrediction {
                group: classes[idx].clone(),
                score: round_to(probas[idx], 4),
                rank: pos + 1,
            })
            .collect())
    }

    /// The `k` nearest catalog breeds, in the index's distance order.
    ///
    /// Similarity is `1 / (1 + distance)` divided by the best similarity in
    /// the result, so the closest breed always scores 1.0.
    pub fn breed_suggestions(&self, row: &[f64], k: usize) -> Result<Vec<BreedSuggestion>> {
        let neighbor_count = k.min(self.index.len());
        let neighbors = self.index.kneighbors(row, neighbor_count)?;

        let max_sim = neighbors
            .distances
            .iter()
            .map(|d| 1.0 / (1.0 + d))
            .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |m| m.max(s))))
            .unwrap_or(1.0);

        neighbors
            .iter()
            .take(k)
            .enumerate()
            .map(|(pos, (idx, distance))| {
                let breed = self
                    .catalog
                    .breed(idx)
                    .ok_or(Error::MissingCatalogRow(idx))?;
                let raw = 1.0 / (1.0 + distance);
                let similarity = if max_sim > 0.0 { raw / max_sim } else { 0.0 };

                Ok(BreedSuggestion {
                    breed: breed.to_string(),
                    group: self.catalog.group(idx).map(str::to_string),
                    similarity: round_to(similarity, 3),
                    rank: pos + 1,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knn::BruteForceIndex;
    use crate::model::Neighbors;

    struct FixedClassifier {
        classes: Vec<String>,
        probas: Vec<f64>,
        probabilities: bool,
    }

    impl Classifier for FixedClassifier {
        fn model_type(&self) -> &str {
            "Fixed"
        }

        fn classes(&self) -> &[String] {
            &self.classes
        }

        fn supports_probabilities(&self) -> bool {
            self.probabilities
        }

        fn predict_proba(&self, _row: &[f64]) -> Result<Vec<f64>> {
            Ok(self.probas.clone())
        }
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn create_test_classifier(probas: Vec<f64>) -> FixedClassifier {
        FixedClassifier {
            classes: labels(&["Herding", "Hound", "Toy", "Working"]),
            probas,
            probabilities: true,
        }
    }

    fn create_test_catalog() -> BreedCatalog {
        BreedCatalog::new(
            labels(&["Border Collie", "Beagle", "Pug", "Rottweiler"]),
            labels(&["Herding", "Hound", "Toy", "Working"]),
        )
        .unwrap()
    }

    fn create_test_index() -> BruteForceIndex {
        BruteForceIndex::new(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![3.0, 0.0], vec![0.0, 4.0]])
    }

    #[test]
    fn test_group_predictions_sorted_with_stable_ties() {
        let classifier = create_test_classifier(vec![0.2, 0.4, 0.2, 0.2]);
        let index = create_test_index();
        let catalog = create_test_catalog();
        let ranker = HybridRanker::new(&classifier, &index, &catalog);

        let groups = ranker.group_predictions(&[0.0, 0.0], 3).unwrap();
        let names: Vec<_> = groups.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(names, vec!["Hound", "Herding", "Toy"]);
        assert_eq!(groups.iter().map(|g| g.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(groups[0].score, 0.4);
    }

    #[test]
    fn test_group_scores_rounded_to_four_places() {
        let classifier = create_test_classifier(vec![1.0 / 3.0, 2.0 / 3.0, 0.0, 0.0]);
        let index = create_test_index();
        let catalog = create_test_catalog();
        let ranker = HybridRanker::new(&classifier, &index, &catalog);

        let groups = ranker.group_predictions(&[0.0, 0.0], 2).unwrap();
        assert_eq!(groups[0].score, 0.6667);
        assert_eq!(groups[1].score, 0.3333);
    }

    #[test]
    fn test_groups_empty_without_probabilities() {
        let mut classifier = create_test_classifier(vec![0.25; 4]);
        classifier.probabilities = false;
        let index = create_test_index();
        let catalog = create_test_catalog();
        let ranker = HybridRanker::new(&classifier, &index, &catalog);

        assert!(ranker.group_predictions(&[0.0, 0.0], 2).unwrap().is_empty());
    }

    #[test]
    fn test_probability_width_mismatch() {
        let classifier = create_test_classifier(vec![1.0]);
        let index = create_test_index();
        let catalog = create_test_catalog();
        let ranker = HybridRanker::new(&classifier, &index, &catalog);

        assert!(matches!(
            ranker.group_predictions(&[0.0, 0.0], 2),
            Err(Error::InvalidDimension { expected: 4, actual: 1 })
        ));
    }

    #[test]
    fn test_breed_suggestions_normalized_to_best_match() {
        let classifier = create_test_classifier(vec![0.25; 4]);
        let index = create_test_index();
        let catalog = create_test_catalog();
        let ranker = HybridRanker::new(&classifier, &index, &catalog);

        // Distances 1, 0, 2, sqrt(17) from (1, 0)
        let breeds = ranker.breed_suggestions(&[1.0, 0.0], 3).unwrap();
        assert_eq!(breeds.len(), 3);
        assert_eq!(breeds[0].breed, "Beagle");
        assert_eq!(breeds[0].group.as_deref(), Some("Hound"));
        assert_eq!(breeds[0].similarity, 1.0);
        assert_eq!(breeds[1].breed, "Border Collie");
        assert_eq!(breeds[1].similarity, 0.5);
        assert_eq!(breeds[2].breed, "Pug");
        assert_eq!(breeds[2].similarity, 0.333);
        assert_eq!(breeds.iter().map(|b| b.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_top_match_is_one_even_without_exact_hit() {
        let classifier = create_test_classifier(vec![0.25; 4]);
        let index = create_test_index();
        let catalog = create_test_catalog();
        let ranker = HybridRanker::new(&classifier, &index, &catalog);

        let breeds = ranker.breed_suggestions(&[10.0, 10.0], 4).unwrap();
        assert_eq!(breeds[0].similarity, 1.0);
        for pair in breeds.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
    }

    #[test]
    fn test_k_beyond_index_size_returns_all_rows() {
        let classifier = create_test_classifier(vec![0.25; 4]);
        let index = create_test_index();
        let catalog = create_test_catalog();
        let ranker = HybridRanker::new(&classifier, &index, &catalog);

        let ranking = ranker.rank(&[0.0, 0.0], 10).unwrap();
        assert_eq!(ranking.breeds.len(), 4);
        assert_eq!(ranking.groups.len(), 4);
    }

    #[test]
    fn test_empty_neighbors_give_empty_suggestions() {
        struct EmptyIndex;

        impl SimilarityIndex for EmptyIndex {
            fn model_type(&self) -> &str {
                "Empty"
            }

            fn len(&self) -> usize {
                0
            }

            fn kneighbors(&self, _row: &[f64], _k: usize) -> Result<Neighbors> {
                Ok(Neighbors::default())
            }
        }

        let classifier = create_test_classifier(vec![0.25; 4]);
        let catalog = create_test_catalog();
        let ranker = HybridRanker::new(&classifier, &EmptyIndex, &catalog);

        assert!(ranker.breed_suggestions(&[0.0], 3).unwrap().is_empty());
    }

    #[test]
    fn test_missing_catalog_row_is_an_error() {
        let classifier = create_test_classifier(vec![0.25; 4]);
        let index = create_test_index();
        let catalog = BreedCatalog::new(labels(&["Border Collie"]), vec![]).unwrap();
        let ranker = HybridRanker::new(&classifier, &index, &catalog);

        assert!(matches!(
            ranker.breed_suggestions(&[1.0, 0.0], 2),
            Err(Error::MissingCatalogRow(1))
        ));
    }
}
