//! # DogMatch Inference
//!
//! Hybrid breed recommendation over pre-trained capabilities.
//!
//! The predictor prepares a normalized row with `dogmatch-core`, then asks
//! two independent questions of it:
//!
//! - **Grouped predictions**: which breed groups does the classifier find most probable?
//! - **Breed suggestions**: which catalog breeds lie closest in feature space?
//!
//! Both capabilities are traits ([`Classifier`], [`SimilarityIndex`]) so any
//! backend can be plugged in; [`KnnClassifier`] and [`BruteForceIndex`]
//! are the bundled ones.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Input     │────>│  Prepare    │────>│ Normalized  │
//! │ (JSON map)  │     │ (core)      │     │    Row      │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                           │         │
//!                              ┌────────────┘         └───────────┐
//!                              v                                  v
//!                       ┌─────────────┐                    ┌─────────────┐
//!                       │ Classifier  │                    │ Similarity  │
//!                       │  (groups)   │                    │  (breeds)   │
//!                       └─────────────┘                    └─────────────┘
//!                              │                                  │
//!                              └──────────────┬───────────────────┘
//!                                             v
//!                                      ┌─────────────┐
//!                                      │   Result    │
//!                                      │ + profile   │
//!                                      └─────────────┘
//! ```

pub mod catalog;
pub mod knn;
pub mod model;
pub mod predictor;
pub mod profile;
pub mod rank;

pub use catalog::BreedCatalog;
pub use knn::{BruteForceIndex, KnnClassifier, Weighting};
pub use model::{Classifier, Neighbors, SerializedClassifier, SerializedIndex, SimilarityIndex};
pub use predictor::{DogMatchPredictor, FeatureInfo, ModelInfo, PredictionResult, PredictorParts};
pub use profile::{ProfileSynthesizer, UserProfile};
pub use rank::{BreedSuggestion, GroupPrediction, HybridRanker, Ranking};
