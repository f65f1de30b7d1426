//! # DogMatch
//!
//! A hybrid dog breed recommender over pre-trained artifacts.
//!
//! Given a user's preferences (size, exercise, temperament, ...) DogMatch
//! answers two questions at once: which breed *groups* a classifier finds
//! most likely, and which concrete *breeds* sit closest to the user in the
//! engineered feature space.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! dogmatch --artifacts-dir ./models --metadata-csv ./data/breeds.csv --http-port 5000
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use dogmatch::prelude::*;
//!
//! let cache = PredictorCache::new("./models");
//! let predictor = cache.get().unwrap();
//!
//! let input = serde_json::json!({
//!     "Size": "Medium",
//!     "Exercise Requirements (hrs/day)": 2.0,
//!     "Good with Children": "Yes",
//! });
//! let result = predictor.predict(input.as_object().unwrap(), 5);
//! ```
//!
//! ## Crate Structure
//!
//! - `dogmatch-core` - Schema, categorical encoding, feature engineering, alignment, robust scaling
//! - `dogmatch-inference` - Capability traits, k-NN backends, hybrid ranking, predictor
//! - `dogmatch-storage` - Artifact bundle loading, checksum manifest, breed metadata, cache
//! - `dogmatch-api` - actix-web REST API

// Re-export core types
pub use dogmatch_core::{
    ArtifactLoadError, CategoricalEncoder, ColumnAligner, Error, FeatureEngineer, FeatureRow,
    FeatureSchema, Result, RobustScaler, Scaler,
};

// Re-export inference
pub use dogmatch_inference::{
    BreedSuggestion, BruteForceIndex, Classifier, DogMatchPredictor, GroupPrediction, KnnClassifier,
    PredictionResult, SimilarityIndex, UserProfile,
};

// Re-export storage
pub use dogmatch_storage::{ArtifactStore, BreedRecord, PredictorCache};

// Re-export API
pub use dogmatch_api::{AppState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ArtifactLoadError, ArtifactStore, BreedSuggestion, Classifier, DogMatchPredictor, Error,
        FeatureRow, FeatureSchema, GroupPrediction, PredictionResult, PredictorCache, RestApi,
        Result, Scaler, SimilarityIndex, UserProfile,
    };
}
