//! Artifact storage for DogMatch
//!
//! Reads the fitted bundle produced at training time, verifies it against
//! its checksum manifest, and keeps one shared predictor per process.

pub mod artifacts;
pub mod cache;
pub mod metadata;

pub use artifacts::{file_checksum, ArtifactStore, FeatureInfoData, LabelEncodersData, Manifest};
pub use cache::PredictorCache;
pub use metadata::{load_breed_metadata, read_breed_csv, BreedRecord};
