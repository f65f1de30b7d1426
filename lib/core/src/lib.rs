//! # DogMatch Core
//!
//! Core feature pipeline for the DogMatch breed recommender.
//!
//! This crate turns a user's raw preferences into the numeric row the
//! pre-trained models expect:
//!
//! - [`FeatureSchema`] - Required columns and their categorical/numeric split
//! - [`CategoricalEncoder`] - Closed-vocabulary label encoding
//! - [`FeatureEngineer`] - Five derived scores computed from fixed weight tables
//! - [`ColumnAligner`] - Reindexing to the training-time column layout
//! - [`RobustScaler`] - Median/IQR normalization of numeric columns
//!
//! ## Example
//!
//! ```rust
//! use dogmatch_core::{CategoricalEncoder, FeatureEngineer, FeatureRow};
//!
//! let encoder = CategoricalEncoder::new([(
//!     "Size".to_string(),
//!     vec!["Large".to_string(), "Medium".to_string()],
//! )]);
//!
//! let mut row = FeatureRow::new();
//! row.set("Size", encoder.encode("Size", "Medium").unwrap() as f64);
//!
//! let derived = FeatureEngineer::new(&encoder).derive(&row);
//! assert_eq!(derived.size, Some(2.0));
//! ```

pub mod aligner;
pub mod distance;
pub mod encoder;
pub mod engineer;
pub mod error;
pub mod row;
pub mod scaler;
pub mod schema;

pub use aligner::ColumnAligner;
pub use distance::{euclidean, round_to};
pub use encoder::{CategoricalEncoder, LabelEncoder};
pub use engineer::{DerivedFeatures, FeatureEngineer, DERIVED_COLUMNS};
pub use error::{ArtifactLoadError, Error, Result};
pub use row::{to_number, FeatureRow};
pub use scaler::{RobustScaler, Scaler};
pub use schema::{FeatureSchema, SchemaError};
