//! Prediction orchestration
//!
//! validate → encode → derive → align → scale → rank → profile → assemble

use crate::catalog::BreedCatalog;
use crate::model::{Classifier, SimilarityIndex};
use crate::profile::{ProfileSynthesizer, UserProfile};
use crate::rank::{BreedSuggestion, GroupPrediction, HybridRanker};
use dogmatch_core::{
    to_number, ArtifactLoadError, CategoricalEncoder, ColumnAligner, Error, FeatureEngineer,
    FeatureRow, FeatureSchema, Result, Scaler,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, error, info};

/// Everything a predictor is built from, already loaded
pub struct PredictorParts {
    pub schema: FeatureSchema,
    pub encoder: CategoricalEncoder,
    pub scaler: Box<dyn Scaler>,
    pub classifier: Box<dyn Classifier + Send + Sync>,
    pub index: Box<dyn SimilarityIndex + Send + Sync>,
    pub catalog: BreedCatalog,
    pub breed_names: Vec<String>,
    pub label_group_name: String,
}

/// Output of a single prediction
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PredictionResult {
    pub predictions_grouped: Vec<GroupPrediction>,
    pub similar_breeds: Vec<BreedSuggestion>,
    pub user_profile: UserProfile,
}

/// Read-only description of the input schema
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureInfo {
    pub feature_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub categorical_values: BTreeMap<String, Vec<String>>,
    pub breed_names: Vec<String>,
}

/// Read-only description of the loaded models
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModelInfo {
    pub model_type: String,
    pub similarity_model_type: String,
    pub n_features: usize,
    pub n_breeds: usize,
    pub label_group_name: String,
    pub supports_probabilities: bool,
    pub feature_engineering: bool,
    pub hybrid_system: bool,
}

/// Hybrid breed recommender over pre-trained capabilities.
///
/// Immutable after construction; safe to share across threads.
pub struct DogMatchPredictor {
    schema: FeatureSchema,
    encoder: CategoricalEncoder,
    aligner: ColumnAligner,
    scaler: Box<dyn Scaler>,
    classifier: Box<dyn Classifier + Send + Sync>,
    index: Box<dyn SimilarityIndex + Send + Sync>,
    catalog: BreedCatalog,
    breed_names: Vec<String>,
    label_group_name: String,
}

impl std::fmt::Debug for DogMatchPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DogMatchPredictor")
            .field("schema", &self.schema)
            .field("model_type", &self.classifier.model_type())
            .field("similarity_model_type", &self.index.model_type())
            .field("n_breeds", &self.breed_names.len())
            .finish()
    }
}

impl DogMatchPredictor {
    /// Assemble a predictor, checking the parts agree with each other
    pub fn new(parts: PredictorParts) -> std::result::Result<Self, ArtifactLoadError> {
        let PredictorParts {
            schema,
            encoder,
            scaler,
            classifier,
            index,
            catalog,
            breed_names,
            label_group_name,
        } = parts;

        schema
            .validate()
            .map_err(|e| ArtifactLoadError::new("feature_info", e))?;

        if let Some(column) = schema.categorical_columns.iter().find(|c| !encoder.contains(c)) {
            return Err(ArtifactLoadError::new(
                "label_encoders",
                format!("no encoder for categorical column '{column}'"),
            ));
        }
        if breed_names.is_empty() {
            return Err(ArtifactLoadError::new("feature_info", "breed_names is empty"));
        }
        if classifier.classes().is_empty() {
            return Err(ArtifactLoadError::new("classifier", "classifier has no classes"));
        }
        if catalog.len() != index.len() {
            return Err(ArtifactLoadError::new(
                "similarity",
                format!("index has {} rows but catalog has {}", index.len(), catalog.len()),
            ));
        }

        let aligner = ColumnAligner::new(&schema.feature_columns);

        info!(
            model_type = classifier.model_type(),
            similarity_model_type = index.model_type(),
            n_features = schema.n_features(),
            n_breeds = breed_names.len(),
            "Predictor ready"
        );

        Ok(Self {
            schema,
            encoder,
            aligner,
            scaler,
            classifier,
            index,
            catalog,
            breed_names,
            label_group_name,
        })
    }

    /// Recommend breeds for `input`.
    ///
    /// `top_k` must be positive and is clamped to the number of breeds.
    /// Validation problems are returned as they are; any other failure is
    /// wrapped in [`Error::Prediction`].
    pub fn predict(&self, input: &Map<String, Value>, top_k: i64) -> Result<PredictionResult> {
        if top_k <= 0 {
            return Err(Error::InvalidTopK(top_k));
        }
        let k = usize::try_from(top_k)
            .unwrap_or(usize::MAX)
            .clamp(1, self.breed_names.len());

        self.run(input, k).map_err(|e| {
            if !e.is_validation() {
                error!(error = %e, "Prediction failed");
            }
            e.into_prediction()
        })
    }

    fn run(&self, input: &Map<String, Value>, k: usize) -> Result<PredictionResult> {
        let row = self.prepare(input)?;

        let ranker =
            HybridRanker::new(self.classifier.as_ref(), self.index.as_ref(), &self.catalog);
        let ranking = ranker.rank(row.as_slice(), k)?;
        let user_profile = ProfileSynthesizer.synthesize(&row);

        debug!(
            k,
            groups = ranking.groups.len(),
            breeds = ranking.breeds.len(),
            "Prediction complete"
        );

        Ok(PredictionResult {
            predictions_grouped: ranking.groups,
            similar_breeds: ranking.breeds,
            user_profile,
        })
    }

    /// Turn raw input into the normalized row the models consume
    pub fn prepare(&self, input: &Map<String, Value>) -> Result<FeatureRow> {
        self.validate(input)?;

        let mut row = self.encode(input)?;

        let derived = FeatureEngineer::new(&self.encoder).derive(&row);
        derived.write_to(&mut row);

        let mut aligned = self.aligner.align(&row);
        self.scaler.transform(&mut aligned, &self.schema.numeric_columns)?;
        Ok(aligned)
    }

    /// Required columns present, numeric columns convertible
    fn validate(&self, input: &Map<String, Value>) -> Result<()> {
        let missing = self.schema.missing_columns(|c| input.contains_key(c));
        if !missing.is_empty() {
            return Err(Error::MissingFeature(missing));
        }

        for column in &self.schema.numeric_columns {
            if let Some(value) = input.get(column) {
                to_number(column, value)?;
            }
        }
        Ok(())
    }

    fn encode(&self, input: &Map<String, Value>) -> Result<FeatureRow> {
        let mut row = FeatureRow::with_capacity(self.aligner.width());

        for column in &self.schema.feature_columns {
            let value = input
                .get(column)
                .ok_or_else(|| Error::MissingFeature(vec![column.clone()]))?;
            let encoded = if self.schema.is_categorical(column) {
                let name = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                self.encoder.encode(column, &name)? as f64
            } else {
                to_number(column, value)?
            };
            row.set(column, encoded);
        }
        Ok(row)
    }

    pub fn feature_info(&self) -> FeatureInfo {
        FeatureInfo {
            feature_columns: self.schema.feature_columns.clone(),
            categorical_columns: self.schema.categorical_columns.clone(),
            numeric_columns: self.schema.numeric_columns.clone(),
            categorical_values: self.encoder.vocabularies(),
            breed_names: self.breed_names.clone(),
        }
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model_type: self.classifier.model_type().to_string(),
            similarity_model_type: self.index.model_type().to_string(),
            n_features: self.schema.n_features(),
            n_breeds: self.breed_names.len(),
            label_group_name: self.label_group_name.clone(),
            supports_probabilities: self.classifier.supports_probabilities(),
            feature_engineering: true,
            hybrid_system: true,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Column layout of prepared rows
    pub fn layout(&self) -> &[String] {
        self.aligner.layout()
    }

    pub fn n_breeds(&self) -> usize {
        self.breed_names.len()
    }
}
