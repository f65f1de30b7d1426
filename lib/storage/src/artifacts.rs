// Artifact bundle loading: fitted models, encoders and scaler exported at training time
use anyhow::{anyhow, bail, Context, Result};
use dogmatch_core::{
    ArtifactLoadError, CategoricalEncoder, ColumnAligner, FeatureSchema, RobustScaler,
};
use dogmatch_inference::{
    BreedCatalog, BruteForceIndex, DogMatchPredictor, KnnClassifier, PredictorParts,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const FEATURE_INFO_FILE: &str = "feature_info.json";
pub const LABEL_ENCODERS_FILE: &str = "label_encoders.json";
pub const SCALER_FILE: &str = "robust_scaler.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const SIMILARITY_FILE: &str = "similarity.json";
pub const Y_PROCESSED_FILE: &str = "y_processed.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Schema and catalog description written next to the models
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureInfoData {
    pub feature_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub breed_names: Vec<String>,
    #[serde(default)]
    pub group_labels: Vec<String>,
    #[serde(default)]
    pub breed_labels: Vec<String>,
    #[serde(default = "default_label_group_name")]
    pub label_group_name: String,
}

fn default_label_group_name() -> String {
    "Label_Grouped".to_string()
}

/// Vocabulary per categorical column
pub type LabelEncodersData = BTreeMap<String, Vec<String>>;

/// SHA-256 digest per bundle file name
pub type Manifest = BTreeMap<String, String>;

/// A directory of fitted artifacts
pub struct ArtifactStore {
    dir: PathBuf,
    verify_checksums: bool,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            verify_checksums: true,
        }
    }

    /// Check files against `manifest.json` when one is present
    pub fn verify_checksums(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load every artifact and assemble a predictor
    pub fn load(&self) -> std::result::Result<DogMatchPredictor, ArtifactLoadError> {
        info!("Loading artifacts from {:?}", self.dir);

        if !self.dir.is_dir() {
            return Err(ArtifactLoadError::new(
                self.dir.display().to_string(),
                "artifact directory does not exist",
            ));
        }

        if self.verify_checksums {
            self.check_manifest()
                .map_err(|e| ArtifactLoadError::new(MANIFEST_FILE, format!("{e:#}")))?;
        }

        let info: FeatureInfoData = self.read(FEATURE_INFO_FILE)?;
        let vocabularies: LabelEncodersData = self.read(LABEL_ENCODERS_FILE)?;
        let scaler: RobustScaler = self.read(SCALER_FILE)?;
        let classifier: KnnClassifier = self.read(CLASSIFIER_FILE)?;
        let index: BruteForceIndex = self.read(SIMILARITY_FILE)?;

        let schema = FeatureSchema::new(
            info.feature_columns.clone(),
            info.categorical_columns.clone(),
            info.numeric_columns.clone(),
        );
        let width = ColumnAligner::new(&schema.feature_columns).width();

        scaler
            .check_width(schema.numeric_columns.len())
            .map_err(|e| ArtifactLoadError::new(SCALER_FILE, e))?;
        classifier
            .validate()
            .and_then(|_| check_width(classifier.n_features(), width))
            .map_err(|e| ArtifactLoadError::new(CLASSIFIER_FILE, e))?;
        index
            .validate()
            .and_then(|_| check_width(index.n_features(), width))
            .map_err(|e| ArtifactLoadError::new(SIMILARITY_FILE, e))?;

        let breed_labels = if info.breed_labels.is_empty() {
            debug!("No breed labels in feature info, falling back to {}", Y_PROCESSED_FILE);
            self.read::<Vec<String>>(Y_PROCESSED_FILE)?
        } else {
            info.breed_labels
        };
        let catalog = BreedCatalog::new(breed_labels, info.group_labels)
            .map_err(|e| ArtifactLoadError::new(FEATURE_INFO_FILE, e))?;

        DogMatchPredictor::new(PredictorParts {
            schema,
            encoder: CategoricalEncoder::new(vocabularies),
            scaler: Box::new(scaler),
            classifier: Box::new(classifier),
            index: Box::new(index),
            catalog,
            breed_names: info.breed_names,
            label_group_name: info.label_group_name,
        })
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> std::result::Result<T, ArtifactLoadError> {
        read_json(&self.dir.join(name)).map_err(|e| ArtifactLoadError::new(name, format!("{e:#}")))
    }

    fn check_manifest(&self) -> Result<()> {
        let path = self.dir.join(MANIFEST_FILE);
        if !path.exists() {
            debug!("No manifest, skipping checksum verification");
            return Ok(());
        }

        let manifest: Manifest = read_json(&path)?;
        for (name, expected) in &manifest {
            let actual = file_checksum(&self.dir.join(name))?;
            if !actual.eq_ignore_ascii_case(expected) {
                bail!("checksum mismatch for {}: expected {}, got {}", name, expected, actual);
            }
        }
        info!("Verified {} artifact checksums", manifest.len());
        Ok(())
    }
}

/// Hex SHA-256 of a file
pub fn file_checksum(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).map_err(|e| anyhow!("parsing {}: {}", path.display(), e))
}

fn check_width(actual: usize, expected: usize) -> std::result::Result<(), String> {
    if actual == expected {
        Ok(())
    } else {
        Err(format!("rows have {actual} columns, expected {expected}"))
    }
}
