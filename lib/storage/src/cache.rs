// Process-wide predictor, loaded at most once
use crate::artifacts::ArtifactStore;
use dogmatch_core::ArtifactLoadError;
use dogmatch_inference::DogMatchPredictor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{error, info};

/// Lazily loads the artifact bundle on first use.
///
/// Exactly one load runs even under concurrent first calls; every caller
/// afterwards observes the same predictor or the same load error.
pub struct PredictorCache {
    dir: PathBuf,
    verify_checksums: bool,
    cell: OnceLock<Result<Arc<DogMatchPredictor>, ArtifactLoadError>>,
}

impl PredictorCache {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            verify_checksums: true,
            cell: OnceLock::new(),
        }
    }

    pub fn verify_checksums(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The shared predictor, loading it if this is the first call
    pub fn get(&self) -> Result<Arc<DogMatchPredictor>, ArtifactLoadError> {
        self.cell
            .get_or_init(|| {
                let loaded = ArtifactStore::new(&self.dir)
                    .verify_checksums(self.verify_checksums)
                    .load();
                match &loaded {
                    Ok(predictor) => info!(breeds = predictor.n_breeds(), "Predictor cached"),
                    Err(e) => error!("Failed to load predictor: {}", e),
                }
                loaded.map(Arc::new)
            })
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.cell.get(), Some(Ok(_)))
    }
}
