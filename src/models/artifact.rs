//! Classifier Artifact
//!
//! The serialized, pre-trained model read once at startup. The file is JSON:
//! a format version, the feature names in training order, and one estimator.

use std::path::{Path, PathBuf};

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::{Classifier, DecisionTree, LogisticRegression, RandomForest};
use crate::patient::{FEATURE_COUNT, FEATURE_NAMES};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model artifact not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("could not read model artifact {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model artifact {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported artifact format version {found} (expected {})", FORMAT_VERSION)]
    UnsupportedVersion { found: u32 },

    #[error("artifact features {found:?} do not match the expected order {expected:?}")]
    FeatureOrder {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("invalid estimator: {0}")]
    InvalidEstimator(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    LogisticRegression(LogisticRegression),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

impl Estimator {
    fn validate(&self) -> Result<(), String> {
        match self {
            Estimator::LogisticRegression(model) => {
                if model.coefficients.len() != FEATURE_COUNT {
                    return Err(format!(
                        "expected {} coefficients, found {}",
                        FEATURE_COUNT,
                        model.coefficients.len()
                    ));
                }
                if let Some(scaler) = &model.scaler {
                    if scaler.mean.len() != FEATURE_COUNT || scaler.scale.len() != FEATURE_COUNT {
                        return Err(format!("scaler must have {} columns", FEATURE_COUNT));
                    }
                }
                let finite = model.coefficients.iter().all(|c| c.is_finite())
                    && model.intercept.is_finite()
                    && model.threshold.is_finite();
                if !finite {
                    return Err("non-finite parameter".to_string());
                }
                Ok(())
            }
            Estimator::DecisionTree(tree) => tree.validate(FEATURE_COUNT),
            Estimator::RandomForest(forest) => {
                if forest.trees.is_empty() {
                    return Err("random forest has no trees".to_string());
                }
                for (idx, tree) in forest.trees.iter().enumerate() {
                    tree.validate(FEATURE_COUNT)
                        .map_err(|e| format!("tree {}: {}", idx, e))?;
                }
                Ok(())
            }
        }
    }
}

impl Classifier for Estimator {
    fn kind(&self) -> &'static str {
        match self {
            Estimator::LogisticRegression(m) => m.kind(),
            Estimator::DecisionTree(m) => m.kind(),
            Estimator::RandomForest(m) => m.kind(),
        }
    }

    fn predict(&self, rows: ArrayView2<'_, f64>) -> Vec<u8> {
        match self {
            Estimator::LogisticRegression(m) => m.predict(rows),
            Estimator::DecisionTree(m) => m.predict(rows),
            Estimator::RandomForest(m) => m.predict(rows),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default = "default_name")]
    pub name: String,
    pub feature_names: Vec<String>,
    pub estimator: Estimator,
}

fn default_name() -> String {
    "DeathEventPrediction".to_string()
}

impl ModelArtifact {
    /// Read, parse and validate the artifact at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        debug!("Reading model artifact from {}", path.display());

        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ModelError::NotFound(path.to_path_buf())
            } else {
                ModelError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let artifact: ModelArtifact =
            serde_json::from_str(&text).map_err(|source| ModelError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?;
        artifact.validate()?;

        info!(
            "Loaded model '{}' ({}) from {}",
            artifact.name,
            artifact.estimator.kind(),
            path.display()
        );
        Ok(artifact)
    }

    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact =
            serde_json::from_str(text).map_err(|source| ModelError::Corrupt {
                path: PathBuf::from("<inline>"),
                source,
            })?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion {
                found: self.format_version,
            });
        }
        if !self
            .feature_names
            .iter()
            .map(String::as_str)
            .eq(FEATURE_NAMES.iter().copied())
        {
            return Err(ModelError::FeatureOrder {
                expected: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
                found: self.feature_names.clone(),
            });
        }
        self.estimator
            .validate()
            .map_err(ModelError::InvalidEstimator)
    }
}
