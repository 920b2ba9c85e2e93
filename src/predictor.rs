//! Prediction Adapter
//!
//! Bridges raw form input to the classifier's numeric schema and interprets
//! its 0/1 output. The service owns the loaded model and is handed to the
//! server explicitly; there is no process-wide model handle.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::models::{Classifier, ModelArtifact, ModelError};
use crate::patient::{self, FeatureVector, RawInputs};

/// Binary prediction result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Survive,
    Die,
}

impl Outcome {
    /// Raw label 1 is death; every other value reads as survival.
    pub fn from_raw(raw: u8) -> Self {
        if raw == 1 {
            Outcome::Die
        } else {
            Outcome::Survive
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Survive => "SURVIVE",
            Outcome::Die => "DIE",
        }
    }

    /// Fixed message shown in the result panel.
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Survive => "Pasien diprediksi BERTAHAN HIDUP dalam periode pengamatan.",
            Outcome::Die => "Pasien diprediksi MENINGGAL dalam periode pengamatan.",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub outcome: Outcome,
    pub raw: u8,
    pub features: FeatureVector,
}

/// Holds the loaded classifier. Read-only after construction and cheap to clone.
#[derive(Clone)]
pub struct PredictionService {
    name: String,
    classifier: Arc<dyn Classifier>,
}

impl PredictionService {
    pub fn new(name: impl Into<String>, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            name: name.into(),
            classifier,
        }
    }

    /// Load the artifact at `path`. Failure is returned, never panicked on.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let artifact = ModelArtifact::load(path)?;
        Ok(Self::new(artifact.name, Arc::new(artifact.estimator)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &'static str {
        self.classifier.kind()
    }

    pub fn encode(&self, raw: &RawInputs) -> FeatureVector {
        patient::encode(raw)
    }

    /// Raw classifier label for a single row.
    pub fn predict_raw(&self, features: &FeatureVector) -> u8 {
        let row = features.to_row();
        let labels = self.classifier.predict(row.view());
        labels.first().copied().unwrap_or(0)
    }

    pub fn predict(&self, features: &FeatureVector) -> Outcome {
        Outcome::from_raw(self.predict_raw(features))
    }

    /// Encode and predict in one step.
    pub fn run(&self, raw: &RawInputs) -> Prediction {
        let features = self.encode(raw);
        let raw_label = self.predict_raw(&features);
        let outcome = Outcome::from_raw(raw_label);
        debug!(model = %self.name, raw = raw_label, %outcome, "prediction");
        Prediction {
            outcome,
            raw: raw_label,
            features,
        }
    }
}

impl fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionService")
            .field("name", &self.name)
            .field("kind", &self.classifier.kind())
            .finish()
    }
}
