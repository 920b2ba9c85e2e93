//! Heart-Failure Survival Prediction
//!
//! A single-page form that collects twelve clinical measurements and asks a
//! pre-trained binary classifier whether the patient survives the follow-up
//! period:
//! - Patient observation and fixed-order feature encoding
//! - Serialized classifier artifacts (logistic regression, trees, forests)
//! - Prediction adapter with an injectable classifier
//! - Form server with a styling toggle

pub mod config;
pub mod models;
pub mod page;
pub mod patient;
pub mod predictor;
pub mod server;

// Re-exports for convenience
pub use config::{AppConfig, Theme};
pub use models::{Classifier, ModelArtifact, ModelError};
pub use patient::{encode, FeatureVector, PatientObservation, RawInputs};
pub use predictor::{Outcome, Prediction, PredictionService};
pub use server::AppState;
