//! Patient Observation
//!
//! The twelve clinical measurements collected by the form, the categorical
//! label decoding, and the fixed-order feature vector handed to the classifier.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of features the classifier was trained on.
pub const FEATURE_COUNT: usize = 12;

/// Column order of the training data. Every artifact must declare exactly this order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "anaemia",
    "creatinine_phosphokinase",
    "diabetes",
    "ejection_fraction",
    "high_blood_pressure",
    "platelets",
    "serum_creatinine",
    "serum_sodium",
    "sex",
    "smoking",
    "time",
];

pub const LABEL_YES: &str = "Ya";
pub const LABEL_NO: &str = "Tidak";
pub const LABEL_MALE: &str = "Laki-laki";
pub const LABEL_FEMALE: &str = "Perempuan";

/// Yes/no answer from a radio control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum YesNo {
    #[default]
    No,
    Yes,
}

impl YesNo {
    /// "Ya" is the only label that means yes; anything else reads as no.
    pub fn from_label(label: &str) -> Self {
        if label == LABEL_YES {
            YesNo::Yes
        } else {
            YesNo::No
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            YesNo::Yes => LABEL_YES,
            YesNo::No => LABEL_NO,
        }
    }

    pub fn encode(&self) -> f64 {
        match self {
            YesNo::Yes => 1.0,
            YesNo::No => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sex {
    #[default]
    Female,
    Male,
}

impl Sex {
    /// "Laki-laki" is male; any other label falls back to female.
    pub fn from_label(label: &str) -> Self {
        if label == LABEL_MALE {
            Sex::Male
        } else {
            Sex::Female
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => LABEL_MALE,
            Sex::Female => LABEL_FEMALE,
        }
    }

    pub fn encode(&self) -> f64 {
        match self {
            Sex::Male => 1.0,
            Sex::Female => 0.0,
        }
    }
}

/// Raw inputs as they arrive from the form or the JSON API.
///
/// Categorical fields keep their UI labels; numeric fields are already parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInputs {
    pub age: f64,
    pub anaemia: String,
    pub creatinine_phosphokinase: f64,
    pub diabetes: String,
    pub ejection_fraction: f64,
    pub high_blood_pressure: String,
    pub platelets: f64,
    pub serum_creatinine: f64,
    pub serum_sodium: f64,
    pub sex: String,
    pub smoking: String,
    pub time: f64,
}

/// One immutable observation, built per submission and dropped after prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PatientObservation {
    pub age: u32,
    pub anaemia: YesNo,
    pub creatinine_phosphokinase: f64,
    pub diabetes: YesNo,
    pub ejection_fraction: u32,
    pub high_blood_pressure: YesNo,
    pub platelets: f64,
    pub serum_creatinine: f64,
    pub serum_sodium: f64,
    pub sex: Sex,
    pub smoking: YesNo,
    pub time: u32,
}

impl PatientObservation {
    /// Decode labels and clamp numbers into their domains the way the input widgets do.
    pub fn from_raw(raw: &RawInputs) -> Self {
        Self {
            age: clamp_int(raw.age, 1, 120),
            anaemia: YesNo::from_label(&raw.anaemia),
            creatinine_phosphokinase: non_negative(raw.creatinine_phosphokinase),
            diabetes: YesNo::from_label(&raw.diabetes),
            ejection_fraction: clamp_int(raw.ejection_fraction, 0, 100),
            high_blood_pressure: YesNo::from_label(&raw.high_blood_pressure),
            platelets: non_negative(raw.platelets),
            serum_creatinine: non_negative(raw.serum_creatinine),
            serum_sodium: non_negative(raw.serum_sodium),
            sex: Sex::from_label(&raw.sex),
            smoking: YesNo::from_label(&raw.smoking),
            time: clamp_int(raw.time, 0, u32::MAX),
        }
    }

    /// Assemble the vector in training order. Do not reorder.
    pub fn features(&self) -> FeatureVector {
        FeatureVector([
            f64::from(self.age),
            self.anaemia.encode(),
            self.creatinine_phosphokinase,
            self.diabetes.encode(),
            f64::from(self.ejection_fraction),
            self.high_blood_pressure.encode(),
            self.platelets,
            self.serum_creatinine,
            self.serum_sodium,
            self.sex.encode(),
            self.smoking.encode(),
            f64::from(self.time),
        ])
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn clamp_int(value: f64, min: u32, max: u32) -> u32 {
    if !value.is_finite() {
        return min;
    }
    let rounded = value.round();
    if rounded <= f64::from(min) {
        min
    } else if rounded >= f64::from(max) {
        max
    } else {
        rounded as u32
    }
}

/// Fixed-order numeric row matching the classifier's input schema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Single-row matrix, the shape classifiers are invoked with.
    pub fn to_row(&self) -> ndarray::Array2<f64> {
        ndarray::Array2::from_shape_fn((1, FEATURE_COUNT), |(_, j)| self.0[j])
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|idx| self.0[idx])
    }
}

/// Convert raw inputs into the classifier's feature vector. Pure and total.
pub fn encode(raw: &RawInputs) -> FeatureVector {
    PatientObservation::from_raw(raw).features()
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{label}: '{value}' is not a number")]
    NotANumber { label: &'static str, value: String },
}

/// URL-encoded form body. Everything arrives as text; blank numbers take the widget default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormSubmission {
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub anaemia: String,
    #[serde(default)]
    pub creatinine_phosphokinase: String,
    #[serde(default)]
    pub diabetes: String,
    #[serde(default)]
    pub ejection_fraction: String,
    #[serde(default)]
    pub high_blood_pressure: String,
    #[serde(default)]
    pub platelets: String,
    #[serde(default)]
    pub serum_creatinine: String,
    #[serde(default)]
    pub serum_sodium: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub smoking: String,
    #[serde(default)]
    pub time: String,
}

impl FormSubmission {
    pub fn parse(&self) -> Result<RawInputs, ValidationError> {
        Ok(RawInputs {
            age: parse_number("age", &self.age, 1.0)?,
            anaemia: self.anaemia.trim().to_string(),
            creatinine_phosphokinase: parse_number(
                "creatinine_phosphokinase",
                &self.creatinine_phosphokinase,
                0.0,
            )?,
            diabetes: self.diabetes.trim().to_string(),
            ejection_fraction: parse_number("ejection_fraction", &self.ejection_fraction, 0.0)?,
            high_blood_pressure: self.high_blood_pressure.trim().to_string(),
            platelets: parse_number("platelets", &self.platelets, 0.0)?,
            serum_creatinine: parse_number("serum_creatinine", &self.serum_creatinine, 0.0)?,
            serum_sodium: parse_number("serum_sodium", &self.serum_sodium, 0.0)?,
            sex: self.sex.trim().to_string(),
            smoking: self.smoking.trim().to_string(),
            time: parse_number("time", &self.time, 0.0)?,
        })
    }
}

fn parse_number(label: &'static str, text: &str, default: f64) -> Result<f64, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ValidationError::NotANumber {
            label,
            value: trimmed.to_string(),
        }),
    }
}
