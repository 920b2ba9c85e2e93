//! Logistic regression with an optional standard scaler in front of it.

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::Classifier;

/// `(x - mean) / scale`, column-wise. Zero scale is treated as 1 like scikit-learn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    fn apply(&self, idx: usize, x: f64) -> f64 {
        let s = self.scale[idx];
        let s = if s == 0.0 { 1.0 } else { s };
        (x - self.mean[idx]) / s
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

impl LogisticRegression {
    /// Probability of the positive class for one row.
    pub fn probability(&self, row: ArrayView1<'_, f64>) -> f64 {
        let scaled: Vec<f64> = match &self.scaler {
            Some(scaler) => row.iter().enumerate().map(|(i, x)| scaler.apply(i, *x)).collect(),
            None => row.to_vec(),
        };
        let z = ArrayView1::from(&scaled[..]).dot(&ArrayView1::from(&self.coefficients[..]))
            + self.intercept;
        sigmoid(z)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Classifier for LogisticRegression {
    fn kind(&self) -> &'static str {
        "logistic_regression"
    }

    fn predict(&self, rows: ArrayView2<'_, f64>) -> Vec<u8> {
        rows.rows()
            .into_iter()
            .map(|row| u8::from(self.probability(row) > self.threshold))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_probability_matches_hand_computation() {
        let model = LogisticRegression {
            coefficients: vec![0.5, -1.0],
            intercept: 0.25,
            scaler: None,
            threshold: 0.5,
        };
        let rows = array![[2.0, 1.0]];
        // z = 1.0 - 1.0 + 0.25
        let p = model.probability(rows.row(0));
        assert!((p - sigmoid(0.25)).abs() < 1e-12);
        assert_eq!(model.predict(rows.view()), vec![1]);
    }

    #[test]
    fn test_scaler_and_zero_scale() {
        let model = LogisticRegression {
            coefficients: vec![1.0, 1.0],
            intercept: 0.0,
            scaler: Some(StandardScaler {
                mean: vec![10.0, 3.0],
                scale: vec![2.0, 0.0],
            }),
            threshold: 0.5,
        };
        // (8 - 10) / 2 + (3 - 3) / 1 = -1
        let rows = array![[8.0, 3.0], [14.0, 3.0]];
        assert_eq!(model.predict(rows.view()), vec![0, 1]);
    }

    #[test]
    fn test_boundary_is_survive() {
        let model = LogisticRegression {
            coefficients: vec![0.0],
            intercept: 0.0,
            scaler: None,
            threshold: 0.5,
        };
        // p == 0.5 exactly is not above the threshold
        assert_eq!(model.predict(array![[42.0]].view()), vec![0]);
    }
}
