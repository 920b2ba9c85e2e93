//! Decision trees and random forests in scikit-learn's flat array layout.
//!
//! Node `i` is a leaf when `children_left[i] == -1`. Otherwise the row goes
//! left when `x[feature[i]] <= threshold[i]` and right otherwise. `value[i]`
//! holds the per-class sample weights reaching that node.

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::Classifier;

pub const LEAF: i64 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<[f64; 2]>,
}

impl DecisionTree {
    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    /// Structural checks run once at load time so traversal never indexes out of range.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(format!("tree arrays disagree on node count ({})", n));
        }

        for i in 0..n {
            let (left, right) = (self.children_left[i], self.children_right[i]);
            if left == LEAF {
                if right != LEAF {
                    return Err(format!("node {} has a right child but no left child", i));
                }
                continue;
            }
            for child in [left, right] {
                // Children always come after their parent in scikit-learn exports; this also rules out cycles.
                if child <= i as i64 || child >= n as i64 {
                    return Err(format!("node {} points to invalid child {}", i, child));
                }
            }
            let f = self.feature[i];
            if f < 0 || f as usize >= n_features {
                return Err(format!("node {} splits on unknown feature {}", i, f));
            }
        }
        Ok(())
    }

    fn leaf_for(&self, row: ArrayView1<'_, f64>) -> usize {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let f = self.feature[node] as usize;
            node = if row[f] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        node
    }

    /// Class probabilities at the leaf the row lands in.
    pub fn proba(&self, row: ArrayView1<'_, f64>) -> [f64; 2] {
        let [a, b] = self.value[self.leaf_for(row)];
        let total = a + b;
        if total > 0.0 {
            [a / total, b / total]
        } else {
            [0.0, 0.0]
        }
    }
}

fn argmax(p: [f64; 2]) -> u8 {
    // Ties go to class 0, matching numpy's argmax.
    u8::from(p[1] > p[0])
}

impl Classifier for DecisionTree {
    fn kind(&self) -> &'static str {
        "decision_tree"
    }

    fn predict(&self, rows: ArrayView2<'_, f64>) -> Vec<u8> {
        rows.rows()
            .into_iter()
            .map(|row| argmax(self.proba(row)))
            .collect()
    }
}

/// Soft-voting ensemble: leaf probabilities are averaged across trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn proba(&self, row: ArrayView1<'_, f64>) -> [f64; 2] {
        let mut sum = [0.0, 0.0];
        for tree in &self.trees {
            let p = tree.proba(row);
            sum[0] += p[0];
            sum[1] += p[1];
        }
        let n = self.trees.len().max(1) as f64;
        [sum[0] / n, sum[1] / n]
    }
}

impl Classifier for RandomForest {
    fn kind(&self) -> &'static str {
        "random_forest"
    }

    fn predict(&self, rows: ArrayView2<'_, f64>) -> Vec<u8> {
        rows.rows()
            .into_iter()
            .map(|row| argmax(self.proba(row)))
            .collect()
    }
}
