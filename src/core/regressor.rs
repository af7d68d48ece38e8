//! Regression models that can be exported from training and evaluated here.
//!
//! The model predicts the natural log of the price; inverting the log is the
//! predictor's job, not the model's.

use crate::domain::ports::Regressor;
use crate::utils::error::{PriceError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Model {
    /// `intercept + Σ coefficients[i] * x[i]`
    Linear {
        #[serde(alias = "coef_")]
        coefficients: Vec<f64>,
        #[serde(default, alias = "intercept_")]
        intercept: f64,
    },
    TreeEnsemble(TreeEnsemble),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Random forest: average of the trees.
    #[default]
    Mean,
    /// Gradient boosting: sum of the trees.
    Sum,
}

fn default_learning_rate() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub n_features: usize,
    pub trees: Vec<RegressionTree>,
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

/// A node in a flattened tree. Node 0 is the root and children always have a
/// larger index than their parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default)]
        default_left: bool,
    },
    Leaf {
        value: f64,
    },
}

impl RegressionTree {
    fn validate(&self, tree_idx: usize, n_features: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(PriceError::InvalidArtifact {
                message: format!("tree {} has no nodes", tree_idx),
            });
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = *node
            {
                if feature >= n_features {
                    return Err(PriceError::InvalidArtifact {
                        message: format!(
                            "tree {} node {} splits on feature {} but the model has {} features",
                            tree_idx, idx, feature, n_features
                        ),
                    });
                }
                for child in [left, right] {
                    if child <= idx || child >= self.nodes.len() {
                        return Err(PriceError::InvalidArtifact {
                            message: format!(
                                "tree {} node {} has invalid child index {}",
                                tree_idx, idx, child
                            ),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, features: &[f64]) -> Result<f64> {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                }) => {
                    let x = features.get(*feature).copied().ok_or(PriceError::ShapeMismatch {
                        stage: "model",
                        expected: feature + 1,
                        actual: features.len(),
                    })?;
                    let go_left = if x.is_nan() { *default_left } else { x <= *threshold };
                    let next = if go_left { *left } else { *right };
                    // 子節點索引必須遞增，否則視為損壞的樹
                    if next <= idx {
                        return Err(PriceError::InvalidArtifact {
                            message: format!("tree node {} points backwards to {}", idx, next),
                        });
                    }
                    idx = next;
                }
                None => {
                    return Err(PriceError::InvalidArtifact {
                        message: format!("tree node index {} out of range", idx),
                    })
                }
            }
        }
    }
}

impl TreeEnsemble {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.evaluate(features)?;
        }

        let aggregate = match self.aggregation {
            Aggregation::Sum => total,
            Aggregation::Mean if self.trees.is_empty() => 0.0,
            Aggregation::Mean => total / self.trees.len() as f64,
        };
        Ok(self.base_score + self.learning_rate * aggregate)
    }
}

impl Model {
    /// 載入時檢查模型結構
    pub fn validate(&self) -> Result<()> {
        match self {
            Model::Linear { coefficients, .. } if coefficients.is_empty() => {
                Err(PriceError::InvalidArtifact {
                    message: "linear model has no coefficients".to_string(),
                })
            }
            Model::Linear { .. } => Ok(()),
            Model::TreeEnsemble(ensemble) => {
                if ensemble.trees.is_empty() {
                    return Err(PriceError::InvalidArtifact {
                        message: "tree ensemble has no trees".to_string(),
                    });
                }
                for (i, tree) in ensemble.trees.iter().enumerate() {
                    tree.validate(i, ensemble.n_features)?;
                }
                Ok(())
            }
        }
    }
}

impl Regressor for Model {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if let Some(expected) = self.n_features() {
            if expected != features.len() {
                return Err(PriceError::ShapeMismatch {
                    stage: "model",
                    expected,
                    actual: features.len(),
                });
            }
        }

        match self {
            Model::Linear {
                coefficients,
                intercept,
            } => Ok(coefficients
                .iter()
                .zip(features)
                .fold(*intercept, |acc, (w, x)| acc + w * x)),
            Model::TreeEnsemble(ensemble) => ensemble.predict(features),
        }
    }

    fn n_features(&self) -> Option<usize> {
        match self {
            Model::Linear { coefficients, .. } => Some(coefficients.len()),
            Model::TreeEnsemble(ensemble) => Some(ensemble.n_features),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> RegressionTree {
        RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                    default_left: true,
                },
                TreeNode::Leaf { value: low },
                TreeNode::Leaf { value: high },
            ],
        }
    }

    #[test]
    fn test_linear_prediction() {
        let model = Model::Linear {
            coefficients: vec![0.5, -1.0],
            intercept: 2.0,
        };
        assert_eq!(model.predict(&[4.0, 1.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_linear_width_mismatch() {
        let model = Model::Linear {
            coefficients: vec![1.0, 1.0, 1.0],
            intercept: 0.0,
        };
        let err = model.predict(&[1.0]).unwrap_err();
        assert!(matches!(err, PriceError::ShapeMismatch { stage: "model", .. }));
    }

    #[test]
    fn test_forest_mean() {
        let model = Model::TreeEnsemble(TreeEnsemble {
            n_features: 2,
            trees: vec![stump(0, 0.5, 1.0, 3.0), stump(1, 10.0, 5.0, 7.0)],
            aggregation: Aggregation::Mean,
            base_score: 0.0,
            learning_rate: 1.0,
        });
        model.validate().unwrap();
        // 左: 1.0，右: 7.0
        assert_eq!(model.predict(&[0.5, 11.0]).unwrap(), 4.0);
        // NaN 走 default_left
        assert_eq!(model.predict(&[f64::NAN, 0.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_boosted_sum() {
        let model = Model::TreeEnsemble(TreeEnsemble {
            n_features: 1,
            trees: vec![stump(0, 1.0, -1.0, 1.0), stump(0, 2.0, -0.5, 0.5)],
            aggregation: Aggregation::Sum,
            base_score: 10.0,
            learning_rate: 0.1,
        });
        let out = model.predict(&[1.5]).unwrap();
        assert!((out - 10.05).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_bad_children() {
        let model = Model::TreeEnsemble(TreeEnsemble {
            n_features: 1,
            trees: vec![RegressionTree {
                nodes: vec![TreeNode::Split {
                    feature: 0,
                    threshold: 0.0,
                    left: 0,
                    right: 5,
                    default_left: false,
                }],
            }],
            aggregation: Aggregation::Mean,
            base_score: 0.0,
            learning_rate: 1.0,
        });
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_feature() {
        let model = Model::TreeEnsemble(TreeEnsemble {
            n_features: 1,
            trees: vec![stump(3, 0.0, 0.0, 1.0)],
            aggregation: Aggregation::Mean,
            base_score: 0.0,
            learning_rate: 1.0,
        });
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_deserialize_tree_ensemble() {
        let model: Model = serde_json::from_value(json!({
            "type": "tree_ensemble",
            "n_features": 1,
            "trees": [
                {"nodes": [
                    {"feature": 0, "threshold": 2.0, "left": 1, "right": 2},
                    {"value": 1.0},
                    {"value": 2.0}
                ]}
            ]
        }))
        .unwrap();
        model.validate().unwrap();
        assert_eq!(model.predict(&[2.0]).unwrap(), 1.0);
        assert_eq!(model.predict(&[2.5]).unwrap(), 2.0);
    }
}
