use crate::domain::ports::FeatureScaler;
use crate::utils::error::{PriceError, Result};
use serde::{Deserialize, Serialize};

/// Fitted feature scaler exported alongside the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - mean) / scale`
    Standard {
        #[serde(default, alias = "mean_")]
        mean: Option<Vec<f64>>,
        #[serde(default, alias = "scale_")]
        scale: Option<Vec<f64>>,
    },
    /// `x * scale + min`
    MinMax {
        #[serde(alias = "min_")]
        min: Vec<f64>,
        #[serde(alias = "scale_")]
        scale: Vec<f64>,
    },
    Identity,
}

impl Scaler {
    fn check_width(&self, row: &[f64]) -> Result<()> {
        match self.n_features() {
            Some(expected) if expected != row.len() => Err(PriceError::ShapeMismatch {
                stage: "scaler",
                expected,
                actual: row.len(),
            }),
            _ => Ok(()),
        }
    }
}

impl FeatureScaler for Scaler {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        check_consistency(self)?;
        self.check_width(row)?;

        let scaled = match self {
            Scaler::Standard { mean, scale } => row
                .iter()
                .enumerate()
                .map(|(i, &x)| {
                    let centered = mean.as_ref().and_then(|m| m.get(i)).map_or(x, |m| x - m);
                    // 變異數為零的欄位 scale 視為 1
                    match scale.as_ref().and_then(|s| s.get(i)) {
                        Some(&s) if s != 0.0 => centered / s,
                        _ => centered,
                    }
                })
                .collect(),
            Scaler::MinMax { min, scale } => row
                .iter()
                .zip(min.iter().zip(scale.iter()))
                .map(|(&x, (&lo, &s))| x * s + lo)
                .collect(),
            Scaler::Identity => row.to_vec(),
        };

        Ok(scaled)
    }

    fn n_features(&self) -> Option<usize> {
        match self {
            Scaler::Standard { mean, scale } => mean
                .as_ref()
                .map(Vec::len)
                .or_else(|| scale.as_ref().map(Vec::len)),
            Scaler::MinMax { min, .. } => Some(min.len()),
            Scaler::Identity => None,
        }
    }
}

/// 檢查 scaler 參數長度一致
pub(crate) fn check_consistency(scaler: &Scaler) -> Result<()> {
    let (a, b) = match scaler {
        Scaler::Standard {
            mean: Some(mean),
            scale: Some(scale),
        } => (mean.len(), scale.len()),
        Scaler::MinMax { min, scale } => (min.len(), scale.len()),
        _ => return Ok(()),
    };

    if a != b {
        return Err(PriceError::InvalidArtifact {
            message: format!("scaler parameters have different lengths ({} vs {})", a, b),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_standard_scaler() {
        let scaler = Scaler::Standard {
            mean: Some(vec![10.0, 0.0]),
            scale: Some(vec![2.0, 0.0]),
        };
        let out = scaler.transform(&[14.0, 3.0]).unwrap();
        assert_eq!(out, vec![2.0, 3.0]);
    }

    #[test]
    fn test_standard_scaler_without_mean() {
        let scaler = Scaler::Standard {
            mean: None,
            scale: Some(vec![4.0]),
        };
        assert_eq!(scaler.transform(&[2.0]).unwrap(), vec![0.5]);
        assert_eq!(scaler.n_features(), Some(1));
    }

    #[test]
    fn test_min_max_scaler() {
        let scaler = Scaler::MinMax {
            min: vec![-1.0],
            scale: vec![0.5],
        };
        assert_eq!(scaler.transform(&[4.0]).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_width_mismatch_is_internal() {
        let scaler = Scaler::MinMax {
            min: vec![0.0, 0.0],
            scale: vec![1.0, 1.0],
        };
        let err = scaler.transform(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            PriceError::ShapeMismatch {
                stage: "scaler",
                expected: 2,
                actual: 1
            }
        ));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_deserialize_tagged() {
        let scaler: Scaler =
            serde_json::from_value(json!({"type": "standard", "mean_": [1.0], "scale_": [2.0]}))
                .unwrap();
        assert_eq!(scaler.transform(&[5.0]).unwrap(), vec![2.0]);

        let identity: Scaler = serde_json::from_value(json!({"type": "identity"})).unwrap();
        assert_eq!(identity.transform(&[7.0, 8.0]).unwrap(), vec![7.0, 8.0]);
    }

    #[test]
    fn test_consistency_check() {
        let bad = Scaler::Standard {
            mean: Some(vec![0.0, 1.0]),
            scale: Some(vec![1.0]),
        };
        assert!(check_consistency(&bad).is_err());
    }
}
