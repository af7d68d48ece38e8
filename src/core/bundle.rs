use crate::core::encoder::LabelEncoder;
use crate::core::regressor::Model;
use crate::core::scaler::{self, Scaler};
use crate::domain::ports::{ArtifactSource, FeatureScaler, Regressor};
use crate::utils::error::{PriceError, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// 模型檔案在磁碟上的格式
#[derive(Debug, Deserialize)]
struct BundleFile {
    model: Model,
    scaler: Scaler,
    #[serde(default)]
    le_dict: HashMap<String, LabelEncoder>,
    feature_cols: Vec<String>,
}

/// Everything needed to turn a request into a price. Built once at startup and
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ModelBundle<R = Model, S = Scaler> {
    model: R,
    scaler: S,
    label_encoders: HashMap<String, LabelEncoder>,
    feature_columns: Vec<String>,
}

impl<R: Regressor, S: FeatureScaler> ModelBundle<R, S> {
    pub fn new(
        model: R,
        scaler: S,
        label_encoders: HashMap<String, LabelEncoder>,
        feature_columns: Vec<String>,
    ) -> Result<Self> {
        if feature_columns.is_empty() {
            return Err(PriceError::InvalidArtifact {
                message: "feature_cols is empty".to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(feature_columns.len());
        for col in &feature_columns {
            if !seen.insert(col.as_str()) {
                return Err(PriceError::InvalidArtifact {
                    message: format!("feature column '{}' is listed twice", col),
                });
            }
        }

        let width = feature_columns.len();
        for (stage, n) in [("scaler", scaler.n_features()), ("model", model.n_features())] {
            if let Some(n) = n {
                if n != width {
                    return Err(PriceError::InvalidArtifact {
                        message: format!(
                            "{} was fitted on {} features but feature_cols has {}",
                            stage, n, width
                        ),
                    });
                }
            }
        }

        for name in label_encoders.keys() {
            if !seen.contains(name.as_str()) {
                tracing::debug!("Label encoder '{}' has no matching feature column", name);
            }
        }

        Ok(Self {
            model,
            scaler,
            label_encoders,
            feature_columns,
        })
    }

    pub fn model(&self) -> &R {
        &self.model
    }

    pub fn scaler(&self) -> &S {
        &self.scaler
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn label_encoder(&self, column: &str) -> Option<&LabelEncoder> {
        self.label_encoders.get(column)
    }

    pub fn categorical_columns(&self) -> impl Iterator<Item = &str> {
        self.feature_columns
            .iter()
            .filter(|col| self.label_encoders.contains_key(col.as_str()))
            .map(String::as_str)
    }
}

impl ModelBundle {
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let file: BundleFile = serde_json::from_slice(bytes)?;
        scaler::check_consistency(&file.scaler)?;
        file.model.validate()?;
        Self::new(file.model, file.scaler, file.le_dict, file.feature_cols)
    }

    pub fn load<A: ArtifactSource>(source: &A) -> Result<Self> {
        tracing::debug!("Reading model bundle from {}", source.describe());
        let bytes = source.read_artifact()?;
        Self::from_json_slice(&bytes)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load(&LocalArtifact::new(path.as_ref()))
    }
}

#[derive(Debug, Clone)]
pub struct LocalArtifact {
    path: PathBuf,
}

impl LocalArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ArtifactSource for LocalArtifact {
    fn read_artifact(&self) -> Result<Vec<u8>> {
        let data = std::fs::read(&self.path)?;
        Ok(data)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
