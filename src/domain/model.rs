use crate::utils::error::{PriceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 單次預測請求的原始欄位
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputRecord {
    pub data: HashMap<String, serde_json::Value>,
}

impl InputRecord {
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: serde_json::Value) {
        self.data.insert(field.into(), value);
    }
}

impl TryFrom<serde_json::Value> for InputRecord {
    type Error = PriceError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Object(obj) => Ok(Self {
                data: obj.into_iter().collect(),
            }),
            other => Err(PriceError::InvalidRequestBody {
                message: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// 依 feature_cols 順序排列的特徵向量
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn push(&mut self, value: f64) {
        self.0.push(value);
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
