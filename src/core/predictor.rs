use crate::core::bundle::ModelBundle;
use crate::core::encoder::LabelEncoder;
use crate::domain::model::{FeatureVector, InputRecord};
use crate::domain::ports::{FeatureScaler, Regressor};
use crate::utils::error::{PriceError, Result};

/// Code used for categorical labels the encoder never saw during training.
pub const UNSEEN_LABEL_CODE: usize = 0;

/// 依 Python float() 的規則轉換數值欄位
pub fn coerce_numeric(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn display_raw(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds the feature vector in `feature_columns` order.
///
/// Fails on the first missing column or non-numeric value; unseen categorical
/// labels are encoded as [`UNSEEN_LABEL_CODE`] with a warning.
pub fn encode_features<R, S>(input: &InputRecord, bundle: &ModelBundle<R, S>) -> Result<FeatureVector>
where
    R: Regressor,
    S: FeatureScaler,
{
    let columns = bundle.feature_columns();
    let mut features = FeatureVector::with_capacity(columns.len());

    for col in columns {
        let raw = input.get(col).ok_or_else(|| PriceError::MissingField { field: col.clone() })?;

        let value = match bundle.label_encoder(col) {
            Some(encoder) => encode_categorical(encoder, col, raw) as f64,
            None => coerce_numeric(raw).ok_or_else(|| PriceError::InvalidNumericField {
                field: col.clone(),
            })?,
        };
        features.push(value);
    }

    Ok(features)
}

fn encode_categorical(encoder: &LabelEncoder, col: &str, raw: &serde_json::Value) -> usize {
    match encoder.encode_value(raw) {
        Some(code) => code,
        None => {
            tracing::warn!(
                "Unseen label '{}' for column '{}'. Using default={}.",
                display_raw(raw),
                col,
                UNSEEN_LABEL_CODE
            );
            UNSEEN_LABEL_CODE
        }
    }
}

/// Predicts the price for one record: encode, scale, run the model, then undo
/// the log transform. The result is not rounded.
pub fn predict_price<R, S>(input: &InputRecord, bundle: &ModelBundle<R, S>) -> Result<f64>
where
    R: Regressor,
    S: FeatureScaler,
{
    let features = encode_features(input, bundle)?;
    let scaled = bundle.scaler().transform(features.as_slice())?;
    let log_price = bundle.model().predict(&scaled)?;

    let price = log_price.exp();
    if !price.is_finite() {
        return Err(PriceError::NonFinitePrediction { log_price });
    }

    tracing::debug!("Predicted log-price {:.6} -> price {:.2}", log_price, price);
    Ok(price)
}

impl<R: Regressor, S: FeatureScaler> ModelBundle<R, S> {
    pub fn predict_price(&self, input: &InputRecord) -> Result<f64> {
        predict_price(input, self)
    }
}
