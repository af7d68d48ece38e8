pub mod bundle;
pub mod encoder;
pub mod predictor;
pub mod regressor;
pub mod scaler;

pub use crate::domain::model::{FeatureVector, InputRecord};
pub use crate::domain::ports::{ArtifactSource, FeatureScaler, Regressor};
pub use crate::utils::error::Result;
