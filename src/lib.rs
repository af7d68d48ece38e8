pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use crate::config::{CliConfig, Command, Settings};
pub use crate::core::{bundle::ModelBundle, predictor::predict_price};
pub use crate::domain::model::InputRecord;
pub use crate::server::{create_router, AppState};
pub use crate::utils::error::{PriceError, Result};
