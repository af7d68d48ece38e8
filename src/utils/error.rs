use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for numerical field: {field}")]
    InvalidNumericField { field: String },

    #[error("Invalid request body: {message}")]
    InvalidRequestBody { message: String },

    #[error("Shape mismatch in {stage}: expected {expected} features, got {actual}")]
    ShapeMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Model produced a non-finite price (log-price {log_price})")]
    NonFinitePrediction { log_price: f64 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid model artifact: {message}")]
    InvalidArtifact { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 錯誤分類，決定 HTTP 狀態碼與行程結束碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 呼叫端輸入造成 (400)
    Validation,
    /// 伺服器內部錯誤 (500)
    Internal,
    /// 啟動階段失敗，無法開始服務
    Startup,
}

impl PriceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PriceError::MissingField { .. }
            | PriceError::InvalidNumericField { .. }
            | PriceError::InvalidRequestBody { .. } => ErrorCategory::Validation,
            PriceError::ShapeMismatch { .. } | PriceError::NonFinitePrediction { .. } => {
                ErrorCategory::Internal
            }
            PriceError::IoError(_)
            | PriceError::SerializationError(_)
            | PriceError::InvalidArtifact { .. }
            | PriceError::ConfigError { .. }
            | PriceError::InvalidConfigValueError { .. } => ErrorCategory::Startup,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            PriceError::ConfigError { .. } | PriceError::InvalidConfigValueError { .. } => 2,
            _ if self.is_validation() => 2,
            PriceError::ShapeMismatch { .. } | PriceError::NonFinitePrediction { .. } => 3,
            _ => 1,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PriceError::MissingField { .. } | PriceError::InvalidNumericField { .. } => {
                "Provide every feature column with a valid value"
            }
            PriceError::InvalidRequestBody { .. } => "Send a single JSON object as the request body",
            PriceError::ShapeMismatch { .. } | PriceError::InvalidArtifact { .. } => {
                "Re-export the model bundle so scaler, model and feature_cols agree"
            }
            PriceError::NonFinitePrediction { .. } => "Check the input ranges and the exported model",
            PriceError::IoError(_) => "Check that the model path exists and is readable",
            PriceError::SerializationError(_) => "Check that the model bundle is valid JSON",
            PriceError::ConfigError { .. } | PriceError::InvalidConfigValueError { .. } => {
                "Fix the configuration file, CLI flags or environment variables"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PriceError>;
