use crate::domain::model::{ErrorResponse, HealthResponse, InputRecord, PredictResponse};
use crate::server::AppState;
use crate::utils::error::{ErrorCategory, PriceError};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};

const INDEX_HTML: &str = include_str!("../../templates/index.html");

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

impl IntoResponse for PriceError {
    fn into_response(self) -> Response {
        match self.category() {
            ErrorCategory::Validation => {
                tracing::debug!("Rejected prediction request: {}", self);
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: self.to_string(),
                    }),
                )
                    .into_response()
            }
            ErrorCategory::Internal | ErrorCategory::Startup => {
                // 詳細錯誤只寫入伺服器日誌
                tracing::error!("Prediction error: {} ({:?})", self, self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: INTERNAL_ERROR_MESSAGE.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// 價格四捨五入到小數點後兩位，剛好一半時取偶數
pub fn round_price(price: f64) -> f64 {
    (price * 100.0).round_ties_even() / 100.0
}

fn parse_record(body: &[u8]) -> Result<InputRecord, PriceError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| PriceError::InvalidRequestBody {
            message: format!("failed to decode JSON object: {}", e),
        })?;
    InputRecord::try_from(value)
}

/// The body is parsed regardless of the request content type.
pub async fn predict_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictResponse>, PriceError> {
    let record = parse_record(&body)?;
    let price = state.bundle().predict_price(&record)?;

    Ok(Json(PredictResponse {
        price: round_price(price),
    }))
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn home_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
