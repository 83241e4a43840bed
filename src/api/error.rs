// =============================================================================
// API Rejections
// =============================================================================
//
// Every handler failure is turned into a JSON body `{ "error": "..." }` with
// a status that tells the caller whose fault it was:
//
//   400 Bad Request           a parameter is unusable (window < 1, out of
//                             the published range)
//   422 Unprocessable Entity  the price frame cannot serve the request
//                             (missing column, unordered dates, ragged
//                             columns)
// =============================================================================

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::catalog::OutOfBounds;
use crate::chart::ChartError;
use crate::market_data::FrameError;

/// Rejection type returned by the REST handlers.
#[derive(Debug)]
pub struct ApiRejection {
    status: StatusCode,
    message: String,
}

#[cfg(test)]
impl ApiRejection {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiRejection {
    fn into_response(self) -> Response {
        warn!(status = %self.status, error = %self.message, "request rejected");
        let body = serde_json::json!({
            "error": self.message,
        });
        (self.status, axum::Json(body)).into_response()
    }
}

impl From<ChartError> for ApiRejection {
    fn from(err: ChartError) -> Self {
        let status = if err.is_invalid_parameter() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<FrameError> for ApiRejection {
    fn from(err: FrameError) -> Self {
        ChartError::from(err).into()
    }
}

impl From<OutOfBounds> for ApiRejection {
    fn from(err: OutOfBounds) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
        }
    }
}
