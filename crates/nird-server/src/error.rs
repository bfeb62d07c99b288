//! API errors and their HTTP replies
//!
//! Every failure leaves the server as `{ "error": "<message>" }` with the
//! status the variant maps to.

use nird_podium::PodiumError;
use nird_village::VillageError;
use serde::Serialize;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::reject::{LengthRequired, MethodNotAllowed, PayloadTooLarge};
use warp::reply::Response;
use warp::{Rejection, Reply};

/// Errors surfaced to HTTP clients
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Referenced mission, team or player does not exist
    #[error("{0}")]
    NotFound(String),

    /// Body, path or query parameter is unusable
    #[error("{0}")]
    InvalidInput(String),

    /// Durable store failed; details stay in the logs
    #[error("internal server error")]
    Storage(String),

    /// Body exceeds the accepted size
    #[error("request body too large")]
    PayloadTooLarge,

    /// No route matches the request
    #[error("route not found")]
    RouteNotFound,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// HTTP status for this error
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl Reply for ApiError {
    fn into_response(self) -> Response {
        if let Self::Storage(detail) = &self {
            tracing::error!("request failed on storage: {}", detail);
        }
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
        };
        warp::reply::with_status(warp::reply::json(&body), status).into_response()
    }
}

impl From<PodiumError> for ApiError {
    fn from(err: PodiumError) -> Self {
        match err {
            PodiumError::MissionNotFound(_) | PodiumError::TeamNotInMission { .. } => {
                Self::NotFound(err.to_string())
            }
            PodiumError::Storage(e) => Self::Storage(e.to_string()),
        }
    }
}

impl From<VillageError> for ApiError {
    fn from(err: VillageError) -> Self {
        if err.is_not_found() {
            Self::NotFound(err.to_string())
        } else {
            Self::InvalidInput(err.to_string())
        }
    }
}

/// Turn unmatched or rejected requests into JSON error replies
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let api = if err.is_not_found() || err.find::<MethodNotAllowed>().is_some() {
        ApiError::RouteNotFound
    } else if err.find::<PayloadTooLarge>().is_some() {
        ApiError::PayloadTooLarge
    } else if err.find::<LengthRequired>().is_some() {
        ApiError::InvalidInput("content-length header required".to_string())
    } else {
        tracing::warn!("unhandled rejection: {:?}", err);
        ApiError::InvalidInput("bad request".to_string())
    };

    Ok(api.into_response())
}
