//! Route tree
//!
//! Podium routes live under `/api/podium`, the village game and system
//! routes under `/api`. Every handler answers with a finished response, so
//! the only rejections left for [`handle_rejection`] are unmatched routes and
//! body-size failures.

pub mod podium;
pub mod system;
pub mod village;

use crate::error::{handle_rejection, ApiError};
use crate::state::SharedState;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::convert::Infallible;
use warp::http::header::{HeaderMap, HeaderValue};
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// Largest accepted request body
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

/// The whole API with CORS, security headers and request tracing
pub fn api(
    state: SharedState,
    frontend_origin: &str,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let cors = warp::cors()
        .allow_origin(frontend_origin)
        .allow_credentials(true)
        .allow_methods(vec!["GET", "POST", "PATCH", "OPTIONS"])
        .allow_headers(vec!["content-type"]);

    warp::path("api")
        .and(
            podium::routes(state.clone())
                .or(village::routes(state.clone()))
                .unify()
                .or(system::routes(state))
                .unify(),
        )
        .recover(handle_rejection)
        .unify()
        .with(cors)
        .with(warp::reply::with::headers(security_headers()))
        .with(warp::trace::request())
}

fn security_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("SAMEORIGIN"));
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));
    headers.insert("x-dns-prefetch-control", HeaderValue::from_static("off"));
    headers
}

pub(crate) fn with_state(
    state: SharedState,
) -> impl Filter<Extract = (SharedState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Raw body, size-limited; parsing happens in the handler
pub(crate) fn body() -> impl Filter<Extract = (Bytes,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::bytes())
}

/// Query string as plain key/value pairs
pub(crate) fn query(
) -> impl Filter<Extract = (HashMap<String, String>,), Error = Rejection> + Clone {
    warp::query::<HashMap<String, String>>()
}

pub(crate) fn json_reply<T: Serialize>(body: &T, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(body), status).into_response()
}

/// Serialize `result` with `status`, or the error's own reply
pub(crate) fn respond<T: Serialize>(result: Result<T, ApiError>, status: StatusCode) -> Response {
    match result {
        Ok(body) => json_reply(&body, status),
        Err(err) => err.into_response(),
    }
}

pub(crate) fn parse_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes)
        .map_err(|e| ApiError::InvalidInput(format!("invalid JSON body: {e}")))
}

/// Optional non-negative `limit` query parameter
pub(crate) fn parse_limit(query: &HashMap<String, String>) -> Result<Option<usize>, ApiError> {
    match query.get("limit").map(|raw| raw.trim()) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<usize>().map(Some).map_err(|_| {
            ApiError::InvalidInput(format!(
                "limit must be a non-negative integer, got '{raw}'"
            ))
        }),
    }
}

/// Non-empty query parameter
pub(crate) fn query_param(query: &HashMap<String, String>, key: &str) -> Option<String> {
    query
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn limit_parsing() {
        assert_eq!(parse_limit(&query_of(&[])).unwrap(), None);
        assert_eq!(parse_limit(&query_of(&[("limit", "")])).unwrap(), None);
        assert_eq!(parse_limit(&query_of(&[("limit", "3")])).unwrap(), Some(3));
        assert!(parse_limit(&query_of(&[("limit", "-1")])).is_err());
        assert!(parse_limit(&query_of(&[("limit", "ten")])).is_err());
    }

    #[test]
    fn blank_query_params_are_absent() {
        let query = query_of(&[("role", " "), ("placeId", "ecole")]);

        assert_eq!(query_param(&query, "role"), None);
        assert_eq!(query_param(&query, "placeId").as_deref(), Some("ecole"));
    }
}
