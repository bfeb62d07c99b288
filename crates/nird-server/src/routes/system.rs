//! Health and build information

use super::{json_reply, with_state};
use crate::state::SharedState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection};

/// Application name reported by `/api/info`
pub const APP_NAME: &str = "NIRD - Village Numérique Résistant";

/// Routes under `/api`
pub fn routes(state: SharedState) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let health_route = warp::path!("health")
        .and(warp::get())
        .and(with_state(state))
        .and_then(health);

    let info_route = warp::path!("info").and(warp::get()).and_then(info);

    health_route.or(info_route).unify()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Health {
    status: &'static str,
    message: &'static str,
    timestamp: DateTime<Utc>,
    db_stats: DataStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DataStats {
    users: usize,
    missions: usize,
    active_progress: usize,
    podium_missions: usize,
    podium_teams: usize,
    score_entries: usize,
}

#[derive(Debug, Serialize)]
struct Info {
    app: &'static str,
    version: &'static str,
}

async fn health(state: SharedState) -> Result<Response, Infallible> {
    let village = state.village.counts();
    let catalog = state.podium.catalog();

    let body = Health {
        status: "OK",
        message: "NIRD API running",
        timestamp: Utc::now(),
        db_stats: DataStats {
            users: village.users,
            missions: village.missions,
            active_progress: village.active_progress,
            podium_missions: catalog.missions.len(),
            podium_teams: catalog.teams.len(),
            score_entries: state.podium.scores_snapshot().len(),
        },
    };

    Ok(json_reply(&body, StatusCode::OK))
}

async fn info() -> Result<Response, Infallible> {
    let body = Info {
        app: APP_NAME,
        version: env!("CARGO_PKG_VERSION"),
    };

    Ok(json_reply(&body, StatusCode::OK))
}
