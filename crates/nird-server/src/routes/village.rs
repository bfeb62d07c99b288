//! Village game routes: players, missions, progress, leaderboard, stats

use super::{body, parse_json, parse_limit, query, query_param, respond, with_state};
use crate::error::ApiError;
use crate::state::SharedState;
use nird_village::{
    Completion, LeaderboardEntry, MissionFilter, Progress, Resource, User, VillageMission,
    DEFAULT_LEADERBOARD_LIMIT,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::Response;
use warp::{Filter, Rejection};

/// Routes under `/api` for the village game
pub fn routes(state: SharedState) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let register_route = warp::path!("users")
        .and(warp::post())
        .and(body())
        .and(with_state(state.clone()))
        .and_then(register);

    let user_route = warp::path!("users" / String)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(user);

    let role_route = warp::path!("users" / String / "role")
        .and(warp::patch())
        .and(body())
        .and(with_state(state.clone()))
        .and_then(set_role);

    let progress_route = warp::path!("users" / String / "progress")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(progress);

    let missions_route = warp::path!("missions")
        .and(warp::get())
        .and(query())
        .and(with_state(state.clone()))
        .and_then(missions);

    let mission_route = warp::path!("missions" / String)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(mission);

    let start_route = warp::path!("missions" / String / "start")
        .and(warp::post())
        .and(body())
        .and(with_state(state.clone()))
        .and_then(start_mission);

    let complete_route = warp::path!("missions" / String / "complete")
        .and(warp::post())
        .and(body())
        .and(with_state(state.clone()))
        .and_then(complete_mission);

    let leaderboard_route = warp::path!("leaderboard")
        .and(warp::get())
        .and(query())
        .and(with_state(state.clone()))
        .and_then(leaderboard);

    let stats_route = warp::path!("stats")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(stats);

    let resources_route = warp::path!("resources")
        .and(warp::get())
        .and(with_state(state))
        .and_then(resources);

    register_route
        .or(user_route)
        .unify()
        .or(role_route)
        .unify()
        .or(progress_route)
        .unify()
        .or(missions_route)
        .unify()
        .or(mission_route)
        .unify()
        .or(start_route)
        .unify()
        .or(complete_route)
        .unify()
        .or(leaderboard_route)
        .unify()
        .or(stats_route)
        .unify()
        .or(resources_route)
        .unify()
}

#[derive(Debug, Deserialize)]
struct RegisterBody {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RoleBody {
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MissionRunBody {
    #[serde(default)]
    user_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct UserReply {
    user: User,
}

#[derive(Debug, Serialize)]
struct MissionsReply {
    missions: Vec<VillageMission>,
}

#[derive(Debug, Serialize)]
struct MissionReply {
    mission: VillageMission,
}

#[derive(Debug, Serialize)]
struct StartReply {
    message: &'static str,
    progress: Progress,
    mission: VillageMission,
}

#[derive(Debug, Serialize)]
struct CompleteReply {
    message: &'static str,
    #[serde(flatten)]
    completion: Completion,
}

#[derive(Debug, Serialize)]
struct LeaderboardReply {
    leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize)]
struct ResourcesReply {
    resources: Vec<Resource>,
}

fn required_user_id(raw: &[u8]) -> Result<String, ApiError> {
    parse_json::<MissionRunBody>(raw)?
        .user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::InvalidInput("userId is required".to_string()))
}

async fn register(body: Bytes, state: SharedState) -> Result<Response, Infallible> {
    let result = parse_json::<RegisterBody>(&body).and_then(|b| {
        let user = state.village.register(
            b.username.as_deref().unwrap_or_default(),
            b.role.as_deref().unwrap_or_default(),
        )?;
        Ok(UserReply { user })
    });

    Ok(respond(result, StatusCode::CREATED))
}

async fn user(id: String, state: SharedState) -> Result<Response, Infallible> {
    let result = state
        .village
        .user(&id)
        .map(|user| UserReply { user })
        .map_err(ApiError::from);

    Ok(respond(result, StatusCode::OK))
}

async fn set_role(id: String, body: Bytes, state: SharedState) -> Result<Response, Infallible> {
    let result = parse_json::<RoleBody>(&body).and_then(|b| {
        let user = state
            .village
            .set_role(&id, b.role.as_deref().unwrap_or_default())?;
        Ok(UserReply { user })
    });

    Ok(respond(result, StatusCode::OK))
}

async fn progress(id: String, state: SharedState) -> Result<Response, Infallible> {
    let result = state.village.progress(&id).map_err(ApiError::from);

    Ok(respond(result, StatusCode::OK))
}

async fn missions(
    query: HashMap<String, String>,
    state: SharedState,
) -> Result<Response, Infallible> {
    let filter = MissionFilter {
        role: query_param(&query, "role"),
        place_id: query_param(&query, "placeId"),
    };
    let reply = MissionsReply {
        missions: state.village.missions(&filter),
    };

    Ok(respond(Ok(reply), StatusCode::OK))
}

async fn mission(id: String, state: SharedState) -> Result<Response, Infallible> {
    let result = state
        .village
        .mission(&id)
        .map(|mission| MissionReply { mission })
        .map_err(ApiError::from);

    Ok(respond(result, StatusCode::OK))
}

async fn start_mission(
    id: String,
    body: Bytes,
    state: SharedState,
) -> Result<Response, Infallible> {
    let result = required_user_id(&body).and_then(|user_id| {
        let (progress, mission) = state.village.start_mission(&id, &user_id)?;
        Ok(StartReply {
            message: "mission started",
            progress,
            mission,
        })
    });

    Ok(respond(result, StatusCode::CREATED))
}

async fn complete_mission(
    id: String,
    body: Bytes,
    state: SharedState,
) -> Result<Response, Infallible> {
    let result = required_user_id(&body).and_then(|user_id| {
        let completion = state.village.complete_mission(&id, &user_id)?;
        Ok(CompleteReply {
            message: "mission completed",
            completion,
        })
    });

    Ok(respond(result, StatusCode::OK))
}

async fn leaderboard(
    query: HashMap<String, String>,
    state: SharedState,
) -> Result<Response, Infallible> {
    let result = parse_limit(&query).map(|limit| {
        let role = query_param(&query, "role");
        LeaderboardReply {
            leaderboard: state
                .village
                .leaderboard(limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT), role.as_deref()),
        }
    });

    Ok(respond(result, StatusCode::OK))
}

async fn stats(state: SharedState) -> Result<Response, Infallible> {
    Ok(respond(Ok(state.village.stats()), StatusCode::OK))
}

async fn resources(state: SharedState) -> Result<Response, Infallible> {
    let reply = ResourcesReply {
        resources: state.village.resources(),
    };

    Ok(respond(Ok(reply), StatusCode::OK))
}
