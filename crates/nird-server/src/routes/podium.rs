//! Podium routes: mission teams, rankings and score updates
//!
//! Validation order for score updates: body shape (400), mission (404),
//! team membership (404). Only a resolved target reaches the mutator.
//!
//! `update-score` is the retry-safe form. `add-score` applies its delta on
//! every delivery, so a duplicated request adds twice.

use super::{body, json_reply, parse_limit, query, respond, with_state};
use crate::error::ApiError;
use crate::state::SharedState;
use chrono::{DateTime, Utc};
use nird_podium::{MissionId, RankingRow, ScoreEntry, Team, TeamId};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::Response;
use warp::{Filter, Rejection};

/// Routes under `/api/podium`
pub fn routes(state: SharedState) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let missions_route = warp::path!("missions")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(list_missions);

    let teams_route = warp::path!("teams")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(list_teams);

    let mission_teams_route = warp::path!("mission" / i64 / "teams")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(mission_teams);

    let ranking_route = warp::path!("mission" / i64 / "ranking")
        .and(warp::get())
        .and(query())
        .and(with_state(state.clone()))
        .and_then(ranking);

    let update_score_route = warp::path!("mission" / i64 / "update-score")
        .and(warp::post())
        .and(body())
        .and(with_state(state.clone()))
        .and_then(update_score);

    let add_score_route = warp::path!("mission" / i64 / "add-score")
        .and(warp::post())
        .and(body())
        .and(with_state(state))
        .and_then(add_score);

    warp::path("podium").and(
        missions_route
            .or(teams_route)
            .unify()
            .or(mission_teams_route)
            .unify()
            .or(ranking_route)
            .unify()
            .or(update_score_route)
            .unify()
            .or(add_score_route)
            .unify(),
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MissionSummary {
    id: MissionId,
    title: String,
    url: String,
    team_count: usize,
}

#[derive(Debug, Serialize)]
struct MissionList {
    missions: Vec<MissionSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TeamSummary {
    team_id: TeamId,
    name: String,
    url: String,
    members_count: usize,
    members: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mission_ids: Option<Vec<MissionId>>,
}

impl TeamSummary {
    fn of(team: &Team) -> Self {
        Self {
            team_id: team.id,
            name: team.name.clone(),
            url: team.url.clone(),
            members_count: team.members.len(),
            members: team.members.clone(),
            mission_ids: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TeamList {
    team_count: usize,
    teams: Vec<TeamSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MissionTeams {
    mission_id: MissionId,
    mission_title: String,
    mission_url: String,
    team_count: usize,
    teams: Vec<TeamSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Ranking {
    mission_id: MissionId,
    mission_title: String,
    timestamp: DateTime<Utc>,
    teams: Vec<RankingRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreUpdate {
    success: bool,
    message: String,
    updated: ScoreEntry,
    new_ranking: Vec<RankingRow>,
}

async fn list_missions(state: SharedState) -> Result<Response, Infallible> {
    let missions = state
        .podium
        .catalog()
        .missions
        .iter()
        .map(|m| MissionSummary {
            id: m.id,
            title: m.title.clone(),
            url: m.url.clone(),
            team_count: m.team_ids.len(),
        })
        .collect();

    Ok(json_reply(&MissionList { missions }, StatusCode::OK))
}

async fn list_teams(state: SharedState) -> Result<Response, Infallible> {
    let teams: Vec<TeamSummary> = state
        .podium
        .catalog()
        .teams
        .iter()
        .map(|t| TeamSummary {
            mission_ids: Some(t.mission_ids.clone()),
            ..TeamSummary::of(t)
        })
        .collect();

    Ok(json_reply(
        &TeamList {
            team_count: teams.len(),
            teams,
        },
        StatusCode::OK,
    ))
}

async fn mission_teams(mission_id: i64, state: SharedState) -> Result<Response, Infallible> {
    let mission_id = MissionId(mission_id);
    let result = state
        .podium
        .mission_by_id(mission_id)
        .ok_or_else(|| mission_not_found(mission_id))
        .map(|mission| {
            let teams: Vec<TeamSummary> = state
                .podium
                .teams_for_mission(mission_id)
                .into_iter()
                .map(TeamSummary::of)
                .collect();
            MissionTeams {
                mission_id,
                mission_title: mission.title.clone(),
                mission_url: mission.url.clone(),
                team_count: teams.len(),
                teams,
            }
        });

    Ok(respond(result, StatusCode::OK))
}

async fn ranking(
    mission_id: i64,
    query: HashMap<String, String>,
    state: SharedState,
) -> Result<Response, Infallible> {
    Ok(respond(ranking_body(&state, MissionId(mission_id), &query), StatusCode::OK))
}

fn ranking_body(
    state: &SharedState,
    mission_id: MissionId,
    query: &HashMap<String, String>,
) -> Result<Ranking, ApiError> {
    let mission = state
        .podium
        .mission_by_id(mission_id)
        .ok_or_else(|| mission_not_found(mission_id))?;
    let limit = parse_limit(query)?;

    let mut teams = state
        .podium
        .ranking_for(mission_id)
        .ok_or_else(|| mission_not_found(mission_id))?;
    if let Some(limit) = limit {
        teams.truncate(limit);
    }

    Ok(Ranking {
        mission_id,
        mission_title: mission.title.clone(),
        timestamp: Utc::now(),
        teams,
    })
}

async fn update_score(
    mission_id: i64,
    body: Bytes,
    state: SharedState,
) -> Result<Response, Infallible> {
    let result = score_body(&body, "newScore").and_then(|(team_id, new_score)| {
        let target = state.podium.resolve(MissionId(mission_id), team_id)?;
        let updated = state.podium.set_score(target, new_score)?;
        let message = format!("team {team_id} score set to {new_score}");
        Ok(score_update(&state, message, updated))
    });

    Ok(respond(result, StatusCode::OK))
}

async fn add_score(
    mission_id: i64,
    body: Bytes,
    state: SharedState,
) -> Result<Response, Infallible> {
    let result = score_body(&body, "deltaScore").and_then(|(team_id, delta)| {
        let target = state.podium.resolve(MissionId(mission_id), team_id)?;
        let updated = state.podium.add_score(target, delta)?;
        let message = format!(
            "team {team_id} score changed by {delta} (now {})",
            updated.score
        );
        Ok(score_update(&state, message, updated))
    });

    Ok(respond(result, StatusCode::OK))
}

fn score_update(state: &SharedState, message: String, updated: ScoreEntry) -> ScoreUpdate {
    let new_ranking = state
        .podium
        .ranking_for(updated.mission_id)
        .unwrap_or_default();

    ScoreUpdate {
        success: true,
        message,
        updated,
        new_ranking,
    }
}

fn mission_not_found(mission_id: MissionId) -> ApiError {
    ApiError::NotFound(format!("mission {mission_id} not found"))
}

/// Pull `{ teamId, <score_field> }` out of a request body
fn score_body(raw: &[u8], score_field: &str) -> Result<(TeamId, i64), ApiError> {
    let invalid = || {
        ApiError::InvalidInput(format!(
            "invalid body, expected {{ teamId: number, {score_field}: number }}"
        ))
    };

    let value: Value = serde_json::from_slice(raw).map_err(|_| invalid())?;
    let team_id = value.get("teamId").and_then(lenient_integer).ok_or_else(invalid)?;
    let score = value.get(score_field).and_then(strict_integer).ok_or_else(invalid)?;

    Ok((TeamId(team_id), score))
}

/// Integer-valued JSON number; fractional numbers and non-numbers are `None`
fn strict_integer(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    if value.as_u64().is_some() {
        return Some(i64::MAX);
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i64)
}

/// Integer-valued number or a string holding one
fn lenient_integer(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        other => strict_integer(other),
    }
}
