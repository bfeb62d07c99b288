//! HTTP behaviour of the full filter tree
//!
//! Each test serves the sample catalog from a temporary data directory and
//! drives the API with `warp::test`, checking status codes, JSON shapes and
//! what ends up in the ledger file.

use nird_podium::{MissionId, TeamId};
use nird_server::{api, AppState, MAX_BODY_BYTES};
use nird_test_utils::{entry, DataDir, PODIUM_MISSION, RELAY_MISSION};
use nird_village::Village;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::test::request;
use warp::{Filter, Rejection, Reply};

const ORIGIN: &str = "http://localhost:5173";

fn app(
    data: &DataDir,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone + 'static {
    api(AppState::new(data.open(), Village::new()), ORIGIN)
}

fn json_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

fn ranked_team_ids(ranking: &Value) -> Vec<i64> {
    ranking
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["teamId"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn lists_missions_and_teams() {
    let data = DataDir::new();
    let api = app(&data);

    let res = request().path("/api/podium/missions").reply(&api).await;
    assert_eq!(res.status(), StatusCode::OK);
    let missions = json_body(res.body());
    assert_eq!(missions["missions"].as_array().unwrap().len(), 3);
    assert_eq!(missions["missions"][0]["teamCount"], 3);

    let res = request().path("/api/podium/teams").reply(&api).await;
    let teams = json_body(res.body());
    assert_eq!(teams["teamCount"], 4);
    assert_eq!(teams["teams"][1]["missionIds"], json!([1, 2]));
}

#[tokio::test]
async fn mission_teams_resolve_in_catalog_order() {
    let data = DataDir::new();
    let api = app(&data);

    let res = request().path("/api/podium/mission/2/teams").reply(&api).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = json_body(res.body());
    assert_eq!(body["missionId"], 2);
    assert_eq!(body["missionTitle"], "Relais");
    assert_eq!(body["teamCount"], 2);
    assert_eq!(body["teams"][0]["teamId"], 2);
    assert_eq!(body["teams"][1]["name"], "Relais Numérique");
    assert_eq!(body["teams"][1]["membersCount"], 1);
    assert!(body["teams"][0].get("missionIds").is_none());
}

#[tokio::test]
async fn unknown_mission_is_404() {
    let data = DataDir::new();
    let api = app(&data);

    for path in ["/api/podium/mission/404/teams", "/api/podium/mission/404/ranking"] {
        let res = request().path(path).reply(&api).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
        assert_eq!(json_body(res.body()), json!({ "error": "mission 404 not found" }));
    }
}

#[tokio::test]
async fn unknown_mission_wins_over_bad_limit() {
    let data = DataDir::new();
    let api = app(&data);

    let res = request()
        .path("/api/podium/mission/404/ranking?limit=abc")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(res.body()), json!({ "error": "mission 404 not found" }));
}

#[tokio::test]
async fn ranking_orders_by_score_then_team_id() {
    let data = DataDir::with_entries(&[
        entry(PODIUM_MISSION, 1, 10),
        entry(PODIUM_MISSION, 2, 50),
        entry(PODIUM_MISSION, 3, 50),
    ]);
    let api = app(&data);

    let res = request().path("/api/podium/mission/1/ranking").reply(&api).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = json_body(res.body());
    assert_eq!(body["missionTitle"], "Podium");
    assert_eq!(ranked_team_ids(&body["teams"]), vec![2, 3, 1]);
    assert_eq!(body["teams"][0]["rank"], 1);
    assert_eq!(body["teams"][2]["rank"], 3);
    assert_eq!(body["teams"][2]["score"], 10);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn ranking_limit_truncates_and_rejects_garbage() {
    let data = DataDir::with_entries(&[entry(PODIUM_MISSION, 3, 7)]);
    let api = app(&data);

    let res = request()
        .path("/api/podium/mission/1/ranking?limit=2")
        .reply(&api)
        .await;
    let body = json_body(res.body());
    assert_eq!(ranked_team_ids(&body["teams"]), vec![3, 1]);

    let res = request()
        .path("/api/podium/mission/1/ranking?limit=many")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_score_clamps_and_persists() {
    let data = DataDir::new();
    let api = app(&data);

    let res = request()
        .method("POST")
        .path("/api/podium/mission/1/update-score")
        .json(&json!({ "teamId": 2, "newScore": 999_999 }))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = json_body(res.body());
    assert_eq!(body["success"], true);
    assert_eq!(body["updated"]["score"], 10_000);
    assert_eq!(body["updated"]["teamId"], 2);
    assert_eq!(ranked_team_ids(&body["newRanking"]), vec![2, 1, 3]);

    let on_disk = data.read_scores();
    assert_eq!(on_disk.len(), 1);
    assert_eq!(on_disk[0].mission_id, PODIUM_MISSION);
    assert_eq!(on_disk[0].team_id, TeamId(2));
    assert_eq!(on_disk[0].score, 10_000);
}

#[tokio::test]
async fn update_score_is_idempotent() {
    let data = DataDir::new();
    let api = app(&data);

    for _ in 0..2 {
        let res = request()
            .method("POST")
            .path("/api/podium/mission/2/update-score")
            .json(&json!({ "teamId": 4, "newScore": 300 }))
            .reply(&api)
            .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let on_disk = data.read_scores();
    assert_eq!(on_disk.len(), 1);
    assert_eq!(on_disk[0].score, 300);
}

#[tokio::test]
async fn add_score_accumulates() {
    let data = DataDir::new();
    let api = app(&data);

    let mut last = Value::Null;
    for _ in 0..2 {
        let res = request()
            .method("POST")
            .path("/api/podium/mission/1/add-score")
            .json(&json!({ "teamId": 3, "deltaScore": 10 }))
            .reply(&api)
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        last = json_body(res.body());
    }

    assert_eq!(last["updated"]["score"], 20);
    assert_eq!(last["message"], "team 3 score changed by 10 (now 20)");

    let res = request()
        .method("POST")
        .path("/api/podium/mission/1/add-score")
        .json(&json!({ "teamId": 3, "deltaScore": -500 }))
        .reply(&api)
        .await;
    assert_eq!(json_body(res.body())["updated"]["score"], 0);
}

#[tokio::test]
async fn malformed_score_bodies_are_400() {
    let data = DataDir::new();
    let api = app(&data);

    let bodies = [
        json!({ "teamId": 1 }),
        json!({ "teamId": 1, "newScore": "lots" }),
        json!({ "teamId": 1, "newScore": 2.5 }),
        json!({ "teamId": "one", "newScore": 5 }),
        json!([1, 2]),
    ];
    for body in bodies {
        let res = request()
            .method("POST")
            .path("/api/podium/mission/1/update-score")
            .json(&body)
            .reply(&api)
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(
            json_body(res.body())["error"],
            "invalid body, expected { teamId: number, newScore: number }"
        );
    }

    let res = request()
        .method("POST")
        .path("/api/podium/mission/1/add-score")
        .body("not json")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert!(data.read_scores().is_empty());
}

#[tokio::test]
async fn mutations_check_mission_and_team() {
    let data = DataDir::new();
    let api = app(&data);

    let res = request()
        .method("POST")
        .path("/api/podium/mission/404/update-score")
        .json(&json!({ "teamId": 1, "newScore": 5 }))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    for route in ["update-score", "add-score"] {
        let field = if route == "update-score" { "newScore" } else { "deltaScore" };
        let mut body = json!({ "teamId": 4 });
        body[field] = json!(5);
        let res = request()
            .method("POST")
            .path(&format!("/api/podium/mission/1/{route}"))
            .json(&body)
            .reply(&api)
            .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{route}");
        assert_eq!(
            json_body(res.body())["error"],
            "team 4 not found in mission 1"
        );
    }

    assert!(data.read_scores().is_empty());
}

#[tokio::test]
async fn persist_failure_is_500_but_memory_keeps_the_write() {
    let data = DataDir::new();
    let api = app(&data);

    std::fs::remove_file(data.scores_path()).unwrap();
    std::fs::create_dir(data.scores_path()).unwrap();

    let res = request()
        .method("POST")
        .path("/api/podium/mission/1/update-score")
        .json(&json!({ "teamId": 1, "newScore": 42 }))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(res.body()), json!({ "error": "internal server error" }));

    let res = request().path("/api/podium/mission/1/ranking").reply(&api).await;
    let body = json_body(res.body());
    assert_eq!(body["teams"][0]["teamId"], 1);
    assert_eq!(body["teams"][0]["score"], 42);
}

#[tokio::test]
async fn orphaned_rows_survive_updates() {
    let data = DataDir::with_entries(&[entry(MissionId(77), 9, 500)]);
    let api = app(&data);

    let res = request().path("/api/podium/mission/1/ranking").reply(&api).await;
    assert_eq!(json_body(res.body())["teams"][0]["score"], 0);

    request()
        .method("POST")
        .path("/api/podium/mission/2/update-score")
        .json(&json!({ "teamId": 2, "newScore": 1 }))
        .reply(&api)
        .await;

    let on_disk = data.read_scores();
    assert_eq!(on_disk.len(), 2);
    assert_eq!(on_disk[0].mission_id, MissionId(77));
    assert_eq!(on_disk[1].mission_id, RELAY_MISSION);
}

#[tokio::test]
async fn oversized_bodies_are_413() {
    let data = DataDir::new();
    let api = app(&data);

    let padding = "x".repeat(usize::try_from(MAX_BODY_BYTES).unwrap() + 1);
    let res = request()
        .method("POST")
        .path("/api/podium/mission/1/update-score")
        .header("content-length", padding.len().to_string())
        .body(padding)
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn unknown_routes_are_json_404() {
    let data = DataDir::new();
    let api = app(&data);

    for path in ["/api/nothing-here", "/api/podium/mission/abc/teams", "/elsewhere"] {
        let res = request().path(path).reply(&api).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
        assert_eq!(json_body(res.body()), json!({ "error": "route not found" }));
    }
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let data = DataDir::new();
    let api = app(&data);

    let res = request().path("/api/info").reply(&api).await;
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");
    assert_eq!(res.headers()["x-frame-options"], "SAMEORIGIN");
    assert_eq!(json_body(res.body())["app"], "NIRD - Village Numérique Résistant");
}

#[tokio::test]
async fn cors_preflight_allows_the_frontend_only() {
    let data = DataDir::new();
    let api = app(&data);

    let res = request()
        .method("OPTIONS")
        .path("/api/podium/mission/1/update-score")
        .header("origin", ORIGIN)
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], ORIGIN);

    let res = request()
        .method("OPTIONS")
        .path("/api/podium/mission/1/update-score")
        .header("origin", "https://evil.example")
        .header("access-control-request-method", "POST")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn health_reports_counts() {
    let data = DataDir::with_entries(&[entry(PODIUM_MISSION, 1, 3)]);
    let api = app(&data);

    let res = request().path("/api/health").reply(&api).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = json_body(res.body());
    assert_eq!(body["status"], "OK");
    assert_eq!(body["dbStats"]["users"], 0);
    assert_eq!(body["dbStats"]["missions"], 4);
    assert_eq!(body["dbStats"]["podiumMissions"], 3);
    assert_eq!(body["dbStats"]["podiumTeams"], 4);
    assert_eq!(body["dbStats"]["scoreEntries"], 1);
}

#[tokio::test]
async fn village_player_flow() {
    let data = DataDir::new();
    let api = app(&data);

    let res = request()
        .method("POST")
        .path("/api/users")
        .json(&json!({ "username": "ada", "role": "technicien" }))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let user_id = json_body(res.body())["user"]["id"].as_str().unwrap().to_string();
    assert!(user_id.starts_with("user_"));

    let res = request()
        .method("POST")
        .path("/api/missions/mission-linux-revival/start")
        .json(&json!({ "userId": user_id }))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let started = json_body(res.body());
    assert_eq!(started["progress"]["missionId"], "mission-linux-revival");
    assert_eq!(started["progress"]["completed"], false);

    let res = request()
        .path(&format!("/api/users/{user_id}/progress"))
        .reply(&api)
        .await;
    let progress = json_body(res.body());
    assert_eq!(progress["activeMissions"].as_array().unwrap().len(), 1);
    assert_eq!(progress["completedCount"], 0);

    let res = request()
        .method("POST")
        .path("/api/missions/mission-linux-revival/complete")
        .json(&json!({ "userId": user_id, "answers": [] }))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let done = json_body(res.body());
    assert_eq!(done["pointsEarned"], 120);
    assert_eq!(done["user"]["totalPoints"], 120);

    let res = request()
        .method("POST")
        .path("/api/missions/mission-linux-revival/complete")
        .json(&json!({ "userId": user_id }))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = request().path("/api/leaderboard?limit=5").reply(&api).await;
    let board = json_body(res.body());
    assert_eq!(board["leaderboard"][0]["username"], "ada");
    assert_eq!(board["leaderboard"][0]["totalPoints"], 120);

    let res = request().path("/api/health").reply(&api).await;
    let health = json_body(res.body());
    assert_eq!(health["dbStats"]["users"], 1);
    assert_eq!(health["dbStats"]["activeProgress"], 0);
}

#[tokio::test]
async fn village_input_errors() {
    let data = DataDir::new();
    let api = app(&data);

    let res = request()
        .method("POST")
        .path("/api/users")
        .json(&json!({ "username": "  " }))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = request().path("/api/users/user_missing").reply(&api).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = request()
        .method("POST")
        .path("/api/missions/mission-linux-revival/start")
        .json(&json!({}))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res.body())["error"], "userId is required");

    let res = request().path("/api/missions/mission-inconnue").reply(&api).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn village_listings() {
    let data = DataDir::new();
    let api = app(&data);

    let res = request().path("/api/missions?placeId=ecole").reply(&api).await;
    let missions = json_body(res.body());
    assert_eq!(missions["missions"].as_array().unwrap().len(), 1);
    assert_eq!(missions["missions"][0]["id"], "mission-cloud-libre");

    let res = request().path("/api/resources").reply(&api).await;
    assert_eq!(json_body(res.body())["resources"].as_array().unwrap().len(), 6);

    let res = request()
        .method("POST")
        .path("/api/users")
        .json(&json!({ "username": "zoe", "role": "parent" }))
        .reply(&api)
        .await;
    let user_id = json_body(res.body())["user"]["id"].as_str().unwrap().to_string();

    let res = request()
        .method("PATCH")
        .path(&format!("/api/users/{user_id}/role"))
        .json(&json!({ "role": "enseignant" }))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res.body())["user"]["role"], "enseignant");

    let res = request().path("/api/stats").reply(&api).await;
    let stats = json_body(res.body());
    assert_eq!(stats["totalUsers"], 1);
    assert_eq!(stats["roleDistribution"]["enseignant"], 1);
}
