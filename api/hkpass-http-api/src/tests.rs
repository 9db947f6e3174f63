use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use hkpass_persistence_sea_orm::{
    create_db_pool, create_schema, minigames::MiniGameRepositoryImpl,
    players::PlayerRepositoryImpl, scoreboard::ScoreboardRepositoryImpl,
    settings::SettingsRepositoryImpl, teams::TeamRepositoryImpl,
};
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_http::normalize_path::NormalizePath;

use crate::service;

async fn test_service() -> NormalizePath<axum::Router> {
    let db = create_db_pool("sqlite::memory:", 1).await.unwrap();
    create_schema(&db).await.unwrap();

    let app = hkpass_app::build_application(
        Arc::new(TeamRepositoryImpl::new(db.clone())),
        Arc::new(PlayerRepositoryImpl::new(db.clone())),
        Arc::new(MiniGameRepositoryImpl::new(db.clone())),
        Arc::new(SettingsRepositoryImpl::new(db.clone())),
        Arc::new(ScoreboardRepositoryImpl::new(db)),
    );
    app.settings_manage_use_case.ensure_settings().await.unwrap();
    service(Arc::new(app))
}

async fn send(
    service: &NormalizePath<axum::Router>,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        })
        .unwrap();
    let response = service.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn seed_two_teams(service: &NormalizePath<axum::Router>) -> (i64, i64, i64) {
    let (status, red) = send(service, "POST", "/api/teams", Some(json!({ "name": "Red" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, blue) = send(service, "POST", "/api/teams", Some(json!({ "name": "Blue" }))).await;
    let (status, alice) = send(
        service,
        "POST",
        "/api/players",
        Some(json!({ "number": "P-01", "name": "Alice", "team": red["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (
        red["id"].as_i64().unwrap(),
        blue["id"].as_i64().unwrap(),
        alice["id"].as_i64().unwrap(),
    )
}

#[tokio::test]
async fn test_attack_updates_scores_and_log() {
    let service = test_service().await;
    let (red, blue, alice) = seed_two_teams(&service).await;

    let (status, record) = send(
        &service,
        "POST",
        "/api/attacks",
        Some(json!({
            "attacker_player_id": alice,
            "attacker_team_id": red,
            "attacked_team_id": blue,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["count"], 1);
    assert_eq!(record["team_bonus"], 2);

    let (_, red_team) = send(&service, "GET", &format!("/api/teams/{}", red), None).await;
    let (_, blue_team) = send(&service, "GET", &format!("/api/teams/{}", blue), None).await;
    let (_, player) = send(&service, "GET", &format!("/api/players/{}", alice), None).await;
    assert_eq!(red_team["score"], 2);
    assert_eq!(blue_team["attacked_count"], 1);
    assert_eq!(player["personal_score"], 1);

    let (status, log) = send(&service, "GET", "/api/attacks?limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(log.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_self_attack_is_rejected_without_changes() {
    let service = test_service().await;
    let (red, _, alice) = seed_two_teams(&service).await;

    let (status, body) = send(
        &service,
        "POST",
        "/api/attacks",
        Some(json!({
            "attacker_player_id": alice,
            "attacker_team_id": red,
            "attacked_team_id": red,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, team) = send(&service, "GET", &format!("/api/teams/{}", red), None).await;
    assert_eq!(team["score"], 0);
    assert_eq!(team["attacked_count"], 0);
}

#[tokio::test]
async fn test_duplicate_team_name_conflicts() {
    let service = test_service().await;
    send(&service, "POST", "/api/teams", Some(json!({ "name": "Red" }))).await;
    let (status, _) = send(&service, "POST", "/api/teams", Some(json!({ "name": "Red" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_trailing_slash_reaches_collection() {
    let service = test_service().await;
    send(&service, "POST", "/api/teams/", Some(json!({ "name": "Red" }))).await;
    let (status, teams) = send(&service, "GET", "/api/teams/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(teams.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_deleting_team_removes_its_players() {
    let service = test_service().await;
    let (red, _, alice) = seed_two_teams(&service).await;

    let (status, _) = send(&service, "DELETE", &format!("/api/teams/{}", red), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&service, "GET", &format!("/api/players/{}", alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_players_filter_by_team_name() {
    let service = test_service().await;
    let (_, blue, _) = seed_two_teams(&service).await;
    send(
        &service,
        "POST",
        "/api/players",
        Some(json!({ "number": "P-02", "name": "Bob", "team": blue })),
    )
    .await;

    let (_, players) = send(&service, "GET", "/api/players?team__name=Blue", None).await;
    let players = players.as_array().unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0]["name"], "Bob");
}

#[tokio::test]
async fn test_minigame_patch_keeps_other_fields() {
    let service = test_service().await;
    let (status, game) = send(
        &service,
        "POST",
        "/api/minigames",
        Some(json!({
            "category": "Puzzle",
            "room": "A",
            "name": "Lockbox",
            "available_chips": 3,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(game["is_displayed"], true);

    let (status, game) = send(
        &service,
        "PATCH",
        &format!("/api/minigames/{}", game["id"]),
        Some(json!({ "room": "B" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["room"], "B");
    assert_eq!(game["name"], "Lockbox");
    assert_eq!(game["available_chips"], 3);
}

#[tokio::test]
async fn test_completion_credits_chips() {
    let service = test_service().await;
    let (_, _, alice) = seed_two_teams(&service).await;
    let (_, game) = send(
        &service,
        "POST",
        "/api/minigames",
        Some(json!({ "category": "Puzzle", "room": "A", "name": "Lockbox", "available_chips": 4 })),
    )
    .await;

    let (status, outcome) = send(
        &service,
        "POST",
        &format!("/api/minigames/{}/complete", game["id"]),
        Some(json!({ "player_id": alice })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["player"]["chips"], 4);
    assert_eq!(outcome["player"]["completed_minigame_count"], 1);
    assert_eq!(outcome["minigame"]["play_count"], 1);
}

#[tokio::test]
async fn test_hidden_player_ranking_leaves_other_boards() {
    let service = test_service().await;
    seed_two_teams(&service).await;

    let (status, settings) = send(
        &service,
        "PATCH",
        "/api/settings/1",
        Some(json!({ "hide_player_ranking": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["hide_player_ranking"], true);
    assert_eq!(settings["has_login_password"], false);

    let (status, boards) = send(&service, "GET", "/api/leaderboards", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(boards["player_score"]["hidden"], true);
    assert!(boards["player_score"]["entries"].as_array().unwrap().is_empty());
    assert_eq!(boards["team_score"]["hidden"], false);
    assert_eq!(boards["team_score"]["entries"].as_array().unwrap().len(), 2);
    assert_eq!(
        boards["player_minigame"]["entries"].as_array().unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_login_checks_display_password() {
    let service = test_service().await;
    let (status, _) = send(&service, "POST", "/api/login", Some(json!({ "password": "x" }))).await;
    assert_eq!(status, StatusCode::OK);

    send(
        &service,
        "PATCH",
        "/api/settings/1",
        Some(json!({ "login_password": "secret" })),
    )
    .await;
    let (status, _) = send(&service, "POST", "/api/login", Some(json!({ "password": "nope" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) =
        send(&service, "POST", "/api/login", Some(json!({ "password": " secret " }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_unknown_settings_id_is_not_found() {
    let service = test_service().await;
    let (status, _) = send(&service, "GET", "/api/settings/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, list) = send(&service, "GET", "/api/settings", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_player_put_resets_omitted_fields() {
    let service = test_service().await;
    let (red, _, alice) = seed_two_teams(&service).await;
    send(
        &service,
        "PATCH",
        &format!("/api/players/{}", alice),
        Some(json!({ "chips": 7, "hide_name": true })),
    )
    .await;

    let (status, player) = send(
        &service,
        "PUT",
        &format!("/api/players/{}", alice),
        Some(json!({ "number": "P-01", "name": "Alice B." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(player["name"], "Alice B.");
    assert_eq!(player["team"], Value::Null);
    assert_eq!(player["chips"], 0);
    assert_eq!(player["hide_name"], false);

    let (_, players) = send(&service, "GET", &format!("/api/players?team={}", red), None).await;
    assert!(players.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_minigame_put_resets_omitted_chips() {
    let service = test_service().await;
    let (_, game) = send(
        &service,
        "POST",
        "/api/minigames",
        Some(json!({ "category": "Puzzle", "room": "A", "name": "Lockbox", "available_chips": 5 })),
    )
    .await;

    let (status, game) = send(
        &service,
        "PUT",
        &format!("/api/minigames/{}", game["id"]),
        Some(json!({ "category": "Puzzle", "room": "C", "name": "Lockbox" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["room"], "C");
    assert_eq!(game["available_chips"], 0);
    assert_eq!(game["is_displayed"], true);
}

#[tokio::test]
async fn test_put_on_missing_id_is_not_found() {
    let service = test_service().await;
    let (status, _) = send(
        &service,
        "PUT",
        "/api/players/999",
        Some(json!({ "number": "P-09", "name": "Nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &service,
        "PUT",
        "/api/minigames/999",
        Some(json!({ "category": "Puzzle", "room": "A", "name": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &service,
        "PUT",
        "/api/teams/999",
        Some(json!({ "name": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
