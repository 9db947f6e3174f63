use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use hkpass_app::domain::{
    MiniGameId, PlayerId,
    minigame::{MiniGame, MiniGameUpdate, NewMiniGame},
    scoring::CompletionOutcome,
};

use crate::{AppState, ServiceError, players::JsonPlayer};

#[derive(serde::Serialize)]
pub struct JsonMiniGame {
    id: i64,
    category: String,
    room: String,
    name: String,
    available_chips: i64,
    is_displayed: bool,
    is_limited: bool,
    limited_time: i64,
    play_count: i64,
}

impl From<MiniGame> for JsonMiniGame {
    fn from(game: MiniGame) -> Self {
        Self {
            id: game.id.0,
            category: game.category,
            room: game.room,
            name: game.name,
            available_chips: game.available_chips,
            is_displayed: game.is_displayed,
            is_limited: game.is_limited,
            limited_time: game.limited_time,
            play_count: game.play_count,
        }
    }
}

fn displayed_by_default() -> bool {
    true
}

#[derive(serde::Deserialize)]
pub struct JsonMiniGameBody {
    category: String,
    room: String,
    name: String,
    #[serde(default)]
    available_chips: i64,
    #[serde(default = "displayed_by_default")]
    is_displayed: bool,
    #[serde(default)]
    is_limited: bool,
    #[serde(default)]
    limited_time: i64,
    #[serde(default)]
    play_count: i64,
}

impl From<JsonMiniGameBody> for NewMiniGame {
    fn from(body: JsonMiniGameBody) -> Self {
        NewMiniGame {
            category: body.category,
            room: body.room,
            name: body.name,
            available_chips: body.available_chips,
            is_displayed: body.is_displayed,
            is_limited: body.is_limited,
            limited_time: body.limited_time,
            play_count: body.play_count,
        }
    }
}

#[derive(serde::Deserialize)]
pub struct JsonMiniGamePatch {
    category: Option<String>,
    room: Option<String>,
    name: Option<String>,
    available_chips: Option<i64>,
    is_displayed: Option<bool>,
    is_limited: Option<bool>,
    limited_time: Option<i64>,
    play_count: Option<i64>,
}

impl From<JsonMiniGamePatch> for MiniGameUpdate {
    fn from(patch: JsonMiniGamePatch) -> Self {
        MiniGameUpdate {
            category: patch.category,
            room: patch.room,
            name: patch.name,
            available_chips: patch.available_chips,
            is_displayed: patch.is_displayed,
            is_limited: patch.is_limited,
            limited_time: patch.limited_time,
            play_count: patch.play_count,
        }
    }
}

#[derive(serde::Deserialize)]
pub struct JsonCompletion {
    player_id: i64,
}

#[derive(serde::Serialize)]
pub struct JsonCompletionOutcome {
    player: JsonPlayer,
    minigame: JsonMiniGame,
}

impl From<CompletionOutcome> for JsonCompletionOutcome {
    fn from(outcome: CompletionOutcome) -> Self {
        Self {
            player: outcome.player.into(),
            minigame: outcome.minigame.into(),
        }
    }
}

pub async fn list(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<JsonMiniGame>>, ServiceError> {
    let games = app_state
        .app
        .minigame_manage_use_case
        .list_minigames()
        .await?;
    Ok(Json(games.into_iter().map(JsonMiniGame::from).collect()))
}

pub async fn get(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JsonMiniGame>, ServiceError> {
    let game = app_state
        .app
        .minigame_manage_use_case
        .get_minigame(MiniGameId(id))
        .await?;
    Ok(Json(game.into()))
}

pub async fn create(
    State(app_state): State<AppState>,
    Json(body): Json<JsonMiniGameBody>,
) -> Result<(StatusCode, Json<JsonMiniGame>), ServiceError> {
    let game = app_state
        .app
        .minigame_manage_use_case
        .create_minigame(body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(game.into())))
}

pub async fn replace(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<JsonMiniGameBody>,
) -> Result<Json<JsonMiniGame>, ServiceError> {
    let game = app_state
        .app
        .minigame_manage_use_case
        .replace_minigame(MiniGameId(id), body.into())
        .await?;
    Ok(Json(game.into()))
}

pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<JsonMiniGamePatch>,
) -> Result<Json<JsonMiniGame>, ServiceError> {
    let game = app_state
        .app
        .minigame_manage_use_case
        .update_minigame(MiniGameId(id), patch.into())
        .await?;
    Ok(Json(game.into()))
}

pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    app_state
        .app
        .minigame_manage_use_case
        .delete_minigame(MiniGameId(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Credits the game's chips to a player and counts one more play.
pub async fn complete(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<JsonCompletion>,
) -> Result<Json<JsonCompletionOutcome>, ServiceError> {
    let outcome = app_state
        .app
        .minigame_complete_use_case
        .complete(MiniGameId(id), PlayerId(body.player_id))
        .await?;
    Ok(Json(outcome.into()))
}
