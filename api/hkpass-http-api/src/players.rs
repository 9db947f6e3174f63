use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use hkpass_app::domain::{
    PlayerId, TeamId,
    player::{NewPlayer, Player, PlayerFilter, PlayerUpdate},
    visibility::PlayerVisibility,
};
use serde::{Deserialize, Deserializer};

use crate::{AppState, ServiceError};

#[derive(serde::Serialize)]
pub struct JsonPlayer {
    id: i64,
    number: String,
    name: String,
    personal_score: i64,
    chips: i64,
    completed_minigame_count: i64,
    team: Option<i64>,
    hide_name: bool,
    hide_team: bool,
    hide_personal_score: bool,
    hide_completed_minigame_count: bool,
}

impl From<Player> for JsonPlayer {
    fn from(player: Player) -> Self {
        let visibility = player.visibility;
        Self {
            id: player.id.0,
            number: player.number,
            name: player.name,
            personal_score: player.personal_score,
            chips: player.chips,
            completed_minigame_count: player.completed_minigame_count,
            team: player.team.map(|t| t.0),
            hide_name: visibility.hide_name(),
            hide_team: visibility.hide_team(),
            hide_personal_score: visibility.hide_personal_score(),
            hide_completed_minigame_count: visibility.hide_completed_minigame_count(),
        }
    }
}

#[derive(serde::Deserialize)]
pub struct JsonPlayerBody {
    number: String,
    name: String,
    #[serde(default)]
    personal_score: i64,
    #[serde(default)]
    chips: i64,
    #[serde(default)]
    completed_minigame_count: i64,
    #[serde(default)]
    team: Option<i64>,
    #[serde(default)]
    hide_name: bool,
    #[serde(default)]
    hide_team: bool,
    #[serde(default)]
    hide_personal_score: bool,
    #[serde(default)]
    hide_completed_minigame_count: bool,
}

impl From<JsonPlayerBody> for NewPlayer {
    fn from(body: JsonPlayerBody) -> Self {
        NewPlayer {
            number: body.number,
            name: body.name,
            personal_score: body.personal_score,
            chips: body.chips,
            completed_minigame_count: body.completed_minigame_count,
            team: body.team.map(TeamId),
            visibility: PlayerVisibility::from_hide_flags(
                body.hide_name,
                body.hide_team,
                body.hide_personal_score,
                body.hide_completed_minigame_count,
            ),
        }
    }
}

/// Absent keeps the stored value, `null` clears it.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(serde::Deserialize)]
pub struct JsonPlayerPatch {
    number: Option<String>,
    name: Option<String>,
    personal_score: Option<i64>,
    chips: Option<i64>,
    completed_minigame_count: Option<i64>,
    #[serde(default, deserialize_with = "present")]
    team: Option<Option<i64>>,
    hide_name: Option<bool>,
    hide_team: Option<bool>,
    hide_personal_score: Option<bool>,
    hide_completed_minigame_count: Option<bool>,
}

impl From<JsonPlayerPatch> for PlayerUpdate {
    fn from(patch: JsonPlayerPatch) -> Self {
        PlayerUpdate {
            number: patch.number,
            name: patch.name,
            personal_score: patch.personal_score,
            chips: patch.chips,
            completed_minigame_count: patch.completed_minigame_count,
            team: patch.team.map(|team| team.map(TeamId)),
            hide_name: patch.hide_name,
            hide_team: patch.hide_team,
            hide_personal_score: patch.hide_personal_score,
            hide_completed_minigame_count: patch.hide_completed_minigame_count,
        }
    }
}

#[derive(serde::Deserialize)]
pub struct JsonPlayerQuery {
    team: Option<i64>,
    #[serde(rename = "team__name")]
    team_name: Option<String>,
}

pub async fn list(
    State(app_state): State<AppState>,
    Query(query): Query<JsonPlayerQuery>,
) -> Result<Json<Vec<JsonPlayer>>, ServiceError> {
    let filter = PlayerFilter {
        team_id: query.team.map(TeamId),
        team_name: query.team_name,
    };
    let players = app_state
        .app
        .player_manage_use_case
        .list_players(filter)
        .await?;
    Ok(Json(players.into_iter().map(JsonPlayer::from).collect()))
}

pub async fn get(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JsonPlayer>, ServiceError> {
    let player = app_state
        .app
        .player_manage_use_case
        .get_player(PlayerId(id))
        .await?;
    Ok(Json(player.into()))
}

pub async fn create(
    State(app_state): State<AppState>,
    Json(body): Json<JsonPlayerBody>,
) -> Result<(StatusCode, Json<JsonPlayer>), ServiceError> {
    let player = app_state
        .app
        .player_manage_use_case
        .create_player(body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(player.into())))
}

pub async fn replace(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<JsonPlayerBody>,
) -> Result<Json<JsonPlayer>, ServiceError> {
    let player = app_state
        .app
        .player_manage_use_case
        .replace_player(PlayerId(id), body.into())
        .await?;
    Ok(Json(player.into()))
}

pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<JsonPlayerPatch>,
) -> Result<Json<JsonPlayer>, ServiceError> {
    let player = app_state
        .app
        .player_manage_use_case
        .update_player(PlayerId(id), patch.into())
        .await?;
    Ok(Json(player.into()))
}

pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    app_state
        .app
        .player_manage_use_case
        .delete_player(PlayerId(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
