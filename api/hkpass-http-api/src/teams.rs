use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use hkpass_app::domain::{
    TeamId,
    team::{NewTeam, Team, TeamFilter, TeamUpdate},
    visibility::TeamVisibility,
};

use crate::{AppState, ServiceError};

#[derive(serde::Serialize)]
pub struct JsonTeam {
    id: i64,
    name: String,
    score: i64,
    attacked_count: i64,
    hide_ranking: bool,
    hide_team_name: bool,
}

impl From<Team> for JsonTeam {
    fn from(team: Team) -> Self {
        Self {
            id: team.id.0,
            hide_ranking: team.visibility.hide_ranking(),
            hide_team_name: team.visibility.hide_team_name(),
            name: team.name,
            score: team.score,
            attacked_count: team.attacked_count,
        }
    }
}

#[derive(serde::Deserialize)]
pub struct JsonTeamBody {
    name: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    attacked_count: i64,
    #[serde(default)]
    hide_ranking: bool,
    #[serde(default)]
    hide_team_name: bool,
}

impl From<JsonTeamBody> for NewTeam {
    fn from(body: JsonTeamBody) -> Self {
        NewTeam {
            name: body.name,
            score: body.score,
            attacked_count: body.attacked_count,
            visibility: TeamVisibility::from_hide_flags(body.hide_ranking, body.hide_team_name),
        }
    }
}

#[derive(serde::Deserialize)]
pub struct JsonTeamPatch {
    name: Option<String>,
    score: Option<i64>,
    attacked_count: Option<i64>,
    hide_ranking: Option<bool>,
    hide_team_name: Option<bool>,
}

impl From<JsonTeamPatch> for TeamUpdate {
    fn from(patch: JsonTeamPatch) -> Self {
        TeamUpdate {
            name: patch.name,
            score: patch.score,
            attacked_count: patch.attacked_count,
            hide_ranking: patch.hide_ranking,
            hide_team_name: patch.hide_team_name,
        }
    }
}

#[derive(serde::Deserialize)]
pub struct JsonTeamQuery {
    name: Option<String>,
}

pub async fn list(
    State(app_state): State<AppState>,
    Query(query): Query<JsonTeamQuery>,
) -> Result<Json<Vec<JsonTeam>>, ServiceError> {
    let teams = app_state
        .app
        .team_manage_use_case
        .list_teams(TeamFilter { name: query.name })
        .await?;
    Ok(Json(teams.into_iter().map(JsonTeam::from).collect()))
}

pub async fn get(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JsonTeam>, ServiceError> {
    let team = app_state
        .app
        .team_manage_use_case
        .get_team(TeamId(id))
        .await?;
    Ok(Json(team.into()))
}

pub async fn create(
    State(app_state): State<AppState>,
    Json(body): Json<JsonTeamBody>,
) -> Result<(StatusCode, Json<JsonTeam>), ServiceError> {
    let team = app_state
        .app
        .team_manage_use_case
        .create_team(body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(team.into())))
}

pub async fn replace(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<JsonTeamBody>,
) -> Result<Json<JsonTeam>, ServiceError> {
    let team = app_state
        .app
        .team_manage_use_case
        .replace_team(TeamId(id), body.into())
        .await?;
    Ok(Json(team.into()))
}

pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<JsonTeamPatch>,
) -> Result<Json<JsonTeam>, ServiceError> {
    let team = app_state
        .app
        .team_manage_use_case
        .update_team(TeamId(id), patch.into())
        .await?;
    Ok(Json(team.into()))
}

pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    app_state
        .app
        .team_manage_use_case
        .delete_team(TeamId(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
