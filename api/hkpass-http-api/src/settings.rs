use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use hkpass_app::domain::{
    SettingsId,
    settings::{CommonSetting, SettingsFields, SettingsUpdate},
};

use crate::{AppState, ServiceError, narrow};

/// The password hash is never sent back, only whether a gate is set.
#[derive(serde::Serialize)]
pub struct JsonSettings {
    id: i64,
    attacker_team_bonus: i64,
    attacker_player_bonus: i64,
    attacked_increment: i64,
    hide_team_ranking: bool,
    team_ranking_top_n: u32,
    hide_player_ranking: bool,
    player_ranking_top_n: u32,
    hide_attack_count_ranking: bool,
    attack_count_ranking_top_n: u32,
    hide_minigame_ranking: bool,
    minigame_ranking_top_n: u32,
    has_login_password: bool,
}

impl From<CommonSetting> for JsonSettings {
    fn from(settings: CommonSetting) -> Self {
        let rules = settings.leaderboards;
        Self {
            id: settings.id.0,
            attacker_team_bonus: settings.coefficients.attacker_team_bonus,
            attacker_player_bonus: settings.coefficients.attacker_player_bonus,
            attacked_increment: settings.coefficients.attacked_increment,
            hide_team_ranking: rules.team_ranking.hidden,
            team_ranking_top_n: rules.team_ranking.top_n,
            hide_player_ranking: rules.player_ranking.hidden,
            player_ranking_top_n: rules.player_ranking.top_n,
            hide_attack_count_ranking: rules.attack_count_ranking.hidden,
            attack_count_ranking_top_n: rules.attack_count_ranking.top_n,
            hide_minigame_ranking: rules.minigame_ranking.hidden,
            minigame_ranking_top_n: rules.minigame_ranking.top_n,
            has_login_password: settings.login_password_hash.is_some(),
        }
    }
}

/// Shared by POST, PUT and PATCH. Omitted fields keep their default on
/// POST and PUT and their stored value on PATCH.
#[derive(serde::Deserialize)]
pub struct JsonSettingsBody {
    attacker_team_bonus: Option<i64>,
    attacker_player_bonus: Option<i64>,
    attacked_increment: Option<i64>,
    hide_team_ranking: Option<bool>,
    team_ranking_top_n: Option<i64>,
    hide_player_ranking: Option<bool>,
    player_ranking_top_n: Option<i64>,
    hide_attack_count_ranking: Option<bool>,
    attack_count_ranking_top_n: Option<i64>,
    hide_minigame_ranking: Option<bool>,
    minigame_ranking_top_n: Option<i64>,
    login_password: Option<String>,
}

impl TryFrom<JsonSettingsBody> for SettingsUpdate {
    type Error = ServiceError;

    fn try_from(body: JsonSettingsBody) -> Result<Self, Self::Error> {
        let top_n = |field: &str, value: Option<i64>| -> Result<Option<u32>, ServiceError> {
            value.map(|v| narrow(field, v)).transpose()
        };
        Ok(SettingsUpdate {
            fields: SettingsFields {
                attacker_team_bonus: body.attacker_team_bonus,
                attacker_player_bonus: body.attacker_player_bonus,
                attacked_increment: body.attacked_increment,
                hide_team_ranking: body.hide_team_ranking,
                team_ranking_top_n: top_n("team_ranking_top_n", body.team_ranking_top_n)?,
                hide_player_ranking: body.hide_player_ranking,
                player_ranking_top_n: top_n("player_ranking_top_n", body.player_ranking_top_n)?,
                hide_attack_count_ranking: body.hide_attack_count_ranking,
                attack_count_ranking_top_n: top_n(
                    "attack_count_ranking_top_n",
                    body.attack_count_ranking_top_n,
                )?,
                hide_minigame_ranking: body.hide_minigame_ranking,
                minigame_ranking_top_n: top_n(
                    "minigame_ranking_top_n",
                    body.minigame_ranking_top_n,
                )?,
            },
            login_password: body.login_password,
        })
    }
}

pub async fn list(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<JsonSettings>>, ServiceError> {
    let settings = app_state
        .app
        .settings_manage_use_case
        .list_settings()
        .await?;
    Ok(Json(settings.into_iter().map(JsonSettings::from).collect()))
}

pub async fn get(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JsonSettings>, ServiceError> {
    let settings = app_state
        .app
        .settings_manage_use_case
        .get_settings(SettingsId(id))
        .await?;
    Ok(Json(settings.into()))
}

pub async fn create(
    State(app_state): State<AppState>,
    Json(body): Json<JsonSettingsBody>,
) -> Result<(StatusCode, Json<JsonSettings>), ServiceError> {
    let settings = app_state
        .app
        .settings_manage_use_case
        .create_settings(body.try_into()?)
        .await?;
    Ok((StatusCode::CREATED, Json(settings.into())))
}

pub async fn replace(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<JsonSettingsBody>,
) -> Result<Json<JsonSettings>, ServiceError> {
    let settings = app_state
        .app
        .settings_manage_use_case
        .replace_settings(SettingsId(id), body.try_into()?)
        .await?;
    Ok(Json(settings.into()))
}

pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<JsonSettingsBody>,
) -> Result<Json<JsonSettings>, ServiceError> {
    let settings = app_state
        .app
        .settings_manage_use_case
        .update_settings(SettingsId(id), body.try_into()?)
        .await?;
    Ok(Json(settings.into()))
}

pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    app_state
        .app
        .settings_manage_use_case
        .delete_settings(SettingsId(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
