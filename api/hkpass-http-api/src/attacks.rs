use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use hkpass_app::domain::{
    PlayerId, TeamId,
    scoring::{AttackEvent, AttackRecord},
};

use crate::{AppState, ServiceError, narrow};

fn single_attack() -> i64 {
    1
}

#[derive(serde::Deserialize)]
pub struct JsonAttack {
    attacker_player_id: i64,
    attacker_team_id: i64,
    attacked_team_id: i64,
    #[serde(default = "single_attack")]
    count: i64,
}

#[derive(serde::Serialize)]
pub struct JsonAttackRecord {
    id: i64,
    attacker_player_id: i64,
    attacker_team_id: i64,
    attacked_team_id: i64,
    count: u32,
    team_bonus: i64,
    player_bonus: i64,
    attacked_increment: i64,
    created_at: String,
}

impl From<AttackRecord> for JsonAttackRecord {
    fn from(record: AttackRecord) -> Self {
        let event = record.attack.event;
        Self {
            id: record.id.0,
            attacker_player_id: event.attacker_player.0,
            attacker_team_id: event.attacker_team.0,
            attacked_team_id: event.attacked_team.0,
            count: event.count,
            team_bonus: record.attack.team_bonus,
            player_bonus: record.attack.player_bonus,
            attacked_increment: record.attack.attacked_increment,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

#[derive(serde::Deserialize)]
pub struct JsonAttackQuery {
    limit: Option<u64>,
}

pub async fn submit(
    State(app_state): State<AppState>,
    Json(body): Json<JsonAttack>,
) -> Result<(StatusCode, Json<JsonAttackRecord>), ServiceError> {
    let event = AttackEvent {
        attacker_player: PlayerId(body.attacker_player_id),
        attacker_team: TeamId(body.attacker_team_id),
        attacked_team: TeamId(body.attacked_team_id),
        count: narrow("count", body.count)?,
    };
    let record = app_state
        .app
        .attack_submit_use_case
        .submit_attack(event)
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

pub async fn list(
    State(app_state): State<AppState>,
    Query(query): Query<JsonAttackQuery>,
) -> Result<Json<Vec<JsonAttackRecord>>, ServiceError> {
    let records = app_state
        .app
        .attack_submit_use_case
        .list_attacks(query.limit)
        .await?;
    Ok(Json(records.into_iter().map(JsonAttackRecord::from).collect()))
}
