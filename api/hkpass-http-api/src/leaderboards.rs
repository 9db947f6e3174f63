use axum::{Json, extract::State};
use hkpass_app::domain::{
    leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardSubject},
    settings::LeaderboardKind,
};

use crate::{AppState, ServiceError};

#[derive(serde::Serialize)]
pub struct JsonLeaderboardEntry {
    rank: u32,
    id: i64,
    name: Option<String>,
    team_name: Option<String>,
    value: i64,
}

impl From<LeaderboardEntry> for JsonLeaderboardEntry {
    fn from(entry: LeaderboardEntry) -> Self {
        let id = match entry.subject {
            LeaderboardSubject::Team(id) => id.0,
            LeaderboardSubject::Player(id) => id.0,
        };
        Self {
            rank: entry.rank,
            id,
            name: entry.name,
            team_name: entry.team_name,
            value: entry.value,
        }
    }
}

#[derive(serde::Serialize, Default)]
pub struct JsonLeaderboard {
    hidden: bool,
    entries: Vec<JsonLeaderboardEntry>,
}

impl From<Leaderboard> for JsonLeaderboard {
    fn from(board: Leaderboard) -> Self {
        Self {
            hidden: board.hidden,
            entries: board.entries.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(serde::Serialize, Default)]
pub struct JsonLeaderboards {
    team_score: JsonLeaderboard,
    player_score: JsonLeaderboard,
    team_attacked: JsonLeaderboard,
    player_minigame: JsonLeaderboard,
}

pub async fn get_all(
    State(app_state): State<AppState>,
) -> Result<Json<JsonLeaderboards>, ServiceError> {
    let boards = app_state
        .app
        .leaderboard_get_use_case
        .get_leaderboards()
        .await?;

    let mut response = JsonLeaderboards::default();
    for board in boards {
        let slot = match board.kind {
            LeaderboardKind::TeamScore => &mut response.team_score,
            LeaderboardKind::PlayerScore => &mut response.player_score,
            LeaderboardKind::TeamAttacked => &mut response.team_attacked,
            LeaderboardKind::PlayerMiniGame => &mut response.player_minigame,
        };
        *slot = board.into();
    }
    Ok(Json(response))
}
