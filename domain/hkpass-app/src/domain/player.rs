use validator::Validate;

use crate::domain::{
    PlayerId, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError, TeamId,
    visibility::PlayerVisibility,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub number: String,
    pub name: String,
    pub personal_score: i64,
    pub chips: i64,
    pub completed_minigame_count: i64,
    pub team: Option<TeamId>,
    pub visibility: PlayerVisibility,
}

#[derive(Clone, Debug, PartialEq, Eq, Validate)]
pub struct NewPlayer {
    #[validate(length(min = 1, max = 20))]
    pub number: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 0))]
    pub personal_score: i64,
    #[validate(range(min = 0))]
    pub chips: i64,
    #[validate(range(min = 0))]
    pub completed_minigame_count: i64,
    pub team: Option<TeamId>,
    pub visibility: PlayerVisibility,
}

impl NewPlayer {
    pub fn new(number: impl Into<String>, name: impl Into<String>, team: Option<TeamId>) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            personal_score: 0,
            chips: 0,
            completed_minigame_count: 0,
            team,
            visibility: PlayerVisibility::default(),
        }
    }
}

/// Field-wise change to a player; `None` keeps the stored value and
/// `team: Some(None)` detaches the player from its team.
#[derive(Clone, Debug, Default, PartialEq, Eq, Validate)]
pub struct PlayerUpdate {
    #[validate(length(min = 1, max = 20))]
    pub number: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub personal_score: Option<i64>,
    #[validate(range(min = 0))]
    pub chips: Option<i64>,
    #[validate(range(min = 0))]
    pub completed_minigame_count: Option<i64>,
    pub team: Option<Option<TeamId>>,
    pub hide_name: Option<bool>,
    pub hide_team: Option<bool>,
    pub hide_personal_score: Option<bool>,
    pub hide_completed_minigame_count: Option<bool>,
}

impl PlayerUpdate {
    pub fn replace_with(player: NewPlayer) -> Self {
        Self {
            number: Some(player.number),
            name: Some(player.name),
            personal_score: Some(player.personal_score),
            chips: Some(player.chips),
            completed_minigame_count: Some(player.completed_minigame_count),
            team: Some(player.team),
            hide_name: Some(player.visibility.hide_name()),
            hide_team: Some(player.visibility.hide_team()),
            hide_personal_score: Some(player.visibility.hide_personal_score()),
            hide_completed_minigame_count: Some(player.visibility.hide_completed_minigame_count()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, player: &mut Player) {
        if let Some(number) = &self.number {
            player.number = number.clone();
        }
        if let Some(name) = &self.name {
            player.name = name.clone();
        }
        if let Some(personal_score) = self.personal_score {
            player.personal_score = personal_score;
        }
        if let Some(chips) = self.chips {
            player.chips = chips;
        }
        if let Some(count) = self.completed_minigame_count {
            player.completed_minigame_count = count;
        }
        if let Some(team) = self.team {
            player.team = team;
        }
        if let Some(hide) = self.hide_name {
            player.visibility.show_name = !hide;
        }
        if let Some(hide) = self.hide_team {
            player.visibility.show_team = !hide;
        }
        if let Some(hide) = self.hide_personal_score {
            player.visibility.show_personal_score = !hide;
        }
        if let Some(hide) = self.hide_completed_minigame_count {
            player.visibility.show_completed_minigame_count = !hide;
        }
    }
}

/// Exact-match filter; both conditions must hold when both are set.
#[derive(Clone, Debug, Default)]
pub struct PlayerFilter {
    pub team_id: Option<TeamId>,
    pub team_name: Option<String>,
}

#[async_trait::async_trait]
pub trait PlayerRepository {
    async fn list_players(&self, filter: PlayerFilter) -> Result<Vec<Player>, RepoError>;
    async fn get_player(&self, id: PlayerId) -> Result<Player, RepoRetrieveError>;
    async fn create_player(&self, player: NewPlayer) -> Result<Player, RepoCreateError>;
    async fn update_player(
        &self,
        id: PlayerId,
        update: PlayerUpdate,
    ) -> Result<Player, RepoUpdateError>;
    async fn delete_player(&self, id: PlayerId) -> Result<Player, RepoRetrieveError>;
}
