use validator::Validate;

use crate::domain::{
    RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError, TeamId,
    visibility::TeamVisibility,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub score: i64,
    pub attacked_count: i64,
    pub visibility: TeamVisibility,
}

#[derive(Clone, Debug, PartialEq, Eq, Validate)]
pub struct NewTeam {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(range(min = 0))]
    pub score: i64,
    #[validate(range(min = 0))]
    pub attacked_count: i64,
    pub visibility: TeamVisibility,
}

impl NewTeam {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0,
            attacked_count: 0,
            visibility: TeamVisibility::default(),
        }
    }
}

/// Field-wise change to a team; `None` keeps the stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Validate)]
pub struct TeamUpdate {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub score: Option<i64>,
    #[validate(range(min = 0))]
    pub attacked_count: Option<i64>,
    pub hide_ranking: Option<bool>,
    pub hide_team_name: Option<bool>,
}

impl TeamUpdate {
    pub fn replace_with(team: NewTeam) -> Self {
        Self {
            name: Some(team.name),
            score: Some(team.score),
            attacked_count: Some(team.attacked_count),
            hide_ranking: Some(team.visibility.hide_ranking()),
            hide_team_name: Some(team.visibility.hide_team_name()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, team: &mut Team) {
        if let Some(name) = &self.name {
            team.name = name.clone();
        }
        if let Some(score) = self.score {
            team.score = score;
        }
        if let Some(attacked_count) = self.attacked_count {
            team.attacked_count = attacked_count;
        }
        if let Some(hide_ranking) = self.hide_ranking {
            team.visibility.show_ranking_value = !hide_ranking;
        }
        if let Some(hide_team_name) = self.hide_team_name {
            team.visibility.show_name = !hide_team_name;
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TeamFilter {
    pub name: Option<String>,
}

impl TeamFilter {
    pub fn matches(&self, team: &Team) -> bool {
        self.name.as_ref().is_none_or(|name| *name == team.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeletedTeam {
    pub team: Team,
    pub removed_players: u64,
}

#[async_trait::async_trait]
pub trait TeamRepository {
    async fn list_teams(&self, filter: TeamFilter) -> Result<Vec<Team>, RepoError>;
    async fn get_team(&self, id: TeamId) -> Result<Team, RepoRetrieveError>;
    async fn create_team(&self, team: NewTeam) -> Result<Team, RepoCreateError>;
    async fn update_team(&self, id: TeamId, update: TeamUpdate) -> Result<Team, RepoUpdateError>;
    /// Removes the team together with every player assigned to it.
    async fn delete_team(&self, id: TeamId) -> Result<DeletedTeam, RepoRetrieveError>;
}
