use std::sync::Arc;

use validator::Validate;

use crate::{
    domain::{
        TeamId,
        team::{NewTeam, Team, TeamFilter, TeamRepository, TeamUpdate},
    },
    workflow::CrudError,
};

#[async_trait::async_trait]
pub trait ManageTeamsUseCase {
    async fn list_teams(&self, filter: TeamFilter) -> Result<Vec<Team>, CrudError>;
    async fn get_team(&self, id: TeamId) -> Result<Team, CrudError>;
    async fn create_team(&self, team: NewTeam) -> Result<Team, CrudError>;
    async fn replace_team(&self, id: TeamId, team: NewTeam) -> Result<Team, CrudError>;
    async fn update_team(&self, id: TeamId, update: TeamUpdate) -> Result<Team, CrudError>;
    async fn delete_team(&self, id: TeamId) -> Result<(), CrudError>;
}

pub struct ManageTeamsUseCaseImpl<T: TeamRepository> {
    team_repository: Arc<T>,
}

impl<T: TeamRepository> ManageTeamsUseCaseImpl<T> {
    pub fn new(team_repository: Arc<T>) -> Self {
        Self { team_repository }
    }
}

#[async_trait::async_trait]
impl<T: TeamRepository + Send + Sync + 'static> ManageTeamsUseCase for ManageTeamsUseCaseImpl<T> {
    async fn list_teams(&self, filter: TeamFilter) -> Result<Vec<Team>, CrudError> {
        self.team_repository
            .list_teams(filter)
            .await
            .map_err(|e| CrudError::from_list(e, "teams"))
    }

    async fn get_team(&self, id: TeamId) -> Result<Team, CrudError> {
        self.team_repository
            .get_team(id)
            .await
            .map_err(|e| CrudError::from_retrieve(e, format!("team {}", id)))
    }

    async fn create_team(&self, team: NewTeam) -> Result<Team, CrudError> {
        team.validate()?;
        let team = self
            .team_repository
            .create_team(team)
            .await
            .map_err(|e| CrudError::from_create(e, "team"))?;
        log::info!("Created team {} '{}'", team.id, team.name);
        Ok(team)
    }

    async fn replace_team(&self, id: TeamId, team: NewTeam) -> Result<Team, CrudError> {
        team.validate()?;
        self.update_team(id, TeamUpdate::replace_with(team)).await
    }

    async fn update_team(&self, id: TeamId, update: TeamUpdate) -> Result<Team, CrudError> {
        update.validate()?;
        let team = self
            .team_repository
            .update_team(id, update)
            .await
            .map_err(|e| CrudError::from_update(e, format!("team {}", id)))?;
        log::info!("Updated team {} '{}'", team.id, team.name);
        Ok(team)
    }

    async fn delete_team(&self, id: TeamId) -> Result<(), CrudError> {
        let deleted = self
            .team_repository
            .delete_team(id)
            .await
            .map_err(|e| CrudError::from_retrieve(e, format!("team {}", id)))?;
        log::info!(
            "Deleted team {} '{}' and {} of its players",
            id,
            deleted.team.name,
            deleted.removed_players
        );
        Ok(())
    }
}
