use std::sync::Arc;

use thiserror::Error;

use crate::domain::{
    RepoError, RepoRetrieveError,
    leaderboard::{Leaderboard, LeaderboardService},
    player::{PlayerFilter, PlayerRepository},
    settings::{LeaderboardRules, SettingsRepository},
    team::{TeamFilter, TeamRepository},
};

#[async_trait::async_trait]
pub trait GetLeaderboardsUseCase {
    async fn get_leaderboards(&self) -> Result<Vec<Leaderboard>, LeaderboardError>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeaderboardError {
    #[error("repository error")]
    Repository,
}

pub struct GetLeaderboardsUseCaseImpl<
    T: TeamRepository,
    P: PlayerRepository,
    S: SettingsRepository,
    L: LeaderboardService,
> {
    team_repository: Arc<T>,
    player_repository: Arc<P>,
    settings_repository: Arc<S>,
    leaderboard_service: Arc<L>,
}

impl<T: TeamRepository, P: PlayerRepository, S: SettingsRepository, L: LeaderboardService>
    GetLeaderboardsUseCaseImpl<T, P, S, L>
{
    pub fn new(
        team_repository: Arc<T>,
        player_repository: Arc<P>,
        settings_repository: Arc<S>,
        leaderboard_service: Arc<L>,
    ) -> Self {
        Self {
            team_repository,
            player_repository,
            settings_repository,
            leaderboard_service,
        }
    }

    async fn rules(&self) -> Result<LeaderboardRules, LeaderboardError> {
        match self.settings_repository.get_settings().await {
            Ok(settings) => Ok(settings.leaderboards),
            Err(RepoRetrieveError::NotFound) => {
                log::warn!("Settings record is missing, projecting leaderboards with default rules");
                Ok(LeaderboardRules::default())
            }
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load leaderboard rules: {}", e);
                Err(LeaderboardError::Repository)
            }
        }
    }
}

fn storage_failure(what: &str) -> impl FnOnce(RepoError) -> LeaderboardError + '_ {
    move |RepoError::StorageError(e)| {
        log::error!("Failed to load {} for leaderboards: {}", what, e);
        LeaderboardError::Repository
    }
}

#[async_trait::async_trait]
impl<
    T: TeamRepository + Send + Sync + 'static,
    P: PlayerRepository + Send + Sync + 'static,
    S: SettingsRepository + Send + Sync + 'static,
    L: LeaderboardService + Send + Sync + 'static,
> GetLeaderboardsUseCase for GetLeaderboardsUseCaseImpl<T, P, S, L>
{
    async fn get_leaderboards(&self) -> Result<Vec<Leaderboard>, LeaderboardError> {
        let rules = self.rules().await?;
        let teams = self
            .team_repository
            .list_teams(TeamFilter::default())
            .await
            .map_err(storage_failure("teams"))?;
        let players = self
            .player_repository
            .list_players(PlayerFilter::default())
            .await
            .map_err(storage_failure("players"))?;
        log::debug!(
            "Projecting leaderboards over {} teams and {} players",
            teams.len(),
            players.len()
        );
        Ok(self.leaderboard_service.project(&rules, &teams, &players))
    }
}
