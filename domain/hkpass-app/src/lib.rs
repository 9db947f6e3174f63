use std::sync::Arc;

use crate::{
    domain::{
        leaderboard::LeaderboardServiceImpl,
        minigame::MiniGameRepository,
        player::PlayerRepository,
        scoring::{ScoreboardRepository, ScoringServiceImpl},
        settings::SettingsRepository,
        team::TeamRepository,
    },
    workflow::{
        access::{VerifyDisplayPasswordUseCase, VerifyDisplayPasswordUseCaseImpl},
        leaderboard::{GetLeaderboardsUseCase, GetLeaderboardsUseCaseImpl},
        minigames::{ManageMiniGamesUseCase, ManageMiniGamesUseCaseImpl},
        players::{ManagePlayersUseCase, ManagePlayersUseCaseImpl},
        scoring::{
            attack::{SubmitAttackUseCase, SubmitAttackUseCaseImpl},
            complete_minigame::{CompleteMiniGameUseCase, CompleteMiniGameUseCaseImpl},
        },
        settings::{ManageSettingsUseCase, ManageSettingsUseCaseImpl},
        teams::{ManageTeamsUseCase, ManageTeamsUseCaseImpl},
    },
};

pub mod domain;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub struct Application {
    pub team_manage_use_case: Box<dyn ManageTeamsUseCase + Send + Sync + 'static>,
    pub player_manage_use_case: Box<dyn ManagePlayersUseCase + Send + Sync + 'static>,
    pub minigame_manage_use_case: Box<dyn ManageMiniGamesUseCase + Send + Sync + 'static>,
    pub settings_manage_use_case: Box<dyn ManageSettingsUseCase + Send + Sync + 'static>,

    pub attack_submit_use_case: Box<dyn SubmitAttackUseCase + Send + Sync + 'static>,
    pub minigame_complete_use_case: Box<dyn CompleteMiniGameUseCase + Send + Sync + 'static>,

    pub leaderboard_get_use_case: Box<dyn GetLeaderboardsUseCase + Send + Sync + 'static>,
    pub display_login_use_case: Box<dyn VerifyDisplayPasswordUseCase + Send + Sync + 'static>,
}

pub fn build_application<
    T: TeamRepository + Send + Sync + 'static,
    P: PlayerRepository + Send + Sync + 'static,
    M: MiniGameRepository + Send + Sync + 'static,
    S: SettingsRepository + Send + Sync + 'static,
    B: ScoreboardRepository + Send + Sync + 'static,
>(
    team_repository: Arc<T>,
    player_repository: Arc<P>,
    minigame_repository: Arc<M>,
    settings_repository: Arc<S>,
    scoreboard_repository: Arc<B>,
) -> Application {
    let scoring_service = Arc::new(ScoringServiceImpl::new());
    let leaderboard_service = Arc::new(LeaderboardServiceImpl::new());

    Application {
        team_manage_use_case: Box::new(ManageTeamsUseCaseImpl::new(team_repository.clone())),
        player_manage_use_case: Box::new(ManagePlayersUseCaseImpl::new(
            player_repository.clone(),
        )),
        minigame_manage_use_case: Box::new(ManageMiniGamesUseCaseImpl::new(
            minigame_repository.clone(),
        )),
        settings_manage_use_case: Box::new(ManageSettingsUseCaseImpl::new(
            settings_repository.clone(),
        )),
        attack_submit_use_case: Box::new(SubmitAttackUseCaseImpl::new(
            settings_repository.clone(),
            scoreboard_repository.clone(),
            scoring_service.clone(),
        )),
        minigame_complete_use_case: Box::new(CompleteMiniGameUseCaseImpl::new(
            minigame_repository.clone(),
            scoreboard_repository.clone(),
            scoring_service.clone(),
        )),
        leaderboard_get_use_case: Box::new(GetLeaderboardsUseCaseImpl::new(
            team_repository.clone(),
            player_repository.clone(),
            settings_repository.clone(),
            leaderboard_service.clone(),
        )),
        display_login_use_case: Box::new(VerifyDisplayPasswordUseCaseImpl::new(
            settings_repository.clone(),
        )),
    }
}
