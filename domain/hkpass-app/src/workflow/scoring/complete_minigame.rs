use std::sync::Arc;

use thiserror::Error;

use crate::domain::{
    MiniGameId, PlayerId, RepoRetrieveError,
    minigame::MiniGameRepository,
    scoring::{ApplyCompletionError, CompletionOutcome, ScoreboardRepository, ScoringService},
};

#[async_trait::async_trait]
pub trait CompleteMiniGameUseCase {
    async fn complete(
        &self,
        minigame_id: MiniGameId,
        player_id: PlayerId,
    ) -> Result<CompletionOutcome, CompletionError>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompletionError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("repository error")]
    Repository,
}

impl From<ApplyCompletionError> for CompletionError {
    fn from(err: ApplyCompletionError) -> Self {
        match err {
            ApplyCompletionError::PlayerNotFound(id) => {
                CompletionError::NotFound(format!("player {}", id))
            }
            ApplyCompletionError::MiniGameNotFound(id) => {
                CompletionError::NotFound(format!("mini-game {}", id))
            }
            ApplyCompletionError::StorageError(e) => {
                log::error!("Failed to record mini-game completion: {}", e);
                CompletionError::Repository
            }
        }
    }
}

pub struct CompleteMiniGameUseCaseImpl<
    M: MiniGameRepository,
    B: ScoreboardRepository,
    SS: ScoringService,
> {
    minigame_repository: Arc<M>,
    scoreboard_repository: Arc<B>,
    scoring_service: Arc<SS>,
}

impl<M: MiniGameRepository, B: ScoreboardRepository, SS: ScoringService>
    CompleteMiniGameUseCaseImpl<M, B, SS>
{
    pub fn new(
        minigame_repository: Arc<M>,
        scoreboard_repository: Arc<B>,
        scoring_service: Arc<SS>,
    ) -> Self {
        Self {
            minigame_repository,
            scoreboard_repository,
            scoring_service,
        }
    }
}

#[async_trait::async_trait]
impl<
    M: MiniGameRepository + Send + Sync + 'static,
    B: ScoreboardRepository + Send + Sync + 'static,
    SS: ScoringService + Send + Sync + 'static,
> CompleteMiniGameUseCase for CompleteMiniGameUseCaseImpl<M, B, SS>
{
    async fn complete(
        &self,
        minigame_id: MiniGameId,
        player_id: PlayerId,
    ) -> Result<CompletionOutcome, CompletionError> {
        let minigame = match self.minigame_repository.get_minigame(minigame_id).await {
            Ok(minigame) => minigame,
            Err(RepoRetrieveError::NotFound) => {
                return Err(CompletionError::NotFound(format!(
                    "mini-game {}",
                    minigame_id
                )));
            }
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load mini-game {}: {}", minigame_id, e);
                return Err(CompletionError::Repository);
            }
        };

        let completion = self
            .scoring_service
            .resolve_completion(player_id, &minigame);
        let outcome = self
            .scoreboard_repository
            .apply_completion(completion)
            .await?;
        log::info!(
            "Player {} completed mini-game {} '{}' for {} chips",
            player_id,
            minigame_id,
            outcome.minigame.name,
            completion.chips
        );
        Ok(outcome)
    }
}
