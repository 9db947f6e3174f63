use std::sync::Arc;

use validator::Validate;

use crate::{
    domain::{
        MiniGameId,
        minigame::{MiniGame, MiniGameRepository, MiniGameUpdate, NewMiniGame},
    },
    workflow::CrudError,
};

#[async_trait::async_trait]
pub trait ManageMiniGamesUseCase {
    async fn list_minigames(&self) -> Result<Vec<MiniGame>, CrudError>;
    async fn get_minigame(&self, id: MiniGameId) -> Result<MiniGame, CrudError>;
    async fn create_minigame(&self, game: NewMiniGame) -> Result<MiniGame, CrudError>;
    async fn replace_minigame(
        &self,
        id: MiniGameId,
        game: NewMiniGame,
    ) -> Result<MiniGame, CrudError>;
    async fn update_minigame(
        &self,
        id: MiniGameId,
        update: MiniGameUpdate,
    ) -> Result<MiniGame, CrudError>;
    async fn delete_minigame(&self, id: MiniGameId) -> Result<(), CrudError>;
}

pub struct ManageMiniGamesUseCaseImpl<M: MiniGameRepository> {
    minigame_repository: Arc<M>,
}

impl<M: MiniGameRepository> ManageMiniGamesUseCaseImpl<M> {
    pub fn new(minigame_repository: Arc<M>) -> Self {
        Self {
            minigame_repository,
        }
    }
}

#[async_trait::async_trait]
impl<M: MiniGameRepository + Send + Sync + 'static> ManageMiniGamesUseCase
    for ManageMiniGamesUseCaseImpl<M>
{
    async fn list_minigames(&self) -> Result<Vec<MiniGame>, CrudError> {
        self.minigame_repository
            .list_minigames()
            .await
            .map_err(|e| CrudError::from_list(e, "mini-games"))
    }

    async fn get_minigame(&self, id: MiniGameId) -> Result<MiniGame, CrudError> {
        self.minigame_repository
            .get_minigame(id)
            .await
            .map_err(|e| CrudError::from_retrieve(e, format!("mini-game {}", id)))
    }

    async fn create_minigame(&self, game: NewMiniGame) -> Result<MiniGame, CrudError> {
        game.validate()?;
        let game = self
            .minigame_repository
            .create_minigame(game)
            .await
            .map_err(|e| CrudError::from_create(e, "mini-game"))?;
        log::info!("Created mini-game {} '{}'", game.id, game.name);
        Ok(game)
    }

    async fn replace_minigame(
        &self,
        id: MiniGameId,
        game: NewMiniGame,
    ) -> Result<MiniGame, CrudError> {
        game.validate()?;
        self.update_minigame(id, MiniGameUpdate::replace_with(game))
            .await
    }

    async fn update_minigame(
        &self,
        id: MiniGameId,
        update: MiniGameUpdate,
    ) -> Result<MiniGame, CrudError> {
        update.validate()?;
        self.minigame_repository
            .update_minigame(id, update)
            .await
            .map_err(|e| CrudError::from_update(e, format!("mini-game {}", id)))
    }

    async fn delete_minigame(&self, id: MiniGameId) -> Result<(), CrudError> {
        let game = self
            .minigame_repository
            .delete_minigame(id)
            .await
            .map_err(|e| CrudError::from_retrieve(e, format!("mini-game {}", id)))?;
        log::info!("Deleted mini-game {} '{}'", id, game.name);
        Ok(())
    }
}
