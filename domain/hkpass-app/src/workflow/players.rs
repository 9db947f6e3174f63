use std::sync::Arc;

use validator::Validate;

use crate::{
    domain::{
        PlayerId,
        player::{NewPlayer, Player, PlayerFilter, PlayerRepository, PlayerUpdate},
    },
    workflow::CrudError,
};

#[async_trait::async_trait]
pub trait ManagePlayersUseCase {
    async fn list_players(&self, filter: PlayerFilter) -> Result<Vec<Player>, CrudError>;
    async fn get_player(&self, id: PlayerId) -> Result<Player, CrudError>;
    async fn create_player(&self, player: NewPlayer) -> Result<Player, CrudError>;
    async fn replace_player(&self, id: PlayerId, player: NewPlayer) -> Result<Player, CrudError>;
    async fn update_player(&self, id: PlayerId, update: PlayerUpdate)
    -> Result<Player, CrudError>;
    async fn delete_player(&self, id: PlayerId) -> Result<(), CrudError>;
}

pub struct ManagePlayersUseCaseImpl<P: PlayerRepository> {
    player_repository: Arc<P>,
}

impl<P: PlayerRepository> ManagePlayersUseCaseImpl<P> {
    pub fn new(player_repository: Arc<P>) -> Self {
        Self { player_repository }
    }
}

#[async_trait::async_trait]
impl<P: PlayerRepository + Send + Sync + 'static> ManagePlayersUseCase
    for ManagePlayersUseCaseImpl<P>
{
    async fn list_players(&self, filter: PlayerFilter) -> Result<Vec<Player>, CrudError> {
        self.player_repository
            .list_players(filter)
            .await
            .map_err(|e| CrudError::from_list(e, "players"))
    }

    async fn get_player(&self, id: PlayerId) -> Result<Player, CrudError> {
        self.player_repository
            .get_player(id)
            .await
            .map_err(|e| CrudError::from_retrieve(e, format!("player {}", id)))
    }

    async fn create_player(&self, player: NewPlayer) -> Result<Player, CrudError> {
        player.validate()?;
        let player = self
            .player_repository
            .create_player(player)
            .await
            .map_err(|e| CrudError::from_create(e, "player"))?;
        log::info!("Created player {} (#{})", player.id, player.number);
        Ok(player)
    }

    async fn replace_player(&self, id: PlayerId, player: NewPlayer) -> Result<Player, CrudError> {
        player.validate()?;
        self.update_player(id, PlayerUpdate::replace_with(player))
            .await
    }

    async fn update_player(
        &self,
        id: PlayerId,
        update: PlayerUpdate,
    ) -> Result<Player, CrudError> {
        update.validate()?;
        let player = self
            .player_repository
            .update_player(id, update)
            .await
            .map_err(|e| CrudError::from_update(e, format!("player {}", id)))?;
        log::debug!("Updated player {}", player.id);
        Ok(player)
    }

    async fn delete_player(&self, id: PlayerId) -> Result<(), CrudError> {
        let player = self
            .player_repository
            .delete_player(id)
            .await
            .map_err(|e| CrudError::from_retrieve(e, format!("player {}", id)))?;
        log::info!("Deleted player {} (#{})", id, player.number);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::{
            TeamId,
            team::{NewTeam, TeamRepository},
        },
        testing::InMemoryStore,
    };

    use super::*;

    #[tokio::test]
    async fn test_unknown_team_reference_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let use_case = ManagePlayersUseCaseImpl::new(store.clone());

        let result = use_case
            .create_player(NewPlayer::new("9", "Ghost", Some(TeamId(404))))
            .await;
        assert!(matches!(result, Err(CrudError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_number_conflicts_on_create_and_update() {
        let store = Arc::new(InMemoryStore::new());
        let use_case = ManagePlayersUseCaseImpl::new(store.clone());
        use_case
            .create_player(NewPlayer::new("1", "Ann", None))
            .await
            .unwrap();
        let ben = use_case
            .create_player(NewPlayer::new("2", "Ben", None))
            .await
            .unwrap();

        assert!(matches!(
            use_case
                .create_player(NewPlayer::new("1", "Copy", None))
                .await,
            Err(CrudError::Conflict(_))
        ));
        assert!(matches!(
            use_case
                .update_player(
                    ben.id,
                    PlayerUpdate {
                        number: Some("1".to_string()),
                        ..Default::default()
                    }
                )
                .await,
            Err(CrudError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_filters_by_team_id_and_name() {
        let store = Arc::new(InMemoryStore::new());
        let use_case = ManagePlayersUseCaseImpl::new(store.clone());
        let red = store.create_team(NewTeam::named("Red")).await.unwrap();
        let blue = store.create_team(NewTeam::named("Blue")).await.unwrap();
        use_case
            .create_player(NewPlayer::new("1", "Ann", Some(red.id)))
            .await
            .unwrap();
        use_case
            .create_player(NewPlayer::new("2", "Ben", Some(blue.id)))
            .await
            .unwrap();
        use_case
            .create_player(NewPlayer::new("3", "Cat", None))
            .await
            .unwrap();

        let by_id = use_case
            .list_players(PlayerFilter {
                team_id: Some(red.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].name, "Ann");

        let by_name = use_case
            .list_players(PlayerFilter {
                team_name: Some("Blue".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Ben");

        let all = use_case
            .list_players(PlayerFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }
}
