use hkpass_app::domain::{
    MiniGameId, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError,
    minigame::{MiniGame, MiniGameRepository, MiniGameUpdate, NewMiniGame},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::{entity::minigame, settle};

pub struct MiniGameRepositoryImpl {
    db: DatabaseConnection,
}

impl MiniGameRepositoryImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn model_to_minigame(model: minigame::Model) -> MiniGame {
        MiniGame {
            id: MiniGameId(model.id),
            category: model.category,
            room: model.room,
            name: model.name,
            available_chips: model.available_chips,
            is_displayed: model.is_displayed,
            is_limited: model.is_limited,
            limited_time: model.limited_time,
            play_count: model.play_count,
        }
    }

    fn update_to_model(update: MiniGameUpdate) -> minigame::ActiveModel {
        let mut model = <minigame::ActiveModel as Default>::default();
        if let Some(v) = update.category {
            model.category = Set(v);
        }
        if let Some(v) = update.room {
            model.room = Set(v);
        }
        if let Some(v) = update.name {
            model.name = Set(v);
        }
        if let Some(v) = update.available_chips {
            model.available_chips = Set(v);
        }
        if let Some(v) = update.is_displayed {
            model.is_displayed = Set(v);
        }
        if let Some(v) = update.is_limited {
            model.is_limited = Set(v);
        }
        if let Some(v) = update.limited_time {
            model.limited_time = Set(v);
        }
        if let Some(v) = update.play_count {
            model.play_count = Set(v);
        }
        model
    }
}

#[async_trait::async_trait]
impl MiniGameRepository for MiniGameRepositoryImpl {
    async fn list_minigames(&self) -> Result<Vec<MiniGame>, RepoError> {
        let models = minigame::Entity::find()
            .order_by_asc(minigame::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(models.into_iter().map(Self::model_to_minigame).collect())
    }

    async fn get_minigame(&self, id: MiniGameId) -> Result<MiniGame, RepoRetrieveError> {
        minigame::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
            .map(Self::model_to_minigame)
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn create_minigame(&self, game: NewMiniGame) -> Result<MiniGame, RepoCreateError> {
        let active_model = minigame::ActiveModel {
            id: NotSet,
            category: Set(game.category),
            room: Set(game.room),
            name: Set(game.name),
            available_chips: Set(game.available_chips),
            is_displayed: Set(game.is_displayed),
            is_limited: Set(game.is_limited),
            limited_time: Set(game.limited_time),
            play_count: Set(game.play_count),
        };
        active_model
            .insert(&self.db)
            .await
            .map(Self::model_to_minigame)
            .map_err(|e| RepoCreateError::StorageError(e.to_string()))
    }

    async fn update_minigame(
        &self,
        id: MiniGameId,
        update: MiniGameUpdate,
    ) -> Result<MiniGame, RepoUpdateError> {
        if update.is_empty() {
            return self.get_minigame(id).await.map_err(|e| match e {
                RepoRetrieveError::NotFound => RepoUpdateError::NotFound,
                RepoRetrieveError::StorageError(e) => RepoUpdateError::StorageError(e),
            });
        }
        let changes = Self::update_to_model(update);
        let res = self
            .db
            .transaction::<_, MiniGame, RepoUpdateError>(|c| {
                Box::pin(async move {
                    let res = minigame::Entity::update_many()
                        .set(changes)
                        .filter(minigame::Column::Id.eq(id.0))
                        .exec(c)
                        .await
                        .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?;
                    if res.rows_affected == 0 {
                        return Err(RepoUpdateError::NotFound);
                    }
                    minigame::Entity::find_by_id(id.0)
                        .one(c)
                        .await
                        .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?
                        .map(Self::model_to_minigame)
                        .ok_or(RepoUpdateError::NotFound)
                })
            })
            .await;
        settle(res, RepoUpdateError::StorageError)
    }

    async fn delete_minigame(&self, id: MiniGameId) -> Result<MiniGame, RepoRetrieveError> {
        let res = self
            .db
            .transaction::<_, MiniGame, RepoRetrieveError>(|c| {
                Box::pin(async move {
                    let model = minigame::Entity::find_by_id(id.0)
                        .one(c)
                        .await
                        .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
                        .ok_or(RepoRetrieveError::NotFound)?;
                    minigame::Entity::delete_by_id(id.0)
                        .exec(c)
                        .await
                        .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;
                    Ok(Self::model_to_minigame(model))
                })
            })
            .await;
        settle(res, RepoRetrieveError::StorageError)
    }
}
