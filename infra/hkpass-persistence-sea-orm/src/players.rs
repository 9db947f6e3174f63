use hkpass_app::domain::{
    PlayerId, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError, TeamId,
    player::{NewPlayer, Player, PlayerFilter, PlayerRepository, PlayerUpdate},
    visibility::PlayerVisibility,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait, sea_query::JoinType,
};

use crate::{
    ConstraintFailure, classify,
    entity::{player, team},
    settle,
};

pub struct PlayerRepositoryImpl {
    db: DatabaseConnection,
}

impl PlayerRepositoryImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn model_to_player(model: player::Model) -> Player {
        Player {
            id: PlayerId(model.id),
            number: model.number,
            name: model.name,
            personal_score: model.personal_score,
            chips: model.chips,
            completed_minigame_count: model.completed_minigame_count,
            team: model.team_id.map(TeamId),
            visibility: PlayerVisibility::from_hide_flags(
                model.hide_name,
                model.hide_team,
                model.hide_personal_score,
                model.hide_completed_minigame_count,
            ),
        }
    }

    fn update_to_model(update: &PlayerUpdate) -> player::ActiveModel {
        let mut model = <player::ActiveModel as Default>::default();
        if let Some(number) = &update.number {
            model.number = Set(number.clone());
        }
        if let Some(name) = &update.name {
            model.name = Set(name.clone());
        }
        if let Some(v) = update.personal_score {
            model.personal_score = Set(v);
        }
        if let Some(v) = update.chips {
            model.chips = Set(v);
        }
        if let Some(v) = update.completed_minigame_count {
            model.completed_minigame_count = Set(v);
        }
        if let Some(team) = update.team {
            model.team_id = Set(team.map(|t| t.0));
        }
        if let Some(v) = update.hide_name {
            model.hide_name = Set(v);
        }
        if let Some(v) = update.hide_team {
            model.hide_team = Set(v);
        }
        if let Some(v) = update.hide_personal_score {
            model.hide_personal_score = Set(v);
        }
        if let Some(v) = update.hide_completed_minigame_count {
            model.hide_completed_minigame_count = Set(v);
        }
        model
    }
}

fn number_taken(number: &str) -> String {
    format!("player number '{}' is taken", number)
}

async fn team_exists(c: &DatabaseTransaction, id: TeamId) -> Result<bool, DbErr> {
    Ok(team::Entity::find_by_id(id.0).one(c).await?.is_some())
}

#[async_trait::async_trait]
impl PlayerRepository for PlayerRepositoryImpl {
    async fn list_players(&self, filter: PlayerFilter) -> Result<Vec<Player>, RepoError> {
        let mut query = player::Entity::find().order_by_asc(player::Column::Id);
        if let Some(team_id) = filter.team_id {
            query = query.filter(player::Column::TeamId.eq(team_id.0));
        }
        if let Some(team_name) = filter.team_name {
            query = query
                .join(JoinType::InnerJoin, player::Relation::Team.def())
                .filter(team::Column::Name.eq(team_name));
        }
        let models = query
            .all(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(models.into_iter().map(Self::model_to_player).collect())
    }

    async fn get_player(&self, id: PlayerId) -> Result<Player, RepoRetrieveError> {
        player::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
            .map(Self::model_to_player)
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn create_player(&self, new_player: NewPlayer) -> Result<Player, RepoCreateError> {
        let active_model = player::ActiveModel {
            id: NotSet,
            number: Set(new_player.number.clone()),
            name: Set(new_player.name),
            personal_score: Set(new_player.personal_score),
            chips: Set(new_player.chips),
            completed_minigame_count: Set(new_player.completed_minigame_count),
            team_id: Set(new_player.team.map(|t| t.0)),
            hide_name: Set(new_player.visibility.hide_name()),
            hide_team: Set(new_player.visibility.hide_team()),
            hide_personal_score: Set(new_player.visibility.hide_personal_score()),
            hide_completed_minigame_count: Set(new_player
                .visibility
                .hide_completed_minigame_count()),
        };
        let number = new_player.number;
        let team = new_player.team;
        let res = self
            .db
            .transaction::<_, Player, RepoCreateError>(|c| {
                Box::pin(async move {
                    let model = active_model.insert(c).await.map_err(|e| match classify(&e) {
                        ConstraintFailure::Unique(_) => {
                            RepoCreateError::Conflict(number_taken(&number))
                        }
                        ConstraintFailure::ForeignKey(_) => RepoCreateError::MissingReference(
                            format!("team {}", team.map(|t| t.0).unwrap_or_default()),
                        ),
                        ConstraintFailure::Other(msg) => RepoCreateError::StorageError(msg),
                    })?;
                    if let Some(team) = team {
                        let exists = team_exists(c, team)
                            .await
                            .map_err(|e| RepoCreateError::StorageError(e.to_string()))?;
                        if !exists {
                            return Err(RepoCreateError::MissingReference(format!("team {}", team)));
                        }
                    }
                    Ok(Self::model_to_player(model))
                })
            })
            .await;
        settle(res, RepoCreateError::StorageError)
    }

    async fn update_player(
        &self,
        id: PlayerId,
        update: PlayerUpdate,
    ) -> Result<Player, RepoUpdateError> {
        if update.is_empty() {
            return self.get_player(id).await.map_err(|e| match e {
                RepoRetrieveError::NotFound => RepoUpdateError::NotFound,
                RepoRetrieveError::StorageError(e) => RepoUpdateError::StorageError(e),
            });
        }
        let changes = Self::update_to_model(&update);
        let res = self
            .db
            .transaction::<_, Player, RepoUpdateError>(|c| {
                Box::pin(async move {
                    let res = player::Entity::update_many()
                        .set(changes)
                        .filter(player::Column::Id.eq(id.0))
                        .exec(c)
                        .await
                        .map_err(|e| match classify(&e) {
                            ConstraintFailure::Unique(_) => RepoUpdateError::Conflict(
                                number_taken(update.number.as_deref().unwrap_or_default()),
                            ),
                            ConstraintFailure::ForeignKey(_) => RepoUpdateError::MissingReference(
                                format!("team {}", update.team.flatten().map(|t| t.0).unwrap_or_default()),
                            ),
                            ConstraintFailure::Other(msg) => RepoUpdateError::StorageError(msg),
                        })?;
                    if res.rows_affected == 0 {
                        return Err(RepoUpdateError::NotFound);
                    }
                    if let Some(Some(team)) = update.team {
                        let exists = team_exists(c, team)
                            .await
                            .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?;
                        if !exists {
                            return Err(RepoUpdateError::MissingReference(format!("team {}", team)));
                        }
                    }
                    player::Entity::find_by_id(id.0)
                        .one(c)
                        .await
                        .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?
                        .map(Self::model_to_player)
                        .ok_or(RepoUpdateError::NotFound)
                })
            })
            .await;
        settle(res, RepoUpdateError::StorageError)
    }

    async fn delete_player(&self, id: PlayerId) -> Result<Player, RepoRetrieveError> {
        let res = self
            .db
            .transaction::<_, Player, RepoRetrieveError>(|c| {
                Box::pin(async move {
                    let model = player::Entity::find_by_id(id.0)
                        .one(c)
                        .await
                        .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
                        .ok_or(RepoRetrieveError::NotFound)?;
                    player::Entity::delete_by_id(id.0)
                        .exec(c)
                        .await
                        .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;
                    Ok(Self::model_to_player(model))
                })
            })
            .await;
        settle(res, RepoRetrieveError::StorageError)
    }
}
