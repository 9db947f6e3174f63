use hkpass_app::domain::{
    RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError, TeamId,
    team::{DeletedTeam, NewTeam, Team, TeamFilter, TeamRepository, TeamUpdate},
    visibility::TeamVisibility,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::{
    ConstraintFailure, classify,
    entity::{player, team},
    settle,
};

pub struct TeamRepositoryImpl {
    db: DatabaseConnection,
}

impl TeamRepositoryImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn model_to_team(model: team::Model) -> Team {
        Team {
            id: TeamId(model.id),
            name: model.name,
            score: model.score,
            attacked_count: model.attacked_count,
            visibility: TeamVisibility::from_hide_flags(model.hide_ranking, model.hide_team_name),
        }
    }

    fn update_to_model(update: &TeamUpdate) -> team::ActiveModel {
        let mut model = <team::ActiveModel as Default>::default();
        if let Some(name) = &update.name {
            model.name = Set(name.clone());
        }
        if let Some(score) = update.score {
            model.score = Set(score);
        }
        if let Some(attacked_count) = update.attacked_count {
            model.attacked_count = Set(attacked_count);
        }
        if let Some(hide) = update.hide_ranking {
            model.hide_ranking = Set(hide);
        }
        if let Some(hide) = update.hide_team_name {
            model.hide_team_name = Set(hide);
        }
        model
    }
}

fn name_taken(name: &str) -> String {
    format!("team name '{}' is taken", name)
}

#[async_trait::async_trait]
impl TeamRepository for TeamRepositoryImpl {
    async fn list_teams(&self, filter: TeamFilter) -> Result<Vec<Team>, RepoError> {
        let mut query = team::Entity::find().order_by_asc(team::Column::Id);
        if let Some(name) = filter.name {
            query = query.filter(team::Column::Name.eq(name));
        }
        let models = query
            .all(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(models.into_iter().map(Self::model_to_team).collect())
    }

    async fn get_team(&self, id: TeamId) -> Result<Team, RepoRetrieveError> {
        team::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
            .map(Self::model_to_team)
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn create_team(&self, new_team: NewTeam) -> Result<Team, RepoCreateError> {
        let active_model = team::ActiveModel {
            id: NotSet,
            name: Set(new_team.name.clone()),
            score: Set(new_team.score),
            attacked_count: Set(new_team.attacked_count),
            hide_ranking: Set(new_team.visibility.hide_ranking()),
            hide_team_name: Set(new_team.visibility.hide_team_name()),
        };
        match active_model.insert(&self.db).await {
            Ok(model) => Ok(Self::model_to_team(model)),
            Err(e) => Err(match classify(&e) {
                ConstraintFailure::Unique(_) => RepoCreateError::Conflict(name_taken(&new_team.name)),
                ConstraintFailure::ForeignKey(msg) | ConstraintFailure::Other(msg) => {
                    RepoCreateError::StorageError(msg)
                }
            }),
        }
    }

    async fn update_team(&self, id: TeamId, update: TeamUpdate) -> Result<Team, RepoUpdateError> {
        if update.is_empty() {
            return self.get_team(id).await.map_err(|e| match e {
                RepoRetrieveError::NotFound => RepoUpdateError::NotFound,
                RepoRetrieveError::StorageError(e) => RepoUpdateError::StorageError(e),
            });
        }
        let changes = Self::update_to_model(&update);
        let res = self
            .db
            .transaction::<_, Team, RepoUpdateError>(|c| {
                Box::pin(async move {
                    let res = team::Entity::update_many()
                        .set(changes)
                        .filter(team::Column::Id.eq(id.0))
                        .exec(c)
                        .await
                        .map_err(|e| match classify(&e) {
                            ConstraintFailure::Unique(_) => RepoUpdateError::Conflict(name_taken(
                                update.name.as_deref().unwrap_or_default(),
                            )),
                            ConstraintFailure::ForeignKey(msg) | ConstraintFailure::Other(msg) => {
                                RepoUpdateError::StorageError(msg)
                            }
                        })?;
                    if res.rows_affected == 0 {
                        return Err(RepoUpdateError::NotFound);
                    }
                    team::Entity::find_by_id(id.0)
                        .one(c)
                        .await
                        .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?
                        .map(Self::model_to_team)
                        .ok_or(RepoUpdateError::NotFound)
                })
            })
            .await;
        settle(res, RepoUpdateError::StorageError)
    }

    async fn delete_team(&self, id: TeamId) -> Result<DeletedTeam, RepoRetrieveError> {
        let res = self
            .db
            .transaction::<_, DeletedTeam, RepoRetrieveError>(|c| {
                Box::pin(async move {
                    let removed = player::Entity::delete_many()
                        .filter(player::Column::TeamId.eq(id.0))
                        .exec(c)
                        .await
                        .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;
                    let model = team::Entity::find_by_id(id.0)
                        .one(c)
                        .await
                        .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
                        .ok_or(RepoRetrieveError::NotFound)?;
                    team::Entity::delete_by_id(id.0)
                        .exec(c)
                        .await
                        .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;
                    Ok(DeletedTeam {
                        team: Self::model_to_team(model),
                        removed_players: removed.rows_affected,
                    })
                })
            })
            .await;
        settle(res, RepoRetrieveError::StorageError)
    }
}
