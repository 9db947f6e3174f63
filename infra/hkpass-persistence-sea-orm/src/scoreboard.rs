use chrono::Utc;
use hkpass_app::domain::{
    AttackRecordId, PlayerId, RepoError, TeamId,
    scoring::{
        ApplyAttackError, ApplyCompletionError, AttackEvent, AttackRecord, CompletionOutcome,
        ResolvedAttack, ResolvedCompletion, ScoreboardRepository,
    },
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, ExprTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    prelude::Expr,
};

use crate::{
    entity::{attack_record, minigame, player, team},
    minigames::MiniGameRepositoryImpl,
    players::PlayerRepositoryImpl,
    settle,
};

/// Applies counter deltas as `col = col + delta` statements. Each write must
/// hit exactly one row, otherwise the transaction is rolled back, so a
/// failed event leaves no partial change behind.
pub struct ScoreboardRepositoryImpl {
    db: DatabaseConnection,
}

impl ScoreboardRepositoryImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_record(model: attack_record::Model) -> AttackRecord {
        AttackRecord {
            id: AttackRecordId(model.id),
            attack: ResolvedAttack {
                event: AttackEvent {
                    attacker_player: PlayerId(model.attacker_player_id),
                    attacker_team: TeamId(model.attacker_team_id),
                    attacked_team: TeamId(model.attacked_team_id),
                    count: model.count.clamp(0, i64::from(u32::MAX)) as u32,
                },
                team_bonus: model.team_bonus,
                player_bonus: model.player_bonus,
                attacked_increment: model.attacked_increment,
            },
            created_at: model.created_at,
        }
    }
}

async fn add_to_team(
    c: &DatabaseTransaction,
    id: TeamId,
    column: team::Column,
    delta: i64,
) -> Result<u64, DbErr> {
    let res = team::Entity::update_many()
        .col_expr(column, Expr::col(column).add(delta))
        .filter(team::Column::Id.eq(id.0))
        .exec(c)
        .await?;
    Ok(res.rows_affected)
}

fn storage(e: DbErr) -> ApplyAttackError {
    ApplyAttackError::StorageError(e.to_string())
}

#[async_trait::async_trait]
impl ScoreboardRepository for ScoreboardRepositoryImpl {
    async fn apply_attack(&self, attack: ResolvedAttack) -> Result<AttackRecord, ApplyAttackError> {
        let event = attack.event;
        let res = self
            .db
            .transaction::<_, AttackRecord, ApplyAttackError>(|c| {
                Box::pin(async move {
                    let touched = add_to_team(
                        c,
                        event.attacked_team,
                        team::Column::AttackedCount,
                        attack.attacked_increment,
                    )
                    .await
                    .map_err(storage)?;
                    if touched != 1 {
                        return Err(ApplyAttackError::TeamNotFound(event.attacked_team));
                    }

                    let touched = add_to_team(
                        c,
                        event.attacker_team,
                        team::Column::Score,
                        attack.team_bonus,
                    )
                    .await
                    .map_err(storage)?;
                    if touched != 1 {
                        return Err(ApplyAttackError::TeamNotFound(event.attacker_team));
                    }

                    let touched = player::Entity::update_many()
                        .col_expr(
                            player::Column::PersonalScore,
                            Expr::col(player::Column::PersonalScore).add(attack.player_bonus),
                        )
                        .filter(player::Column::Id.eq(event.attacker_player.0))
                        .filter(player::Column::TeamId.eq(event.attacker_team.0))
                        .exec(c)
                        .await
                        .map_err(storage)?
                        .rows_affected;
                    if touched != 1 {
                        let exists = player::Entity::find_by_id(event.attacker_player.0)
                            .one(c)
                            .await
                            .map_err(storage)?
                            .is_some();
                        return Err(if exists {
                            ApplyAttackError::PlayerNotInTeam {
                                player: event.attacker_player,
                                team: event.attacker_team,
                            }
                        } else {
                            ApplyAttackError::PlayerNotFound(event.attacker_player)
                        });
                    }

                    let record = attack_record::ActiveModel {
                        id: NotSet,
                        attacker_player_id: Set(event.attacker_player.0),
                        attacker_team_id: Set(event.attacker_team.0),
                        attacked_team_id: Set(event.attacked_team.0),
                        count: Set(i64::from(event.count)),
                        team_bonus: Set(attack.team_bonus),
                        player_bonus: Set(attack.player_bonus),
                        attacked_increment: Set(attack.attacked_increment),
                        created_at: Set(Utc::now()),
                    }
                    .insert(c)
                    .await
                    .map_err(storage)?;
                    Ok(Self::model_to_record(record))
                })
            })
            .await;
        settle(res, ApplyAttackError::StorageError)
    }

    async fn apply_completion(
        &self,
        completion: ResolvedCompletion,
    ) -> Result<CompletionOutcome, ApplyCompletionError> {
        let storage = |e: DbErr| ApplyCompletionError::StorageError(e.to_string());
        let res = self
            .db
            .transaction::<_, CompletionOutcome, ApplyCompletionError>(|c| {
                Box::pin(async move {
                    let touched = player::Entity::update_many()
                        .col_expr(
                            player::Column::Chips,
                            Expr::col(player::Column::Chips).add(completion.chips),
                        )
                        .col_expr(
                            player::Column::CompletedMinigameCount,
                            Expr::col(player::Column::CompletedMinigameCount).add(1),
                        )
                        .filter(player::Column::Id.eq(completion.player.0))
                        .exec(c)
                        .await
                        .map_err(storage)?
                        .rows_affected;
                    if touched != 1 {
                        return Err(ApplyCompletionError::PlayerNotFound(completion.player));
                    }

                    let touched = minigame::Entity::update_many()
                        .col_expr(
                            minigame::Column::PlayCount,
                            Expr::col(minigame::Column::PlayCount).add(1),
                        )
                        .filter(minigame::Column::Id.eq(completion.minigame.0))
                        .exec(c)
                        .await
                        .map_err(storage)?
                        .rows_affected;
                    if touched != 1 {
                        return Err(ApplyCompletionError::MiniGameNotFound(completion.minigame));
                    }

                    let player = player::Entity::find_by_id(completion.player.0)
                        .one(c)
                        .await
                        .map_err(storage)?
                        .ok_or(ApplyCompletionError::PlayerNotFound(completion.player))?;
                    let minigame = minigame::Entity::find_by_id(completion.minigame.0)
                        .one(c)
                        .await
                        .map_err(storage)?
                        .ok_or(ApplyCompletionError::MiniGameNotFound(completion.minigame))?;
                    Ok(CompletionOutcome {
                        player: PlayerRepositoryImpl::model_to_player(player),
                        minigame: MiniGameRepositoryImpl::model_to_minigame(minigame),
                    })
                })
            })
            .await;
        settle(res, ApplyCompletionError::StorageError)
    }

    async fn list_attack_records(&self, limit: u64) -> Result<Vec<AttackRecord>, RepoError> {
        let models = attack_record::Entity::find()
            .order_by_desc(attack_record::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(models.into_iter().map(Self::model_to_record).collect())
    }
}
