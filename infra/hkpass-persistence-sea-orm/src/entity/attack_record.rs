use chrono::Utc;
use sea_orm::entity::prelude::*;

/// Append-only log of applied attacks. Rows keep plain ids so the history
/// survives deletion of the teams and players involved.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attack_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i64,
    pub attacker_player_id: i64,
    pub attacker_team_id: i64,
    pub attacked_team_id: i64,
    pub count: i64,
    pub team_bonus: i64,
    pub player_bonus: i64,
    pub attacked_increment: i64,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
