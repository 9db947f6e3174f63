use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "common_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub attacker_team_bonus: i64,
    pub attacker_player_bonus: i64,
    pub attacked_increment: i64,
    pub hide_team_ranking: bool,
    pub team_ranking_top_n: i64,
    pub hide_player_ranking: bool,
    pub player_ranking_top_n: i64,
    pub hide_attack_count_ranking: bool,
    pub attack_count_ranking_top_n: i64,
    pub hide_minigame_ranking: bool,
    pub minigame_ranking_top_n: i64,
    pub login_password_hash: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
