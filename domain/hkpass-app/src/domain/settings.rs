use validator::Validate;

use crate::domain::{
    RepoCreateError, RepoRetrieveError, RepoUpdateError, SettingsId, visibility::LeaderboardRule,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoringCoefficients {
    pub attacker_team_bonus: i64,
    pub attacker_player_bonus: i64,
    pub attacked_increment: i64,
}

impl Default for ScoringCoefficients {
    fn default() -> Self {
        Self {
            attacker_team_bonus: 2,
            attacker_player_bonus: 1,
            attacked_increment: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LeaderboardKind {
    TeamScore,
    PlayerScore,
    TeamAttacked,
    PlayerMiniGame,
}

impl LeaderboardKind {
    pub const ALL: [LeaderboardKind; 4] = [
        LeaderboardKind::TeamScore,
        LeaderboardKind::PlayerScore,
        LeaderboardKind::TeamAttacked,
        LeaderboardKind::PlayerMiniGame,
    ];
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LeaderboardRules {
    pub team_ranking: LeaderboardRule,
    pub player_ranking: LeaderboardRule,
    pub attack_count_ranking: LeaderboardRule,
    pub minigame_ranking: LeaderboardRule,
}

impl LeaderboardRules {
    pub fn rule(&self, kind: LeaderboardKind) -> LeaderboardRule {
        match kind {
            LeaderboardKind::TeamScore => self.team_ranking,
            LeaderboardKind::PlayerScore => self.player_ranking,
            LeaderboardKind::TeamAttacked => self.attack_count_ranking,
            LeaderboardKind::PlayerMiniGame => self.minigame_ranking,
        }
    }
}

/// The global configuration record. Exactly one exists, under
/// [`SettingsId::SINGLETON`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommonSetting {
    pub id: SettingsId,
    pub coefficients: ScoringCoefficients,
    pub leaderboards: LeaderboardRules,
    /// bcrypt hash; `None` leaves the public displays ungated.
    pub login_password_hash: Option<String>,
}

impl Default for CommonSetting {
    fn default() -> Self {
        Self {
            id: SettingsId::SINGLETON,
            coefficients: ScoringCoefficients::default(),
            leaderboards: LeaderboardRules::default(),
            login_password_hash: None,
        }
    }
}

/// Coefficient and leaderboard fields of the settings record; `None` keeps
/// the stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Validate)]
pub struct SettingsFields {
    pub attacker_team_bonus: Option<i64>,
    pub attacker_player_bonus: Option<i64>,
    pub attacked_increment: Option<i64>,
    pub hide_team_ranking: Option<bool>,
    pub team_ranking_top_n: Option<u32>,
    pub hide_player_ranking: Option<bool>,
    pub player_ranking_top_n: Option<u32>,
    pub hide_attack_count_ranking: Option<bool>,
    pub attack_count_ranking_top_n: Option<u32>,
    pub hide_minigame_ranking: Option<bool>,
    pub minigame_ranking_top_n: Option<u32>,
}

impl SettingsFields {
    pub fn replace_with(settings: &CommonSetting) -> Self {
        let rules = &settings.leaderboards;
        Self {
            attacker_team_bonus: Some(settings.coefficients.attacker_team_bonus),
            attacker_player_bonus: Some(settings.coefficients.attacker_player_bonus),
            attacked_increment: Some(settings.coefficients.attacked_increment),
            hide_team_ranking: Some(rules.team_ranking.hidden),
            team_ranking_top_n: Some(rules.team_ranking.top_n),
            hide_player_ranking: Some(rules.player_ranking.hidden),
            player_ranking_top_n: Some(rules.player_ranking.top_n),
            hide_attack_count_ranking: Some(rules.attack_count_ranking.hidden),
            attack_count_ranking_top_n: Some(rules.attack_count_ranking.top_n),
            hide_minigame_ranking: Some(rules.minigame_ranking.hidden),
            minigame_ranking_top_n: Some(rules.minigame_ranking.top_n),
        }
    }

    pub fn apply_to(&self, settings: &mut CommonSetting) {
        let coefficients = &mut settings.coefficients;
        if let Some(v) = self.attacker_team_bonus {
            coefficients.attacker_team_bonus = v;
        }
        if let Some(v) = self.attacker_player_bonus {
            coefficients.attacker_player_bonus = v;
        }
        if let Some(v) = self.attacked_increment {
            coefficients.attacked_increment = v;
        }

        let rules = &mut settings.leaderboards;
        apply_rule(
            &mut rules.team_ranking,
            self.hide_team_ranking,
            self.team_ranking_top_n,
        );
        apply_rule(
            &mut rules.player_ranking,
            self.hide_player_ranking,
            self.player_ranking_top_n,
        );
        apply_rule(
            &mut rules.attack_count_ranking,
            self.hide_attack_count_ranking,
            self.attack_count_ranking_top_n,
        );
        apply_rule(
            &mut rules.minigame_ranking,
            self.hide_minigame_ranking,
            self.minigame_ranking_top_n,
        );
    }
}

fn apply_rule(rule: &mut LeaderboardRule, hidden: Option<bool>, top_n: Option<u32>) {
    if let Some(hidden) = hidden {
        rule.hidden = hidden;
    }
    if let Some(top_n) = top_n {
        rule.top_n = top_n;
    }
}

/// Administrator input for the settings record. The password arrives in
/// clear text and never leaves the domain layer unhashed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Validate)]
pub struct SettingsUpdate {
    #[validate(nested)]
    pub fields: SettingsFields,
    #[validate(length(max = 128))]
    pub login_password: Option<String>,
}

/// What the store persists for a settings update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingsChange {
    pub fields: SettingsFields,
    /// `Some(None)` removes the password gate.
    pub login_password_hash: Option<Option<String>>,
}

impl SettingsChange {
    pub fn apply_to(&self, settings: &mut CommonSetting) {
        self.fields.apply_to(settings);
        if let Some(hash) = &self.login_password_hash {
            settings.login_password_hash = hash.clone();
        }
    }
}

#[async_trait::async_trait]
pub trait SettingsRepository {
    /// `NotFound` when the singleton has not been created (or was deleted).
    async fn get_settings(&self) -> Result<CommonSetting, RepoRetrieveError>;
    /// `Conflict` when the singleton already exists.
    async fn create_settings(
        &self,
        settings: CommonSetting,
    ) -> Result<CommonSetting, RepoCreateError>;
    async fn update_settings(
        &self,
        id: SettingsId,
        change: SettingsChange,
    ) -> Result<CommonSetting, RepoUpdateError>;
    async fn delete_settings(&self, id: SettingsId) -> Result<CommonSetting, RepoRetrieveError>;
}
