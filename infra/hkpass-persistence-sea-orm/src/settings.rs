use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use hkpass_app::domain::{
    RepoCreateError, RepoRetrieveError, RepoUpdateError, SettingsId,
    settings::{
        CommonSetting, LeaderboardRules, ScoringCoefficients, SettingsChange, SettingsRepository,
    },
    visibility::LeaderboardRule,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::{ConstraintFailure, classify, entity::common_setting, settle};

/// Settings store with a read-through cache. The cache is invalidated after
/// every committed write and before the write call returns.
///
/// Every committed write also bumps `generation`. A reader only keeps what
/// it loaded in the cache if no write committed since it started reading.
pub struct SettingsRepositoryImpl {
    db: DatabaseConnection,
    settings_cache: Arc<moka::sync::Cache<SettingsId, CommonSetting>>,
    generation: AtomicU64,
}

impl SettingsRepositoryImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        let settings_cache = Arc::new(
            moka::sync::Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(60 * 60))
                .build(),
        );
        Self {
            db,
            settings_cache,
            generation: AtomicU64::new(0),
        }
    }

    fn written(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.settings_cache.invalidate(&SettingsId::SINGLETON);
    }

    /// Reads the row, returning it with the write generation observed
    /// before the read started.
    async fn load_settings(&self) -> Result<(u64, CommonSetting), RepoRetrieveError> {
        let generation = self.generation.load(Ordering::SeqCst);
        let settings = common_setting::Entity::find_by_id(SettingsId::SINGLETON.0)
            .one(&self.db)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
            .map(Self::model_to_settings)
            .ok_or(RepoRetrieveError::NotFound)?;
        Ok((generation, settings))
    }

    /// Caches a loaded value unless a write committed after `generation`
    /// was observed. Returns whether the value stayed cached.
    fn remember(&self, generation: u64, settings: &CommonSetting) -> bool {
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        self.settings_cache
            .insert(SettingsId::SINGLETON, settings.clone());
        // A write may have committed between the check and the insert.
        if self.generation.load(Ordering::SeqCst) != generation {
            self.settings_cache.invalidate(&SettingsId::SINGLETON);
            return false;
        }
        true
    }

    fn model_to_settings(model: common_setting::Model) -> CommonSetting {
        let rule = |hidden: bool, top_n: i64| LeaderboardRule {
            hidden,
            top_n: top_n.clamp(0, i64::from(u32::MAX)) as u32,
        };
        CommonSetting {
            id: SettingsId(model.id),
            coefficients: ScoringCoefficients {
                attacker_team_bonus: model.attacker_team_bonus,
                attacker_player_bonus: model.attacker_player_bonus,
                attacked_increment: model.attacked_increment,
            },
            leaderboards: LeaderboardRules {
                team_ranking: rule(model.hide_team_ranking, model.team_ranking_top_n),
                player_ranking: rule(model.hide_player_ranking, model.player_ranking_top_n),
                attack_count_ranking: rule(
                    model.hide_attack_count_ranking,
                    model.attack_count_ranking_top_n,
                ),
                minigame_ranking: rule(model.hide_minigame_ranking, model.minigame_ranking_top_n),
            },
            login_password_hash: model.login_password_hash,
        }
    }

    fn settings_to_model(settings: &CommonSetting) -> common_setting::ActiveModel {
        let rules = &settings.leaderboards;
        common_setting::ActiveModel {
            id: Set(settings.id.0),
            attacker_team_bonus: Set(settings.coefficients.attacker_team_bonus),
            attacker_player_bonus: Set(settings.coefficients.attacker_player_bonus),
            attacked_increment: Set(settings.coefficients.attacked_increment),
            hide_team_ranking: Set(rules.team_ranking.hidden),
            team_ranking_top_n: Set(i64::from(rules.team_ranking.top_n)),
            hide_player_ranking: Set(rules.player_ranking.hidden),
            player_ranking_top_n: Set(i64::from(rules.player_ranking.top_n)),
            hide_attack_count_ranking: Set(rules.attack_count_ranking.hidden),
            attack_count_ranking_top_n: Set(i64::from(rules.attack_count_ranking.top_n)),
            hide_minigame_ranking: Set(rules.minigame_ranking.hidden),
            minigame_ranking_top_n: Set(i64::from(rules.minigame_ranking.top_n)),
            login_password_hash: Set(settings.login_password_hash.clone()),
        }
    }

    /// Only the columns the change touches are `Set`.
    fn change_to_model(change: &SettingsChange) -> common_setting::ActiveModel {
        let fields = &change.fields;
        let mut model = <common_setting::ActiveModel as Default>::default();
        if let Some(v) = fields.attacker_team_bonus {
            model.attacker_team_bonus = Set(v);
        }
        if let Some(v) = fields.attacker_player_bonus {
            model.attacker_player_bonus = Set(v);
        }
        if let Some(v) = fields.attacked_increment {
            model.attacked_increment = Set(v);
        }
        if let Some(v) = fields.hide_team_ranking {
            model.hide_team_ranking = Set(v);
        }
        if let Some(v) = fields.team_ranking_top_n {
            model.team_ranking_top_n = Set(i64::from(v));
        }
        if let Some(v) = fields.hide_player_ranking {
            model.hide_player_ranking = Set(v);
        }
        if let Some(v) = fields.player_ranking_top_n {
            model.player_ranking_top_n = Set(i64::from(v));
        }
        if let Some(v) = fields.hide_attack_count_ranking {
            model.hide_attack_count_ranking = Set(v);
        }
        if let Some(v) = fields.attack_count_ranking_top_n {
            model.attack_count_ranking_top_n = Set(i64::from(v));
        }
        if let Some(v) = fields.hide_minigame_ranking {
            model.hide_minigame_ranking = Set(v);
        }
        if let Some(v) = fields.minigame_ranking_top_n {
            model.minigame_ranking_top_n = Set(i64::from(v));
        }
        if let Some(hash) = &change.login_password_hash {
            model.login_password_hash = Set(hash.clone());
        }
        model
    }
}

#[async_trait::async_trait]
impl SettingsRepository for SettingsRepositoryImpl {
    async fn get_settings(&self) -> Result<CommonSetting, RepoRetrieveError> {
        if let Some(cached) = self.settings_cache.get(&SettingsId::SINGLETON) {
            return Ok(cached);
        }
        let (generation, settings) = self.load_settings().await?;
        self.remember(generation, &settings);
        Ok(settings)
    }

    async fn create_settings(
        &self,
        settings: CommonSetting,
    ) -> Result<CommonSetting, RepoCreateError> {
        let active_model = Self::settings_to_model(&settings);
        let res = self
            .db
            .transaction::<_, CommonSetting, RepoCreateError>(|c| {
                Box::pin(async move {
                    let existing = common_setting::Entity::find()
                        .one(c)
                        .await
                        .map_err(|e| RepoCreateError::StorageError(e.to_string()))?;
                    if existing.is_some() {
                        return Err(RepoCreateError::Conflict(
                            "settings already exist".to_string(),
                        ));
                    }
                    active_model
                        .insert(c)
                        .await
                        .map(Self::model_to_settings)
                        .map_err(|e| match classify(&e) {
                            ConstraintFailure::Unique(_) => RepoCreateError::Conflict(
                                "settings already exist".to_string(),
                            ),
                            ConstraintFailure::ForeignKey(msg) | ConstraintFailure::Other(msg) => {
                                RepoCreateError::StorageError(msg)
                            }
                        })
                })
            })
            .await;
        self.written();
        settle(res, RepoCreateError::StorageError)
    }

    async fn update_settings(
        &self,
        id: SettingsId,
        change: SettingsChange,
    ) -> Result<CommonSetting, RepoUpdateError> {
        let changes = Self::change_to_model(&change);
        if !changes.is_changed() {
            if id != SettingsId::SINGLETON {
                return Err(RepoUpdateError::NotFound);
            }
            return self.get_settings().await.map_err(|e| match e {
                RepoRetrieveError::NotFound => RepoUpdateError::NotFound,
                RepoRetrieveError::StorageError(e) => RepoUpdateError::StorageError(e),
            });
        }
        let res = self
            .db
            .transaction::<_, CommonSetting, RepoUpdateError>(|c| {
                Box::pin(async move {
                    let res = common_setting::Entity::update_many()
                        .set(changes)
                        .filter(common_setting::Column::Id.eq(id.0))
                        .exec(c)
                        .await
                        .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?;
                    if res.rows_affected == 0 {
                        return Err(RepoUpdateError::NotFound);
                    }
                    common_setting::Entity::find_by_id(id.0)
                        .one(c)
                        .await
                        .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?
                        .map(Self::model_to_settings)
                        .ok_or(RepoUpdateError::NotFound)
                })
            })
            .await;
        self.written();
        settle(res, RepoUpdateError::StorageError)
    }

    async fn delete_settings(&self, id: SettingsId) -> Result<CommonSetting, RepoRetrieveError> {
        let res = self
            .db
            .transaction::<_, CommonSetting, RepoRetrieveError>(|c| {
                Box::pin(async move {
                    let model = common_setting::Entity::find_by_id(id.0)
                        .one(c)
                        .await
                        .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
                        .ok_or(RepoRetrieveError::NotFound)?;
                    common_setting::Entity::delete_by_id(id.0)
                        .exec(c)
                        .await
                        .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;
                    Ok(Self::model_to_settings(model))
                })
            })
            .await;
        self.written();
        settle(res, RepoRetrieveError::StorageError)
    }
}

#[cfg(test)]
mod tests {
    use hkpass_app::domain::settings::SettingsFields;

    use crate::test_support::memory_db;

    use super::*;

    #[tokio::test]
    async fn test_singleton_rejects_second_creation() {
        let repo = SettingsRepositoryImpl::new(memory_db().await);
        assert!(matches!(
            repo.get_settings().await,
            Err(RepoRetrieveError::NotFound)
        ));

        let created = repo.create_settings(CommonSetting::default()).await.unwrap();
        assert_eq!(created, CommonSetting::default());
        assert!(matches!(
            repo.create_settings(CommonSetting::default()).await,
            Err(RepoCreateError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_update_is_visible_through_the_cache() {
        let repo = SettingsRepositoryImpl::new(memory_db().await);
        repo.create_settings(CommonSetting::default()).await.unwrap();
        // Warm the cache.
        assert_eq!(repo.get_settings().await.unwrap().coefficients.attacked_increment, 1);

        repo.update_settings(
            SettingsId::SINGLETON,
            SettingsChange {
                fields: SettingsFields {
                    attacked_increment: Some(3),
                    player_ranking_top_n: Some(5),
                    ..Default::default()
                },
                login_password_hash: Some(Some("$2b$hash".to_string())),
            },
        )
        .await
        .unwrap();

        let settings = repo.get_settings().await.unwrap();
        assert_eq!(settings.coefficients.attacked_increment, 3);
        assert_eq!(settings.coefficients.attacker_team_bonus, 2);
        assert_eq!(settings.leaderboards.player_ranking.top_n, 5);
        assert_eq!(settings.login_password_hash.as_deref(), Some("$2b$hash"));
    }

    #[tokio::test]
    async fn test_read_overtaken_by_a_write_is_not_cached() {
        let repo = SettingsRepositoryImpl::new(memory_db().await);
        repo.create_settings(CommonSetting::default()).await.unwrap();

        let (generation, stale) = repo.load_settings().await.unwrap();
        repo.update_settings(
            SettingsId::SINGLETON,
            SettingsChange {
                fields: SettingsFields {
                    attacked_increment: Some(4),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(!repo.remember(generation, &stale));
        assert_eq!(repo.get_settings().await.unwrap().coefficients.attacked_increment, 4);

        let (generation, fresh) = repo.load_settings().await.unwrap();
        assert!(repo.remember(generation, &fresh));
    }

    #[tokio::test]
    async fn test_delete_clears_the_cache() {
        let repo = SettingsRepositoryImpl::new(memory_db().await);
        repo.create_settings(CommonSetting::default()).await.unwrap();
        repo.get_settings().await.unwrap();

        repo.delete_settings(SettingsId::SINGLETON).await.unwrap();
        assert!(matches!(
            repo.get_settings().await,
            Err(RepoRetrieveError::NotFound)
        ));
        assert!(matches!(
            repo.update_settings(
                SettingsId::SINGLETON,
                SettingsChange {
                    fields: SettingsFields {
                        attacked_increment: Some(2),
                        ..Default::default()
                    },
                    ..Default::default()
                }
            )
            .await,
            Err(RepoUpdateError::NotFound)
        ));
    }
}
