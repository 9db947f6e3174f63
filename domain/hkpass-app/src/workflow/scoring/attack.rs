use std::sync::Arc;

use thiserror::Error;

use crate::domain::{
    RepoError, RepoRetrieveError,
    scoring::{
        ApplyAttackError, AttackEvent, AttackRecord, AttackRuleViolation, ScoreboardRepository,
        ScoringService,
    },
    settings::SettingsRepository,
};

pub const DEFAULT_ATTACK_LOG_LIMIT: u64 = 50;
pub const MAX_ATTACK_LOG_LIMIT: u64 = 500;

#[async_trait::async_trait]
pub trait SubmitAttackUseCase {
    async fn submit_attack(&self, event: AttackEvent) -> Result<AttackRecord, AttackError>;
    /// Most recent first. The limit is clamped to `1..=MAX_ATTACK_LOG_LIMIT`.
    async fn list_attacks(&self, limit: Option<u64>) -> Result<Vec<AttackRecord>, AttackError>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttackError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid attack: {0}")]
    InvalidOperation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("repository error")]
    Repository,
}

impl From<AttackRuleViolation> for AttackError {
    fn from(violation: AttackRuleViolation) -> Self {
        AttackError::InvalidOperation(violation.to_string())
    }
}

impl From<ApplyAttackError> for AttackError {
    fn from(err: ApplyAttackError) -> Self {
        match err {
            ApplyAttackError::TeamNotFound(id) => AttackError::NotFound(format!("team {}", id)),
            ApplyAttackError::PlayerNotFound(id) => {
                AttackError::NotFound(format!("player {}", id))
            }
            e @ ApplyAttackError::PlayerNotInTeam { .. } => {
                AttackError::InvalidOperation(e.to_string())
            }
            ApplyAttackError::StorageError(e) => {
                log::error!("Failed to apply attack: {}", e);
                AttackError::Repository
            }
        }
    }
}

pub struct SubmitAttackUseCaseImpl<S: SettingsRepository, B: ScoreboardRepository, SS: ScoringService>
{
    settings_repository: Arc<S>,
    scoreboard_repository: Arc<B>,
    scoring_service: Arc<SS>,
}

impl<S: SettingsRepository, B: ScoreboardRepository, SS: ScoringService>
    SubmitAttackUseCaseImpl<S, B, SS>
{
    pub fn new(
        settings_repository: Arc<S>,
        scoreboard_repository: Arc<B>,
        scoring_service: Arc<SS>,
    ) -> Self {
        Self {
            settings_repository,
            scoreboard_repository,
            scoring_service,
        }
    }
}

#[async_trait::async_trait]
impl<
    S: SettingsRepository + Send + Sync + 'static,
    B: ScoreboardRepository + Send + Sync + 'static,
    SS: ScoringService + Send + Sync + 'static,
> SubmitAttackUseCase for SubmitAttackUseCaseImpl<S, B, SS>
{
    async fn submit_attack(&self, event: AttackEvent) -> Result<AttackRecord, AttackError> {
        log::debug!(
            "Player {} of team {} attacks team {} x{}",
            event.attacker_player,
            event.attacker_team,
            event.attacked_team,
            event.count
        );
        let settings = match self.settings_repository.get_settings().await {
            Ok(settings) => settings,
            Err(RepoRetrieveError::NotFound) => {
                log::warn!("Rejected attack: settings record is missing");
                return Err(AttackError::Conflict(
                    "settings record is missing".to_string(),
                ));
            }
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load scoring coefficients: {}", e);
                return Err(AttackError::Repository);
            }
        };

        let resolved = self
            .scoring_service
            .resolve_attack(event, &settings.coefficients)?;
        let record = self.scoreboard_repository.apply_attack(resolved).await?;

        log::info!(
            "Attack {} applied: team {} +{} score, player {} +{} personal score, team {} +{} attacked",
            record.id.0,
            event.attacker_team,
            resolved.team_bonus,
            event.attacker_player,
            resolved.player_bonus,
            event.attacked_team,
            resolved.attacked_increment
        );
        Ok(record)
    }

    async fn list_attacks(&self, limit: Option<u64>) -> Result<Vec<AttackRecord>, AttackError> {
        let limit = limit
            .unwrap_or(DEFAULT_ATTACK_LOG_LIMIT)
            .clamp(1, MAX_ATTACK_LOG_LIMIT);
        self.scoreboard_repository
            .list_attack_records(limit)
            .await
            .map_err(|RepoError::StorageError(e)| {
                log::error!("Failed to list attack records: {}", e);
                AttackError::Repository
            })
    }
}

#[cfg(test)]
mod tests {
    use futures::future::join_all;

    use crate::{
        domain::{
            PlayerId, TeamId,
            player::{NewPlayer, PlayerRepository},
            scoring::ScoringServiceImpl,
            settings::{CommonSetting, SettingsRepository},
            team::{NewTeam, TeamRepository},
        },
        testing::InMemoryStore,
    };

    use super::*;

    fn use_case(
        store: &Arc<InMemoryStore>,
    ) -> SubmitAttackUseCaseImpl<InMemoryStore, InMemoryStore, ScoringServiceImpl> {
        SubmitAttackUseCaseImpl::new(
            store.clone(),
            store.clone(),
            Arc::new(ScoringServiceImpl::new()),
        )
    }

    struct Arena {
        a: TeamId,
        b: TeamId,
        p1: PlayerId,
    }

    async fn arena(store: &InMemoryStore) -> Arena {
        let a = store.create_team(NewTeam::named("A")).await.unwrap();
        let b = store.create_team(NewTeam::named("B")).await.unwrap();
        let p1 = store
            .create_player(NewPlayer {
                personal_score: 5,
                ..NewPlayer::new("1", "P1", Some(a.id))
            })
            .await
            .unwrap();
        Arena {
            a: a.id,
            b: b.id,
            p1: p1.id,
        }
    }

    fn attack(arena: &Arena, attacker_team: TeamId, attacked_team: TeamId) -> AttackEvent {
        AttackEvent {
            attacker_player: arena.p1,
            attacker_team,
            attacked_team,
            count: 1,
        }
    }

    #[tokio::test]
    async fn test_attack_applies_all_three_deltas() {
        let store = Arc::new(InMemoryStore::with_default_settings());
        let arena = arena(&store).await;

        let record = use_case(&store)
            .submit_attack(attack(&arena, arena.a, arena.b))
            .await
            .expect("attack applies");

        assert_eq!(store.team(arena.a).unwrap().score, 2);
        assert_eq!(store.player(arena.p1).unwrap().personal_score, 6);
        assert_eq!(store.team(arena.b).unwrap().attacked_count, 1);
        assert_eq!(record.attack.team_bonus, 2);
        assert_eq!(store.attack_count(), 1);
    }

    #[tokio::test]
    async fn test_self_attack_is_rejected_without_mutation() {
        let store = Arc::new(InMemoryStore::with_default_settings());
        let arena = arena(&store).await;

        let result = use_case(&store)
            .submit_attack(attack(&arena, arena.a, arena.a))
            .await;

        assert!(matches!(result, Err(AttackError::InvalidOperation(_))));
        let a = store.team(arena.a).unwrap();
        assert_eq!(a.score, 0);
        assert_eq!(a.attacked_count, 0);
        assert_eq!(store.player(arena.p1).unwrap().personal_score, 5);
        assert_eq!(store.attack_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_entities_are_not_found() {
        let store = Arc::new(InMemoryStore::with_default_settings());
        let arena = arena(&store).await;
        let use_case = use_case(&store);

        let result = use_case
            .submit_attack(attack(&arena, arena.a, TeamId(999)))
            .await;
        assert_eq!(result, Err(AttackError::NotFound("team 999".to_string())));

        let result = use_case
            .submit_attack(AttackEvent {
                attacker_player: PlayerId(999),
                ..attack(&arena, arena.a, arena.b)
            })
            .await;
        assert_eq!(result, Err(AttackError::NotFound("player 999".to_string())));
        assert_eq!(store.team(arena.a).unwrap().score, 0);
    }

    #[tokio::test]
    async fn test_player_must_belong_to_attacking_team() {
        let store = Arc::new(InMemoryStore::with_default_settings());
        let arena = arena(&store).await;
        let c = store.create_team(NewTeam::named("C")).await.unwrap();

        let result = use_case(&store)
            .submit_attack(attack(&arena, c.id, arena.b))
            .await;
        assert!(matches!(result, Err(AttackError::InvalidOperation(_))));
        assert_eq!(store.team(arena.b).unwrap().attacked_count, 0);
    }

    #[tokio::test]
    async fn test_missing_settings_is_a_conflict() {
        let store = Arc::new(InMemoryStore::new());
        let arena = arena(&store).await;

        let result = use_case(&store)
            .submit_attack(attack(&arena, arena.a, arena.b))
            .await;
        assert!(matches!(result, Err(AttackError::Conflict(_))));
        assert_eq!(store.team(arena.b).unwrap().attacked_count, 0);
    }

    #[tokio::test]
    async fn test_count_and_custom_coefficients() {
        let store = Arc::new(InMemoryStore::new());
        store
            .create_settings(CommonSetting {
                coefficients: crate::domain::settings::ScoringCoefficients {
                    attacker_team_bonus: 3,
                    attacker_player_bonus: 0,
                    attacked_increment: 2,
                },
                ..CommonSetting::default()
            })
            .await
            .unwrap();
        let arena = arena(&store).await;

        use_case(&store)
            .submit_attack(AttackEvent {
                count: 4,
                ..attack(&arena, arena.a, arena.b)
            })
            .await
            .unwrap();
        assert_eq!(store.team(arena.a).unwrap().score, 12);
        assert_eq!(store.player(arena.p1).unwrap().personal_score, 5);
        assert_eq!(store.team(arena.b).unwrap().attacked_count, 8);

        let zero = use_case(&store)
            .submit_attack(AttackEvent {
                count: 0,
                ..attack(&arena, arena.a, arena.b)
            })
            .await;
        assert!(matches!(zero, Err(AttackError::InvalidOperation(_))));
    }

    #[tokio::test]
    async fn test_concurrent_attacks_never_lose_an_update() {
        let store = Arc::new(InMemoryStore::with_default_settings());
        let arena = arena(&store).await;
        let use_case = Arc::new(use_case(&store));
        let n = 25;

        let handles = (0..n).map(|_| {
            let use_case = use_case.clone();
            let event = attack(&arena, arena.a, arena.b);
            tokio::spawn(async move { use_case.submit_attack(event).await })
        });
        for result in join_all(handles).await {
            result.expect("task").expect("attack");
        }

        assert_eq!(store.team(arena.b).unwrap().attacked_count, n);
        assert_eq!(store.team(arena.a).unwrap().score, 2 * n);
        assert_eq!(store.player(arena.p1).unwrap().personal_score, 5 + n);
    }

    #[tokio::test]
    async fn test_attack_log_is_newest_first_and_clamped() {
        let store = Arc::new(InMemoryStore::with_default_settings());
        let arena = arena(&store).await;
        let use_case = use_case(&store);
        for count in 1..=3 {
            use_case
                .submit_attack(AttackEvent {
                    count,
                    ..attack(&arena, arena.a, arena.b)
                })
                .await
                .unwrap();
        }

        let log = use_case.list_attacks(None).await.unwrap();
        let counts: Vec<u32> = log.iter().map(|r| r.attack.event.count).collect();
        assert_eq!(counts, vec![3, 2, 1]);

        let log = use_case.list_attacks(Some(0)).await.unwrap();
        assert_eq!(log.len(), 1);
    }
}
