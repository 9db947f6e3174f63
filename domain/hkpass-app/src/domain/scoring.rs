use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    AttackRecordId, MiniGameId, PlayerId, RepoError, TeamId,
    minigame::MiniGame,
    player::Player,
    settings::ScoringCoefficients,
};

/// One team's player hitting another team, possibly several times at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackEvent {
    pub attacker_player: PlayerId,
    pub attacker_team: TeamId,
    pub attacked_team: TeamId,
    pub count: u32,
}

/// An attack together with the exact deltas the store has to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedAttack {
    pub event: AttackEvent,
    pub team_bonus: i64,
    pub player_bonus: i64,
    pub attacked_increment: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackRecord {
    pub id: AttackRecordId,
    pub attack: ResolvedAttack,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttackRuleViolation {
    #[error("team {0} cannot attack itself")]
    SelfAttack(TeamId),
    #[error("attack count must be at least 1")]
    ZeroCount,
    #[error("attack deltas overflow")]
    Overflow,
}

/// A player finishing a mini-game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedCompletion {
    pub player: PlayerId,
    pub minigame: MiniGameId,
    pub chips: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub player: Player,
    pub minigame: MiniGame,
}

pub trait ScoringService {
    fn resolve_attack(
        &self,
        event: AttackEvent,
        coefficients: &ScoringCoefficients,
    ) -> Result<ResolvedAttack, AttackRuleViolation>;
    fn resolve_completion(&self, player: PlayerId, minigame: &MiniGame) -> ResolvedCompletion;
}

pub struct ScoringServiceImpl;

impl ScoringServiceImpl {
    pub fn new() -> Self {
        Self
    }
}

impl ScoringService for ScoringServiceImpl {
    fn resolve_attack(
        &self,
        event: AttackEvent,
        coefficients: &ScoringCoefficients,
    ) -> Result<ResolvedAttack, AttackRuleViolation> {
        if event.attacker_team == event.attacked_team {
            return Err(AttackRuleViolation::SelfAttack(event.attacker_team));
        }
        if event.count == 0 {
            return Err(AttackRuleViolation::ZeroCount);
        }
        let count = i64::from(event.count);
        let scale = |coefficient: i64| {
            coefficient
                .checked_mul(count)
                .ok_or(AttackRuleViolation::Overflow)
        };
        Ok(ResolvedAttack {
            event,
            team_bonus: scale(coefficients.attacker_team_bonus)?,
            player_bonus: scale(coefficients.attacker_player_bonus)?,
            attacked_increment: scale(coefficients.attacked_increment)?,
        })
    }

    fn resolve_completion(&self, player: PlayerId, minigame: &MiniGame) -> ResolvedCompletion {
        ResolvedCompletion {
            player,
            minigame: minigame.id,
            chips: minigame.available_chips,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApplyAttackError {
    #[error("team {0} not found")]
    TeamNotFound(TeamId),
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),
    #[error("player {player} is not a member of team {team}")]
    PlayerNotInTeam { player: PlayerId, team: TeamId },
    #[error("storage error: {0}")]
    StorageError(String),
}

#[derive(Debug, Error)]
pub enum ApplyCompletionError {
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),
    #[error("mini-game {0} not found")]
    MiniGameNotFound(MiniGameId),
    #[error("storage error: {0}")]
    StorageError(String),
}

/// Atomic counter mutations. Every method either applies all of its
/// deltas or none of them.
#[async_trait::async_trait]
pub trait ScoreboardRepository {
    async fn apply_attack(&self, attack: ResolvedAttack) -> Result<AttackRecord, ApplyAttackError>;
    async fn apply_completion(
        &self,
        completion: ResolvedCompletion,
    ) -> Result<CompletionOutcome, ApplyCompletionError>;
    /// Most recent first.
    async fn list_attack_records(&self, limit: u64) -> Result<Vec<AttackRecord>, RepoError>;
}
