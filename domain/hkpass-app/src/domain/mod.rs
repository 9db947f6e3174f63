pub mod leaderboard;
pub mod minigame;
pub mod player;
pub mod scoring;
pub mod settings;
pub mod team;
pub mod visibility;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeamId(pub i64);

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub i64);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MiniGameId(pub i64);

impl std::fmt::Display for MiniGameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SettingsId(pub i64);

impl SettingsId {
    /// The only key the settings record is ever stored under.
    pub const SINGLETON: SettingsId = SettingsId(1);
}

impl std::fmt::Display for SettingsId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttackRecordId(pub i64);

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("storage error: {0}")]
    StorageError(String),
}

#[derive(Debug, Error)]
pub enum RepoRetrieveError {
    #[error("resource not found")]
    NotFound,
    #[error("storage error: {0}")]
    StorageError(String),
}

#[derive(Debug, Error)]
pub enum RepoCreateError {
    #[error("resource conflict: {0}")]
    Conflict(String),
    #[error("referenced resource not found: {0}")]
    MissingReference(String),
    #[error("storage error: {0}")]
    StorageError(String),
}

#[derive(Debug, Error)]
pub enum RepoUpdateError {
    #[error("resource not found")]
    NotFound,
    #[error("resource conflict: {0}")]
    Conflict(String),
    #[error("referenced resource not found: {0}")]
    MissingReference(String),
    #[error("storage error: {0}")]
    StorageError(String),
}
