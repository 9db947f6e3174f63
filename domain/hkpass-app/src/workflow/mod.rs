use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::{RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError};

pub mod access;
pub mod leaderboard;
pub mod minigames;
pub mod players;
pub mod scoring;
pub mod settings;
pub mod teams;

/// Failure of a plain administrative create/read/update/delete call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CrudError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("repository error")]
    Repository,
}

impl From<ValidationErrors> for CrudError {
    fn from(errors: ValidationErrors) -> Self {
        CrudError::Validation(errors.to_string())
    }
}

impl CrudError {
    pub(crate) fn from_list(err: RepoError, what: &str) -> Self {
        match err {
            RepoError::StorageError(e) => {
                log::error!("Failed to list {}: {}", what, e);
                CrudError::Repository
            }
        }
    }

    pub(crate) fn from_retrieve(err: RepoRetrieveError, what: impl std::fmt::Display) -> Self {
        match err {
            RepoRetrieveError::NotFound => CrudError::NotFound(what.to_string()),
            RepoRetrieveError::StorageError(e) => {
                log::error!("Failed to access {}: {}", what, e);
                CrudError::Repository
            }
        }
    }

    pub(crate) fn from_create(err: RepoCreateError, what: &str) -> Self {
        match err {
            RepoCreateError::Conflict(msg) => CrudError::Conflict(msg),
            RepoCreateError::MissingReference(msg) => CrudError::NotFound(msg),
            RepoCreateError::StorageError(e) => {
                log::error!("Failed to create {}: {}", what, e);
                CrudError::Repository
            }
        }
    }

    pub(crate) fn from_update(err: RepoUpdateError, what: impl std::fmt::Display) -> Self {
        match err {
            RepoUpdateError::NotFound => CrudError::NotFound(what.to_string()),
            RepoUpdateError::Conflict(msg) => CrudError::Conflict(msg),
            RepoUpdateError::MissingReference(msg) => CrudError::NotFound(msg),
            RepoUpdateError::StorageError(e) => {
                log::error!("Failed to update {}: {}", what, e);
                CrudError::Repository
            }
        }
    }
}
