use std::sync::Arc;

use thiserror::Error;

use crate::domain::{RepoRetrieveError, settings::SettingsRepository};

const PASSWORD_HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// Hashes a display password. Surrounding whitespace is ignored and an empty
/// password removes the gate.
pub(crate) fn hash_login_password(raw: &str) -> Result<Option<String>, bcrypt::BcryptError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    bcrypt::hash(trimmed, PASSWORD_HASH_COST).map(Some)
}

#[async_trait::async_trait]
pub trait VerifyDisplayPasswordUseCase {
    async fn verify(&self, password: &str) -> Result<(), LoginError>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("wrong password")]
    WrongPassword,
    #[error("settings are not configured")]
    SettingsMissing,
    #[error("repository error")]
    Repository,
}

pub struct VerifyDisplayPasswordUseCaseImpl<S: SettingsRepository> {
    settings_repository: Arc<S>,
}

impl<S: SettingsRepository> VerifyDisplayPasswordUseCaseImpl<S> {
    pub fn new(settings_repository: Arc<S>) -> Self {
        Self {
            settings_repository,
        }
    }
}

#[async_trait::async_trait]
impl<S: SettingsRepository + Send + Sync + 'static> VerifyDisplayPasswordUseCase
    for VerifyDisplayPasswordUseCaseImpl<S>
{
    async fn verify(&self, password: &str) -> Result<(), LoginError> {
        let settings = match self.settings_repository.get_settings().await {
            Ok(settings) => settings,
            Err(RepoRetrieveError::NotFound) => return Err(LoginError::SettingsMissing),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load settings for login: {}", e);
                return Err(LoginError::Repository);
            }
        };
        let Some(hash) = settings.login_password_hash else {
            return Ok(());
        };
        match bcrypt::verify(password.trim(), &hash) {
            Ok(true) => Ok(()),
            Ok(false) => {
                log::debug!("Rejected display login");
                Err(LoginError::WrongPassword)
            }
            Err(e) => {
                log::error!("Stored display password hash is unusable: {}", e);
                Err(LoginError::Repository)
            }
        }
    }
}
