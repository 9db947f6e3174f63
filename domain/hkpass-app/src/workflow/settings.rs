use std::sync::Arc;

use validator::Validate;

use crate::{
    domain::{
        RepoCreateError, RepoRetrieveError, SettingsId,
        settings::{CommonSetting, SettingsChange, SettingsFields, SettingsRepository, SettingsUpdate},
    },
    workflow::{CrudError, access::hash_login_password},
};

#[async_trait::async_trait]
pub trait ManageSettingsUseCase {
    /// Zero or one record.
    async fn list_settings(&self) -> Result<Vec<CommonSetting>, CrudError>;
    async fn get_settings(&self, id: SettingsId) -> Result<CommonSetting, CrudError>;
    async fn create_settings(&self, input: SettingsUpdate) -> Result<CommonSetting, CrudError>;
    async fn replace_settings(
        &self,
        id: SettingsId,
        input: SettingsUpdate,
    ) -> Result<CommonSetting, CrudError>;
    async fn update_settings(
        &self,
        id: SettingsId,
        input: SettingsUpdate,
    ) -> Result<CommonSetting, CrudError>;
    async fn delete_settings(&self, id: SettingsId) -> Result<(), CrudError>;
    /// Creates the record with default values unless it already exists.
    async fn ensure_settings(&self) -> Result<CommonSetting, CrudError>;
}

pub struct ManageSettingsUseCaseImpl<S: SettingsRepository> {
    settings_repository: Arc<S>,
}

impl<S: SettingsRepository> ManageSettingsUseCaseImpl<S> {
    pub fn new(settings_repository: Arc<S>) -> Self {
        Self {
            settings_repository,
        }
    }

    fn password_change(input: &SettingsUpdate) -> Result<Option<Option<String>>, CrudError> {
        input
            .login_password
            .as_deref()
            .map(hash_login_password)
            .transpose()
            .map_err(|e| {
                log::error!("Failed to hash display password: {}", e);
                CrudError::Repository
            })
    }
}

#[async_trait::async_trait]
impl<S: SettingsRepository + Send + Sync + 'static> ManageSettingsUseCase
    for ManageSettingsUseCaseImpl<S>
{
    async fn list_settings(&self) -> Result<Vec<CommonSetting>, CrudError> {
        match self.settings_repository.get_settings().await {
            Ok(settings) => Ok(vec![settings]),
            Err(RepoRetrieveError::NotFound) => Ok(Vec::new()),
            Err(e) => Err(CrudError::from_retrieve(e, "settings")),
        }
    }

    async fn get_settings(&self, id: SettingsId) -> Result<CommonSetting, CrudError> {
        let not_found = || CrudError::NotFound(format!("settings {}", id));
        let settings = self
            .settings_repository
            .get_settings()
            .await
            .map_err(|e| CrudError::from_retrieve(e, format!("settings {}", id)))?;
        if settings.id != id {
            return Err(not_found());
        }
        Ok(settings)
    }

    async fn create_settings(&self, input: SettingsUpdate) -> Result<CommonSetting, CrudError> {
        input.validate()?;
        let mut settings = CommonSetting::default();
        SettingsChange {
            fields: input.fields.clone(),
            login_password_hash: Self::password_change(&input)?,
        }
        .apply_to(&mut settings);

        let settings = self
            .settings_repository
            .create_settings(settings)
            .await
            .map_err(|e| CrudError::from_create(e, "settings"))?;
        log::info!("Created settings record");
        Ok(settings)
    }

    async fn replace_settings(
        &self,
        id: SettingsId,
        input: SettingsUpdate,
    ) -> Result<CommonSetting, CrudError> {
        input.validate()?;
        let mut full = CommonSetting::default();
        input.fields.apply_to(&mut full);
        let change = SettingsChange {
            fields: SettingsFields::replace_with(&full),
            login_password_hash: Some(
                Self::password_change(&input)?.unwrap_or(None),
            ),
        };
        self.apply_change(id, change).await
    }

    async fn update_settings(
        &self,
        id: SettingsId,
        input: SettingsUpdate,
    ) -> Result<CommonSetting, CrudError> {
        input.validate()?;
        let change = SettingsChange {
            login_password_hash: Self::password_change(&input)?,
            fields: input.fields,
        };
        self.apply_change(id, change).await
    }

    async fn delete_settings(&self, id: SettingsId) -> Result<(), CrudError> {
        self.settings_repository
            .delete_settings(id)
            .await
            .map_err(|e| CrudError::from_retrieve(e, format!("settings {}", id)))?;
        log::warn!("Deleted settings record; scoring is disabled until it is recreated");
        Ok(())
    }

    async fn ensure_settings(&self) -> Result<CommonSetting, CrudError> {
        match self.settings_repository.get_settings().await {
            Ok(settings) => return Ok(settings),
            Err(RepoRetrieveError::NotFound) => {}
            Err(e) => return Err(CrudError::from_retrieve(e, "settings")),
        }
        match self
            .settings_repository
            .create_settings(CommonSetting::default())
            .await
        {
            Ok(settings) => {
                log::info!("Seeded default settings");
                Ok(settings)
            }
            // Lost a race against a concurrent seed.
            Err(RepoCreateError::Conflict(_)) => self
                .settings_repository
                .get_settings()
                .await
                .map_err(|e| CrudError::from_retrieve(e, "settings")),
            Err(e) => Err(CrudError::from_create(e, "settings")),
        }
    }
}

impl<S: SettingsRepository + Send + Sync + 'static> ManageSettingsUseCaseImpl<S> {
    async fn apply_change(
        &self,
        id: SettingsId,
        change: SettingsChange,
    ) -> Result<CommonSetting, CrudError> {
        let settings = self
            .settings_repository
            .update_settings(id, change)
            .await
            .map_err(|e| CrudError::from_update(e, format!("settings {}", id)))?;
        log::info!(
            "Updated settings: team bonus {}, player bonus {}, attacked increment {}",
            settings.coefficients.attacker_team_bonus,
            settings.coefficients.attacker_player_bonus,
            settings.coefficients.attacked_increment
        );
        Ok(settings)
    }
}
