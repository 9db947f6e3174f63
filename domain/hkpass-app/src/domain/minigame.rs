use validator::Validate;

use crate::domain::{MiniGameId, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MiniGame {
    pub id: MiniGameId,
    pub category: String,
    pub room: String,
    pub name: String,
    pub available_chips: i64,
    pub is_displayed: bool,
    pub is_limited: bool,
    /// Seconds; only meaningful while `is_limited` is set.
    pub limited_time: i64,
    pub play_count: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Validate)]
pub struct NewMiniGame {
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(length(min = 1, max = 50))]
    pub room: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 0))]
    pub available_chips: i64,
    pub is_displayed: bool,
    pub is_limited: bool,
    #[validate(range(min = 0))]
    pub limited_time: i64,
    #[validate(range(min = 0))]
    pub play_count: i64,
}

impl NewMiniGame {
    pub fn new(
        category: impl Into<String>,
        room: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            room: room.into(),
            name: name.into(),
            available_chips: 0,
            is_displayed: true,
            is_limited: false,
            limited_time: 0,
            play_count: 0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Validate)]
pub struct MiniGameUpdate {
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub room: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub available_chips: Option<i64>,
    pub is_displayed: Option<bool>,
    pub is_limited: Option<bool>,
    #[validate(range(min = 0))]
    pub limited_time: Option<i64>,
    #[validate(range(min = 0))]
    pub play_count: Option<i64>,
}

impl MiniGameUpdate {
    pub fn replace_with(game: NewMiniGame) -> Self {
        Self {
            category: Some(game.category),
            room: Some(game.room),
            name: Some(game.name),
            available_chips: Some(game.available_chips),
            is_displayed: Some(game.is_displayed),
            is_limited: Some(game.is_limited),
            limited_time: Some(game.limited_time),
            play_count: Some(game.play_count),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, game: &mut MiniGame) {
        if let Some(category) = &self.category {
            game.category = category.clone();
        }
        if let Some(room) = &self.room {
            game.room = room.clone();
        }
        if let Some(name) = &self.name {
            game.name = name.clone();
        }
        if let Some(chips) = self.available_chips {
            game.available_chips = chips;
        }
        if let Some(is_displayed) = self.is_displayed {
            game.is_displayed = is_displayed;
        }
        if let Some(is_limited) = self.is_limited {
            game.is_limited = is_limited;
        }
        if let Some(limited_time) = self.limited_time {
            game.limited_time = limited_time;
        }
        if let Some(play_count) = self.play_count {
            game.play_count = play_count;
        }
    }
}

#[async_trait::async_trait]
pub trait MiniGameRepository {
    async fn list_minigames(&self) -> Result<Vec<MiniGame>, RepoError>;
    async fn get_minigame(&self, id: MiniGameId) -> Result<MiniGame, RepoRetrieveError>;
    async fn create_minigame(&self, game: NewMiniGame) -> Result<MiniGame, RepoCreateError>;
    async fn update_minigame(
        &self,
        id: MiniGameId,
        update: MiniGameUpdate,
    ) -> Result<MiniGame, RepoUpdateError>;
    async fn delete_minigame(&self, id: MiniGameId) -> Result<MiniGame, RepoRetrieveError>;
}
