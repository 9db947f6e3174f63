//! In-memory implementations of every repository port, for use-case tests.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use chrono::Utc;

use crate::domain::{
    AttackRecordId, MiniGameId, PlayerId, RepoCreateError, RepoError, RepoRetrieveError,
    RepoUpdateError, SettingsId, TeamId,
    minigame::{MiniGame, MiniGameRepository, MiniGameUpdate, NewMiniGame},
    player::{NewPlayer, Player, PlayerFilter, PlayerRepository, PlayerUpdate},
    scoring::{
        ApplyAttackError, ApplyCompletionError, AttackRecord, CompletionOutcome, ResolvedAttack,
        ResolvedCompletion, ScoreboardRepository,
    },
    settings::{CommonSetting, SettingsChange, SettingsRepository},
    team::{DeletedTeam, NewTeam, Team, TeamFilter, TeamRepository, TeamUpdate},
};

#[derive(Default)]
struct State {
    next_id: i64,
    teams: BTreeMap<TeamId, Team>,
    players: BTreeMap<PlayerId, Player>,
    minigames: BTreeMap<MiniGameId, MiniGame>,
    settings: Option<CommonSetting>,
    attacks: Vec<AttackRecord>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn team_name_taken(&self, name: &str, except: Option<TeamId>) -> bool {
        self.teams
            .values()
            .any(|t| t.name == name && Some(t.id) != except)
    }

    fn player_number_taken(&self, number: &str, except: Option<PlayerId>) -> bool {
        self.players
            .values()
            .any(|p| p.number == number && Some(p.id) != except)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_settings() -> Self {
        let store = Self::new();
        store.state.lock().unwrap().settings = Some(CommonSetting::default());
        store
    }

    pub fn team(&self, id: TeamId) -> Option<Team> {
        self.state.lock().unwrap().teams.get(&id).cloned()
    }

    pub fn player(&self, id: PlayerId) -> Option<Player> {
        self.state.lock().unwrap().players.get(&id).cloned()
    }

    pub fn minigame(&self, id: MiniGameId) -> Option<MiniGame> {
        self.state.lock().unwrap().minigames.get(&id).cloned()
    }

    pub fn attack_count(&self) -> usize {
        self.state.lock().unwrap().attacks.len()
    }
}

#[async_trait::async_trait]
impl TeamRepository for InMemoryStore {
    async fn list_teams(&self, filter: TeamFilter) -> Result<Vec<Team>, RepoError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .teams
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    async fn get_team(&self, id: TeamId) -> Result<Team, RepoRetrieveError> {
        self.team(id).ok_or(RepoRetrieveError::NotFound)
    }

    async fn create_team(&self, team: NewTeam) -> Result<Team, RepoCreateError> {
        let mut state = self.state.lock().unwrap();
        if state.team_name_taken(&team.name, None) {
            return Err(RepoCreateError::Conflict(format!(
                "team name '{}' is taken",
                team.name
            )));
        }
        let team = Team {
            id: TeamId(state.next_id()),
            name: team.name,
            score: team.score,
            attacked_count: team.attacked_count,
            visibility: team.visibility,
        };
        state.teams.insert(team.id, team.clone());
        Ok(team)
    }

    async fn update_team(&self, id: TeamId, update: TeamUpdate) -> Result<Team, RepoUpdateError> {
        let mut state = self.state.lock().unwrap();
        if let Some(name) = &update.name {
            if state.team_name_taken(name, Some(id)) {
                return Err(RepoUpdateError::Conflict(format!(
                    "team name '{}' is taken",
                    name
                )));
            }
        }
        let team = state.teams.get_mut(&id).ok_or(RepoUpdateError::NotFound)?;
        update.apply_to(team);
        Ok(team.clone())
    }

    async fn delete_team(&self, id: TeamId) -> Result<DeletedTeam, RepoRetrieveError> {
        let mut state = self.state.lock().unwrap();
        let team = state.teams.remove(&id).ok_or(RepoRetrieveError::NotFound)?;
        let before = state.players.len();
        state.players.retain(|_, p| p.team != Some(id));
        let removed_players = (before - state.players.len()) as u64;
        Ok(DeletedTeam {
            team,
            removed_players,
        })
    }
}

#[async_trait::async_trait]
impl PlayerRepository for InMemoryStore {
    async fn list_players(&self, filter: PlayerFilter) -> Result<Vec<Player>, RepoError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .players
            .values()
            .filter(|p| filter.team_id.is_none_or(|id| p.team == Some(id)))
            .filter(|p| {
                filter.team_name.as_ref().is_none_or(|name| {
                    p.team
                        .and_then(|id| state.teams.get(&id))
                        .is_some_and(|t| t.name == *name)
                })
            })
            .cloned()
            .collect())
    }

    async fn get_player(&self, id: PlayerId) -> Result<Player, RepoRetrieveError> {
        self.player(id).ok_or(RepoRetrieveError::NotFound)
    }

    async fn create_player(&self, player: NewPlayer) -> Result<Player, RepoCreateError> {
        let mut state = self.state.lock().unwrap();
        if state.player_number_taken(&player.number, None) {
            return Err(RepoCreateError::Conflict(format!(
                "player number '{}' is taken",
                player.number
            )));
        }
        if let Some(team) = player.team {
            if !state.teams.contains_key(&team) {
                return Err(RepoCreateError::MissingReference(format!("team {}", team)));
            }
        }
        let player = Player {
            id: PlayerId(state.next_id()),
            number: player.number,
            name: player.name,
            personal_score: player.personal_score,
            chips: player.chips,
            completed_minigame_count: player.completed_minigame_count,
            team: player.team,
            visibility: player.visibility,
        };
        state.players.insert(player.id, player.clone());
        Ok(player)
    }

    async fn update_player(
        &self,
        id: PlayerId,
        update: PlayerUpdate,
    ) -> Result<Player, RepoUpdateError> {
        let mut state = self.state.lock().unwrap();
        if !state.players.contains_key(&id) {
            return Err(RepoUpdateError::NotFound);
        }
        if let Some(number) = &update.number {
            if state.player_number_taken(number, Some(id)) {
                return Err(RepoUpdateError::Conflict(format!(
                    "player number '{}' is taken",
                    number
                )));
            }
        }
        if let Some(Some(team)) = update.team {
            if !state.teams.contains_key(&team) {
                return Err(RepoUpdateError::MissingReference(format!("team {}", team)));
            }
        }
        let player = state.players.get_mut(&id).ok_or(RepoUpdateError::NotFound)?;
        update.apply_to(player);
        Ok(player.clone())
    }

    async fn delete_player(&self, id: PlayerId) -> Result<Player, RepoRetrieveError> {
        let mut state = self.state.lock().unwrap();
        state.players.remove(&id).ok_or(RepoRetrieveError::NotFound)
    }
}

#[async_trait::async_trait]
impl MiniGameRepository for InMemoryStore {
    async fn list_minigames(&self) -> Result<Vec<MiniGame>, RepoError> {
        Ok(self.state.lock().unwrap().minigames.values().cloned().collect())
    }

    async fn get_minigame(&self, id: MiniGameId) -> Result<MiniGame, RepoRetrieveError> {
        self.minigame(id).ok_or(RepoRetrieveError::NotFound)
    }

    async fn create_minigame(&self, game: NewMiniGame) -> Result<MiniGame, RepoCreateError> {
        let mut state = self.state.lock().unwrap();
        let game = MiniGame {
            id: MiniGameId(state.next_id()),
            category: game.category,
            room: game.room,
            name: game.name,
            available_chips: game.available_chips,
            is_displayed: game.is_displayed,
            is_limited: game.is_limited,
            limited_time: game.limited_time,
            play_count: game.play_count,
        };
        state.minigames.insert(game.id, game.clone());
        Ok(game)
    }

    async fn update_minigame(
        &self,
        id: MiniGameId,
        update: MiniGameUpdate,
    ) -> Result<MiniGame, RepoUpdateError> {
        let mut state = self.state.lock().unwrap();
        let game = state
            .minigames
            .get_mut(&id)
            .ok_or(RepoUpdateError::NotFound)?;
        update.apply_to(game);
        Ok(game.clone())
    }

    async fn delete_minigame(&self, id: MiniGameId) -> Result<MiniGame, RepoRetrieveError> {
        let mut state = self.state.lock().unwrap();
        state.minigames.remove(&id).ok_or(RepoRetrieveError::NotFound)
    }
}

#[async_trait::async_trait]
impl SettingsRepository for InMemoryStore {
    async fn get_settings(&self) -> Result<CommonSetting, RepoRetrieveError> {
        self.state
            .lock()
            .unwrap()
            .settings
            .clone()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn create_settings(
        &self,
        settings: CommonSetting,
    ) -> Result<CommonSetting, RepoCreateError> {
        let mut state = self.state.lock().unwrap();
        if state.settings.is_some() {
            return Err(RepoCreateError::Conflict(
                "settings already exist".to_string(),
            ));
        }
        state.settings = Some(settings.clone());
        Ok(settings)
    }

    async fn update_settings(
        &self,
        id: SettingsId,
        change: SettingsChange,
    ) -> Result<CommonSetting, RepoUpdateError> {
        let mut state = self.state.lock().unwrap();
        let settings = state
            .settings
            .as_mut()
            .filter(|s| s.id == id)
            .ok_or(RepoUpdateError::NotFound)?;
        change.apply_to(settings);
        Ok(settings.clone())
    }

    async fn delete_settings(&self, id: SettingsId) -> Result<CommonSetting, RepoRetrieveError> {
        let mut state = self.state.lock().unwrap();
        match state.settings.take() {
            Some(settings) if settings.id == id => Ok(settings),
            other => {
                state.settings = other;
                Err(RepoRetrieveError::NotFound)
            }
        }
    }
}

#[async_trait::async_trait]
impl ScoreboardRepository for InMemoryStore {
    async fn apply_attack(&self, attack: ResolvedAttack) -> Result<AttackRecord, ApplyAttackError> {
        let mut state = self.state.lock().unwrap();
        let event = attack.event;
        for team in [event.attacker_team, event.attacked_team] {
            if !state.teams.contains_key(&team) {
                return Err(ApplyAttackError::TeamNotFound(team));
            }
        }
        let player = state
            .players
            .get(&event.attacker_player)
            .ok_or(ApplyAttackError::PlayerNotFound(event.attacker_player))?;
        if player.team != Some(event.attacker_team) {
            return Err(ApplyAttackError::PlayerNotInTeam {
                player: event.attacker_player,
                team: event.attacker_team,
            });
        }

        if let Some(team) = state.teams.get_mut(&event.attacked_team) {
            team.attacked_count += attack.attacked_increment;
        }
        if let Some(team) = state.teams.get_mut(&event.attacker_team) {
            team.score += attack.team_bonus;
        }
        if let Some(player) = state.players.get_mut(&event.attacker_player) {
            player.personal_score += attack.player_bonus;
        }
        let record = AttackRecord {
            id: AttackRecordId(state.attacks.len() as i64 + 1),
            attack,
            created_at: Utc::now(),
        };
        state.attacks.push(record.clone());
        Ok(record)
    }

    async fn apply_completion(
        &self,
        completion: ResolvedCompletion,
    ) -> Result<CompletionOutcome, ApplyCompletionError> {
        let mut state = self.state.lock().unwrap();
        if !state.players.contains_key(&completion.player) {
            return Err(ApplyCompletionError::PlayerNotFound(completion.player));
        }
        let minigame = state
            .minigames
            .get_mut(&completion.minigame)
            .ok_or(ApplyCompletionError::MiniGameNotFound(completion.minigame))?;
        minigame.play_count += 1;
        let minigame = minigame.clone();
        let player = state
            .players
            .get_mut(&completion.player)
            .ok_or(ApplyCompletionError::PlayerNotFound(completion.player))?;
        player.chips += completion.chips;
        player.completed_minigame_count += 1;
        Ok(CompletionOutcome {
            player: player.clone(),
            minigame,
        })
    }

    async fn list_attack_records(&self, limit: u64) -> Result<Vec<AttackRecord>, RepoError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .attacks
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
