use std::collections::HashMap;

use crate::domain::{
    PlayerId, TeamId,
    player::Player,
    settings::{LeaderboardKind, LeaderboardRules},
    team::Team,
    visibility::LeaderboardRule,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeaderboardSubject {
    Team(TeamId),
    Player(PlayerId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub subject: LeaderboardSubject,
    /// `None` when the entity asked for its name to be masked.
    pub name: Option<String>,
    /// Player boards only; `None` for unaffiliated or masked teams.
    pub team_name: Option<String>,
    pub value: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaderboard {
    pub kind: LeaderboardKind,
    pub hidden: bool,
    pub entries: Vec<LeaderboardEntry>,
}

pub trait LeaderboardService {
    fn project(
        &self,
        rules: &LeaderboardRules,
        teams: &[Team],
        players: &[Player],
    ) -> Vec<Leaderboard>;
}

pub struct LeaderboardServiceImpl;

impl LeaderboardServiceImpl {
    pub fn new() -> Self {
        Self
    }
}

impl LeaderboardService for LeaderboardServiceImpl {
    fn project(
        &self,
        rules: &LeaderboardRules,
        teams: &[Team],
        players: &[Player],
    ) -> Vec<Leaderboard> {
        let team_names: HashMap<TeamId, &str> =
            teams.iter().map(|t| (t.id, t.name.as_str())).collect();

        LeaderboardKind::ALL
            .into_iter()
            .map(|kind| {
                let rule = rules.rule(kind);
                if rule.hidden {
                    return Leaderboard {
                        kind,
                        hidden: true,
                        entries: Vec::new(),
                    };
                }
                let entries = match kind {
                    LeaderboardKind::TeamScore => project_teams(teams, rule, |t| t.score),
                    LeaderboardKind::TeamAttacked => {
                        project_teams(teams, rule, |t| t.attacked_count)
                    }
                    LeaderboardKind::PlayerScore => project_players(
                        players,
                        &team_names,
                        rule,
                        |p| p.personal_score,
                        |p| p.visibility.show_personal_score,
                    ),
                    LeaderboardKind::PlayerMiniGame => project_players(
                        players,
                        &team_names,
                        rule,
                        |p| p.completed_minigame_count,
                        |p| p.visibility.show_completed_minigame_count,
                    ),
                };
                Leaderboard {
                    kind,
                    hidden: false,
                    entries,
                }
            })
            .collect()
    }
}

fn project_teams(
    teams: &[Team],
    rule: LeaderboardRule,
    value: impl Fn(&Team) -> i64,
) -> Vec<LeaderboardEntry> {
    rank_by(teams, &value, |t| t.id.0)
        .into_iter()
        .take_while(|&(rank, _)| rank <= rule.top_n)
        .filter(|(_, team)| team.visibility.show_ranking_value)
        .map(|(rank, team)| LeaderboardEntry {
            rank,
            subject: LeaderboardSubject::Team(team.id),
            name: team.visibility.show_name.then(|| team.name.clone()),
            team_name: None,
            value: value(team),
        })
        .collect()
}

fn project_players(
    players: &[Player],
    team_names: &HashMap<TeamId, &str>,
    rule: LeaderboardRule,
    value: impl Fn(&Player) -> i64,
    shows_value: impl Fn(&Player) -> bool,
) -> Vec<LeaderboardEntry> {
    rank_by(players, &value, |p| p.id.0)
        .into_iter()
        .take_while(|&(rank, _)| rank <= rule.top_n)
        .filter(|&(_, player)| shows_value(player))
        .map(|(rank, player)| LeaderboardEntry {
            rank,
            subject: LeaderboardSubject::Player(player.id),
            name: player.visibility.show_name.then(|| player.name.clone()),
            team_name: player
                .team
                .filter(|_| player.visibility.show_team)
                .and_then(|id| team_names.get(&id).map(|name| name.to_string())),
            value: value(player),
        })
        .collect()
}

/// Orders by value descending, then by key ascending, and assigns
/// competition ranks (1, 2, 2, 4).
fn rank_by<'a, T>(
    items: &'a [T],
    value: impl Fn(&T) -> i64,
    key: impl Fn(&T) -> i64,
) -> Vec<(u32, &'a T)> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| value(b).cmp(&value(a)).then_with(|| key(a).cmp(&key(b))));

    let mut ranked = Vec::with_capacity(sorted.len());
    let mut previous: Option<(i64, u32)> = None;
    for (position, item) in sorted.into_iter().enumerate() {
        let current = value(item);
        let rank = match previous {
            Some((prev_value, prev_rank)) if prev_value == current => prev_rank,
            _ => position as u32 + 1,
        };
        previous = Some((current, rank));
        ranked.push((rank, item));
    }
    ranked
}
