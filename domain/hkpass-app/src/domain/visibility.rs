//! Display capabilities of teams and players on the public boards.
//!
//! The dashboard stores these as individual `hide_*` switches; inside the
//! domain they are grouped into one policy value per entity so the
//! leaderboard projection can evaluate them in a single place.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TeamVisibility {
    pub show_ranking_value: bool,
    pub show_name: bool,
}

impl Default for TeamVisibility {
    fn default() -> Self {
        Self {
            show_ranking_value: true,
            show_name: true,
        }
    }
}

impl TeamVisibility {
    pub fn from_hide_flags(hide_ranking: bool, hide_team_name: bool) -> Self {
        Self {
            show_ranking_value: !hide_ranking,
            show_name: !hide_team_name,
        }
    }

    pub fn hide_ranking(&self) -> bool {
        !self.show_ranking_value
    }

    pub fn hide_team_name(&self) -> bool {
        !self.show_name
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerVisibility {
    pub show_name: bool,
    pub show_team: bool,
    pub show_personal_score: bool,
    pub show_completed_minigame_count: bool,
}

impl Default for PlayerVisibility {
    fn default() -> Self {
        Self {
            show_name: true,
            show_team: true,
            show_personal_score: true,
            show_completed_minigame_count: true,
        }
    }
}

impl PlayerVisibility {
    pub fn from_hide_flags(
        hide_name: bool,
        hide_team: bool,
        hide_personal_score: bool,
        hide_completed_minigame_count: bool,
    ) -> Self {
        Self {
            show_name: !hide_name,
            show_team: !hide_team,
            show_personal_score: !hide_personal_score,
            show_completed_minigame_count: !hide_completed_minigame_count,
        }
    }

    pub fn hide_name(&self) -> bool {
        !self.show_name
    }

    pub fn hide_team(&self) -> bool {
        !self.show_team
    }

    pub fn hide_personal_score(&self) -> bool {
        !self.show_personal_score
    }

    pub fn hide_completed_minigame_count(&self) -> bool {
        !self.show_completed_minigame_count
    }
}

/// How one public board is displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeaderboardRule {
    pub hidden: bool,
    pub top_n: u32,
}

impl Default for LeaderboardRule {
    fn default() -> Self {
        Self {
            hidden: false,
            top_n: 10,
        }
    }
}
