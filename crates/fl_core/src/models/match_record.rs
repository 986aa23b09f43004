//! The `Match` aggregate and its embedded side records.
//!
//! A match exclusively owns its two `TeamMatch` sub-records and their
//! action ledgers. The `score`/`player_stats`/`team_stats` fields on a
//! side are caches of the deriver's output; they are refreshed on every
//! append and must always equal a full ledger replay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::action::{Action, ActionType};
use super::stats::{PlayerStatLine, SideDerived, TeamStatLine};
use crate::workflow::StatsWorkflow;

/// Match lifecycle status. Only ever advances forward.
///
/// The live status serializes as `"continue"` to stay compatible with the
/// upstream document shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Upcoming,
    #[serde(rename = "continue")]
    Live,
    Completed,
}

/// Period marker within a live match (`timesSwitched` upstream).
/// `None` on the match means the first half is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodMark {
    HalfTime,
    FullTime,
    Overtime,
}

impl PeriodMark {
    /// The marker that must come immediately after `current`.
    pub fn successor(current: Option<PeriodMark>) -> Option<PeriodMark> {
        match current {
            None => Some(PeriodMark::HalfTime),
            Some(PeriodMark::HalfTime) => Some(PeriodMark::FullTime),
            Some(PeriodMark::FullTime) => Some(PeriodMark::Overtime),
            Some(PeriodMark::Overtime) => None,
        }
    }
}

/// League match format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchFormat {
    #[serde(rename = "5v5")]
    FiveVFive,
    #[serde(rename = "7v7")]
    SevenVSeven,
}

/// One of the two competing sides within a match record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opposing(&self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Side::A => "team_a",
            Side::B => "team_b",
        }
    }
}

/// Roster membership for one side. `is_active` marks who is currently on
/// the field; only active players may record actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_id: String,
    pub name: String,
    pub is_active: bool,
}

/// Embedded per-side match record: roster, append-only action ledger, and
/// the cached derived score/stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMatch {
    pub team_id: String,
    pub roster: Vec<RosterEntry>,
    /// Append-only. Never deleted from, never edited in place.
    pub player_actions: Vec<Action>,
    /// Derived: must equal the ledger replay at all times.
    pub score: u16,
    /// Derived: per-player roll-up keyed by player id.
    pub player_stats: HashMap<String, PlayerStatLine>,
    /// Derived: side-level roll-up.
    pub team_stats: TeamStatLine,
    /// True/false once the match completes; `None` for an undecided or
    /// tied match.
    pub win: Option<bool>,
}

impl TeamMatch {
    pub fn new(team_id: impl Into<String>, roster: Vec<RosterEntry>) -> Self {
        Self {
            team_id: team_id.into(),
            roster,
            player_actions: Vec::new(),
            score: 0,
            player_stats: HashMap::new(),
            team_stats: TeamStatLine::default(),
            win: None,
        }
    }

    pub fn roster_entry(&self, player_id: &str) -> Option<&RosterEntry> {
        self.roster.iter().find(|entry| entry.player_id == player_id)
    }

    pub fn roster_entry_mut(&mut self, player_id: &str) -> Option<&mut RosterEntry> {
        self.roster.iter_mut().find(|entry| entry.player_id == player_id)
    }

    /// Snapshot of the cached derived fields.
    pub fn derived(&self) -> SideDerived {
        SideDerived {
            score: self.score,
            player_stats: self.player_stats.clone(),
            team_stats: self.team_stats.clone(),
        }
    }

    /// Replace the cached derived fields with a fresh derivation.
    pub fn apply_derived(&mut self, derived: SideDerived) {
        self.score = derived.score;
        self.player_stats = derived.player_stats;
        self.team_stats = derived.team_stats;
    }
}

/// Cross-team audit timeline entry, kept for display and review. The
/// per-side ledgers remain the source of truth for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub side: Side,
    pub player_id: String,
    pub action_type: ActionType,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate root for a scheduled, live, or completed match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub league_id: String,
    pub format: MatchFormat,
    pub scheduled_at: DateTime<Utc>,
    pub venue: String,
    pub referee_id: String,
    pub stat_keeper_id: String,
    pub status: MatchStatus,
    /// Period marker; `None` until half-time is reached.
    pub period: Option<PeriodMark>,
    pub toss_winner: Option<Side>,
    /// Set only at completion; `None` for a tie.
    pub game_winner_team: Option<String>,
    pub team_a: TeamMatch,
    pub team_b: TeamMatch,
    /// Cross-team audit timeline.
    pub timeline: Vec<TimelineEntry>,
    /// Stats submission workflow, independent of the lifecycle status.
    pub workflow: StatsWorkflow,
    /// Whether this match decides the league title for its format.
    pub is_league_final: bool,
    /// Exactly-once guard for the aggregate updater.
    pub aggregated: bool,
}

impl Match {
    /// Create an upcoming match between two distinct teams.
    ///
    /// Returns a validation error when both sides reference the same team.
    pub fn new(
        league_id: impl Into<String>,
        format: MatchFormat,
        scheduled_at: DateTime<Utc>,
        venue: impl Into<String>,
        referee_id: impl Into<String>,
        stat_keeper_id: impl Into<String>,
        team_a: TeamMatch,
        team_b: TeamMatch,
    ) -> crate::error::LeagueResult<Self> {
        if team_a.team_id == team_b.team_id {
            return Err(crate::error::LeagueError::ValidationError(format!(
                "a match requires two distinct teams, got {} twice",
                team_a.team_id
            )));
        }
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            league_id: league_id.into(),
            format,
            scheduled_at,
            venue: venue.into(),
            referee_id: referee_id.into(),
            stat_keeper_id: stat_keeper_id.into(),
            status: MatchStatus::Upcoming,
            period: None,
            toss_winner: None,
            game_winner_team: None,
            team_a,
            team_b,
            timeline: Vec::new(),
            workflow: StatsWorkflow::default(),
            is_league_final: false,
            aggregated: false,
        })
    }

    pub fn side(&self, side: Side) -> &TeamMatch {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut TeamMatch {
        match side {
            Side::A => &mut self.team_a,
            Side::B => &mut self.team_b,
        }
    }

    /// Both sides' ledgers, own side first.
    pub fn ledgers(&self, side: Side) -> (&[Action], &[Action]) {
        (&self.side(side).player_actions, &self.side(side.opposing()).player_actions)
    }

    pub fn is_tied(&self) -> bool {
        self.team_a.score == self.team_b.score
    }
}
