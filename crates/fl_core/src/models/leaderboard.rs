//! League standings, one leaderboard per league.
//!
//! Mutated only by the aggregate updater when an approved match commits;
//! created lazily and never deleted while the league exists.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standings entry for one team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub team_id: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub points_scored: u32,
    pub points_against: u32,
    /// Denormalized for sort performance; must always equal
    /// `points_scored - points_against`.
    pub point_difference: i64,
    pub league_points: u32,
}

impl LeaderboardEntry {
    pub fn new(team_id: impl Into<String>) -> Self {
        Self { team_id: team_id.into(), ..Default::default() }
    }

    /// Fold one match result into this entry.
    pub fn record_result(
        &mut self,
        won: bool,
        drawn: bool,
        points_scored: u16,
        points_against: u16,
        league_points: u16,
    ) {
        if drawn {
            self.draws += 1;
        } else if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.points_scored += u32::from(points_scored);
        self.points_against += u32::from(points_against);
        self.point_difference = i64::from(self.points_scored) - i64::from(self.points_against);
        self.league_points += u32::from(league_points);
    }

    pub fn matches_played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }
}

/// Standings table for one league.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub league_id: String,
    pub entries: HashMap<String, LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new(league_id: impl Into<String>) -> Self {
        Self { league_id: league_id.into(), entries: HashMap::new() }
    }

    /// Entry for a team, created lazily on first contact.
    pub fn entry_mut(&mut self, team_id: &str) -> &mut LeaderboardEntry {
        self.entries
            .entry(team_id.to_string())
            .or_insert_with(|| LeaderboardEntry::new(team_id))
    }

    pub fn entry(&self, team_id: &str) -> Option<&LeaderboardEntry> {
        self.entries.get(team_id)
    }

    /// Standings sorted by league points, then point difference, then
    /// points scored. Team id breaks remaining ties for a stable order.
    pub fn standings(&self) -> Vec<&LeaderboardEntry> {
        let mut table: Vec<&LeaderboardEntry> = self.entries.values().collect();
        table.sort_by(|a, b| {
            b.league_points
                .cmp(&a.league_points)
                .then(b.point_difference.cmp(&a.point_difference))
                .then(b.points_scored.cmp(&a.points_scored))
                .then(a.team_id.cmp(&b.team_id))
        });
        table
    }
}
