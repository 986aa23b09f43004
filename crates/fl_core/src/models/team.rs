//! Team records and lifetime aggregates.
//!
//! `TeamOverallStats` is a write-target of the aggregate updater only:
//! one contribution per match, guarded by the match's `aggregated` marker.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::match_record::MatchFormat;

/// Win/loss record and titles for one match format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatRecord {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub titles: u32,
}

/// Lifetime cumulative counters for a team, across leagues and seasons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamOverallStats {
    pub matches_played: u32,
    pub touchdowns: u32,
    pub points_scored: u32,
    pub points_against: u32,
    pub leagues_played: u32,
    pub five_v_five: FormatRecord,
    pub seven_v_seven: FormatRecord,
}

impl TeamOverallStats {
    pub fn format_record(&self, format: MatchFormat) -> &FormatRecord {
        match format {
            MatchFormat::FiveVFive => &self.five_v_five,
            MatchFormat::SevenVSeven => &self.seven_v_seven,
        }
    }

    pub fn format_record_mut(&mut self, format: MatchFormat) -> &mut FormatRecord {
        match format {
            MatchFormat::FiveVFive => &mut self.five_v_five,
            MatchFormat::SevenVSeven => &mut self.seven_v_seven,
        }
    }
}

/// A registered team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub overall_stats: TeamOverallStats,
    /// Leagues this team has appeared in; backs `leagues_played`.
    #[serde(default)]
    pub leagues: BTreeSet<String>,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            overall_stats: TeamOverallStats::default(),
            leagues: BTreeSet::new(),
        }
    }
}
