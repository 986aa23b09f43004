//! Derived statistics. Never independently authored: everything in this
//! module is computed from a side's action ledger by the deriver.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-player rolled-up counters for one match side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatLine {
    pub touchdowns: u16,
    pub extra_points: u16,
    pub defensive_touchdowns: u16,
    pub extra_point_returns: u16,
    pub points: u16,
}

/// Side-level rolled-up counters for one match side.
///
/// `safeties_forced` counts safeties credited from the opposing ledger;
/// `safeties_conceded` counts safeties recorded against this side's own
/// ball-carriers. Neither is attributed to an individual defender.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStatLine {
    pub touchdowns: u16,
    pub extra_points: u16,
    pub defensive_touchdowns: u16,
    pub extra_point_returns: u16,
    pub safeties_forced: u16,
    pub safeties_conceded: u16,
    pub points: u16,
}

/// Output of deriving one side: the current score plus per-player and
/// side-level stat lines, keyed by roster player id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideDerived {
    pub score: u16,
    pub player_stats: HashMap<String, PlayerStatLine>,
    pub team_stats: TeamStatLine,
}

impl SideDerived {
    pub fn stat_line(&self, player_id: &str) -> Option<&PlayerStatLine> {
        self.player_stats.get(player_id)
    }
}
