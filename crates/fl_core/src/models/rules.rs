//! Table-driven league rules.
//!
//! Standings points are never hard-coded at a call site; the aggregate
//! updater reads whatever table the league configured.

use serde::{Deserialize, Serialize};

use super::match_record::MatchFormat;

/// Per-league configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueRules {
    pub points_for_win: u16,
    pub points_for_draw: u16,
    pub points_for_loss: u16,
    /// When false, a match may not complete while the scores are tied.
    pub allow_ties: bool,
    pub format: MatchFormat,
}

impl Default for LeagueRules {
    fn default() -> Self {
        Self {
            points_for_win: 3,
            points_for_draw: 1,
            points_for_loss: 0,
            allow_ties: true,
            format: MatchFormat::FiveVFive,
        }
    }
}

impl LeagueRules {
    /// Standings points for a result expressed as (won, drawn).
    pub fn standings_points(&self, won: bool, drawn: bool) -> u16 {
        if drawn {
            self.points_for_draw
        } else if won {
            self.points_for_win
        } else {
            self.points_for_loss
        }
    }
}
