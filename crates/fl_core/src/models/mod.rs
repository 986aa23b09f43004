pub mod action;
pub mod leaderboard;
pub mod match_record;
pub mod rules;
pub mod stats;
pub mod team;

pub use action::{Action, ActionType};
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use match_record::{
    Match, MatchFormat, MatchStatus, PeriodMark, RosterEntry, Side, TeamMatch, TimelineEntry,
};
pub use rules::LeagueRules;
pub use stats::{PlayerStatLine, SideDerived, TeamStatLine};
pub use team::{FormatRecord, Team, TeamOverallStats};
