//! # fl_core - Flag-Football League Match & Statistics Core
//!
//! This library implements the match lifecycle and statistics subsystem of
//! a recreational flag-football league platform: an append-only per-side
//! action ledger, a pure score/stats deriver, the match state machine, the
//! multi-role stats approval workflow, and the aggregate updater that folds
//! approved results into league standings and lifetime team records.
//!
//! ## Design
//! - The ledger is the single source of truth; `score`/stats are derived
//!   caches, recomputed synchronously on every append
//! - Match lifecycle and stats workflow are two independent state machines
//!   coupled only by a completion precondition
//! - Aggregation is exactly-once per match and safe to re-drive
//! - JSON API for easy integration with the surrounding HTTP layer

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod standings;
pub mod state;
pub mod workflow;

// Re-export main API surface
pub use api::league_json::{
    advance_period_json, approve_stats_json, complete_match_json, error_response_json,
    get_match_stats_json, league_standings_json, record_action_json, record_toss_json,
    send_back_stats_json, set_player_active_json, submit_stats_json,
};
pub use api::{CompletionView, LeagueService, MatchStateView, MatchStatsView, SideStatsView};
pub use error::{LeagueError, LeagueResult};

// Re-export model types
pub use models::{
    Action, ActionType, Leaderboard, LeaderboardEntry, LeagueRules, Match, MatchFormat,
    MatchStatus, PeriodMark, PlayerStatLine, RosterEntry, Side, SideDerived, Team, TeamMatch,
    TeamOverallStats, TeamStatLine,
};

// Re-export workflow and standings types
pub use standings::{CommitOutcome, TeamLeaderboardDelta, TeamStatsDelta};
pub use state::{global_store, LeagueStore, LEAGUE_STORE};
pub use workflow::{Role, StatsWorkflow, WorkflowState};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
