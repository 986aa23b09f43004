//! Error taxonomy for the league core.
//!
//! Every user-visible failure carries a stable machine-readable kind (see
//! [`LeagueError::kind`]) plus a human-readable reason. Callers dispatch on
//! the kind; the Display text is presentation only.

use thiserror::Error;

use crate::models::MatchStatus;

pub type LeagueResult<T> = std::result::Result<T, LeagueError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LeagueError {
    // Validation errors: malformed input, rejected before any state change.
    #[error("unknown action type: {0}")]
    UnknownActionType(String),

    #[error("player {player_id} is not on the roster for this side")]
    UnknownPlayer { player_id: String },

    #[error("both rosters must be non-empty before the toss")]
    EmptyRoster,

    #[error("validation error: {0}")]
    ValidationError(String),

    // State errors: the operation is well-formed but illegal in the current
    // phase. Rejected with no auto-correction.
    #[error("match does not accept this operation in status {status:?}")]
    InvalidMatchPhase { status: MatchStatus },

    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    #[error("coin toss has already been recorded")]
    TossAlreadyRecorded,

    #[error("overtime requires the scores to be tied at full-time ({score_a}-{score_b})")]
    OvertimeNotEligible { score_a: u16, score_b: u16 },

    #[error("match is tied and this league does not allow ties")]
    TieRequiresResolution,

    #[error("match must be completed before stats can be submitted")]
    MatchNotCompleted,

    #[error("stats must be approved before aggregation")]
    StatsNotApproved,

    #[error("player {player_id} is not currently on the field")]
    PlayerInactive { player_id: String },

    #[error("role {role} is not permitted to {operation}")]
    RoleNotPermitted { role: String, operation: String },

    // Consistency errors: defects, not user errors. Logged and refused.
    #[error("derived stats disagree with ledger replay for side {side}: {detail}")]
    ConsistencyViolation { side: String, detail: String },

    // Transient errors: the caller owns the retry policy.
    #[error("match not found: {0}")]
    MatchNotFound(String),

    #[error("league not found: {0}")]
    LeagueNotFound(String),

    #[error("team not found: {0}")]
    TeamNotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Stable error codes exposed to callers. These are part of the contract;
/// Display strings are not.
pub mod error_codes {
    pub const UNKNOWN_ACTION_TYPE: &str = "UNKNOWN_ACTION_TYPE";
    pub const UNKNOWN_PLAYER: &str = "UNKNOWN_PLAYER";
    pub const EMPTY_ROSTER: &str = "EMPTY_ROSTER";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const INVALID_MATCH_PHASE: &str = "INVALID_MATCH_PHASE";
    pub const INVALID_TRANSITION: &str = "INVALID_TRANSITION";
    pub const TOSS_ALREADY_RECORDED: &str = "TOSS_ALREADY_RECORDED";
    pub const OVERTIME_NOT_ELIGIBLE: &str = "OVERTIME_NOT_ELIGIBLE";
    pub const TIE_REQUIRES_RESOLUTION: &str = "TIE_REQUIRES_RESOLUTION";
    pub const MATCH_NOT_COMPLETED: &str = "MATCH_NOT_COMPLETED";
    pub const STATS_NOT_APPROVED: &str = "STATS_NOT_APPROVED";
    pub const PLAYER_INACTIVE: &str = "PLAYER_INACTIVE";
    pub const ROLE_NOT_PERMITTED: &str = "ROLE_NOT_PERMITTED";
    pub const CONSISTENCY_VIOLATION: &str = "CONSISTENCY_VIOLATION";
    pub const MATCH_NOT_FOUND: &str = "MATCH_NOT_FOUND";
    pub const LEAGUE_NOT_FOUND: &str = "LEAGUE_NOT_FOUND";
    pub const TEAM_NOT_FOUND: &str = "TEAM_NOT_FOUND";
    pub const SERIALIZATION: &str = "SERIALIZATION";
}

impl LeagueError {
    /// Stable machine-readable kind for this error.
    pub fn kind(&self) -> &'static str {
        use error_codes::*;
        match self {
            LeagueError::UnknownActionType(_) => UNKNOWN_ACTION_TYPE,
            LeagueError::UnknownPlayer { .. } => UNKNOWN_PLAYER,
            LeagueError::EmptyRoster => EMPTY_ROSTER,
            LeagueError::ValidationError(_) => VALIDATION_ERROR,
            LeagueError::InvalidMatchPhase { .. } => INVALID_MATCH_PHASE,
            LeagueError::InvalidTransition(_) => INVALID_TRANSITION,
            LeagueError::TossAlreadyRecorded => TOSS_ALREADY_RECORDED,
            LeagueError::OvertimeNotEligible { .. } => OVERTIME_NOT_ELIGIBLE,
            LeagueError::TieRequiresResolution => TIE_REQUIRES_RESOLUTION,
            LeagueError::MatchNotCompleted => MATCH_NOT_COMPLETED,
            LeagueError::StatsNotApproved => STATS_NOT_APPROVED,
            LeagueError::PlayerInactive { .. } => PLAYER_INACTIVE,
            LeagueError::RoleNotPermitted { .. } => ROLE_NOT_PERMITTED,
            LeagueError::ConsistencyViolation { .. } => CONSISTENCY_VIOLATION,
            LeagueError::MatchNotFound(_) => MATCH_NOT_FOUND,
            LeagueError::LeagueNotFound(_) => LEAGUE_NOT_FOUND,
            LeagueError::TeamNotFound(_) => TEAM_NOT_FOUND,
            LeagueError::Serialization(_) => SERIALIZATION,
        }
    }

    /// True for errors that indicate an internal defect rather than bad
    /// input or bad timing. These are logged and the operation refused.
    pub fn is_defect(&self) -> bool {
        matches!(self, LeagueError::ConsistencyViolation { .. })
    }

    /// True for errors a caller may reasonably retry (missing records,
    /// serialization hiccups). The core never retries on its own.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LeagueError::MatchNotFound(_)
                | LeagueError::LeagueNotFound(_)
                | LeagueError::TeamNotFound(_)
                | LeagueError::Serialization(_)
        )
    }
}

impl From<serde_json::Error> for LeagueError {
    fn from(err: serde_json::Error) -> Self {
        LeagueError::Serialization(err.to_string())
    }
}
