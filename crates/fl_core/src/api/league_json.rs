//! JSON string API over the global store.
//!
//! The HTTP layer (out of scope here) hands request bodies straight to
//! these functions and returns the response strings. Every request carries
//! a `schema_version`; every error maps to a stable kind via
//! [`error_response_json`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::{CompletionView, LeagueService, MatchStatsView, MatchStateView};
use crate::error::{LeagueError, LeagueResult};
use crate::models::{ActionType, LeaderboardEntry, PeriodMark, Side, SideDerived};
use crate::standings::CommitOutcome;
use crate::state::global_store;
use crate::workflow::{Role, WorkflowState};

fn check_schema_version(found: u8) -> LeagueResult<()> {
    if found != crate::SCHEMA_VERSION {
        return Err(LeagueError::ValidationError(format!(
            "unsupported schema_version {found}, expected {}",
            crate::SCHEMA_VERSION
        )));
    }
    Ok(())
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RecordActionRequest {
    pub schema_version: u8,
    pub match_id: String,
    pub side: Side,
    pub player_id: String,
    /// Wire name of the action type; unknown names are rejected with
    /// `UNKNOWN_ACTION_TYPE` rather than a generic parse error.
    pub action_type: String,
}

#[derive(Debug, Deserialize)]
pub struct SetPlayerActiveRequest {
    pub schema_version: u8,
    pub match_id: String,
    pub side: Side,
    pub player_id: String,
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct RecordTossRequest {
    pub schema_version: u8,
    pub match_id: String,
    pub winning_side: Side,
}

#[derive(Debug, Deserialize)]
pub struct AdvancePeriodRequest {
    pub schema_version: u8,
    pub match_id: String,
    pub next_period: PeriodMark,
}

#[derive(Debug, Deserialize)]
pub struct CompleteMatchRequest {
    pub schema_version: u8,
    pub match_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitStatsRequest {
    pub schema_version: u8,
    pub match_id: String,
    pub actor_id: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct ApproveStatsRequest {
    pub schema_version: u8,
    pub match_id: String,
    pub actor_id: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct SendBackStatsRequest {
    pub schema_version: u8,
    pub match_id: String,
    pub actor_id: String,
    pub role: Role,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct GetMatchStatsRequest {
    pub schema_version: u8,
    pub match_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LeagueStandingsRequest {
    pub schema_version: u8,
    pub league_id: String,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RecordActionResponse {
    pub schema_version: u8,
    pub match_id: String,
    pub side: Side,
    pub score: u16,
    pub stats: SideDerived,
}

#[derive(Debug, Serialize)]
pub struct MatchStateResponse {
    pub schema_version: u8,
    pub state: MatchStateView,
}

#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub schema_version: u8,
    pub completion: CompletionView,
}

#[derive(Debug, Serialize)]
pub struct WorkflowStateResponse {
    pub schema_version: u8,
    pub match_id: String,
    pub workflow: WorkflowState,
}

#[derive(Debug, Serialize)]
pub struct ApproveStatsResponse {
    pub schema_version: u8,
    pub match_id: String,
    pub outcome: CommitOutcome,
}

#[derive(Debug, Serialize)]
pub struct MatchStatsResponse {
    pub schema_version: u8,
    pub stats: MatchStatsView,
}

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub schema_version: u8,
    pub league_id: String,
    pub standings: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

/// Stable error envelope for the HTTP layer: `{"error": {"kind", "message"}}`.
pub fn error_response_json(err: &LeagueError) -> String {
    let body = ErrorResponse {
        error: ErrorBody { kind: err.kind().to_string(), message: err.to_string() },
    };
    serde_json::to_string(&body).unwrap_or_else(|_| {
        format!("{{\"error\":{{\"kind\":\"{}\",\"message\":\"serialization failed\"}}}}", err.kind())
    })
}

// ============================================================================
// Operations
// ============================================================================

pub fn record_action_json(request_json: &str) -> LeagueResult<String> {
    let request: RecordActionRequest = serde_json::from_str(request_json)?;
    check_schema_version(request.schema_version)?;
    let action_type = ActionType::parse(&request.action_type).ok_or_else(|| {
        warn!("rejecting unknown action type: {}", request.action_type);
        LeagueError::UnknownActionType(request.action_type.clone())
    })?;

    let service = LeagueService::new(global_store());
    let derived =
        service.record_action(&request.match_id, request.side, &request.player_id, action_type)?;
    debug!(
        "recorded {} by player {} in match {} (score now {})",
        action_type.code(),
        request.player_id,
        request.match_id,
        derived.score
    );
    let response = RecordActionResponse {
        schema_version: crate::SCHEMA_VERSION,
        match_id: request.match_id,
        side: request.side,
        score: derived.score,
        stats: derived,
    };
    Ok(serde_json::to_string(&response)?)
}

pub fn set_player_active_json(request_json: &str) -> LeagueResult<String> {
    let request: SetPlayerActiveRequest = serde_json::from_str(request_json)?;
    check_schema_version(request.schema_version)?;
    let service = LeagueService::new(global_store());
    service.set_player_active(&request.match_id, request.side, &request.player_id, request.active)?;
    let state = service.get_match_stats(&request.match_id)?;
    Ok(serde_json::to_string(&MatchStatsResponse {
        schema_version: crate::SCHEMA_VERSION,
        stats: state,
    })?)
}

pub fn record_toss_json(request_json: &str) -> LeagueResult<String> {
    let request: RecordTossRequest = serde_json::from_str(request_json)?;
    check_schema_version(request.schema_version)?;
    let service = LeagueService::new(global_store());
    let state = service.record_toss(&request.match_id, request.winning_side)?;
    info!("toss recorded for match {}, match is live", request.match_id);
    Ok(serde_json::to_string(&MatchStateResponse { schema_version: crate::SCHEMA_VERSION, state })?)
}

pub fn advance_period_json(request_json: &str) -> LeagueResult<String> {
    let request: AdvancePeriodRequest = serde_json::from_str(request_json)?;
    check_schema_version(request.schema_version)?;
    let service = LeagueService::new(global_store());
    let state = service.advance_period(&request.match_id, request.next_period)?;
    Ok(serde_json::to_string(&MatchStateResponse { schema_version: crate::SCHEMA_VERSION, state })?)
}

pub fn complete_match_json(request_json: &str) -> LeagueResult<String> {
    let request: CompleteMatchRequest = serde_json::from_str(request_json)?;
    check_schema_version(request.schema_version)?;
    let service = LeagueService::new(global_store());
    let completion = service.complete_match(&request.match_id)?;
    info!(
        "match {} completed, winner: {}",
        request.match_id,
        completion.winner_team.as_deref().unwrap_or("tie")
    );
    Ok(serde_json::to_string(&CompletionResponse {
        schema_version: crate::SCHEMA_VERSION,
        completion,
    })?)
}

pub fn submit_stats_json(request_json: &str) -> LeagueResult<String> {
    let request: SubmitStatsRequest = serde_json::from_str(request_json)?;
    check_schema_version(request.schema_version)?;
    let service = LeagueService::new(global_store());
    let workflow = service.submit_stats(&request.match_id, &request.actor_id, request.role)?;
    info!("stats for match {} submitted for review by {}", request.match_id, request.actor_id);
    Ok(serde_json::to_string(&WorkflowStateResponse {
        schema_version: crate::SCHEMA_VERSION,
        match_id: request.match_id,
        workflow,
    })?)
}

pub fn approve_stats_json(request_json: &str) -> LeagueResult<String> {
    let request: ApproveStatsRequest = serde_json::from_str(request_json)?;
    check_schema_version(request.schema_version)?;
    let service = LeagueService::new(global_store());
    let outcome = service.approve_stats(&request.match_id, &request.actor_id, request.role)?;
    info!(
        "stats for match {} approved by {} (aggregation applied: {})",
        request.match_id, request.actor_id, outcome.applied
    );
    Ok(serde_json::to_string(&ApproveStatsResponse {
        schema_version: crate::SCHEMA_VERSION,
        match_id: request.match_id,
        outcome,
    })?)
}

pub fn send_back_stats_json(request_json: &str) -> LeagueResult<String> {
    let request: SendBackStatsRequest = serde_json::from_str(request_json)?;
    check_schema_version(request.schema_version)?;
    let service = LeagueService::new(global_store());
    let workflow = service.send_back_stats(
        &request.match_id,
        &request.actor_id,
        request.role,
        &request.reason,
    )?;
    info!("stats for match {} sent back for revision by {}", request.match_id, request.actor_id);
    Ok(serde_json::to_string(&WorkflowStateResponse {
        schema_version: crate::SCHEMA_VERSION,
        match_id: request.match_id,
        workflow,
    })?)
}

pub fn get_match_stats_json(request_json: &str) -> LeagueResult<String> {
    let request: GetMatchStatsRequest = serde_json::from_str(request_json)?;
    check_schema_version(request.schema_version)?;
    let service = LeagueService::new(global_store());
    let stats = service.get_match_stats(&request.match_id)?;
    Ok(serde_json::to_string(&MatchStatsResponse { schema_version: crate::SCHEMA_VERSION, stats })?)
}

pub fn league_standings_json(request_json: &str) -> LeagueResult<String> {
    let request: LeagueStandingsRequest = serde_json::from_str(request_json)?;
    check_schema_version(request.schema_version)?;
    let service = LeagueService::new(global_store());
    let standings = service.league_standings(&request.league_id)?;
    Ok(serde_json::to_string(&StandingsResponse {
        schema_version: crate::SCHEMA_VERSION,
        league_id: request.league_id,
        standings,
    })?)
}
