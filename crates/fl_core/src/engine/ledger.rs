//! Append path for the per-side action ledgers.
//!
//! The ledger is append-only: no deletion, no in-place edits. Corrections
//! are ordinary new entries. Every successful append re-derives both sides
//! synchronously so callers always observe a score consistent with the
//! ledger they just extended.

use crate::engine::deriver;
use crate::error::{LeagueError, LeagueResult};
use crate::models::{Action, ActionType, Match, MatchStatus, Side, SideDerived, TimelineEntry};

/// Append an action to one side's ledger.
///
/// Validates phase (live matches only), roster membership, and that the
/// acting player is currently on the field. On success returns the side's
/// freshly derived score and stats.
pub fn append(
    game: &mut Match,
    side: Side,
    player_id: &str,
    action_type: ActionType,
) -> LeagueResult<SideDerived> {
    if game.status != MatchStatus::Live {
        return Err(LeagueError::InvalidMatchPhase { status: game.status });
    }

    let team = game.side(side);
    let entry = team
        .roster_entry(player_id)
        .ok_or_else(|| LeagueError::UnknownPlayer { player_id: player_id.to_string() })?;
    if !entry.is_active {
        return Err(LeagueError::PlayerInactive { player_id: player_id.to_string() });
    }

    let sequence = team.player_actions.len() as u32;
    let action = Action::new(player_id, action_type, sequence);
    game.timeline.push(TimelineEntry {
        side,
        player_id: player_id.to_string(),
        action_type,
        timestamp: action.timestamp,
    });
    game.side_mut(side).player_actions.push(action);

    deriver::rederive_match(game);
    Ok(game.side(side).derived())
}

/// Toggle whether a roster player is currently on the field.
///
/// Legal any time before completion; substitutions during a live match are
/// the normal case.
pub fn set_active(
    game: &mut Match,
    side: Side,
    player_id: &str,
    active: bool,
) -> LeagueResult<()> {
    if game.status == MatchStatus::Completed {
        return Err(LeagueError::InvalidMatchPhase { status: game.status });
    }
    let entry = game
        .side_mut(side)
        .roster_entry_mut(player_id)
        .ok_or_else(|| LeagueError::UnknownPlayer { player_id: player_id.to_string() })?;
    entry.is_active = active;
    Ok(())
}
