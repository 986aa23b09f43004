//! Score/stats deriver.
//!
//! Pure mapping from action ledgers to derived score and stat lines. This
//! is the one place scoring rules are applied and the correctness oracle
//! the rest of the system is tested against: full replay from an empty
//! ledger is the reference implementation, and the incremental fold must
//! agree with it.
//!
//! Deriving one side needs both ledgers because a safety recorded on the
//! opposing ledger credits this side's score and defensive counters.

use tracing::warn;

use crate::error::{LeagueError, LeagueResult};
use crate::models::{Action, ActionType, Match, Side, SideDerived};

/// Fold a single action into a side's derivation.
///
/// `on_own_ledger` says whether the action sits on the side being derived
/// or on the opposing ledger. Folding the N+1th action into the
/// derivation of the first N is equivalent to a full replay of N+1.
pub fn fold_action(derived: &mut SideDerived, action: &Action, on_own_ledger: bool) {
    let points = action.action_type.point_value();
    match (on_own_ledger, action.action_type.credits_opponent()) {
        // Own scoring action: credit the acting player and the side.
        (true, false) => {
            let line = derived.player_stats.entry(action.player_id.clone()).or_default();
            match action.action_type {
                ActionType::Touchdown => {
                    line.touchdowns += 1;
                    derived.team_stats.touchdowns += 1;
                }
                ActionType::ExtraPointFromFive
                | ActionType::ExtraPointFromTen
                | ActionType::ExtraPointFromTwenty => {
                    line.extra_points += 1;
                    derived.team_stats.extra_points += 1;
                }
                ActionType::DefensiveTouchdown => {
                    line.defensive_touchdowns += 1;
                    derived.team_stats.defensive_touchdowns += 1;
                }
                ActionType::ExtraPointReturn => {
                    line.extra_point_returns += 1;
                    derived.team_stats.extra_point_returns += 1;
                }
                ActionType::Safety => unreachable!("safety credits the opponent"),
            }
            line.points += points;
            derived.team_stats.points += points;
            derived.score += points;
        }
        // Safety on our own ledger: our ball-carrier was downed. The
        // points belong to the opposing side; we only record the concession.
        (true, true) => {
            derived.team_stats.safeties_conceded += 1;
        }
        // Safety on the opposing ledger: credit our defense. No individual
        // attribution; the ledger entry names the downed opponent.
        (false, true) => {
            derived.team_stats.safeties_forced += 1;
            derived.team_stats.points += points;
            derived.score += points;
        }
        // Opposing side's ordinary scoring action: nothing for us.
        (false, false) => {}
    }
}

/// Full replay: derive one side's score and stats from both ledgers.
///
/// Deterministic and total: the same ledgers always produce identical
/// output, and every action sequence is accepted.
pub fn derive_side(own: &[Action], opposing: &[Action]) -> SideDerived {
    let mut derived = SideDerived::default();
    for action in own {
        fold_action(&mut derived, action, true);
    }
    for action in opposing {
        fold_action(&mut derived, action, false);
    }
    derived
}

/// Recompute both sides' derived fields from their ledgers and refresh the
/// caches on the match.
pub fn rederive_match(game: &mut Match) {
    let derived_a = {
        let (own, opposing) = game.ledgers(Side::A);
        derive_side(own, opposing)
    };
    let derived_b = {
        let (own, opposing) = game.ledgers(Side::B);
        derive_side(own, opposing)
    };
    game.team_a.apply_derived(derived_a);
    game.team_b.apply_derived(derived_b);
}

/// Check the cached derived fields against a fresh replay.
///
/// A mismatch is a defect, not a user error: it is logged and reported as
/// `ConsistencyViolation` so the caller refuses the operation instead of
/// guessing which copy is right.
pub fn verify_consistency(game: &Match) -> LeagueResult<()> {
    for side in [Side::A, Side::B] {
        let (own, opposing) = game.ledgers(side);
        let replayed = derive_side(own, opposing);
        let cached = game.side(side).derived();
        if replayed != cached {
            warn!(
                "derived stats for match {} side {} disagree with ledger replay: cached score {} vs replayed {}",
                game.id,
                side.label(),
                cached.score,
                replayed.score
            );
            return Err(LeagueError::ConsistencyViolation {
                side: side.label().to_string(),
                detail: format!(
                    "cached score {} vs replayed {}",
                    cached.score, replayed.score
                ),
            });
        }
    }
    Ok(())
}
