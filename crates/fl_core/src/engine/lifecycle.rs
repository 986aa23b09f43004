//! Match state machine.
//!
//! Status advances `Upcoming -> Live -> Completed` and never backward.
//! Within `Live` the period marker cycles first half -> half-time ->
//! full-time -> overtime, with overtime gated on a tied score.

use crate::error::{LeagueError, LeagueResult};
use crate::models::{LeagueRules, Match, MatchStatus, PeriodMark, Side};

/// Final outcome of a completed match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    /// `None` for a tie.
    pub winner_team: Option<String>,
    pub score_a: u16,
    pub score_b: u16,
}

/// Record the coin-toss result, moving the match from `Upcoming` to `Live`.
///
/// Requires both rosters to be non-empty. A repeated toss fails with
/// `TossAlreadyRecorded`.
pub fn record_toss(game: &mut Match, winning_side: Side) -> LeagueResult<()> {
    match game.status {
        MatchStatus::Upcoming => {
            if game.team_a.roster.is_empty() || game.team_b.roster.is_empty() {
                return Err(LeagueError::EmptyRoster);
            }
            game.toss_winner = Some(winning_side);
            game.status = MatchStatus::Live;
            Ok(())
        }
        MatchStatus::Live | MatchStatus::Completed => {
            if game.toss_winner.is_some() {
                Err(LeagueError::TossAlreadyRecorded)
            } else {
                Err(LeagueError::InvalidTransition(format!(
                    "cannot record a toss in status {:?}",
                    game.status
                )))
            }
        }
    }
}

/// Advance the period marker within a live match.
///
/// The marker must be the exact successor of the current one; skipping or
/// reversing fails with `InvalidTransition`. Overtime additionally
/// requires the scores to be tied at full-time.
pub fn advance_period(game: &mut Match, next: PeriodMark) -> LeagueResult<()> {
    if game.status != MatchStatus::Live {
        return Err(LeagueError::InvalidTransition(format!(
            "cannot advance period in status {:?}",
            game.status
        )));
    }
    let expected = PeriodMark::successor(game.period);
    if expected != Some(next) {
        return Err(LeagueError::InvalidTransition(format!(
            "period {:?} cannot follow {:?}",
            next, game.period
        )));
    }
    if next == PeriodMark::Overtime && !game.is_tied() {
        return Err(LeagueError::OvertimeNotEligible {
            score_a: game.team_a.score,
            score_b: game.team_b.score,
        });
    }
    game.period = Some(next);
    Ok(())
}

/// Finish a live match: fix the winner, freeze derived stats, and move to
/// the terminal `Completed` status.
///
/// A tie resolves to `win = None` on both sides unless the league rules
/// disallow ties, in which case completion is refused with
/// `TieRequiresResolution`. Resolving the tie (overtime, replay) is the
/// caller's decision, never made silently here.
pub fn complete_match(game: &mut Match, rules: &LeagueRules) -> LeagueResult<MatchOutcome> {
    if game.status != MatchStatus::Live {
        return Err(LeagueError::InvalidTransition(format!(
            "cannot complete a match in status {:?}",
            game.status
        )));
    }

    let (score_a, score_b) = (game.team_a.score, game.team_b.score);
    let winner_team = if score_a == score_b {
        if !rules.allow_ties {
            return Err(LeagueError::TieRequiresResolution);
        }
        game.team_a.win = None;
        game.team_b.win = None;
        None
    } else {
        let a_won = score_a > score_b;
        game.team_a.win = Some(a_won);
        game.team_b.win = Some(!a_won);
        Some(if a_won { game.team_a.team_id.clone() } else { game.team_b.team_id.clone() })
    };

    game.game_winner_team = winner_team.clone();
    game.status = MatchStatus::Completed;
    Ok(MatchOutcome { winner_team, score_a, score_b })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::deriver::test_support::{live_match, roster, upcoming_match};
    use crate::engine::ledger;
    use crate::models::{ActionType, MatchFormat, TeamMatch};
    use chrono::Utc;

    fn score(game: &mut Match, side: Side, player: &str, points: ActionType) {
        ledger::append(game, side, player, points).unwrap();
    }

    #[test]
    fn test_toss_moves_match_live() {
        let mut game = upcoming_match();
        record_toss(&mut game, Side::B).unwrap();
        assert_eq!(game.status, MatchStatus::Live);
        assert_eq!(game.toss_winner, Some(Side::B));
    }

    #[test]
    fn test_repeated_toss_rejected() {
        let mut game = live_match();
        let err = record_toss(&mut game, Side::A).unwrap_err();
        assert_eq!(err, LeagueError::TossAlreadyRecorded);
    }

    #[test]
    fn test_toss_requires_rosters() {
        let mut game = Match::new(
            "league-1",
            MatchFormat::FiveVFive,
            Utc::now(),
            "Riverside Park",
            "ref-1",
            "keeper-1",
            TeamMatch::new("team-red", roster(&["a1"])),
            TeamMatch::new("team-blue", Vec::new()),
        )
        .unwrap();
        let err = record_toss(&mut game, Side::A).unwrap_err();
        assert_eq!(err, LeagueError::EmptyRoster);
        assert_eq!(game.status, MatchStatus::Upcoming);
    }

    #[test]
    fn test_period_must_follow_in_order() {
        let mut game = live_match();
        let err = advance_period(&mut game, PeriodMark::FullTime).unwrap_err();
        assert_eq!(err.kind(), "INVALID_TRANSITION");

        advance_period(&mut game, PeriodMark::HalfTime).unwrap();
        advance_period(&mut game, PeriodMark::FullTime).unwrap();

        // Reversing is just as illegal as skipping.
        let err = advance_period(&mut game, PeriodMark::HalfTime).unwrap_err();
        assert_eq!(err.kind(), "INVALID_TRANSITION");
    }

    #[test]
    fn test_overtime_requires_tied_score() {
        // 14-10 at full-time.
        let mut game = live_match();
        score(&mut game, Side::A, "a1", ActionType::Touchdown);
        score(&mut game, Side::A, "a1", ActionType::ExtraPointFromTen);
        score(&mut game, Side::A, "a2", ActionType::Touchdown);
        score(&mut game, Side::B, "b1", ActionType::Touchdown);
        score(&mut game, Side::B, "b1", ActionType::ExtraPointFromTwenty);
        score(&mut game, Side::B, "b2", ActionType::ExtraPointFromFive);
        assert_eq!((game.team_a.score, game.team_b.score), (14, 10));

        advance_period(&mut game, PeriodMark::HalfTime).unwrap();
        advance_period(&mut game, PeriodMark::FullTime).unwrap();
        let err = advance_period(&mut game, PeriodMark::Overtime).unwrap_err();
        assert_eq!(err, LeagueError::OvertimeNotEligible { score_a: 14, score_b: 10 });
    }

    #[test]
    fn test_overtime_reachable_when_tied() {
        let mut game = live_match();
        score(&mut game, Side::A, "a1", ActionType::Touchdown);
        score(&mut game, Side::B, "b1", ActionType::Touchdown);
        advance_period(&mut game, PeriodMark::HalfTime).unwrap();
        advance_period(&mut game, PeriodMark::FullTime).unwrap();
        advance_period(&mut game, PeriodMark::Overtime).unwrap();
        assert_eq!(game.period, Some(PeriodMark::Overtime));
    }

    #[test]
    fn test_completion_fixes_winner() {
        let mut game = live_match();
        score(&mut game, Side::A, "a1", ActionType::Touchdown);
        score(&mut game, Side::A, "a1", ActionType::ExtraPointFromFive);

        let outcome = complete_match(&mut game, &LeagueRules::default()).unwrap();
        assert_eq!(outcome.winner_team.as_deref(), Some("team-red"));
        assert_eq!((outcome.score_a, outcome.score_b), (7, 0));
        assert_eq!(game.status, MatchStatus::Completed);
        assert_eq!(game.game_winner_team.as_deref(), Some("team-red"));
        assert_eq!(game.team_a.win, Some(true));
        assert_eq!(game.team_b.win, Some(false));
    }

    #[test]
    fn test_tie_leaves_no_winner() {
        let mut game = live_match();
        let outcome = complete_match(&mut game, &LeagueRules::default()).unwrap();
        assert_eq!(outcome.winner_team, None);
        assert_eq!(game.team_a.win, None);
        assert_eq!(game.team_b.win, None);
        assert_eq!(game.game_winner_team, None);
    }

    #[test]
    fn test_tie_rejected_when_league_disallows() {
        let mut game = live_match();
        let rules = LeagueRules { allow_ties: false, ..Default::default() };
        let err = complete_match(&mut game, &rules).unwrap_err();
        assert_eq!(err, LeagueError::TieRequiresResolution);
        // Refused, not partially applied.
        assert_eq!(game.status, MatchStatus::Live);
        assert_eq!(game.team_a.win, None);
    }

    #[test]
    fn test_completion_is_terminal() {
        let mut game = live_match();
        complete_match(&mut game, &LeagueRules::default()).unwrap();
        let err = complete_match(&mut game, &LeagueRules::default()).unwrap_err();
        assert_eq!(err.kind(), "INVALID_TRANSITION");
    }
}
