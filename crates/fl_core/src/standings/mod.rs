//! Aggregate updater: folds one completed, approved match into the league
//! leaderboard and both teams' lifetime records.
//!
//! `commit` is keyed by the match's `aggregated` marker and is safe to
//! re-drive: a second invocation for the same match is a reported no-op.
//! Both teams' updates are applied together under the caller's exclusive
//! section, so a half-updated leaderboard is never observable.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{LeagueError, LeagueResult};
use crate::models::{Leaderboard, LeagueRules, Match, MatchStatus, Side, Team};

/// What one commit added to a team's leaderboard entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamLeaderboardDelta {
    pub team_id: String,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub points_scored: u32,
    pub points_against: u32,
    pub league_points: u32,
}

/// What one commit added to a team's lifetime overall stats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStatsDelta {
    pub team_id: String,
    pub matches_played: u32,
    pub touchdowns: u32,
    pub points_scored: u32,
    pub points_against: u32,
    pub title_won: bool,
}

/// Result of an aggregation commit. `applied` is false when the match had
/// already been aggregated and nothing changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitOutcome {
    pub applied: bool,
    pub leaderboard: Vec<TeamLeaderboardDelta>,
    pub team_stats: Vec<TeamStatsDelta>,
}

/// Fold the match result into the leaderboard and lifetime stats.
///
/// Preconditions: match completed and workflow approved. The caller must
/// hold exclusive access to all four records for the duration of the call;
/// the store's service layer takes the corresponding locks in a fixed
/// order before invoking this.
pub fn commit(
    game: &mut Match,
    board: &mut Leaderboard,
    team_a: &mut Team,
    team_b: &mut Team,
    rules: &LeagueRules,
) -> LeagueResult<CommitOutcome> {
    if game.aggregated {
        info!("match {} already aggregated; commit is a no-op", game.id);
        return Ok(CommitOutcome::default());
    }
    if game.status != MatchStatus::Completed {
        return Err(LeagueError::MatchNotCompleted);
    }
    if !game.workflow.is_approved() {
        return Err(LeagueError::StatsNotApproved);
    }
    if team_a.id != game.team_a.team_id || team_b.id != game.team_b.team_id {
        return Err(LeagueError::ValidationError(format!(
            "commit called with teams {}/{} for match between {}/{}",
            team_a.id, team_b.id, game.team_a.team_id, game.team_b.team_id
        )));
    }

    let mut outcome = CommitOutcome { applied: true, ..Default::default() };
    for (side, team) in [(Side::A, &mut *team_a), (Side::B, &mut *team_b)] {
        let side_record = game.side(side);
        let opposing = game.side(side.opposing());
        let won = side_record.win == Some(true);
        let drawn = side_record.win.is_none();
        let league_points = rules.standings_points(won, drawn);

        board.entry_mut(&side_record.team_id).record_result(
            won,
            drawn,
            side_record.score,
            opposing.score,
            league_points,
        );
        outcome.leaderboard.push(TeamLeaderboardDelta {
            team_id: side_record.team_id.clone(),
            wins: u32::from(won),
            draws: u32::from(drawn),
            losses: u32::from(!won && !drawn),
            points_scored: u32::from(side_record.score),
            points_against: u32::from(opposing.score),
            league_points: u32::from(league_points),
        });

        let touchdowns = u32::from(side_record.team_stats.touchdowns)
            + u32::from(side_record.team_stats.defensive_touchdowns);
        let title_won = game.is_league_final && won;
        let stats = &mut team.overall_stats;
        stats.matches_played += 1;
        stats.touchdowns += touchdowns;
        stats.points_scored += u32::from(side_record.score);
        stats.points_against += u32::from(opposing.score);
        if team.leagues.insert(game.league_id.clone()) {
            stats.leagues_played += 1;
        }
        let record = stats.format_record_mut(game.format);
        if drawn {
            record.draws += 1;
        } else if won {
            record.wins += 1;
        } else {
            record.losses += 1;
        }
        if title_won {
            record.titles += 1;
        }
        outcome.team_stats.push(TeamStatsDelta {
            team_id: team.id.clone(),
            matches_played: 1,
            touchdowns,
            points_scored: u32::from(side_record.score),
            points_against: u32::from(opposing.score),
            title_won,
        });
    }

    game.aggregated = true;
    debug!("aggregation committed for match {} in league {}", game.id, game.league_id);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::deriver::test_support::live_match;
    use crate::engine::{ledger, lifecycle};
    use crate::models::ActionType;
    use crate::workflow::Role;

    /// Completed, approved 7-0 match for team-red.
    fn approved_match() -> Match {
        let mut game = live_match();
        ledger::append(&mut game, Side::A, "a1", ActionType::Touchdown).unwrap();
        ledger::append(&mut game, Side::A, "a1", ActionType::ExtraPointFromFive).unwrap();
        lifecycle::complete_match(&mut game, &LeagueRules::default()).unwrap();
        game.workflow.submit(game.status, "keeper-1", Role::StatKeeper).unwrap();
        game.workflow.approve("ref-1", Role::Referee).unwrap();
        game
    }

    fn teams() -> (Team, Team) {
        (Team::new("team-red", "Red"), Team::new("team-blue", "Blue"))
    }

    #[test]
    fn test_worked_example_commit() {
        let mut game = approved_match();
        let mut board = Leaderboard::new("league-1");
        let (mut red, mut blue) = teams();

        let outcome =
            commit(&mut game, &mut board, &mut red, &mut blue, &LeagueRules::default()).unwrap();
        assert!(outcome.applied);

        let red_entry = board.entry("team-red").unwrap();
        assert_eq!(red_entry.wins, 1);
        assert_eq!(red_entry.points_scored, 7);
        assert_eq!(red_entry.points_against, 0);
        assert_eq!(red_entry.point_difference, 7);
        assert_eq!(red_entry.league_points, 3);

        let blue_entry = board.entry("team-blue").unwrap();
        assert_eq!(blue_entry.losses, 1);
        assert_eq!(blue_entry.point_difference, -7);
        assert_eq!(blue_entry.league_points, 0);

        assert_eq!(red.overall_stats.matches_played, 1);
        assert_eq!(red.overall_stats.touchdowns, 1);
        assert_eq!(red.overall_stats.leagues_played, 1);
        assert_eq!(red.overall_stats.five_v_five.wins, 1);
        assert_eq!(blue.overall_stats.five_v_five.losses, 1);
        assert!(game.aggregated);
    }

    #[test]
    fn test_double_commit_is_noop() {
        let mut game = approved_match();
        let mut board = Leaderboard::new("league-1");
        let (mut red, mut blue) = teams();
        let rules = LeagueRules::default();

        commit(&mut game, &mut board, &mut red, &mut blue, &rules).unwrap();
        let second = commit(&mut game, &mut board, &mut red, &mut blue, &rules).unwrap();

        assert!(!second.applied);
        assert_eq!(board.entry("team-red").unwrap().wins, 1);
        assert_eq!(board.entry("team-red").unwrap().points_scored, 7);
        assert_eq!(red.overall_stats.matches_played, 1);
    }

    #[test]
    fn test_commit_requires_approval() {
        let mut game = live_match();
        ledger::append(&mut game, Side::A, "a1", ActionType::Touchdown).unwrap();
        lifecycle::complete_match(&mut game, &LeagueRules::default()).unwrap();

        let mut board = Leaderboard::new("league-1");
        let (mut red, mut blue) = teams();
        let err = commit(&mut game, &mut board, &mut red, &mut blue, &LeagueRules::default())
            .unwrap_err();
        assert_eq!(err, LeagueError::StatsNotApproved);
        assert!(board.entries.is_empty());
    }

    #[test]
    fn test_draw_uses_table_points() {
        let mut game = live_match();
        lifecycle::complete_match(&mut game, &LeagueRules::default()).unwrap();
        game.workflow.submit(game.status, "keeper-1", Role::StatKeeper).unwrap();
        game.workflow.approve("cap-1", Role::Captain).unwrap();

        let mut board = Leaderboard::new("league-1");
        let (mut red, mut blue) = teams();
        let rules = LeagueRules { points_for_draw: 2, ..Default::default() };
        commit(&mut game, &mut board, &mut red, &mut blue, &rules).unwrap();

        assert_eq!(board.entry("team-red").unwrap().draws, 1);
        assert_eq!(board.entry("team-red").unwrap().league_points, 2);
        assert_eq!(board.entry("team-blue").unwrap().league_points, 2);
        assert_eq!(red.overall_stats.five_v_five.draws, 1);
    }

    #[test]
    fn test_league_final_awards_title() {
        let mut game = approved_match();
        game.is_league_final = true;
        let mut board = Leaderboard::new("league-1");
        let (mut red, mut blue) = teams();

        let outcome =
            commit(&mut game, &mut board, &mut red, &mut blue, &LeagueRules::default()).unwrap();

        assert_eq!(red.overall_stats.five_v_five.titles, 1);
        assert_eq!(blue.overall_stats.five_v_five.titles, 0);
        assert!(outcome.team_stats[0].title_won);
        assert!(!outcome.team_stats[1].title_won);
    }

    #[test]
    fn test_leagues_played_counted_once() {
        let mut board = Leaderboard::new("league-1");
        let (mut red, mut blue) = teams();
        let rules = LeagueRules::default();

        for _ in 0..2 {
            let mut game = approved_match();
            commit(&mut game, &mut board, &mut red, &mut blue, &rules).unwrap();
        }

        assert_eq!(red.overall_stats.matches_played, 2);
        assert_eq!(red.overall_stats.leagues_played, 1);
    }
}
