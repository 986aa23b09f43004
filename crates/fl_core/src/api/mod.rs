//! External interface of the core.
//!
//! `LeagueService` is the typed facade the surrounding request/response
//! layer calls; `league_json` wraps it in a JSON string API. The service
//! never authenticates: callers hand it a pre-validated role label and it
//! enforces workflow-role gating on top.

pub mod league_json;

use serde::{Deserialize, Serialize};

use crate::engine::{deriver, ledger, lifecycle};
use crate::error::{LeagueError, LeagueResult};
use crate::models::{
    Action, ActionType, LeaderboardEntry, Match, MatchStatus, PeriodMark, Side, SideDerived,
    TimelineEntry,
};
use crate::standings::{self, CommitOutcome};
use crate::state::LeagueStore;
use crate::workflow::{Role, WorkflowState};

/// Snapshot of a match's lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStateView {
    pub match_id: String,
    pub status: MatchStatus,
    pub period: Option<PeriodMark>,
    pub toss_winner: Option<Side>,
    pub score_a: u16,
    pub score_b: u16,
}

impl MatchStateView {
    fn from_match(game: &Match) -> Self {
        Self {
            match_id: game.id.clone(),
            status: game.status,
            period: game.period,
            toss_winner: game.toss_winner,
            score_a: game.team_a.score,
            score_b: game.team_b.score,
        }
    }
}

/// Result of completing a match: the winner and the frozen final stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionView {
    pub match_id: String,
    pub winner_team: Option<String>,
    pub score_a: u16,
    pub score_b: u16,
    pub team_a: SideDerived,
    pub team_b: SideDerived,
}

/// One side's ledger and derived stats, for review surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideStatsView {
    pub team_id: String,
    pub ledger: Vec<Action>,
    pub derived: SideDerived,
    pub win: Option<bool>,
}

/// Read-only view of a match: ledgers, derived stats, workflow state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStatsView {
    pub match_id: String,
    pub status: MatchStatus,
    pub period: Option<PeriodMark>,
    pub workflow: WorkflowState,
    pub team_a: SideStatsView,
    pub team_b: SideStatsView,
    pub timeline: Vec<TimelineEntry>,
    pub aggregated: bool,
}

/// Typed service over a `LeagueStore`.
pub struct LeagueService<'a> {
    store: &'a LeagueStore,
}

impl<'a> LeagueService<'a> {
    pub fn new(store: &'a LeagueStore) -> Self {
        Self { store }
    }

    /// Append an in-game action and return the side's derived score/stats.
    pub fn record_action(
        &self,
        match_id: &str,
        side: Side,
        player_id: &str,
        action_type: ActionType,
    ) -> LeagueResult<SideDerived> {
        let handle = self.store.match_handle(match_id)?;
        let mut game = handle.write().expect("match lock poisoned");
        ledger::append(&mut game, side, player_id, action_type)
    }

    /// Toggle whether a roster player is on the field.
    pub fn set_player_active(
        &self,
        match_id: &str,
        side: Side,
        player_id: &str,
        active: bool,
    ) -> LeagueResult<()> {
        let handle = self.store.match_handle(match_id)?;
        let mut game = handle.write().expect("match lock poisoned");
        ledger::set_active(&mut game, side, player_id, active)
    }

    /// Record the coin toss, moving the match live.
    pub fn record_toss(&self, match_id: &str, winning_side: Side) -> LeagueResult<MatchStateView> {
        let handle = self.store.match_handle(match_id)?;
        let mut game = handle.write().expect("match lock poisoned");
        lifecycle::record_toss(&mut game, winning_side)?;
        Ok(MatchStateView::from_match(&game))
    }

    /// Advance the period marker (half-time, full-time, overtime).
    pub fn advance_period(
        &self,
        match_id: &str,
        next_period: PeriodMark,
    ) -> LeagueResult<MatchStateView> {
        let handle = self.store.match_handle(match_id)?;
        let mut game = handle.write().expect("match lock poisoned");
        lifecycle::advance_period(&mut game, next_period)?;
        Ok(MatchStateView::from_match(&game))
    }

    /// Finish the match and freeze its derived stats.
    pub fn complete_match(&self, match_id: &str) -> LeagueResult<CompletionView> {
        let handle = self.store.match_handle(match_id)?;
        let mut game = handle.write().expect("match lock poisoned");
        let rules = self.store.league_rules(&game.league_id);
        let outcome = lifecycle::complete_match(&mut game, &rules)?;
        Ok(CompletionView {
            match_id: game.id.clone(),
            winner_team: outcome.winner_team,
            score_a: outcome.score_a,
            score_b: outcome.score_b,
            team_a: game.team_a.derived(),
            team_b: game.team_b.derived(),
        })
    }

    /// Submit the completed match's derived stats for review.
    pub fn submit_stats(
        &self,
        match_id: &str,
        actor_id: &str,
        role: Role,
    ) -> LeagueResult<WorkflowState> {
        let handle = self.store.match_handle(match_id)?;
        let mut game = handle.write().expect("match lock poisoned");
        let status = game.status;
        game.workflow.submit(status, actor_id, role)?;
        Ok(game.workflow.state.clone())
    }

    /// Send a pending submission back to the stat-keeper with feedback.
    pub fn send_back_stats(
        &self,
        match_id: &str,
        actor_id: &str,
        role: Role,
        reason: &str,
    ) -> LeagueResult<WorkflowState> {
        let handle = self.store.match_handle(match_id)?;
        let mut game = handle.write().expect("match lock poisoned");
        game.workflow.send_back(actor_id, role, reason)?;
        Ok(game.workflow.state.clone())
    }

    /// Approve the pending submission and fold the match into standings.
    ///
    /// Approval and aggregation happen under the match's write lock, with
    /// the leaderboard and both team documents locked for the duration of
    /// the commit: either both teams' updates land or neither does.
    /// Safe to re-drive: a match that is already approved and aggregated
    /// yields a no-op outcome with `applied = false`.
    pub fn approve_stats(
        &self,
        match_id: &str,
        actor_id: &str,
        role: Role,
    ) -> LeagueResult<CommitOutcome> {
        if !role.may_review() {
            return Err(LeagueError::RoleNotPermitted {
                role: role.label().to_string(),
                operation: "approve stats".to_string(),
            });
        }

        let handle = self.store.match_handle(match_id)?;
        let mut game = handle.write().expect("match lock poisoned");

        // A ledger/derived divergence is a defect; refuse rather than make
        // a wrong number authoritative.
        deriver::verify_consistency(&game)?;

        // Resolve every record the commit touches before mutating anything.
        let board_handle = self.store.leaderboard_handle(&game.league_id);
        let team_a_handle = self.store.team_handle(&game.team_a.team_id)?;
        let team_b_handle = self.store.team_handle(&game.team_b.team_id)?;
        let rules = self.store.league_rules(&game.league_id);

        if !game.workflow.is_approved() {
            game.workflow.approve(actor_id, role)?;
        }

        let mut board = board_handle.write().expect("leaderboard lock poisoned");
        // Team locks are taken in id order so concurrent commits for
        // matches sharing teams cannot deadlock.
        let a_first = game.team_a.team_id <= game.team_b.team_id;
        let (first_handle, second_handle) =
            if a_first { (&team_a_handle, &team_b_handle) } else { (&team_b_handle, &team_a_handle) };
        let mut first = first_handle.write().expect("team lock poisoned");
        let mut second = second_handle.write().expect("team lock poisoned");
        let (team_a, team_b) =
            if a_first { (&mut *first, &mut *second) } else { (&mut *second, &mut *first) };

        standings::commit(&mut game, &mut board, team_a, team_b, &rules)
    }

    /// Read-only view of a match's ledger, derived stats, and workflow.
    pub fn get_match_stats(&self, match_id: &str) -> LeagueResult<MatchStatsView> {
        let handle = self.store.match_handle(match_id)?;
        let game = handle.read().expect("match lock poisoned");
        Ok(MatchStatsView {
            match_id: game.id.clone(),
            status: game.status,
            period: game.period,
            workflow: game.workflow.state.clone(),
            team_a: SideStatsView {
                team_id: game.team_a.team_id.clone(),
                ledger: game.team_a.player_actions.clone(),
                derived: game.team_a.derived(),
                win: game.team_a.win,
            },
            team_b: SideStatsView {
                team_id: game.team_b.team_id.clone(),
                ledger: game.team_b.player_actions.clone(),
                derived: game.team_b.derived(),
                win: game.team_b.win,
            },
            timeline: game.timeline.clone(),
            aggregated: game.aggregated,
        })
    }

    /// Sorted standings for a league.
    pub fn league_standings(&self, league_id: &str) -> LeagueResult<Vec<LeaderboardEntry>> {
        let board_handle = self.store.leaderboard_handle(league_id);
        let board = board_handle.read().expect("leaderboard lock poisoned");
        Ok(board.standings().into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::deriver::test_support::upcoming_match;
    use crate::models::Team;

    fn seeded_store() -> (LeagueStore, String) {
        let store = LeagueStore::new();
        store.register_team(Team::new("team-red", "Red"));
        store.register_team(Team::new("team-blue", "Blue"));
        let match_id = store.insert_match(upcoming_match());
        (store, match_id)
    }

    fn play_to_completion(service: &LeagueService, match_id: &str) {
        service.record_toss(match_id, Side::A).unwrap();
        service.record_action(match_id, Side::A, "a1", ActionType::Touchdown).unwrap();
        service.record_action(match_id, Side::A, "a1", ActionType::ExtraPointFromFive).unwrap();
        service.advance_period(match_id, PeriodMark::HalfTime).unwrap();
        service.advance_period(match_id, PeriodMark::FullTime).unwrap();
        let completion = service.complete_match(match_id).unwrap();
        assert_eq!(completion.winner_team.as_deref(), Some("team-red"));
        assert_eq!((completion.score_a, completion.score_b), (7, 0));
    }

    #[test]
    fn test_full_match_to_standings_flow() {
        let (store, match_id) = seeded_store();
        let service = LeagueService::new(&store);

        play_to_completion(&service, &match_id);

        let state = service.submit_stats(&match_id, "keeper-1", Role::StatKeeper).unwrap();
        assert_eq!(state, WorkflowState::Submitted);

        let outcome = service.approve_stats(&match_id, "ref-1", Role::Referee).unwrap();
        assert!(outcome.applied);

        let table = service.league_standings("league-1").unwrap();
        assert_eq!(table[0].team_id, "team-red");
        assert_eq!(table[0].wins, 1);
        assert_eq!(table[0].league_points, 3);
        assert_eq!(table[1].team_id, "team-blue");
        assert_eq!(table[1].losses, 1);
    }

    #[test]
    fn test_approve_is_idempotent_on_leaderboard() {
        let (store, match_id) = seeded_store();
        let service = LeagueService::new(&store);
        play_to_completion(&service, &match_id);
        service.submit_stats(&match_id, "keeper-1", Role::StatKeeper).unwrap();

        service.approve_stats(&match_id, "ref-1", Role::Referee).unwrap();
        let second = service.approve_stats(&match_id, "ref-1", Role::Referee).unwrap();
        assert!(!second.applied);

        let table = service.league_standings("league-1").unwrap();
        assert_eq!(table[0].wins, 1);
        assert_eq!(table[0].points_scored, 7);
    }

    #[test]
    fn test_send_back_loop_commits_once() {
        let (store, match_id) = seeded_store();
        let service = LeagueService::new(&store);
        play_to_completion(&service, &match_id);

        for _ in 0..2 {
            service.submit_stats(&match_id, "keeper-1", Role::StatKeeper).unwrap();
            let state = service
                .send_back_stats(&match_id, "cap-1", Role::Captain, "check the extra point")
                .unwrap();
            assert!(matches!(state, WorkflowState::SentBack { .. }));
        }
        service.submit_stats(&match_id, "keeper-1", Role::StatKeeper).unwrap();
        let outcome = service.approve_stats(&match_id, "cap-1", Role::Captain).unwrap();
        assert!(outcome.applied);

        let table = service.league_standings("league-1").unwrap();
        assert_eq!(table[0].wins, 1);
        assert_eq!(table[0].matches_played(), 1);
    }

    #[test]
    fn test_submission_gated_on_completion() {
        let (store, match_id) = seeded_store();
        let service = LeagueService::new(&store);
        service.record_toss(&match_id, Side::A).unwrap();

        let err = service.submit_stats(&match_id, "keeper-1", Role::StatKeeper).unwrap_err();
        assert_eq!(err, LeagueError::MatchNotCompleted);
    }

    #[test]
    fn test_unapproved_match_never_reaches_leaderboard() {
        let (store, match_id) = seeded_store();
        let service = LeagueService::new(&store);
        play_to_completion(&service, &match_id);
        service.submit_stats(&match_id, "keeper-1", Role::StatKeeper).unwrap();

        // Visible for review, absent from standings.
        let view = service.get_match_stats(&match_id).unwrap();
        assert_eq!(view.workflow, WorkflowState::Submitted);
        assert_eq!(view.team_a.derived.score, 7);
        let table = service.league_standings("league-1").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_viewer_cannot_approve() {
        let (store, match_id) = seeded_store();
        let service = LeagueService::new(&store);
        play_to_completion(&service, &match_id);
        service.submit_stats(&match_id, "keeper-1", Role::StatKeeper).unwrap();

        let err = service.approve_stats(&match_id, "viewer-1", Role::Viewer).unwrap_err();
        assert_eq!(err.kind(), "ROLE_NOT_PERMITTED");
    }

    #[test]
    fn test_unknown_match_is_transient() {
        let store = LeagueStore::new();
        let service = LeagueService::new(&store);
        let err = service.get_match_stats("missing").unwrap_err();
        assert!(err.is_transient());
    }
}
