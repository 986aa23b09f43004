//! In-memory record store and concurrency boundary.
//!
//! Each match lives behind its own `RwLock`: one logical writer per match
//! id, unlimited concurrent readers of the derived score/stats. Two
//! concurrent appends to the same match serialize on the write lock, so
//! read-modify-write on a ledger is atomic and entries are never dropped
//! or interleaved.
//!
//! The store owns only the records this core is responsible for: matches,
//! leaderboards, team documents, and per-league rules. Everything else
//! (users, payments, uploads) belongs to the surrounding CRUD layer.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{LeagueError, LeagueResult};
use crate::models::{Leaderboard, LeagueRules, Match, Team};

/// Shared handle to one record.
pub type Handle<T> = Arc<RwLock<T>>;

/// Global store singleton used by the JSON API layer.
pub static LEAGUE_STORE: Lazy<LeagueStore> = Lazy::new(LeagueStore::new);

/// Access the global store.
pub fn global_store() -> &'static LeagueStore {
    &LEAGUE_STORE
}

#[derive(Debug, Default)]
pub struct LeagueStore {
    matches: RwLock<HashMap<String, Handle<Match>>>,
    leaderboards: RwLock<HashMap<String, Handle<Leaderboard>>>,
    teams: RwLock<HashMap<String, Handle<Team>>>,
    league_rules: RwLock<HashMap<String, LeagueRules>>,
}

impl LeagueStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Matches
    // ========================

    /// Register a match and return its id.
    pub fn insert_match(&self, game: Match) -> String {
        let id = game.id.clone();
        self.matches
            .write()
            .expect("match registry lock poisoned")
            .insert(id.clone(), Arc::new(RwLock::new(game)));
        id
    }

    pub fn match_handle(&self, match_id: &str) -> LeagueResult<Handle<Match>> {
        self.matches
            .read()
            .expect("match registry lock poisoned")
            .get(match_id)
            .cloned()
            .ok_or_else(|| LeagueError::MatchNotFound(match_id.to_string()))
    }

    // ========================
    // Teams
    // ========================

    pub fn register_team(&self, team: Team) {
        self.teams
            .write()
            .expect("team registry lock poisoned")
            .insert(team.id.clone(), Arc::new(RwLock::new(team)));
    }

    pub fn team_handle(&self, team_id: &str) -> LeagueResult<Handle<Team>> {
        self.teams
            .read()
            .expect("team registry lock poisoned")
            .get(team_id)
            .cloned()
            .ok_or_else(|| LeagueError::TeamNotFound(team_id.to_string()))
    }

    // ========================
    // Leaderboards & rules
    // ========================

    /// Leaderboard for a league, created lazily on first access.
    pub fn leaderboard_handle(&self, league_id: &str) -> Handle<Leaderboard> {
        let mut boards = self.leaderboards.write().expect("leaderboard registry lock poisoned");
        boards
            .entry(league_id.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(Leaderboard::new(league_id))))
            .clone()
    }

    pub fn set_league_rules(&self, league_id: &str, rules: LeagueRules) {
        self.league_rules
            .write()
            .expect("league rules lock poisoned")
            .insert(league_id.to_string(), rules);
    }

    /// Rules for a league; the nominal default table when none were set.
    pub fn league_rules(&self, league_id: &str) -> LeagueRules {
        self.league_rules
            .read()
            .expect("league rules lock poisoned")
            .get(league_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::deriver::test_support::live_match;
    use crate::engine::ledger;
    use crate::models::{ActionType, Side};
    use std::thread;

    #[test]
    fn test_missing_records_are_transient_errors() {
        let store = LeagueStore::new();
        assert!(store.match_handle("nope").unwrap_err().is_transient());
        assert!(store.team_handle("nope").unwrap_err().is_transient());
    }

    #[test]
    fn test_leaderboard_created_lazily_and_shared() {
        let store = LeagueStore::new();
        let first = store.leaderboard_handle("league-1");
        let second = store.leaderboard_handle("league-1");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_league_rules_default_when_unset() {
        let store = LeagueStore::new();
        assert_eq!(store.league_rules("league-1"), LeagueRules::default());

        store.set_league_rules("league-1", LeagueRules { points_for_win: 2, ..Default::default() });
        assert_eq!(store.league_rules("league-1").points_for_win, 2);
    }

    #[test]
    fn test_concurrent_appends_serialize_per_match() {
        let store = LeagueStore::new();
        let match_id = store.insert_match(live_match());

        let mut workers = Vec::new();
        for _ in 0..8 {
            let handle = store.match_handle(&match_id).unwrap();
            workers.push(thread::spawn(move || {
                for _ in 0..10 {
                    let mut game = handle.write().expect("match lock poisoned");
                    ledger::append(&mut game, Side::A, "a1", ActionType::ExtraPointFromFive)
                        .unwrap();
                }
            }));
        }
        for worker in workers {
            worker.join().unwrap();
        }

        let handle = store.match_handle(&match_id).unwrap();
        let game = handle.read().expect("match lock poisoned");
        // No append dropped, no ledger corruption.
        assert_eq!(game.team_a.player_actions.len(), 80);
        assert_eq!(game.team_a.score, 80);
        let sequences: Vec<u32> =
            game.team_a.player_actions.iter().map(|a| a.sequence).collect();
        assert_eq!(sequences, (0..80).collect::<Vec<u32>>());
    }
}
