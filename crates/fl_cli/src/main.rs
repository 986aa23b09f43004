//! Match-script runner.
//!
//! Replays a JSON match script through the league core end to end: toss,
//! actions, period changes, completion, and the stats approval workflow,
//! then prints the box score and the resulting league standings.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;

use fl_core::{
    ActionType, LeagueRules, LeagueService, LeagueStore, Match, MatchFormat, PeriodMark, Role,
    RosterEntry, Side, Team, TeamMatch,
};

#[derive(Parser)]
#[command(name = "fl_cli")]
#[command(about = "Replay a match script through the league core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a match script and print the box score and standings
    Replay {
        /// Input script JSON file path
        #[arg(long)]
        script: PathBuf,
    },
}

// ============================================================================
// Script format
// ============================================================================

#[derive(Debug, Deserialize)]
struct TeamScript {
    team_id: String,
    name: String,
    roster: Vec<RosterPlayer>,
}

#[derive(Debug, Deserialize)]
struct RosterPlayer {
    player_id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ScriptEvent {
    Toss { winning_side: Side },
    Action { side: Side, player_id: String, action_type: ActionType },
    Substitution { side: Side, player_id: String, active: bool },
    Period { next: PeriodMark },
    Complete {},
    Submit { actor_id: String },
    SendBack { actor_id: String, reason: String },
    Approve { actor_id: String },
}

#[derive(Debug, Deserialize)]
struct MatchScript {
    league_id: String,
    #[serde(default)]
    rules: Option<LeagueRules>,
    format: MatchFormat,
    venue: String,
    referee_id: String,
    stat_keeper_id: String,
    team_a: TeamScript,
    team_b: TeamScript,
    events: Vec<ScriptEvent>,
}

fn roster_entries(team: &TeamScript) -> Vec<RosterEntry> {
    team.roster
        .iter()
        .map(|p| RosterEntry {
            player_id: p.player_id.clone(),
            name: p.name.clone(),
            is_active: true,
        })
        .collect()
}

/// Replay a parsed script against a fresh store and return it for
/// inspection along with the match id.
fn run_script(script: &MatchScript) -> Result<(LeagueStore, String)> {
    let store = LeagueStore::new();
    store.register_team(Team::new(script.team_a.team_id.clone(), script.team_a.name.clone()));
    store.register_team(Team::new(script.team_b.team_id.clone(), script.team_b.name.clone()));
    if let Some(rules) = &script.rules {
        store.set_league_rules(&script.league_id, rules.clone());
    }

    let game = Match::new(
        script.league_id.clone(),
        script.format,
        chrono::Utc::now(),
        script.venue.clone(),
        script.referee_id.clone(),
        script.stat_keeper_id.clone(),
        TeamMatch::new(script.team_a.team_id.clone(), roster_entries(&script.team_a)),
        TeamMatch::new(script.team_b.team_id.clone(), roster_entries(&script.team_b)),
    )
    .map_err(|e| anyhow::anyhow!("invalid match setup: {e}"))?;
    let match_id = store.insert_match(game);
    tracing::info!(
        "replaying {} scripted events for match {}",
        script.events.len(),
        match_id
    );

    let service = LeagueService::new(&store);
    for (index, event) in script.events.iter().enumerate() {
        let step = || format!("script event #{index}");
        match event {
            ScriptEvent::Toss { winning_side } => {
                service.record_toss(&match_id, *winning_side).with_context(step)?;
            }
            ScriptEvent::Action { side, player_id, action_type } => {
                service
                    .record_action(&match_id, *side, player_id, *action_type)
                    .with_context(step)?;
            }
            ScriptEvent::Substitution { side, player_id, active } => {
                service
                    .set_player_active(&match_id, *side, player_id, *active)
                    .with_context(step)?;
            }
            ScriptEvent::Period { next } => {
                service.advance_period(&match_id, *next).with_context(step)?;
            }
            ScriptEvent::Complete {} => {
                service.complete_match(&match_id).with_context(step)?;
            }
            ScriptEvent::Submit { actor_id } => {
                service.submit_stats(&match_id, actor_id, Role::StatKeeper).with_context(step)?;
            }
            ScriptEvent::SendBack { actor_id, reason } => {
                service
                    .send_back_stats(&match_id, actor_id, Role::Referee, reason)
                    .with_context(step)?;
            }
            ScriptEvent::Approve { actor_id } => {
                service.approve_stats(&match_id, actor_id, Role::Referee).with_context(step)?;
            }
        }
    }

    Ok((store, match_id))
}

fn print_report(store: &LeagueStore, match_id: &str, league_id: &str) -> Result<()> {
    let service = LeagueService::new(store);
    let view = service
        .get_match_stats(match_id)
        .map_err(|e| anyhow::anyhow!("reading match stats: {e}"))?;

    println!("Match {match_id}");
    println!(
        "  {} {} - {} {}",
        view.team_a.team_id, view.team_a.derived.score, view.team_b.derived.score,
        view.team_b.team_id
    );
    println!("  status: {:?}, workflow: {}", view.status, view.workflow.label());

    for side in [&view.team_a, &view.team_b] {
        println!("  {}:", side.team_id);
        let mut players: Vec<_> = side.derived.player_stats.iter().collect();
        players.sort_by(|a, b| a.0.cmp(b.0));
        for (player_id, line) in players {
            println!(
                "    {player_id}: {} TD, {} XP, {} DTD, {} XPR, {} pts",
                line.touchdowns,
                line.extra_points,
                line.defensive_touchdowns,
                line.extra_point_returns,
                line.points
            );
        }
    }

    let standings = service
        .league_standings(league_id)
        .map_err(|e| anyhow::anyhow!("reading standings: {e}"))?;
    if !standings.is_empty() {
        println!("Standings for {league_id}:");
        println!("  {:<20} {:>3} {:>3} {:>3} {:>4} {:>4} {:>5} {:>4}", "team", "W", "D", "L",
            "PF", "PA", "diff", "pts");
        for entry in standings {
            println!(
                "  {:<20} {:>3} {:>3} {:>3} {:>4} {:>4} {:>5} {:>4}",
                entry.team_id,
                entry.wins,
                entry.draws,
                entry.losses,
                entry.points_scored,
                entry.points_against,
                entry.point_difference,
                entry.league_points
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Replay { script } => {
            let raw = std::fs::read_to_string(&script)
                .with_context(|| format!("reading {}", script.display()))?;
            let parsed: MatchScript =
                serde_json::from_str(&raw).with_context(|| format!("parsing {}", script.display()))?;
            if parsed.events.is_empty() {
                bail!("script has no events");
            }
            let (store, match_id) = run_script(&parsed)?;
            print_report(&store, &match_id, &parsed.league_id)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_script() -> serde_json::Value {
        json!({
            "league_id": "summer-2026",
            "format": "5v5",
            "venue": "Riverside Park",
            "referee_id": "ref-1",
            "stat_keeper_id": "keeper-1",
            "team_a": {
                "team_id": "team-red",
                "name": "Red",
                "roster": [
                    {"player_id": "a1", "name": "Ana"},
                    {"player_id": "a2", "name": "Aki"}
                ]
            },
            "team_b": {
                "team_id": "team-blue",
                "name": "Blue",
                "roster": [
                    {"player_id": "b1", "name": "Bo"},
                    {"player_id": "b2", "name": "Bea"}
                ]
            },
            "events": [
                {"toss": {"winning_side": "a"}},
                {"action": {"side": "a", "player_id": "a1", "action_type": "touchdown"}},
                {"action": {"side": "a", "player_id": "a1", "action_type": "extra_point_from_five"}},
                {"period": {"next": "half_time"}},
                {"period": {"next": "full_time"}},
                {"complete": {}},
                {"submit": {"actor_id": "keeper-1"}},
                {"approve": {"actor_id": "ref-1"}}
            ]
        })
    }

    #[test]
    fn test_replay_sample_script() {
        let script: MatchScript = serde_json::from_value(sample_script()).unwrap();
        let (store, match_id) = run_script(&script).unwrap();

        let service = LeagueService::new(&store);
        let view = service.get_match_stats(&match_id).unwrap();
        assert_eq!(view.team_a.derived.score, 7);
        assert!(view.aggregated);

        let standings = service.league_standings("summer-2026").unwrap();
        assert_eq!(standings[0].team_id, "team-red");
        assert_eq!(standings[0].league_points, 3);
    }

    #[test]
    fn test_replay_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.json");
        std::fs::write(&path, sample_script().to_string()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let script: MatchScript = serde_json::from_str(&raw).unwrap();
        let (store, match_id) = run_script(&script).unwrap();
        assert!(print_report(&store, &match_id, &script.league_id).is_ok());
    }

    #[test]
    fn test_script_fails_on_illegal_event_order() {
        let mut value = sample_script();
        // Completing before the toss is an invalid transition.
        value["events"] = json!([{"complete": {}}]);
        let script: MatchScript = serde_json::from_value(value).unwrap();
        assert!(run_script(&script).is_err());
    }
}
