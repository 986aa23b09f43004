//! Match engine: action ledger, score/stats deriver, and the match state
//! machine. The deriver is pure; the ledger and lifecycle modules mutate a
//! `Match` in place and are serialized per match by the store.

pub mod deriver;
pub mod ledger;
pub mod lifecycle;

pub use lifecycle::MatchOutcome;
