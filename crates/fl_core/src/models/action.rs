//! Ledger entries and the fixed action-type enumeration.
//!
//! The point table lives here and nowhere else; the deriver reads it, the
//! rest of the system only ever sees derived totals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed enumeration of recordable in-game actions.
///
/// Extra points are keyed by the distance of the conversion attempt
/// (5/10/20-yard line). A `Safety` is recorded on the ledger of the side
/// whose ball-carrier was downed; its points credit the opposing side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Touchdown,
    ExtraPointFromFive,
    ExtraPointFromTen,
    ExtraPointFromTwenty,
    DefensiveTouchdown,
    ExtraPointReturn,
    Safety,
}

impl ActionType {
    /// Points awarded for this action.
    pub fn point_value(&self) -> u16 {
        match self {
            ActionType::Touchdown => 6,
            ActionType::ExtraPointFromFive => 1,
            ActionType::ExtraPointFromTen => 2,
            ActionType::ExtraPointFromTwenty => 3,
            ActionType::DefensiveTouchdown => 6,
            ActionType::ExtraPointReturn => 2,
            ActionType::Safety => 2,
        }
    }

    /// Whether the points land on the opposing side's score rather than the
    /// acting side's.
    pub fn credits_opponent(&self) -> bool {
        matches!(self, ActionType::Safety)
    }

    /// Canonical wire name (matches the serde representation).
    pub fn code(&self) -> &'static str {
        match self {
            ActionType::Touchdown => "touchdown",
            ActionType::ExtraPointFromFive => "extra_point_from_five",
            ActionType::ExtraPointFromTen => "extra_point_from_ten",
            ActionType::ExtraPointFromTwenty => "extra_point_from_twenty",
            ActionType::DefensiveTouchdown => "defensive_touchdown",
            ActionType::ExtraPointReturn => "extra_point_return",
            ActionType::Safety => "safety",
        }
    }

    /// Parse a wire name back into an action type.
    pub fn parse(s: &str) -> Option<ActionType> {
        match s {
            "touchdown" => Some(ActionType::Touchdown),
            "extra_point_from_five" => Some(ActionType::ExtraPointFromFive),
            "extra_point_from_ten" => Some(ActionType::ExtraPointFromTen),
            "extra_point_from_twenty" => Some(ActionType::ExtraPointFromTwenty),
            "defensive_touchdown" => Some(ActionType::DefensiveTouchdown),
            "extra_point_return" => Some(ActionType::ExtraPointReturn),
            "safety" => Some(ActionType::Safety),
            _ => None,
        }
    }
}

/// A single recorded in-game action. Immutable once appended; corrections
/// are made by appending a compensating entry, never by editing history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub player_id: String,
    pub action_type: ActionType,
    /// Server-assigned at append time.
    pub timestamp: DateTime<Utc>,
    /// Position within the side's ledger. Replay order follows sequence,
    /// not wall-clock time.
    pub sequence: u32,
}

impl Action {
    pub fn new(player_id: impl Into<String>, action_type: ActionType, sequence: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            player_id: player_id.into(),
            action_type,
            timestamp: Utc::now(),
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_action_scores_points() {
        for action_type in ActionType::iter() {
            assert!(action_type.point_value() > 0, "{:?} has no point value", action_type);
        }
    }

    #[test]
    fn test_code_parse_roundtrip() {
        for action_type in ActionType::iter() {
            assert_eq!(ActionType::parse(action_type.code()), Some(action_type));
        }
        assert_eq!(ActionType::parse("field_goal"), None);
    }

    #[test]
    fn test_serde_names_match_codes() {
        for action_type in ActionType::iter() {
            let json = serde_json::to_string(&action_type).unwrap();
            assert_eq!(json, format!("\"{}\"", action_type.code()));
        }
    }

    #[test]
    fn test_only_safety_credits_opponent() {
        for action_type in ActionType::iter() {
            assert_eq!(action_type.credits_opponent(), action_type == ActionType::Safety);
        }
    }

    #[test]
    fn test_worked_example_point_values() {
        assert_eq!(ActionType::Touchdown.point_value(), 6);
        assert_eq!(ActionType::ExtraPointFromFive.point_value(), 1);
    }
}
