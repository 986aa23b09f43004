//! Stats submission workflow.
//!
//! A second state machine, independent of the match lifecycle and coupled
//! to it only by one precondition: a match must be completed before its
//! stats can be submitted. A stat-keeper submits, a referee or captain
//! approves or sends back with feedback; the revision loop is unbounded.
//! Approval is the single trigger that unlocks aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LeagueError, LeagueResult};
use crate::models::MatchStatus;

/// Caller-supplied role label, pre-validated by the (out of scope) auth
/// layer. The core only enforces workflow-role gating on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Referee,
    StatKeeper,
    Captain,
    Viewer,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Referee => "referee",
            Role::StatKeeper => "stat_keeper",
            Role::Captain => "captain",
            Role::Viewer => "viewer",
        }
    }

    /// Referees and captains may approve or send back submissions.
    pub fn may_review(&self) -> bool {
        matches!(self, Role::Referee | Role::Captain)
    }
}

/// Submission status for a match's derived stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum WorkflowState {
    NotSubmitted,
    Submitted,
    SentBack { feedback: String },
    Approved,
}

impl WorkflowState {
    pub fn label(&self) -> &'static str {
        match self {
            WorkflowState::NotSubmitted => "not_submitted",
            WorkflowState::Submitted => "submitted",
            WorkflowState::SentBack { .. } => "sent_back",
            WorkflowState::Approved => "approved",
        }
    }
}

/// What happened in one workflow transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    Submitted,
    SentBack,
    Approved,
}

/// Audit record of a single transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEvent {
    pub actor_id: String,
    pub role: Role,
    pub action: WorkflowAction,
    pub at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// The workflow attached to one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsWorkflow {
    pub state: WorkflowState,
    pub history: Vec<WorkflowEvent>,
}

impl Default for StatsWorkflow {
    fn default() -> Self {
        Self { state: WorkflowState::NotSubmitted, history: Vec::new() }
    }
}

impl StatsWorkflow {
    /// Submit the completed match's derived stats for review.
    ///
    /// Legal from `NotSubmitted` and from `SentBack` (resubmission after
    /// revision). The match itself must already be completed.
    pub fn submit(
        &mut self,
        match_status: MatchStatus,
        actor_id: &str,
        role: Role,
    ) -> LeagueResult<()> {
        if role != Role::StatKeeper {
            return Err(LeagueError::RoleNotPermitted {
                role: role.label().to_string(),
                operation: "submit stats".to_string(),
            });
        }
        if match_status != MatchStatus::Completed {
            return Err(LeagueError::MatchNotCompleted);
        }
        match self.state {
            WorkflowState::NotSubmitted | WorkflowState::SentBack { .. } => {
                self.state = WorkflowState::Submitted;
                self.push_event(actor_id, role, WorkflowAction::Submitted, None);
                Ok(())
            }
            WorkflowState::Submitted => {
                Err(LeagueError::InvalidTransition("stats are already awaiting review".to_string()))
            }
            WorkflowState::Approved => {
                Err(LeagueError::InvalidTransition("stats are already approved".to_string()))
            }
        }
    }

    /// Approve the pending submission. Stats become authoritative and
    /// immutable; aggregation is unlocked.
    pub fn approve(&mut self, actor_id: &str, role: Role) -> LeagueResult<()> {
        if !role.may_review() {
            return Err(LeagueError::RoleNotPermitted {
                role: role.label().to_string(),
                operation: "approve stats".to_string(),
            });
        }
        match self.state {
            WorkflowState::Submitted => {
                self.state = WorkflowState::Approved;
                self.push_event(actor_id, role, WorkflowAction::Approved, None);
                Ok(())
            }
            _ => Err(LeagueError::InvalidTransition(format!(
                "cannot approve stats in state {}",
                self.state.label()
            ))),
        }
    }

    /// Send the pending submission back to the stat-keeper with feedback.
    pub fn send_back(&mut self, actor_id: &str, role: Role, reason: &str) -> LeagueResult<()> {
        if !role.may_review() {
            return Err(LeagueError::RoleNotPermitted {
                role: role.label().to_string(),
                operation: "send back stats".to_string(),
            });
        }
        if reason.trim().is_empty() {
            return Err(LeagueError::ValidationError(
                "send-back requires feedback text".to_string(),
            ));
        }
        match self.state {
            WorkflowState::Submitted => {
                self.state = WorkflowState::SentBack { feedback: reason.to_string() };
                self.push_event(actor_id, role, WorkflowAction::SentBack, Some(reason.to_string()));
                Ok(())
            }
            _ => Err(LeagueError::InvalidTransition(format!(
                "cannot send back stats in state {}",
                self.state.label()
            ))),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.state == WorkflowState::Approved
    }

    fn push_event(
        &mut self,
        actor_id: &str,
        role: Role,
        action: WorkflowAction,
        feedback: Option<String>,
    ) {
        self.history.push(WorkflowEvent {
            actor_id: actor_id.to_string(),
            role,
            action,
            at: Utc::now(),
            feedback,
        });
    }
}
