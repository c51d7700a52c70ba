use serde::{Deserialize, Serialize};
use std::fmt;

/// Task status definitions for the board lifecycle.
///
/// Deletion is not a stored status: a deleted task is removed from the
/// store and subsequently loads as `NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Posted on the board, visible to prospective freelancers.
    Unassigned,
    /// A freelancer has been assigned and is working on it.
    Assigned,
    /// The freelancer sent the work for customer review.
    Submitted,
    /// The customer accepted the solution. Terminal.
    Accepted,
}

impl TaskStatus {
    /// Check if this is a terminal state (no further transitions allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Check if the task is on the board waiting for a freelancer.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Unassigned)
    }

    /// Check if a freelancer currently holds the task.
    pub fn is_taken(&self) -> bool {
        matches!(self, Self::Assigned | Self::Submitted)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned => write!(f, "unassigned"),
            Self::Assigned => write!(f, "assigned"),
            Self::Submitted => write!(f, "submitted"),
            Self::Accepted => write!(f, "accepted"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unassigned" => Ok(Self::Unassigned),
            "assigned" => Ok(Self::Assigned),
            "submitted" => Ok(Self::Submitted),
            "accepted" => Ok(Self::Accepted),
            _ => Err(format!("Invalid task status: {s}")),
        }
    }
}

/// Default status for newly posted tasks
impl Default for TaskStatus {
    fn default() -> Self {
        Self::Unassigned
    }
}
