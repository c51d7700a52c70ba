use serde::{Deserialize, Serialize};
use std::fmt;

/// Status-changing lifecycle events a task can receive.
///
/// `edit`, `attach_solution` and `delete` are not listed: they do not move
/// the status and are handled directly by the lifecycle layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskEvent {
    /// A freelancer is assigned by the customer.
    Assign,
    /// The freelancer sends their work for review.
    SendOnReview,
    /// The customer accepts the attached solution.
    Accept,
    /// The freelancer steps away (or is removed) from the task.
    RemoveFreelancer,
}

impl fmt::Display for TaskEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign => write!(f, "assign"),
            Self::SendOnReview => write!(f, "send_on_review"),
            Self::Accept => write!(f, "accept"),
            Self::RemoveFreelancer => write!(f, "remove_freelancer"),
        }
    }
}
