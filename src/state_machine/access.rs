use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Role, Task, User};

/// The operations a caller can request on a task, for access-control
/// purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Edit,
    AssignFreelancer,
    SendOnReview,
    Accept,
    RemoveFreelancer,
    AttachSolution,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Edit => "edit",
            Self::AssignFreelancer => "assign_freelancer",
            Self::SendOnReview => "send_on_review",
            Self::Accept => "accept",
            Self::RemoveFreelancer => "remove_freelancer",
            Self::AttachSolution => "attach_solution",
            Self::Delete => "delete",
        };
        write!(f, "{s}")
    }
}

/// Pure authorization predicate for task operations.
///
/// Callers are expected to check this before invoking a mutating lifecycle
/// operation; the lifecycle layer also defends internally with the same
/// rules. Authentication itself happens outside this crate.
///
/// Rules:
/// - customer-side operations (`Edit`, `AssignFreelancer`, `Accept`,
///   `Delete`) require the actor to be the task's customer;
/// - an administrator bypasses the ownership check for `Delete` only;
/// - freelancer-side operations (`SendOnReview`, `RemoveFreelancer`,
///   `AttachSolution`) require the actor to be the assigned freelancer;
/// - `Create` requires any authenticated (non-guest) actor.
pub fn can_act(actor: &User, task: &Task, operation: Operation) -> bool {
    if actor.role == Role::Guest {
        return false;
    }

    match operation {
        Operation::Create => true,
        Operation::Edit | Operation::AssignFreelancer | Operation::Accept => {
            actor.id == task.customer_id
        }
        Operation::Delete => actor.id == task.customer_id || actor.is_admin(),
        Operation::SendOnReview | Operation::RemoveFreelancer | Operation::AttachSolution => {
            task.freelancer_id == Some(actor.id)
        }
    }
}
