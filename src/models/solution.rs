//! # Solution Model
//!
//! A freelancer's submission for a task. While attached, the solution's
//! `task_id` and the task's `solution_id` reference each other; the
//! lifecycle layer maintains both sides.

use serde::{Deserialize, Serialize};

use crate::models::task::TaskId;

pub type SolutionId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub id: SolutionId,
    /// Link to the deliverable (repository, document, archive).
    pub link: String,
    pub description: String,
    /// The task this solution is attached to, if any.
    pub task_id: Option<TaskId>,
}

/// Creation shape for a solution, before the store assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSolution {
    pub link: String,
    pub description: String,
}

impl NewSolution {
    pub(crate) fn into_solution(self, id: SolutionId) -> Solution {
        Solution {
            id,
            link: self.link,
            description: self.description,
            task_id: None,
        }
    }
}
