//! # Task Model
//!
//! A task is the unit of work posted by a customer and (optionally) taken
//! by a freelancer. Its `status` field is governed exclusively by the
//! lifecycle layer's state machine; the date and reference fields here
//! must stay mutually consistent with it:
//!
//! - `Assigned` implies `freelancer_id` and `assigned_date` are present
//! - `Unassigned` implies `freelancer_id` is absent
//!
//! Relationships are carried as ids (`customer_id`, `freelancer_id`,
//! `solution_id`); the corresponding back-reference sets live on
//! [`crate::models::User`] and are maintained by the lifecycle layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::solution::SolutionId;
use crate::models::user::UserId;
use crate::state_machine::states::TaskStatus;

pub type TaskId = i64;

/// Category tag for a task, used by board filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Development,
    Design,
    Testing,
    Analytics,
    Copywriting,
    Other,
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Development => "development",
            Self::Design => "design",
            Self::Testing => "testing",
            Self::Analytics => "analytics",
            Self::Copywriting => "copywriting",
            Self::Other => "other",
        };
        write!(f, "{s}")
    }
}

/// A unit of work posted on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub problem: String,
    /// Payment amount in minor currency units.
    pub payment: i64,
    pub deadline: DateTime<Utc>,
    pub task_type: TaskType,
    pub status: TaskStatus,
    /// Set at creation, immutable afterwards.
    pub posted_date: DateTime<Utc>,
    /// Set when a freelancer is assigned, cleared on removal.
    pub assigned_date: Option<DateTime<Utc>>,
    /// Set when sent for review, cleared on freelancer removal.
    pub submitted_date: Option<DateTime<Utc>>,
    /// The posting customer. Required, never reassigned.
    pub customer_id: UserId,
    /// The assigned freelancer, if any.
    pub freelancer_id: Option<UserId>,
    /// The currently attached solution, if any.
    pub solution_id: Option<SolutionId>,
}

impl Task {
    pub fn has_freelancer(&self) -> bool {
        self.freelancer_id.is_some()
    }

    pub fn has_solution(&self) -> bool {
        self.solution_id.is_some()
    }

    /// Whether the deadline has passed relative to `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.deadline < now
    }
}

/// Creation shape for a task, before the store assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub problem: String,
    pub payment: i64,
    pub deadline: DateTime<Utc>,
    pub task_type: TaskType,
}

/// Fields a customer may change while the task is still unassigned.
/// Everything else on [`Task`] is lifecycle-owned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub problem: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub task_type: Option<TaskType>,
}

impl TaskEdit {
    /// Apply the edit to a task, leaving unset fields untouched.
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(problem) = &self.problem {
            task.problem = problem.clone();
        }
        if let Some(deadline) = self.deadline {
            task.deadline = deadline;
        }
        if let Some(task_type) = self.task_type {
            task.task_type = task_type;
        }
    }
}
