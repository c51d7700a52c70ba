use super::errors::{precondition_failed, GuardError};
use super::states::TaskStatus;
use crate::models::Task;

/// Trait for implementing transition precondition guards.
///
/// Guards inspect an already-loaded task; they never touch the stores.
pub trait StateGuard {
    /// Check if the transition is allowed.
    fn check(&self, task: &Task) -> Result<(), GuardError>;

    /// Get a description of this guard for logging.
    fn description(&self) -> &'static str;
}

/// Guard requiring the task to still be on the board. Editing a task that
/// is already committed to a freelancer is a conflict, not a shape error.
pub struct EditableGuard;

impl StateGuard for EditableGuard {
    fn check(&self, task: &Task) -> Result<(), GuardError> {
        if task.status != TaskStatus::Unassigned {
            return Err(precondition_failed(format!(
                "task {} can be edited only while unassigned, current status is '{}'",
                task.id, task.status
            )));
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Task must be unassigned to be edited"
    }
}

/// Guard requiring an assigned freelancer.
pub struct FreelancerPresentGuard;

impl StateGuard for FreelancerPresentGuard {
    fn check(&self, task: &Task) -> Result<(), GuardError> {
        if !task.has_freelancer() {
            return Err(precondition_failed(format!(
                "task {} has no assigned freelancer",
                task.id
            )));
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Task must have an assigned freelancer"
    }
}

/// Guard requiring an attached solution before acceptance.
pub struct SolutionPresentGuard;

impl StateGuard for SolutionPresentGuard {
    fn check(&self, task: &Task) -> Result<(), GuardError> {
        if !task.has_solution() {
            return Err(precondition_failed(format!(
                "task {} has no attached solution",
                task.id
            )));
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Task must have an attached solution"
    }
}

/// Guard rejecting assignment while a different freelancer holds the task.
pub struct AwaitingAssignmentGuard {
    pub candidate_id: i64,
}

impl StateGuard for AwaitingAssignmentGuard {
    fn check(&self, task: &Task) -> Result<(), GuardError> {
        match task.freelancer_id {
            Some(current) if current != self.candidate_id => Err(precondition_failed(format!(
                "task {} is already assigned to freelancer {current}",
                task.id
            ))),
            _ => Ok(()),
        }
    }

    fn description(&self) -> &'static str {
        "Task must be unassigned or already held by the same freelancer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskType;
    use chrono::{Duration, Utc};

    fn board_task() -> Task {
        Task {
            id: 1,
            title: "Translate docs".to_string(),
            problem: "EN to DE".to_string(),
            payment: 10_000,
            deadline: Utc::now() + Duration::days(3),
            task_type: TaskType::Copywriting,
            status: TaskStatus::Unassigned,
            posted_date: Utc::now(),
            assigned_date: None,
            submitted_date: None,
            customer_id: 10,
            freelancer_id: None,
            solution_id: None,
        }
    }

    #[test]
    fn test_editable_guard() {
        let mut task = board_task();
        assert!(EditableGuard.check(&task).is_ok());

        task.status = TaskStatus::Assigned;
        let err = EditableGuard.check(&task).unwrap_err();
        assert!(err.reason.contains("assigned"));
    }

    #[test]
    fn test_freelancer_present_guard() {
        let mut task = board_task();
        assert!(FreelancerPresentGuard.check(&task).is_err());

        task.freelancer_id = Some(20);
        assert!(FreelancerPresentGuard.check(&task).is_ok());
    }

    #[test]
    fn test_solution_present_guard() {
        let mut task = board_task();
        assert!(SolutionPresentGuard.check(&task).is_err());

        task.solution_id = Some(7);
        assert!(SolutionPresentGuard.check(&task).is_ok());
    }

    #[test]
    fn test_awaiting_assignment_guard() {
        let mut task = board_task();
        let guard = AwaitingAssignmentGuard { candidate_id: 20 };
        assert!(guard.check(&task).is_ok());

        task.freelancer_id = Some(20);
        assert!(guard.check(&task).is_ok());

        task.freelancer_id = Some(21);
        assert!(guard.check(&task).is_err());
    }
}
