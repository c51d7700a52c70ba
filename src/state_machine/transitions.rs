use super::errors::TransitionError;
use super::events::TaskEvent;
use super::states::TaskStatus;

/// Determine the target status for an event against the current status.
///
/// This is the complete legal transition table; anything it rejects is a
/// state conflict. Field-level preconditions (freelancer present, solution
/// attached) are checked separately by the guards.
pub fn determine_target_status(
    current: TaskStatus,
    event: TaskEvent,
) -> Result<TaskStatus, TransitionError> {
    let target = match (current, event) {
        // Assignment. Re-assignment while assigned is allowed at the table
        // level; the lifecycle layer rejects it unless it targets the same
        // freelancer, keeping the call idempotent.
        (TaskStatus::Unassigned, TaskEvent::Assign) => TaskStatus::Assigned,
        (TaskStatus::Assigned, TaskEvent::Assign) => TaskStatus::Assigned,

        // Review flow
        (TaskStatus::Assigned, TaskEvent::SendOnReview) => TaskStatus::Submitted,
        (TaskStatus::Assigned, TaskEvent::Accept) => TaskStatus::Accepted,
        (TaskStatus::Submitted, TaskEvent::Accept) => TaskStatus::Accepted,

        // Back-transitions to the board
        (TaskStatus::Assigned, TaskEvent::RemoveFreelancer) => TaskStatus::Unassigned,
        (TaskStatus::Submitted, TaskEvent::RemoveFreelancer) => TaskStatus::Unassigned,

        (from, event) => return Err(TransitionError { from, event }),
    };

    Ok(target)
}
