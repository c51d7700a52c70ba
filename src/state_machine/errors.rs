use thiserror::Error;

use super::events::TaskEvent;
use super::states::TaskStatus;
use crate::error::CoreError;

/// An event arrived while the task was in a status that does not accept it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: cannot apply '{event}' while '{from}'")]
pub struct TransitionError {
    pub from: TaskStatus,
    pub event: TaskEvent,
}

/// A transition precondition on the task's fields was not met.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("precondition failed: {reason}")]
pub struct GuardError {
    pub reason: String,
}

pub fn precondition_failed(reason: impl Into<String>) -> GuardError {
    GuardError {
        reason: reason.into(),
    }
}

impl From<TransitionError> for CoreError {
    fn from(err: TransitionError) -> Self {
        CoreError::StateConflict(err.to_string())
    }
}

impl From<GuardError> for CoreError {
    fn from(err: GuardError) -> Self {
        CoreError::StateConflict(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TransitionError {
            from: TaskStatus::Accepted,
            event: TaskEvent::Assign,
        };
        assert_eq!(
            err.to_string(),
            "invalid transition: cannot apply 'assign' while 'accepted'"
        );

        let err = precondition_failed("task has no attached solution");
        assert_eq!(
            err.to_string(),
            "precondition failed: task has no attached solution"
        );
    }

    #[test]
    fn test_error_chain() {
        let guard_err = precondition_sanity();
        let core: CoreError = guard_err.into();
        match core {
            CoreError::StateConflict(reason) => {
                assert!(reason.contains("no freelancer"));
            }
            _ => panic!("Expected StateConflict error"),
        }
    }

    fn precondition_sanity() -> GuardError {
        precondition_failed("task has no freelancer")
    }
}
