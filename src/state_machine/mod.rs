//! Task lifecycle state machine.
//!
//! Pure, store-free building blocks: the status enum, lifecycle events,
//! the transition table, precondition guards, and the access-control
//! predicate. The lifecycle layer composes these with the stores and the
//! event publisher.

pub mod access;
pub mod errors;
pub mod events;
pub mod guards;
pub mod states;
pub mod transitions;

pub use access::{can_act, Operation};
pub use errors::{GuardError, TransitionError};
pub use events::TaskEvent;
pub use guards::{
    AwaitingAssignmentGuard, EditableGuard, FreelancerPresentGuard, SolutionPresentGuard,
    StateGuard,
};
pub use states::TaskStatus;
pub use transitions::determine_target_status;
