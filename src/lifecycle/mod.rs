//! Lifecycle services.
//!
//! [`TaskLifecycle`] owns the task state machine, the back-reference
//! consistency between tasks and users, and post-commit event emission.
//! [`UserLifecycle`] covers user creation, update and deletion with the
//! matching `user_*` events.

pub mod task_lifecycle;
pub mod user_lifecycle;

pub use task_lifecycle::TaskLifecycle;
pub use user_lifecycle::UserLifecycle;
