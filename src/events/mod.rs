//! Lifecycle event emission.
//!
//! Events are published synchronously, inline, immediately after each
//! successful commit, which preserves per-task ordering. Delivery is
//! best-effort: a publish failure is logged and never rolls back the
//! state transition that triggered it.

pub mod payload;
pub mod publisher;

pub use payload::{EventKind, TaskEventPayload, UserEventPayload, UserRef};
pub use publisher::{EventPublisher, PublishError, PublishedEvent};
