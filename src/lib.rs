#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Taskboard Core
//!
//! Core task lifecycle engine for a freelance marketplace. Owns the task
//! state machine (`unassigned -> assigned -> submitted -> accepted`, with
//! removal back-transitions), the consistency between tasks and the
//! customer/freelancer back-references on users, and the lifecycle event
//! stream consumed by the notification side of the platform.
//!
//! ## Architecture
//!
//! The crate is one stateful domain service plus its collaborators:
//!
//! - [`storage`] - async store seams (`TaskStore`, `UserStore`,
//!   `SolutionStore`) with an in-memory arena implementation and an
//!   explicitly invalidated snapshot cache
//! - [`state_machine`] - the pure transition table, precondition guards,
//!   and the `can_act` authorization predicate
//! - [`events`] - fire-and-forget lifecycle event publication on named
//!   topics (`task_posted`, `freelancer_assigned`, ...)
//! - [`lifecycle`] - `TaskLifecycle` and `UserLifecycle`, composing the
//!   above into the eight task operations and the user CRUD operations
//! - [`models`] - id-addressed domain entities
//! - [`error`] - the caller-facing error taxonomy
//! - [`config`] - environment-aware runtime configuration
//!
//! HTTP routing, authentication, SQL persistence and the message-bus
//! transport live outside this crate; callers pass loaded domain objects
//! plus an explicit `actor` into every operation.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use taskboard_core::config::CoreConfig;
//! use taskboard_core::events::EventPublisher;
//! use taskboard_core::lifecycle::TaskLifecycle;
//! use taskboard_core::storage::memory::MemoryStore;
//!
//! let config = CoreConfig::default();
//! let store = Arc::new(MemoryStore::new());
//! let lifecycle = TaskLifecycle::new(
//!     &config,
//!     store.clone(),
//!     store.clone(),
//!     store,
//!     EventPublisher::new(config.event_channel_capacity),
//! );
//! let _ = lifecycle;
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod logging;
pub mod models;
pub mod state_machine;
pub mod storage;

pub use config::CoreConfig;
pub use error::{CoreError, Result};
pub use events::{EventKind, EventPublisher, PublishedEvent, TaskEventPayload, UserEventPayload};
pub use lifecycle::{TaskLifecycle, UserLifecycle};
pub use models::{
    NewSolution, NewTask, NewUser, Role, Solution, Task, TaskEdit, TaskId, TaskType, User, UserId,
};
pub use state_machine::{can_act, Operation, TaskEvent, TaskStatus};
pub use storage::{SolutionStore, TaskStore, UserStore};
