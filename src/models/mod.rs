//! Domain entities for the freelance task board.
//!
//! Entities are addressed by opaque integer ids and carry id references
//! instead of live back-pointers; relationship consistency between them
//! is enforced procedurally by the lifecycle layer.

pub mod solution;
pub mod task;
pub mod user;

pub use solution::{NewSolution, Solution, SolutionId};
pub use task::{NewTask, Task, TaskEdit, TaskId, TaskType};
pub use user::{NewUser, Role, User, UserId};
