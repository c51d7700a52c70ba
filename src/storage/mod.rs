//! Persistence seams for the lifecycle core.
//!
//! Stores are async trait abstractions; the backing technology lives
//! outside this crate. [`memory`] provides the in-memory arena
//! implementation used by tests and embedders without a database, and
//! [`cache`] the explicit snapshot cache the lifecycle layer invalidates
//! after every mutation.

pub mod cache;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Solution, SolutionId, Task, TaskId, TaskType, User, UserId};
use crate::state_machine::states::TaskStatus;

/// Persistence abstraction for tasks. No business logic.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a new task, assigning its id.
    async fn insert(&self, task: Task) -> Result<Task>;

    /// Load a task by id; absent ids are a `NotFound` error.
    async fn load(&self, id: TaskId) -> Result<Task>;

    /// Persist an existing task.
    async fn save(&self, task: Task) -> Result<Task>;

    /// Remove a task. Returns whether it existed.
    async fn delete(&self, id: TaskId) -> Result<bool>;

    /// Unassigned tasks, ordered by posted date, optionally filtered by
    /// type. The task board.
    async fn list_board(&self, task_type: Option<TaskType>, from_newest: bool)
        -> Result<Vec<Task>>;

    /// Tasks taken by a freelancer, partitioned by deadline expiry and
    /// optionally filtered by status.
    async fn list_taken(
        &self,
        freelancer_id: UserId,
        status: Option<TaskStatus>,
        expired: bool,
    ) -> Result<Vec<Task>>;

    /// Tasks posted by a customer, partitioned by deadline expiry and
    /// optionally filtered by status.
    async fn list_posted(
        &self,
        customer_id: UserId,
        status: Option<TaskStatus>,
        expired: bool,
    ) -> Result<Vec<Task>>;
}

/// Persistence abstraction for users.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: User) -> Result<User>;
    async fn load(&self, id: UserId) -> Result<User>;
    async fn save(&self, user: User) -> Result<User>;
    async fn delete(&self, id: UserId) -> Result<bool>;

    /// Uniqueness lookups used by user creation and update.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// Persistence abstraction for solutions.
#[async_trait]
pub trait SolutionStore: Send + Sync {
    async fn insert(&self, solution: Solution) -> Result<Solution>;
    async fn load(&self, id: SolutionId) -> Result<Solution>;
    async fn save(&self, solution: Solution) -> Result<Solution>;
    async fn delete(&self, id: SolutionId) -> Result<bool>;
}
