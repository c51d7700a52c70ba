//! In-memory arena store.
//!
//! Entities live in `DashMap`s keyed by id, with sequential id
//! assignment. One `MemoryStore` implements all three store traits, so a
//! single instance can back a whole lifecycle in tests or embedded use.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use super::{SolutionStore, TaskStore, UserStore};
use crate::error::{CoreError, Result};
use crate::models::{Solution, SolutionId, Task, TaskId, TaskType, User, UserId};
use crate::state_machine::states::TaskStatus;

#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: DashMap<TaskId, Task>,
    users: DashMap<UserId, User>,
    solutions: DashMap<SolutionId, Solution>,
    task_seq: AtomicI64,
    user_seq: AtomicI64,
    solution_seq: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_task_id(&self) -> TaskId {
        self.task_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn next_user_id(&self) -> UserId {
        self.user_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn next_solution_id(&self) -> SolutionId {
        self.solution_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn collect_tasks(&self, mut filter: impl FnMut(&Task) -> bool) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|entry| filter(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert(&self, mut task: Task) -> Result<Task> {
        task.id = self.next_task_id();
        self.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn load(&self, id: TaskId) -> Result<Task> {
        self.tasks
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| CoreError::not_found("task", id))
    }

    async fn save(&self, task: Task) -> Result<Task> {
        if !self.tasks.contains_key(&task.id) {
            return Err(CoreError::not_found("task", task.id));
        }
        self.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn delete(&self, id: TaskId) -> Result<bool> {
        Ok(self.tasks.remove(&id).is_some())
    }

    async fn list_board(
        &self,
        task_type: Option<TaskType>,
        from_newest: bool,
    ) -> Result<Vec<Task>> {
        let mut board = self.collect_tasks(|task| {
            task.status == TaskStatus::Unassigned
                && task_type.map_or(true, |t| task.task_type == t)
        });
        board.sort_by_key(|task| task.posted_date);
        if from_newest {
            board.reverse();
        }
        Ok(board)
    }

    async fn list_taken(
        &self,
        freelancer_id: UserId,
        status: Option<TaskStatus>,
        expired: bool,
    ) -> Result<Vec<Task>> {
        let now = Utc::now();
        let mut taken = self.collect_tasks(|task| {
            task.freelancer_id == Some(freelancer_id)
                && status.map_or(true, |s| task.status == s)
                && task.is_expired_at(now) == expired
        });
        taken.sort_by_key(|task| task.id);
        Ok(taken)
    }

    async fn list_posted(
        &self,
        customer_id: UserId,
        status: Option<TaskStatus>,
        expired: bool,
    ) -> Result<Vec<Task>> {
        let now = Utc::now();
        let mut posted = self.collect_tasks(|task| {
            task.customer_id == customer_id
                && status.map_or(true, |s| task.status == s)
                && task.is_expired_at(now) == expired
        });
        posted.sort_by_key(|task| task.id);
        Ok(posted)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, mut user: User) -> Result<User> {
        user.id = self.next_user_id();
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn load(&self, id: UserId) -> Result<User> {
        self.users
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| CoreError::not_found("user", id))
    }

    async fn save(&self, user: User) -> Result<User> {
        if !self.users.contains_key(&user.id) {
            return Err(CoreError::not_found("user", user.id));
        }
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<bool> {
        Ok(self.users.remove(&id).is_some())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.value().username == username)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.value().email == email)
            .map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl SolutionStore for MemoryStore {
    async fn insert(&self, mut solution: Solution) -> Result<Solution> {
        solution.id = self.next_solution_id();
        self.solutions.insert(solution.id, solution.clone());
        Ok(solution)
    }

    async fn load(&self, id: SolutionId) -> Result<Solution> {
        self.solutions
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| CoreError::not_found("solution", id))
    }

    async fn save(&self, solution: Solution) -> Result<Solution> {
        if !self.solutions.contains_key(&solution.id) {
            return Err(CoreError::not_found("solution", solution.id));
        }
        self.solutions.insert(solution.id, solution.clone());
        Ok(solution)
    }

    async fn delete(&self, id: SolutionId) -> Result<bool> {
        Ok(self.solutions.remove(&id).is_some())
    }
}
