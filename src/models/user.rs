//! # User Model
//!
//! A user acts as a customer (posting tasks) and/or a freelancer (taking
//! tasks). The `posted_tasks` / `taken_tasks` sets are derived
//! back-references: the lifecycle layer keeps them synchronized with the
//! `customer_id` / `freelancer_id` fields on each [`crate::models::Task`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::models::task::TaskId;

pub type UserId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Guest,
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Guest => "guest",
            Self::User => "user",
            Self::Admin => "admin",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Opaque credential. Never inspected or transformed by this crate.
    pub password: String,
    pub role: Role,
    /// Aggregate feedback rating, mutated outside this crate.
    pub rating: i32,
    /// Tasks where this user is the customer.
    pub posted_tasks: BTreeSet<TaskId>,
    /// Tasks where this user is the assigned freelancer.
    pub taken_tasks: BTreeSet<TaskId>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Record a task as taken. Set semantics keep the reference unique
    /// even if assignment is repeated.
    pub fn add_taken_task(&mut self, task_id: TaskId) {
        self.taken_tasks.insert(task_id);
    }

    pub fn remove_taken_task(&mut self, task_id: TaskId) {
        self.taken_tasks.remove(&task_id);
    }

    pub fn add_posted_task(&mut self, task_id: TaskId) {
        self.posted_tasks.insert(task_id);
    }

    pub fn remove_posted_task(&mut self, task_id: TaskId) {
        self.posted_tasks.remove(&task_id);
    }

    /// Whether the user still holds references to active tasks.
    pub fn has_active_tasks(&self) -> bool {
        !self.posted_tasks.is_empty() || !self.taken_tasks.is_empty()
    }
}

/// Creation shape for a user, before the store assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl NewUser {
    pub(crate) fn into_user(self, id: UserId) -> User {
        User {
            id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
            role: self.role,
            rating: 0,
            posted_tasks: BTreeSet::new(),
            taken_tasks: BTreeSet::new(),
        }
    }
}
