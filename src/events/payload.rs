//! Event kinds and the payload shapes downstream notification consumers
//! depend on.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{SolutionId, Task, TaskId, User, UserId};
use crate::state_machine::states::TaskStatus;

/// Named event channels, one topic per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    TaskPosted,
    FreelancerAssigned,
    TaskAccepted,
    FreelancerRemoved,
    TaskSendOnReview,
    UserCreated,
    UserUpdated,
    UserDeleted,
}

impl EventKind {
    /// The exact topic name the kind is emitted on.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::TaskPosted => "task_posted",
            Self::FreelancerAssigned => "freelancer_assigned",
            Self::TaskAccepted => "task_accepted",
            Self::FreelancerRemoved => "freelancer_removed",
            Self::TaskSendOnReview => "task_send_on_review",
            Self::UserCreated => "user_created",
            Self::UserUpdated => "user_updated",
            Self::UserDeleted => "user_deleted",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.topic())
    }
}

impl std::str::FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task_posted" => Ok(Self::TaskPosted),
            "freelancer_assigned" => Ok(Self::FreelancerAssigned),
            "task_accepted" => Ok(Self::TaskAccepted),
            "freelancer_removed" => Ok(Self::FreelancerRemoved),
            "task_send_on_review" => Ok(Self::TaskSendOnReview),
            "user_created" => Ok(Self::UserCreated),
            "user_updated" => Ok(Self::UserUpdated),
            "user_deleted" => Ok(Self::UserDeleted),
            _ => Err(format!("Unsupported topic name: {s}")),
        }
    }
}

/// Minimal user identity embedded in task payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Snapshot carried by every task lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEventPayload {
    pub id: TaskId,
    pub title: String,
    pub status: TaskStatus,
    pub customer: UserRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freelancer: Option<UserRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution_id: Option<SolutionId>,
}

impl TaskEventPayload {
    pub fn new(task: &Task, customer: &User, freelancer: Option<&User>) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            status: task.status,
            customer: customer.into(),
            freelancer: freelancer.map(UserRef::from),
            solution_id: task.solution_id,
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Snapshot carried by user lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEventPayload {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserEventPayload {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

impl UserEventPayload {
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewUser, Role, TaskType};
    use chrono::{Duration, Utc};

    #[test]
    fn test_topic_names_round_trip() {
        for kind in [
            EventKind::TaskPosted,
            EventKind::FreelancerAssigned,
            EventKind::TaskAccepted,
            EventKind::FreelancerRemoved,
            EventKind::TaskSendOnReview,
            EventKind::UserCreated,
            EventKind::UserUpdated,
            EventKind::UserDeleted,
        ] {
            assert_eq!(kind.topic().parse::<EventKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_exact_topic_strings() {
        assert_eq!(EventKind::TaskPosted.topic(), "task_posted");
        assert_eq!(EventKind::FreelancerAssigned.topic(), "freelancer_assigned");
        assert_eq!(EventKind::TaskSendOnReview.topic(), "task_send_on_review");
        assert_eq!(EventKind::UserDeleted.topic(), "user_deleted");
    }

    #[test]
    fn test_unknown_topic_rejected() {
        assert!("task_started".parse::<EventKind>().is_err());
    }

    fn user(id: UserId, name: &str) -> User {
        NewUser {
            username: name.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: format!("{name}@example.com"),
            password: "hash".to_string(),
            role: Role::User,
        }
        .into_user(id)
    }

    fn task(customer_id: UserId, freelancer_id: Option<UserId>) -> Task {
        Task {
            id: 7,
            title: "Migrate billing".to_string(),
            problem: "Old gateway is sunsetting".to_string(),
            payment: 40_000,
            deadline: Utc::now() + Duration::days(10),
            task_type: TaskType::Development,
            status: if freelancer_id.is_some() {
                TaskStatus::Assigned
            } else {
                TaskStatus::Unassigned
            },
            posted_date: Utc::now(),
            assigned_date: None,
            submitted_date: None,
            customer_id,
            freelancer_id,
            solution_id: None,
        }
    }

    #[test]
    fn test_task_payload_json_shape() {
        let customer = user(10, "poster");
        let freelancer = user(20, "worker");

        let with_freelancer = TaskEventPayload::new(&task(10, Some(20)), &customer, Some(&freelancer))
            .to_json()
            .unwrap();
        assert_eq!(with_freelancer["id"], 7);
        assert_eq!(with_freelancer["title"], "Migrate billing");
        assert_eq!(with_freelancer["status"], "assigned");
        assert_eq!(with_freelancer["customer"]["username"], "poster");
        assert_eq!(with_freelancer["customer"]["email"], "poster@example.com");
        assert_eq!(with_freelancer["freelancer"]["id"], 20);

        let on_board = TaskEventPayload::new(&task(10, None), &customer, None)
            .to_json()
            .unwrap();
        assert_eq!(on_board["status"], "unassigned");
        assert!(on_board["freelancer"].is_null());
    }
}
