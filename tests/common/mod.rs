//! Shared fixtures for integration tests.

use std::sync::Arc;

use chrono::{Duration, Utc};
use taskboard_core::events::{EventKind, EventPublisher, PublishedEvent};
use taskboard_core::lifecycle::{TaskLifecycle, UserLifecycle};
use taskboard_core::models::{NewTask, NewUser, Role, TaskType, User};
use taskboard_core::storage::memory::MemoryStore;
use taskboard_core::CoreConfig;
use tokio::sync::broadcast;

pub struct TestPlatform {
    pub store: Arc<MemoryStore>,
    pub tasks: TaskLifecycle,
    pub users: UserLifecycle,
    pub publisher: EventPublisher,
}

pub fn platform() -> TestPlatform {
    let config = CoreConfig::default();
    let store = Arc::new(MemoryStore::new());
    let publisher = EventPublisher::new(64);
    let tasks = TaskLifecycle::new(
        &config,
        store.clone(),
        store.clone(),
        store.clone(),
        publisher.clone(),
    );
    let users = UserLifecycle::new(
        &config,
        store.clone(),
        publisher.clone(),
        tasks.user_cache(),
    );
    TestPlatform {
        store,
        tasks,
        users,
        publisher,
    }
}

pub async fn register_user(platform: &TestPlatform, username: &str, role: Role) -> User {
    platform
        .users
        .create_user(NewUser {
            username: username.to_string(),
            first_name: username.to_string(),
            last_name: "Tester".to_string(),
            email: format!("{username}@example.com"),
            password: "hash".to_string(),
            role,
        })
        .await
        .expect("user creation should succeed")
}

pub fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        problem: format!("{title}: details"),
        payment: 25_000,
        deadline: Utc::now() + Duration::days(14),
        task_type: TaskType::Development,
    }
}

/// Drain every event currently buffered on the receiver.
pub fn drain_events(rx: &mut broadcast::Receiver<PublishedEvent>) -> Vec<EventKind> {
    let mut kinds = Vec::new();
    while let Ok(event) = rx.try_recv() {
        kinds.push(event.kind);
    }
    kinds
}
