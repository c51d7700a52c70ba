//! User CRUD semantics: uniqueness, deletion rules, and user events.

mod common;

use common::{drain_events, new_task, platform, register_user};
use taskboard_core::error::CoreError;
use taskboard_core::events::EventKind;
use taskboard_core::models::{NewUser, Role};

fn signup(username: &str, email: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        email: email.to_string(),
        password: "hash".to_string(),
        role: Role::User,
    }
}

#[tokio::test]
async fn creation_emits_user_created() {
    let p = platform();
    let mut rx = p.publisher.subscribe();

    let user = p
        .users
        .create_user(signup("ada", "ada@example.com"))
        .await
        .unwrap();
    assert!(user.id > 0);
    assert_eq!(drain_events(&mut rx), vec![EventKind::UserCreated]);
}

#[tokio::test]
async fn duplicate_username_and_email_are_conflicts() {
    let p = platform();
    p.users
        .create_user(signup("ada", "ada@example.com"))
        .await
        .unwrap();

    let err = p
        .users
        .create_user(signup("ada", "other@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::StateConflict(_)));

    let err = p
        .users
        .create_user(signup("lovelace", "ada@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::StateConflict(_)));
}

#[tokio::test]
async fn update_preserves_derived_task_sets() {
    let p = platform();
    let customer = register_user(&p, "customer", Role::User).await;
    let task = p.tasks.create(new_task("T1"), &customer).await.unwrap();

    let mut changed = p.tasks.get_user(customer.id).await.unwrap();
    changed.first_name = "Renamed".to_string();
    // Stale or tampered sets on the submitted row must not win.
    changed.posted_tasks.clear();

    let saved = p.users.update_user(changed.clone(), &changed).await.unwrap();
    assert_eq!(saved.first_name, "Renamed");
    assert!(saved.posted_tasks.contains(&task.id));
}

#[tokio::test]
async fn only_self_or_admin_may_update() {
    let p = platform();
    let ada = register_user(&p, "ada", Role::User).await;
    let stranger = register_user(&p, "stranger", Role::User).await;
    let admin = register_user(&p, "admin", Role::Admin).await;

    let mut changed = ada.clone();
    changed.first_name = "A.".to_string();

    let err = p
        .users
        .update_user(changed.clone(), &stranger)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));

    assert!(p.users.update_user(changed, &admin).await.is_ok());
}

#[tokio::test]
async fn deletion_refused_while_tasks_are_active() {
    let p = platform();
    let customer = register_user(&p, "customer", Role::User).await;
    let task = p.tasks.create(new_task("T1"), &customer).await.unwrap();

    let err = p.users.delete_user(&customer, &customer).await.unwrap_err();
    assert!(matches!(err, CoreError::StateConflict(_)));

    p.tasks.delete(&task, &customer).await.unwrap();

    let mut rx = p.publisher.subscribe();
    p.users.delete_user(&customer, &customer).await.unwrap();
    assert_eq!(drain_events(&mut rx), vec![EventKind::UserDeleted]);

    let err = p.tasks.get_user(customer.id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[tokio::test]
async fn update_emits_user_updated_with_identity_payload() {
    let p = platform();
    let ada = register_user(&p, "ada", Role::User).await;
    let mut rx = p.publisher.subscribe();

    let mut changed = ada.clone();
    changed.last_name = "Byron".to_string();
    p.users.update_user(changed, &ada).await.unwrap();

    let event = rx.try_recv().unwrap();
    assert_eq!(event.kind, EventKind::UserUpdated);
    assert_eq!(event.payload["id"], ada.id);
    assert_eq!(event.payload["username"], "ada");
    assert_eq!(event.payload["email"], "ada@example.com");
}
