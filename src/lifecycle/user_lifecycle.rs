use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::CoreConfig;
use crate::error::{CoreError, Result};
use crate::events::{EventKind, EventPublisher, UserEventPayload};
use crate::logging::{log_event_publish_failure, log_user_operation};
use crate::models::{NewUser, User};
use crate::storage::cache::SnapshotCache;
use crate::storage::UserStore;

/// User creation, update and deletion, with uniqueness enforcement and
/// the matching `user_*` events.
///
/// Derived task back-reference sets on [`User`] are owned by the task
/// lifecycle; updates here never touch them.
pub struct UserLifecycle {
    users: Arc<dyn UserStore>,
    publisher: EventPublisher,
    cache: Arc<SnapshotCache<User>>,
    store_timeout: Duration,
}

impl UserLifecycle {
    /// Build with a cache shared with a `TaskLifecycle` wired against the
    /// same user store, so either side's mutations invalidate both.
    pub fn new(
        config: &CoreConfig,
        users: Arc<dyn UserStore>,
        publisher: EventPublisher,
        cache: Arc<SnapshotCache<User>>,
    ) -> Self {
        Self {
            users,
            publisher,
            cache,
            store_timeout: Duration::from_millis(config.store_timeout_ms),
        }
    }

    /// Register a new user. Username and email must be unique.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User> {
        validate_new_user(&new_user)?;

        if self
            .timed(self.users.find_by_username(&new_user.username))
            .await?
            .is_some()
        {
            return Err(CoreError::StateConflict(format!(
                "username '{}' is already taken",
                new_user.username
            )));
        }
        if self
            .timed(self.users.find_by_email(&new_user.email))
            .await?
            .is_some()
        {
            return Err(CoreError::StateConflict(format!(
                "email '{}' is already registered",
                new_user.email
            )));
        }

        let user = self
            .timed(self.users.insert(new_user.into_user(0)))
            .await
            .map_err(|e| e.in_operation("create_user"))?;

        log_user_operation(
            "create_user",
            Some(user.id),
            Some(&user.username),
            "created",
            None,
        );
        self.publish_user_event(EventKind::UserCreated, &user);
        Ok(user)
    }

    /// Update a user's own attributes.
    ///
    /// Only the user themself or an administrator may update; a changed
    /// username or email re-checks uniqueness. The derived posted/taken
    /// sets are carried over from the stored row untouched.
    pub async fn update_user(&self, updated: User, actor: &User) -> Result<User> {
        if actor.id != updated.id && !actor.is_admin() {
            return Err(CoreError::Forbidden(format!(
                "user {} may not update user {}",
                actor.id, updated.id
            )));
        }

        let current = self
            .timed(self.users.load(updated.id))
            .await
            .map_err(|e| e.in_operation("update_user"))?;

        if updated.username != current.username
            && self
                .timed(self.users.find_by_username(&updated.username))
                .await?
                .is_some()
        {
            return Err(CoreError::StateConflict(format!(
                "username '{}' is already taken",
                updated.username
            )));
        }
        if updated.email != current.email
            && self
                .timed(self.users.find_by_email(&updated.email))
                .await?
                .is_some()
        {
            return Err(CoreError::StateConflict(format!(
                "email '{}' is already registered",
                updated.email
            )));
        }

        let mut to_save = updated;
        to_save.posted_tasks = current.posted_tasks;
        to_save.taken_tasks = current.taken_tasks;

        let saved = self
            .timed(self.users.save(to_save))
            .await
            .map_err(|e| e.in_operation("update_user"))?;
        self.cache.invalidate(saved.id);

        log_user_operation(
            "update_user",
            Some(saved.id),
            Some(&saved.username),
            "updated",
            None,
        );
        self.publish_user_event(EventKind::UserUpdated, &saved);
        Ok(saved)
    }

    /// Delete a user. Refused while they still hold active posted or
    /// taken tasks; those must be deleted or handed back first.
    pub async fn delete_user(&self, user: &User, actor: &User) -> Result<()> {
        if actor.id != user.id && !actor.is_admin() {
            return Err(CoreError::Forbidden(format!(
                "user {} may not delete user {}",
                actor.id, user.id
            )));
        }

        let current = self
            .timed(self.users.load(user.id))
            .await
            .map_err(|e| e.in_operation("delete_user"))?;
        if current.has_active_tasks() {
            return Err(CoreError::StateConflict(format!(
                "user {} still has active tasks",
                current.id
            )));
        }

        self.timed(self.users.delete(current.id))
            .await
            .map_err(|e| e.in_operation("delete_user"))?;
        self.cache.invalidate(current.id);

        log_user_operation(
            "delete_user",
            Some(current.id),
            Some(&current.username),
            "deleted",
            None,
        );
        self.publish_user_event(EventKind::UserDeleted, &current);
        Ok(())
    }

    /// Run a store call under the configured timeout. An elapsed
    /// deadline is a retryable `Transient`.
    async fn timed<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CoreError::Transient(format!(
                "store call exceeded {}ms",
                self.store_timeout.as_millis()
            ))),
        }
    }

    fn publish_user_event(&self, kind: EventKind, user: &User) {
        let payload = UserEventPayload::from(user);
        match payload.to_json() {
            Ok(json) => {
                if let Err(e) = self.publisher.publish(kind, json) {
                    log_event_publish_failure(kind.topic(), &e.to_string());
                }
            }
            Err(e) => log_event_publish_failure(kind.topic(), &e.to_string()),
        }
    }
}

fn validate_new_user(new_user: &NewUser) -> Result<()> {
    if new_user.username.trim().is_empty() {
        return Err(CoreError::InvalidArgument(
            "username must not be empty".to_string(),
        ));
    }
    if new_user.email.trim().is_empty() || !new_user.email.contains('@') {
        return Err(CoreError::InvalidArgument(
            "email must be a valid address".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_new_user_validation() {
        let bad_email = NewUser {
            username: "kay".to_string(),
            first_name: "Kay".to_string(),
            last_name: "M".to_string(),
            email: "not-an-email".to_string(),
            password: "hash".to_string(),
            role: Role::User,
        };
        assert!(matches!(
            validate_new_user(&bad_email),
            Err(CoreError::InvalidArgument(_))
        ));
    }
}
