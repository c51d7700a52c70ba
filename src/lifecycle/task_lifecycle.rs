use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::config::CoreConfig;
use crate::error::{CoreError, Result};
use crate::events::{EventKind, EventPublisher, TaskEventPayload};
use crate::logging::{log_event_publish_failure, log_task_operation};
use crate::models::{NewSolution, NewTask, Task, TaskEdit, TaskId, TaskType, User, UserId};
use crate::state_machine::{
    can_act, determine_target_status, AwaitingAssignmentGuard, EditableGuard,
    FreelancerPresentGuard, Operation, SolutionPresentGuard, StateGuard, TaskEvent, TaskStatus,
};
use crate::storage::cache::SnapshotCache;
use crate::storage::{SolutionStore, TaskStore, UserStore};

/// Owner of all legal task state transitions and of the invariant that a
/// task's customer/freelancer back-references on [`User`] stay
/// synchronized with the task's own fields.
///
/// Mutating operations on the same task are serialized through a per-task
/// lock; operations on different tasks proceed in parallel. User-side
/// back-reference mutations are persisted before the task's own mutation,
/// and lifecycle events are published inline immediately after the
/// operation commits, so per-task event order follows commit order.
/// Publish failures are logged and never fail the operation.
///
/// Every store call runs under the configured timeout; an elapsed
/// deadline surfaces as a retryable `Transient` error.
pub struct TaskLifecycle {
    tasks: Arc<dyn TaskStore>,
    users: Arc<dyn UserStore>,
    solutions: Arc<dyn SolutionStore>,
    publisher: EventPublisher,
    task_cache: SnapshotCache<Task>,
    user_cache: Arc<SnapshotCache<User>>,
    locks: DashMap<TaskId, Arc<Mutex<()>>>,
    store_timeout: Duration,
}

impl TaskLifecycle {
    pub fn new(
        config: &CoreConfig,
        tasks: Arc<dyn TaskStore>,
        users: Arc<dyn UserStore>,
        solutions: Arc<dyn SolutionStore>,
        publisher: EventPublisher,
    ) -> Self {
        Self {
            tasks,
            users,
            solutions,
            publisher,
            task_cache: SnapshotCache::new(config.cache_enabled),
            user_cache: Arc::new(SnapshotCache::new(config.cache_enabled)),
            locks: DashMap::new(),
            store_timeout: Duration::from_millis(config.store_timeout_ms),
        }
    }

    /// The user snapshot cache, for sharing with a [`UserLifecycle`]
    /// wired against the same store.
    ///
    /// [`UserLifecycle`]: crate::lifecycle::UserLifecycle
    pub fn user_cache(&self) -> Arc<SnapshotCache<User>> {
        Arc::clone(&self.user_cache)
    }

    /// Pure authorization predicate, exposed so callers can reject a
    /// request before invoking the mutating operation.
    pub fn can_act(&self, actor: &User, task: &Task, operation: Operation) -> bool {
        can_act(actor, task, operation)
    }

    // ---- operations -----------------------------------------------------

    /// Post a new task on the board on behalf of `customer`.
    ///
    /// The task starts `Unassigned` with `posted_date` set to now, is
    /// recorded in the customer's posted set, and a `task_posted` event is
    /// emitted.
    pub async fn create(&self, new_task: NewTask, customer: &User) -> Result<Task> {
        validate_new_task(&new_task)?;
        if !allows_create(customer) {
            return Err(CoreError::Forbidden(format!(
                "user {} may not post tasks",
                customer.id
            )));
        }

        // Fail on a dangling customer id before writing anything.
        let mut customer_fresh = self.load_user_fresh(customer.id, "create").await?;

        let task = Task {
            id: 0,
            title: new_task.title,
            problem: new_task.problem,
            payment: new_task.payment,
            deadline: new_task.deadline,
            task_type: new_task.task_type,
            status: TaskStatus::Unassigned,
            posted_date: Utc::now(),
            assigned_date: None,
            submitted_date: None,
            customer_id: customer_fresh.id,
            freelancer_id: None,
            solution_id: None,
        };
        let task = self
            .timed(self.tasks.insert(task))
            .await
            .map_err(|e| e.in_operation("create"))?;

        customer_fresh.add_posted_task(task.id);
        self.timed(self.users.save(customer_fresh))
            .await
            .map_err(|e| e.in_operation("create"))?;
        self.user_cache.invalidate(task.customer_id);

        log_task_operation(
            "create",
            Some(task.id),
            Some(task.customer_id),
            "unassigned",
            None,
        );
        self.publish_task_event(EventKind::TaskPosted, &task, None)
            .await;
        Ok(task)
    }

    /// Edit the describable fields of a task still on the board.
    ///
    /// Editing a task that is already committed to a freelancer (or
    /// further along) is a `StateConflict`, not a validation error.
    pub async fn edit(&self, task: &Task, actor: &User, edit: TaskEdit) -> Result<Task> {
        let lock = self.lock_for(task.id);
        let _guard = lock.lock().await;

        let mut current = self.load_task_fresh(task.id, "edit").await?;
        self.require(actor, &current, Operation::Edit)?;
        EditableGuard.check(&current)?;

        edit.apply(&mut current);
        let saved = self
            .timed(self.tasks.save(current))
            .await
            .map_err(|e| e.in_operation("edit"))?;
        self.task_cache.invalidate(saved.id);

        log_task_operation("edit", Some(saved.id), Some(actor.id), "unassigned", None);
        Ok(saved)
    }

    /// Assign a freelancer to the task.
    ///
    /// Repeating the call for the same freelancer is harmless (the taken
    /// set holds the task exactly once and `assigned_date` reflects the
    /// latest call); assigning while a different freelancer holds the
    /// task is a `StateConflict`.
    pub async fn assign_freelancer(
        &self,
        task: &Task,
        freelancer: &User,
        actor: &User,
    ) -> Result<Task> {
        let lock = self.lock_for(task.id);
        let _guard = lock.lock().await;

        let mut current = self.load_task_fresh(task.id, "assign_freelancer").await?;
        self.require(actor, &current, Operation::AssignFreelancer)?;
        AwaitingAssignmentGuard {
            candidate_id: freelancer.id,
        }
        .check(&current)?;
        let target = determine_target_status(current.status, TaskEvent::Assign)?;

        // User-side back-reference first, then the task's own mutation.
        let mut freelancer_fresh = self.load_user_fresh(freelancer.id, "assign_freelancer").await?;
        freelancer_fresh.add_taken_task(current.id);
        let freelancer_fresh = self
            .timed(self.users.save(freelancer_fresh))
            .await
            .map_err(|e| e.in_operation("assign_freelancer"))?;
        self.user_cache.invalidate(freelancer_fresh.id);

        current.status = target;
        current.freelancer_id = Some(freelancer_fresh.id);
        current.assigned_date = Some(Utc::now());
        let saved = self
            .timed(self.tasks.save(current))
            .await
            .map_err(|e| e.in_operation("assign_freelancer"))?;
        self.task_cache.invalidate(saved.id);

        log_task_operation(
            "assign_freelancer",
            Some(saved.id),
            Some(actor.id),
            "assigned",
            None,
        );
        self.publish_task_event(EventKind::FreelancerAssigned, &saved, Some(&freelancer_fresh))
            .await;
        Ok(saved)
    }

    /// Submit the task for customer review.
    pub async fn send_on_review(&self, task: &Task, actor: &User) -> Result<Task> {
        let lock = self.lock_for(task.id);
        let _guard = lock.lock().await;

        let mut current = self.load_task_fresh(task.id, "send_on_review").await?;
        FreelancerPresentGuard.check(&current)?;
        self.require(actor, &current, Operation::SendOnReview)?;
        let target = determine_target_status(current.status, TaskEvent::SendOnReview)?;

        current.status = target;
        current.submitted_date = Some(Utc::now());
        let saved = self
            .timed(self.tasks.save(current))
            .await
            .map_err(|e| e.in_operation("send_on_review"))?;
        self.task_cache.invalidate(saved.id);

        log_task_operation(
            "send_on_review",
            Some(saved.id),
            Some(actor.id),
            "submitted",
            None,
        );
        self.publish_task_event(EventKind::TaskSendOnReview, &saved, None)
            .await;
        Ok(saved)
    }

    /// Accept the attached solution, finishing the task.
    pub async fn accept(&self, task: &Task, actor: &User) -> Result<Task> {
        let lock = self.lock_for(task.id);
        let _guard = lock.lock().await;

        let mut current = self.load_task_fresh(task.id, "accept").await?;
        self.require(actor, &current, Operation::Accept)?;
        SolutionPresentGuard.check(&current)?;
        let target = determine_target_status(current.status, TaskEvent::Accept)?;

        current.status = target;
        let saved = self
            .timed(self.tasks.save(current))
            .await
            .map_err(|e| e.in_operation("accept"))?;
        self.task_cache.invalidate(saved.id);

        log_task_operation("accept", Some(saved.id), Some(actor.id), "accepted", None);
        self.publish_task_event(EventKind::TaskAccepted, &saved, None)
            .await;
        Ok(saved)
    }

    /// Remove the assigned freelancer, returning the task to the board.
    ///
    /// Clears the assignment and submission dates, detaches any attached
    /// solution, and drops the task from the freelancer's taken set.
    pub async fn remove_freelancer(&self, task: &Task, actor: &User) -> Result<Task> {
        let lock = self.lock_for(task.id);
        let _guard = lock.lock().await;

        let mut current = self.load_task_fresh(task.id, "remove_freelancer").await?;
        FreelancerPresentGuard.check(&current)?;
        self.require(actor, &current, Operation::RemoveFreelancer)?;
        let target = determine_target_status(current.status, TaskEvent::RemoveFreelancer)?;

        // Invariant: freelancer_id is present, the guard above checked it.
        let freelancer_id = current
            .freelancer_id
            .ok_or_else(|| CoreError::StateConflict("task lost its freelancer".to_string()))?;

        // User-side back-reference first, then the task's own mutation.
        let mut freelancer = self.load_user_fresh(freelancer_id, "remove_freelancer").await?;
        freelancer.remove_taken_task(current.id);
        let freelancer = self
            .timed(self.users.save(freelancer))
            .await
            .map_err(|e| e.in_operation("remove_freelancer"))?;
        self.user_cache.invalidate(freelancer.id);

        if let Some(solution_id) = current.solution_id {
            self.detach_solution(solution_id, "remove_freelancer").await?;
        }

        current.status = target;
        current.freelancer_id = None;
        current.assigned_date = None;
        current.submitted_date = None;
        current.solution_id = None;
        let saved = self
            .timed(self.tasks.save(current))
            .await
            .map_err(|e| e.in_operation("remove_freelancer"))?;
        self.task_cache.invalidate(saved.id);

        log_task_operation(
            "remove_freelancer",
            Some(saved.id),
            Some(actor.id),
            "unassigned",
            None,
        );
        // The payload names the removed freelancer so downstream
        // notifications can still reach them.
        self.publish_task_event(EventKind::FreelancerRemoved, &saved, Some(&freelancer))
            .await;
        Ok(saved)
    }

    /// Attach a solution to the task the actor is working on.
    ///
    /// Persists the solution with its task back-reference before the task
    /// row is touched. A previously attached solution is detached first.
    /// No event is emitted.
    pub async fn attach_solution(
        &self,
        task: &Task,
        actor: &User,
        new_solution: NewSolution,
    ) -> Result<Task> {
        validate_new_solution(&new_solution)?;

        let lock = self.lock_for(task.id);
        let _guard = lock.lock().await;

        let mut current = self.load_task_fresh(task.id, "attach_solution").await?;
        FreelancerPresentGuard.check(&current)?;
        self.require(actor, &current, Operation::AttachSolution)?;

        if let Some(previous_id) = current.solution_id {
            self.detach_solution(previous_id, "attach_solution").await?;
        }

        let mut solution = new_solution.into_solution(0);
        solution.task_id = Some(current.id);
        let solution = self
            .timed(self.solutions.insert(solution))
            .await
            .map_err(|e| e.in_operation("attach_solution"))?;

        current.solution_id = Some(solution.id);
        let saved = self
            .timed(self.tasks.save(current))
            .await
            .map_err(|e| e.in_operation("attach_solution"))?;
        self.task_cache.invalidate(saved.id);

        log_task_operation(
            "attach_solution",
            Some(saved.id),
            Some(actor.id),
            &saved.status.to_string(),
            None,
        );
        Ok(saved)
    }

    /// Logically delete the task.
    ///
    /// Removes it from the customer's posted set and, if assigned, from
    /// the freelancer's taken set, detaches any solution, then removes
    /// the task from the store. Loading the id afterwards is `NotFound`.
    /// An administrator may delete tasks they do not own.
    pub async fn delete(&self, task: &Task, actor: &User) -> Result<()> {
        let lock = self.lock_for(task.id);
        let _guard = lock.lock().await;

        let current = self.load_task_fresh(task.id, "delete").await?;
        self.require(actor, &current, Operation::Delete)?;

        // User-side back-references first; a crash mid-way leaves the
        // references absent rather than pointing at a removed task.
        let mut customer = self.load_user_fresh(current.customer_id, "delete").await?;
        customer.remove_posted_task(current.id);
        self.timed(self.users.save(customer))
            .await
            .map_err(|e| e.in_operation("delete"))?;
        self.user_cache.invalidate(current.customer_id);

        if let Some(freelancer_id) = current.freelancer_id {
            let mut freelancer = self.load_user_fresh(freelancer_id, "delete").await?;
            freelancer.remove_taken_task(current.id);
            self.timed(self.users.save(freelancer))
                .await
                .map_err(|e| e.in_operation("delete"))?;
            self.user_cache.invalidate(freelancer_id);
        }

        if let Some(solution_id) = current.solution_id {
            self.detach_solution(solution_id, "delete").await?;
        }

        self.timed(self.tasks.delete(current.id))
            .await
            .map_err(|e| e.in_operation("delete"))?;
        self.task_cache.invalidate(current.id);
        self.locks.remove(&current.id);

        log_task_operation("delete", Some(current.id), Some(actor.id), "deleted", None);
        Ok(())
    }

    // ---- reads ----------------------------------------------------------

    /// Load a task through the snapshot cache.
    pub async fn get_task(&self, id: TaskId) -> Result<Task> {
        if let Some(task) = self.task_cache.get(id) {
            return Ok(task);
        }
        let task = self.timed(self.tasks.load(id)).await?;
        self.task_cache.put(id, task.clone());
        Ok(task)
    }

    /// Load a user through the shared snapshot cache.
    pub async fn get_user(&self, id: UserId) -> Result<User> {
        if let Some(user) = self.user_cache.get(id) {
            return Ok(user);
        }
        let user = self.timed(self.users.load(id)).await?;
        self.user_cache.put(id, user.clone());
        Ok(user)
    }

    /// The task board: unassigned tasks ordered by posted date.
    pub async fn task_board(
        &self,
        task_type: Option<TaskType>,
        from_newest: bool,
    ) -> Result<Vec<Task>> {
        self.timed(self.tasks.list_board(task_type, from_newest))
            .await
    }

    /// Tasks taken by a freelancer, split by deadline expiry.
    pub async fn taken_tasks(
        &self,
        freelancer_id: UserId,
        status: Option<TaskStatus>,
        expired: bool,
    ) -> Result<Vec<Task>> {
        self.timed(self.tasks.list_taken(freelancer_id, status, expired))
            .await
    }

    /// Tasks posted by a customer, split by deadline expiry.
    pub async fn posted_tasks(
        &self,
        customer_id: UserId,
        status: Option<TaskStatus>,
        expired: bool,
    ) -> Result<Vec<Task>> {
        self.timed(self.tasks.list_posted(customer_id, status, expired))
            .await
    }

    // ---- internals ------------------------------------------------------

    fn lock_for(&self, id: TaskId) -> Arc<Mutex<()>> {
        self.locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn require(&self, actor: &User, task: &Task, operation: Operation) -> Result<()> {
        if can_act(actor, task, operation) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "user {} may not {} task {}",
                actor.id, operation, task.id
            )))
        }
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

    async fn load_task_fresh(&self, id: TaskId, operation: &str) -> Result<Task> {
        self.timed(self.tasks.load(id))
            .await
            .map_err(|e| e.in_operation(operation))
    }

    async fn load_user_fresh(&self, id: UserId, operation: &str) -> Result<User> {
        self.timed(self.users.load(id))
            .await
            .map_err(|e| e.in_operation(operation))
    }

    async fn detach_solution(&self, solution_id: i64, operation: &str) -> Result<()> {
        let mut solution = self
            .timed(self.solutions.load(solution_id))
            .await
            .map_err(|e| e.in_operation(operation))?;
        solution.task_id = None;
        self.timed(self.solutions.save(solution))
            .await
            .map_err(|e| e.in_operation(operation))?;
        Ok(())
    }

    /// Build and emit a task event. Best-effort: any failure here (stale
    /// user reference, closed channel) is logged and swallowed.
    async fn publish_task_event(
        &self,
        kind: EventKind,
        task: &Task,
        freelancer_override: Option<&User>,
    ) {
        let customer = match self.timed(self.users.load(task.customer_id)).await {
            Ok(user) => user,
            Err(e) => {
                log_event_publish_failure(kind.topic(), &e.to_string());
                return;
            }
        };

        let freelancer = match (freelancer_override, task.freelancer_id) {
            (Some(user), _) => Some(user.clone()),
            (None, Some(id)) => match self.timed(self.users.load(id)).await {
                Ok(user) => Some(user),
                Err(e) => {
                    log_event_publish_failure(kind.topic(), &e.to_string());
                    return;
                }
            },
            (None, None) => None,
        };

        let payload = TaskEventPayload::new(task, &customer, freelancer.as_ref());
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

fn allows_create(customer: &User) -> bool {
    customer.role != crate::models::Role::Guest
}

fn validate_new_task(new_task: &NewTask) -> Result<()> {
    if new_task.title.trim().is_empty() {
        return Err(CoreError::InvalidArgument(
            "task title must not be empty".to_string(),
        ));
    }
    if new_task.problem.trim().is_empty() {
        return Err(CoreError::InvalidArgument(
            "task problem must not be empty".to_string(),
        ));
    }
    if new_task.payment <= 0 {
        return Err(CoreError::InvalidArgument(
            "task payment must be positive".to_string(),
        ));
    }
    Ok(())
}

fn validate_new_solution(new_solution: &NewSolution) -> Result<()> {
    if new_solution.link.trim().is_empty() {
        return Err(CoreError::InvalidArgument(
            "solution link must not be empty".to_string(),
        ));
    }
    Ok(())
}
