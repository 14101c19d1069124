//! Task use-case service.
//!
//! # Invariants
//! - A task submitted without a category is filed under the owner's inbox.
//! - A category of another owner is rejected as an invalid choice.

use super::{resolve_category, ServiceError, ServiceResult};
use crate::model::local_now;
use crate::model::owner::OwnerId;
use crate::model::task::{Task, TaskId};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use crate::validation::task::{validate_task, TaskInput};
use log::info;
use uuid::Uuid;

pub struct TaskService<T: TaskRepository, C: CategoryRepository> {
    tasks: T,
    categories: C,
}

impl<T: TaskRepository, C: CategoryRepository> TaskService<T, C> {
    pub fn new(tasks: T, categories: C) -> Self {
        Self { tasks, categories }
    }

    pub fn create_task(&self, owner_id: OwnerId, input: &TaskInput) -> ServiceResult<Task> {
        let (category_id, category_known) =
            resolve_category(&self.categories, owner_id, input.category_id)?;
        let validated = validate_task(input, category_known)?;

        let task = Task {
            id: Uuid::new_v4(),
            owner_id,
            category_id,
            title: validated.title,
            description: validated.description,
            priority: validated.priority,
            status: validated.status,
            due_date: validated.due_date,
            estimated_minutes: validated.estimated_minutes,
            created_at: local_now(),
        };
        self.tasks.create_task(&task)?;
        info!("event=task_create module=service status=ok task_id={}", task.id);
        Ok(task)
    }

    pub fn update_task(
        &self,
        owner_id: OwnerId,
        id: TaskId,
        input: &TaskInput,
    ) -> ServiceResult<Task> {
        let existing = self
            .tasks
            .get_task(owner_id, id)?
            .ok_or(ServiceError::NotFound { entity: "task", id })?;
        let (category_id, category_known) =
            resolve_category(&self.categories, owner_id, input.category_id)?;
        let validated = validate_task(input, category_known)?;

        let task = Task {
            category_id,
            title: validated.title,
            description: validated.description,
            priority: validated.priority,
            status: validated.status,
            due_date: validated.due_date,
            estimated_minutes: validated.estimated_minutes,
            ..existing
        };
        self.tasks.update_task(&task)?;
        info!("event=task_update module=service status=ok task_id={id}");
        Ok(task)
    }

    pub fn get_task(&self, owner_id: OwnerId, id: TaskId) -> ServiceResult<Option<Task>> {
        Ok(self.tasks.get_task(owner_id, id)?)
    }

    /// Lists the owner's tasks, newest first, with optional text/status filters.
    pub fn list_tasks(&self, owner_id: OwnerId, query: &TaskListQuery) -> ServiceResult<Vec<Task>> {
        Ok(self.tasks.list_tasks(owner_id, query)?)
    }

    pub fn delete_task(&self, owner_id: OwnerId, id: TaskId) -> ServiceResult<()> {
        self.tasks.delete_task(owner_id, id)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }
}
