//! Add and edit task forms

use thiserror::Error;
use todo_core::task::{NewTask, Task, TaskPatch, TaskStore};

/// Alert shown when a form is submitted without a title
pub const EMPTY_TITLE_ALERT: &str = "Por favor, insira um título para a tarefa.";

#[derive(Debug, Error)]
pub enum FormError {
    #[error("{alert}", alert = EMPTY_TITLE_ALERT)]
    EmptyTitle,

    #[error(transparent)]
    Store(#[from] todo_core::Error),
}

fn ensure_title(title: &str) -> Result<(), FormError> {
    if title.trim().is_empty() {
        return Err(FormError::EmptyTitle);
    }
    Ok(())
}

/// Form for creating a task
pub struct AddTaskForm {
    store: TaskStore,
    pub title: String,
    pub category: String,
}

impl AddTaskForm {
    pub fn new(store: TaskStore) -> Self {
        Self {
            store,
            title: String::new(),
            category: String::new(),
        }
    }

    /// Create the task; blank titles are rejected before the store is called
    pub async fn submit(&self) -> Result<Task, FormError> {
        ensure_title(&self.title)?;
        let input = NewTask::new(self.title.clone()).with_category(self.category.clone());
        Ok(self.store.add_task(input).await?)
    }
}

/// Form for editing a task, prefilled from the task
pub struct EditTaskForm {
    store: TaskStore,
    task_id: String,
    pub title: String,
    pub category: String,
}

impl EditTaskForm {
    pub fn new(store: TaskStore, task: &Task) -> Self {
        Self {
            store,
            task_id: task.id.clone(),
            title: task.title.clone(),
            category: task.category.clone(),
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Save title and category
    ///
    /// Returns `Ok(None)` if the task was deleted while the form was open.
    pub async fn submit(&self) -> Result<Option<Task>, FormError> {
        ensure_title(&self.title)?;
        let patch = TaskPatch {
            title: Some(self.title.clone()),
            category: Some(self.category.clone()),
        };
        Ok(self.store.update_task(&self.task_id, patch).await?)
    }
}
