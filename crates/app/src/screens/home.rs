//! Home screen: every task in insertion order

use todo_core::task::TaskStore;
use todo_core::Error;

use super::forms::{AddTaskForm, EditTaskForm};
use super::{rows, TaskRow};

pub struct HomeScreen {
    store: TaskStore,
}

impl HomeScreen {
    pub const TITLE: &'static str = "Todas as Tarefas";

    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    pub async fn rows(&self) -> Vec<TaskRow> {
        rows(self.store.tasks().await)
    }

    pub async fn toggle(&self, id: &str) -> todo_core::Result<()> {
        self.store.toggle_task(id).await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> todo_core::Result<()> {
        self.store.delete_task(id).await?;
        Ok(())
    }

    pub fn add_form(&self) -> AddTaskForm {
        AddTaskForm::new(self.store.clone())
    }

    /// Open the edit form for a task
    pub async fn edit(&self, id: &str) -> todo_core::Result<EditTaskForm> {
        let task = self
            .store
            .get_task(id)
            .await
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        Ok(EditTaskForm::new(self.store.clone(), &task))
    }
}
