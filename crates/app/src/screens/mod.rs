//! Screen controllers
//!
//! Each screen is built from a [`TaskStore`] handle and exposes the rows and
//! actions its view renders. Rendering itself lives in the frontend.

mod categories;
mod forms;
mod home;
mod settings;
mod statistics;

pub use categories::{CategoriesScreen, CategoryTasksScreen};
pub use forms::{AddTaskForm, EditTaskForm, FormError};
pub use home::HomeScreen;
pub use settings::SettingsScreen;
pub use statistics::StatisticsScreen;

use serde::Serialize;
use todo_core::task::Task;

/// One line of a task list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub completed: bool,
}

impl From<Task> for TaskRow {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            category: task.category,
            completed: task.completed,
        }
    }
}

fn rows(tasks: Vec<Task>) -> Vec<TaskRow> {
    tasks.into_iter().map(TaskRow::from).collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use todo_core::haptics::NoopHaptics;
    use todo_core::storage::MemoryKeyValueStore;
    use todo_core::task::TaskStore;

    pub async fn memory_store() -> TaskStore {
        TaskStore::load(Arc::new(MemoryKeyValueStore::new()), Arc::new(NoopHaptics)).await
    }
}
