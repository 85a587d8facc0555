//! Category listing and per-category task lists

use todo_core::task::{CategorySummary, TaskStore};

use super::{rows, TaskRow};

pub struct CategoriesScreen {
    store: TaskStore,
}

impl CategoriesScreen {
    pub const TITLE: &'static str = "Categorias";
    pub const EMPTY_MESSAGE: &'static str = "Nenhuma categoria encontrada.";

    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    pub async fn rows(&self) -> Vec<CategorySummary> {
        self.store.categories().await
    }

    pub fn open(&self, category: impl Into<String>) -> CategoryTasksScreen {
        CategoryTasksScreen::new(self.store.clone(), category)
    }
}

pub struct CategoryTasksScreen {
    store: TaskStore,
    category: String,
}

impl CategoryTasksScreen {
    pub const EMPTY_MESSAGE: &'static str = "Nenhuma tarefa encontrada nesta categoria.";

    pub fn new(store: TaskStore, category: impl Into<String>) -> Self {
        Self {
            store,
            category: category.into(),
        }
    }

    pub fn title(&self) -> String {
        format!("Categoria: {}", self.category)
    }

    pub async fn rows(&self) -> Vec<TaskRow> {
        rows(self.store.tasks_in_category(&self.category).await)
    }

    pub async fn toggle(&self, id: &str) -> todo_core::Result<()> {
        self.store.toggle_task(id).await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> todo_core::Result<()> {
        self.store.delete_task(id).await?;
        Ok(())
    }
}
