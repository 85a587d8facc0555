//! Point-in-time view of every screen

use serde::Serialize;
use todo_core::task::{TaskStatistics, TaskStore};

use crate::screens::{
    CategoriesScreen, CategoryTasksScreen, HomeScreen, SettingsScreen, StatisticsScreen,
    TaskRow,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub title: String,
    pub count: usize,
    pub tasks: Vec<TaskRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot {
    pub tasks: Vec<TaskRow>,
    pub categories: Vec<CategoryView>,
    pub statistics: TaskStatistics,
    pub vibration_enabled: bool,
}

impl AppSnapshot {
    pub async fn capture(store: &TaskStore) -> Self {
        let tasks = HomeScreen::new(store.clone()).rows().await;

        let categories_screen = CategoriesScreen::new(store.clone());
        let mut categories = Vec::new();
        for summary in categories_screen.rows().await {
            let screen = categories_screen.open(summary.name);
            categories.push(CategoryView {
                title: screen.title(),
                count: summary.count,
                tasks: screen.rows().await,
            });
        }

        Self {
            tasks,
            categories,
            statistics: StatisticsScreen::new(store.clone()).snapshot().await,
            vibration_enabled: SettingsScreen::new(store.clone()).vibration_enabled().await,
        }
    }

    /// Plain-text rendering, one block per screen
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        out.push_str(HomeScreen::TITLE);
        out.push('\n');
        push_rows(&mut out, &self.tasks, "  ");

        out.push('\n');
        out.push_str(CategoriesScreen::TITLE);
        out.push('\n');
        if self.categories.is_empty() {
            out.push_str(&format!("  {}\n", CategoriesScreen::EMPTY_MESSAGE));
        }
        for category in &self.categories {
            out.push_str(&format!("  {} - {}\n", category.title, category.count));
            if category.tasks.is_empty() {
                out.push_str(&format!("    {}\n", CategoryTasksScreen::EMPTY_MESSAGE));
            }
            push_rows(&mut out, &category.tasks, "    ");
        }

        out.push('\n');
        out.push_str(StatisticsScreen::TITLE);
        out.push('\n');
        out.push_str(&format!(
            "  total: {}  completed: {}  pending: {}\n",
            self.statistics.total, self.statistics.completed, self.statistics.pending
        ));

        out.push('\n');
        out.push_str(SettingsScreen::TITLE);
        out.push('\n');
        let state = if self.vibration_enabled { "on" } else { "off" };
        out.push_str(&format!("  vibration: {}\n", state));

        out
    }
}

fn push_rows(out: &mut String, rows: &[TaskRow], indent: &str) {
    for row in rows {
        let mark = if row.completed { "[x]" } else { "[ ]" };
        out.push_str(&format!("{}{} {} ({})\n", indent, mark, row.title, row.category));
    }
}
