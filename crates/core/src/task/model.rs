//! Task model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Category assigned when a task is created without one
pub const DEFAULT_CATEGORY: &str = "geral";

/// A single to-do item
///
/// Field names are serialized in camelCase so the stored `tasks` value stays
/// readable by the mobile frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Normalize a user-supplied category, falling back to the default when blank
pub fn normalize_category(category: Option<&str>) -> String {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => default_category(),
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::InvalidInput("Task title must not be empty".to_string()));
    }
    Ok(())
}

impl Task {
    /// Create a new, pending task in the default category
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            category: default_category(),
            completed: false,
            created_at: Utc::now(),
        }
    }

    /// Set the category; blank values keep the default
    pub fn with_category(mut self, category: impl AsRef<str>) -> Self {
        self.category = normalize_category(Some(category.as_ref()));
        self
    }

    /// Apply a field-level patch
    ///
    /// Only `title` and `category` can change; `id`, `completed` and
    /// `created_at` are left as they are.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(category) = patch.category {
            self.category = normalize_category(Some(&category));
        }
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Reject blank titles
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)
    }

    /// Build the task record with a fresh id and creation time
    pub fn into_task(self) -> Task {
        let category = normalize_category(self.category.as_deref());
        let mut task = Task::new(self.title);
        task.category = category;
        task
    }
}

/// Partial update for an existing task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            category: None,
        }
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self {
            title: None,
            category: Some(category.into()),
        }
    }

    /// A patch that sets a title must not blank it out
    pub fn validate(&self) -> Result<()> {
        match &self.title {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }
}

/// A category and how many tasks carry it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub count: usize,
}

/// Aggregate counts over the task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStatistics {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TaskStatistics {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total,
            completed,
            pending: total - completed,
        }
    }
}

/// Distinct categories in order of first appearance, with counts
pub fn summarize_categories(tasks: &[Task]) -> Vec<CategorySummary> {
    let mut summaries: Vec<CategorySummary> = Vec::new();
    for task in tasks {
        match summaries.iter_mut().find(|s| s.name == task.category) {
            Some(summary) => summary.count += 1,
            None => summaries.push(CategorySummary {
                name: task.category.clone(),
                count: 1,
            }),
        }
    }
    summaries
}
