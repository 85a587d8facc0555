//! Task store
//!
//! Owns the ordered task list and the vibration setting, and mirrors both to
//! a [`KeyValueStore`] under two independent keys.
//!
//! Every mutation builds the next snapshot, writes it through the key-value
//! store and only then commits it in memory. A failed write leaves the
//! in-memory state untouched and is returned to the caller, so memory never
//! runs ahead of what was persisted.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::model::{
    summarize_categories, CategorySummary, NewTask, Task, TaskPatch, TaskStatistics,
};
use crate::haptics::{Haptics, ADD_PULSE, TOGGLE_PULSE};
use crate::storage::KeyValueStore;
use crate::Result;

/// Storage key holding the JSON array of tasks
pub const TASKS_KEY: &str = "tasks";

/// Storage key holding the JSON vibration flag
pub const VIBRATION_KEY: &str = "vibrationEnabled";

#[derive(Debug, Clone)]
struct StoreState {
    tasks: Vec<Task>,
    vibration_enabled: bool,
}

/// Shared handle to the task list and settings
///
/// Cloning is cheap; all clones see the same state. Writers are serialized
/// by holding the state lock across the persistence write.
#[derive(Clone)]
pub struct TaskStore {
    state: Arc<RwLock<StoreState>>,
    storage: Arc<dyn KeyValueStore>,
    haptics: Arc<dyn Haptics>,
}

impl TaskStore {
    /// Load tasks and settings from storage
    ///
    /// Missing keys fall back to an empty list and vibration enabled. Keys
    /// that cannot be read or decoded are logged and fall back the same way.
    pub async fn load(storage: Arc<dyn KeyValueStore>, haptics: Arc<dyn Haptics>) -> Self {
        let tasks: Vec<Task> = load_key(storage.as_ref(), TASKS_KEY)
            .await
            .unwrap_or_default();
        let vibration_enabled: bool = load_key(storage.as_ref(), VIBRATION_KEY)
            .await
            .unwrap_or(true);

        info!(
            tasks = tasks.len(),
            vibration_enabled, "Loaded task store"
        );

        Self {
            state: Arc::new(RwLock::new(StoreState {
                tasks,
                vibration_enabled,
            })),
            storage,
            haptics,
        }
    }

    /// Snapshot of all tasks in insertion order
    pub async fn tasks(&self) -> Vec<Task> {
        self.state.read().await.tasks.clone()
    }

    /// Get a task by ID
    pub async fn get_task(&self, id: &str) -> Option<Task> {
        let state = self.state.read().await;
        state.tasks.iter().find(|t| t.id == id).cloned()
    }

    pub async fn vibration_enabled(&self) -> bool {
        self.state.read().await.vibration_enabled
    }

    /// Distinct categories in order of first appearance, with task counts
    pub async fn categories(&self) -> Vec<CategorySummary> {
        let state = self.state.read().await;
        summarize_categories(&state.tasks)
    }

    pub async fn statistics(&self) -> TaskStatistics {
        let state = self.state.read().await;
        TaskStatistics::from_tasks(&state.tasks)
    }

    /// Tasks in the given category, order preserved
    pub async fn tasks_in_category(&self, category: &str) -> Vec<Task> {
        let state = self.state.read().await;
        state
            .tasks
            .iter()
            .filter(|t| t.category == category)
            .cloned()
            .collect()
    }

    /// Append a new task and persist the list
    pub async fn add_task(&self, input: NewTask) -> Result<Task> {
        input.validate()?;
        let task = input.into_task();

        let vibrate = {
            let mut state = self.state.write().await;
            let mut next = state.tasks.clone();
            next.push(task.clone());
            self.persist_tasks(&next).await?;
            state.tasks = next;
            state.vibration_enabled
        };

        debug!(task_id = %task.id, category = %task.category, "Added task");
        if vibrate {
            self.haptics.vibrate(ADD_PULSE);
        }
        Ok(task)
    }

    /// Merge `patch` over an existing task
    ///
    /// Returns `Ok(None)` without writing anything when no task has `id`.
    pub async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Option<Task>> {
        patch.validate()?;

        let mut state = self.state.write().await;
        let Some(index) = position(&state.tasks, id) else {
            warn!(task_id = id, "Update skipped, task not found");
            return Ok(None);
        };

        let mut next = state.tasks.clone();
        next[index].apply(patch);
        let updated = next[index].clone();
        self.persist_tasks(&next).await?;
        state.tasks = next;

        debug!(task_id = id, "Updated task");
        Ok(Some(updated))
    }

    /// Remove a task and persist the list
    ///
    /// Returns `Ok(false)` when no task has `id`. The unchanged list is still
    /// written in that case.
    pub async fn delete_task(&self, id: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        let mut next = state.tasks.clone();
        let removed = match position(&next, id) {
            Some(index) => {
                next.remove(index);
                true
            }
            None => {
                warn!(task_id = id, "Delete found no task, list unchanged");
                false
            }
        };

        self.persist_tasks(&next).await?;
        state.tasks = next;

        if removed {
            debug!(task_id = id, "Deleted task");
        }
        Ok(removed)
    }

    /// Flip the completion flag of a task
    ///
    /// Returns `Ok(None)` without writing or vibrating when no task has `id`.
    pub async fn toggle_task(&self, id: &str) -> Result<Option<Task>> {
        let (toggled, vibrate) = {
            let mut state = self.state.write().await;
            let Some(index) = position(&state.tasks, id) else {
                warn!(task_id = id, "Toggle skipped, task not found");
                return Ok(None);
            };

            let mut next = state.tasks.clone();
            next[index].completed = !next[index].completed;
            let toggled = next[index].clone();
            self.persist_tasks(&next).await?;
            state.tasks = next;
            (toggled, state.vibration_enabled)
        };

        debug!(task_id = id, completed = toggled.completed, "Toggled task");
        if vibrate {
            self.haptics.vibrate(TOGGLE_PULSE);
        }
        Ok(Some(toggled))
    }

    /// Persist and apply the vibration setting
    pub async fn set_vibration_enabled(&self, enabled: bool) -> Result<()> {
        let mut state = self.state.write().await;
        let content = serde_json::to_string(&enabled)?;
        self.storage
            .set(VIBRATION_KEY, &content)
            .await
            .inspect_err(|e| error!("Failed to save settings: {}", e))?;
        state.vibration_enabled = enabled;

        debug!(enabled, "Updated vibration setting");
        Ok(())
    }

    async fn persist_tasks(&self, tasks: &[Task]) -> Result<()> {
        let content = serde_json::to_string(tasks)?;
        self.storage
            .set(TASKS_KEY, &content)
            .await
            .inspect_err(|e| error!("Failed to save tasks: {}", e))
    }
}

fn position(tasks: &[Task], id: &str) -> Option<usize> {
    tasks.iter().position(|t| t.id == id)
}

async fn load_key<T: DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match storage.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            error!(key, "Failed to read stored value: {}", e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            error!(key, "Failed to parse stored value: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileKeyValueStore, MemoryKeyValueStore};
    use crate::Error;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingHaptics {
        pulses: Mutex<Vec<Duration>>,
    }

    impl RecordingHaptics {
        fn pulses(&self) -> Vec<Duration> {
            self.pulses.lock().unwrap().clone()
        }
    }

    impl Haptics for RecordingHaptics {
        fn vibrate(&self, duration: Duration) {
            self.pulses.lock().unwrap().push(duration);
        }
    }

    /// Memory store whose writes can be switched to fail
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryKeyValueStore,
        fail_writes: AtomicBool,
    }

    #[async_trait]
    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Error::Storage("disk full".to_string()));
            }
            self.inner.set(key, value).await
        }
    }

    async fn create_test_store() -> (TaskStore, MemoryKeyValueStore, Arc<RecordingHaptics>) {
        let storage = MemoryKeyValueStore::new();
        let haptics = Arc::new(RecordingHaptics::default());
        let store = TaskStore::load(Arc::new(storage.clone()), haptics.clone()).await;
        (store, storage, haptics)
    }

    #[tokio::test]
    async fn test_add_to_empty_store() {
        let (store, _, _) = create_test_store().await;

        store.add_task(NewTask::new("Buy milk")).await.unwrap();

        let tasks = store.tasks().await;
        assert_eq!(tasks.len(), 1);
        assert!(!tasks[0].completed);
        assert_eq!(tasks[0].category, "geral");
        assert_eq!(tasks[0].title, "Buy milk");
    }

    #[tokio::test]
    async fn test_add_appends_with_unique_ids() {
        let (store, _, _) = create_test_store().await;

        let first = store.add_task(NewTask::new("Task 1")).await.unwrap();
        let second = store.add_task(NewTask::new("Task 2")).await.unwrap();
        let third = store
            .add_task(NewTask::new("Task 3").with_category(""))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_ne!(second.id, third.id);
        assert_ne!(first.id, third.id);
        assert_eq!(third.category, "geral");

        let titles: Vec<String> = store.tasks().await.into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Task 1", "Task 2", "Task 3"]);
    }

    #[tokio::test]
    async fn test_add_blank_title_is_rejected() {
        let (store, storage, haptics) = create_test_store().await;

        let result = store.add_task(NewTask::new("   ")).await;

        match result.unwrap_err() {
            Error::InvalidInput(_) => {}
            e => panic!("Expected InvalidInput error, got: {:?}", e),
        }
        assert!(store.tasks().await.is_empty());
        assert_eq!(storage.get(TASKS_KEY).await.unwrap(), None);
        assert!(haptics.pulses().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let (store, _, _) = create_test_store().await;
        let task = store.add_task(NewTask::new("Toggle me")).await.unwrap();

        let once = store.toggle_task(&task.id).await.unwrap().unwrap();
        assert!(once.completed);

        let twice = store.toggle_task(&task.id).await.unwrap().unwrap();
        assert!(!twice.completed);
        assert!(!store.get_task(&task.id).await.unwrap().completed);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let (store, _, _) = create_test_store().await;
        let keep = store.add_task(NewTask::new("Keep")).await.unwrap();
        let task = store.add_task(NewTask::new("Task to delete")).await.unwrap();

        assert!(store.delete_task(&task.id).await.unwrap());
        assert!(store.get_task(&task.id).await.is_none());

        assert!(!store.delete_task(&task.id).await.unwrap());

        let tasks = store.tasks().await;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, keep.id);
    }

    #[tokio::test]
    async fn test_update_title_only() {
        let (store, _, _) = create_test_store().await;
        let task = store
            .add_task(NewTask::new("Original title").with_category("work"))
            .await
            .unwrap();
        store.toggle_task(&task.id).await.unwrap();
        let before = store.get_task(&task.id).await.unwrap();

        let updated = store
            .update_task(&task.id, TaskPatch::title("X"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "X");
        assert_eq!(updated.id, before.id);
        assert_eq!(updated.category, before.category);
        assert_eq!(updated.completed, before.completed);
        assert_eq!(updated.created_at, before.created_at);
    }

    #[tokio::test]
    async fn test_update_keeps_position() {
        let (store, _, _) = create_test_store().await;
        store.add_task(NewTask::new("a")).await.unwrap();
        let middle = store.add_task(NewTask::new("b")).await.unwrap();
        store.add_task(NewTask::new("c")).await.unwrap();

        store
            .update_task(&middle.id, TaskPatch::category("home"))
            .await
            .unwrap();

        let tasks = store.tasks().await;
        assert_eq!(tasks[1].id, middle.id);
        assert_eq!(tasks[1].category, "home");
    }

    #[tokio::test]
    async fn test_lookup_miss_is_noop() {
        let (store, storage, haptics) = create_test_store().await;

        assert!(store
            .update_task("missing", TaskPatch::title("X"))
            .await
            .unwrap()
            .is_none());
        assert!(store.toggle_task("missing").await.unwrap().is_none());
        assert_eq!(storage.get(TASKS_KEY).await.unwrap(), None);

        assert!(!store.delete_task("missing").await.unwrap());

        assert!(store.tasks().await.is_empty());
        assert_eq!(storage.get(TASKS_KEY).await.unwrap().as_deref(), Some("[]"));
        assert!(haptics.pulses().is_empty());
    }

    #[tokio::test]
    async fn test_delete_miss_rewrites_malformed_value() {
        let storage = MemoryKeyValueStore::with_entries([(TASKS_KEY, "garbage")]);
        let store = TaskStore::load(
            Arc::new(storage.clone()),
            Arc::new(RecordingHaptics::default()),
        )
        .await;

        assert!(!store.delete_task("missing").await.unwrap());

        assert_eq!(storage.get(TASKS_KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_reload_reproduces_tasks() {
        let (store, storage, _) = create_test_store().await;
        let a = store.add_task(NewTask::new("a").with_category("work")).await.unwrap();
        let b = store.add_task(NewTask::new("b")).await.unwrap();
        let c = store.add_task(NewTask::new("c")).await.unwrap();
        store.toggle_task(&a.id).await.unwrap();
        store.update_task(&b.id, TaskPatch::title("bb")).await.unwrap();
        store.delete_task(&c.id).await.unwrap();
        store.set_vibration_enabled(false).await.unwrap();

        let reloaded = TaskStore::load(Arc::new(storage), Arc::new(RecordingHaptics::default())).await;

        assert_eq!(reloaded.tasks().await, store.tasks().await);
        assert!(!reloaded.vibration_enabled().await);
    }

    #[tokio::test]
    async fn test_statistics_invariant() {
        let (store, _, _) = create_test_store().await;
        assert_eq!(store.statistics().await, TaskStatistics::default());

        let a = store.add_task(NewTask::new("a")).await.unwrap();
        store.add_task(NewTask::new("b")).await.unwrap();
        store.add_task(NewTask::new("c")).await.unwrap();
        store.toggle_task(&a.id).await.unwrap();

        let stats = store.statistics().await;
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.total, stats.completed + stats.pending);
    }

    #[tokio::test]
    async fn test_categories_and_filter() {
        let (store, _, _) = create_test_store().await;
        let w1 = store.add_task(NewTask::new("w1").with_category("work")).await.unwrap();
        store.add_task(NewTask::new("h1").with_category("home")).await.unwrap();
        let w2 = store.add_task(NewTask::new("w2").with_category("work")).await.unwrap();

        let categories = store.categories().await;
        assert_eq!(
            categories,
            vec![
                CategorySummary { name: "work".to_string(), count: 2 },
                CategorySummary { name: "home".to_string(), count: 1 },
            ]
        );

        let work = store.tasks_in_category("work").await;
        let ids: Vec<&str> = work.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![w1.id.as_str(), w2.id.as_str()]);
        assert!(work.iter().all(|t| t.category == "work"));

        assert!(store.tasks_in_category("missing").await.is_empty());
    }

    #[tokio::test]
    async fn test_haptics_follow_setting() {
        let (store, _, haptics) = create_test_store().await;
        assert!(store.vibration_enabled().await);

        let task = store.add_task(NewTask::new("buzz")).await.unwrap();
        store.toggle_task(&task.id).await.unwrap();
        assert_eq!(haptics.pulses(), vec![ADD_PULSE, TOGGLE_PULSE]);

        store.set_vibration_enabled(false).await.unwrap();
        let task = store.add_task(NewTask::new("quiet")).await.unwrap();
        store.toggle_task(&task.id).await.unwrap();
        assert_eq!(haptics.pulses().len(), 2);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_previous_state() {
        let storage = Arc::new(FlakyStore::default());
        let haptics = Arc::new(RecordingHaptics::default());
        let store = TaskStore::load(storage.clone(), haptics.clone()).await;
        let task = store.add_task(NewTask::new("stable")).await.unwrap();
        let persisted = storage.get(TASKS_KEY).await.unwrap();

        storage.fail_writes.store(true, Ordering::SeqCst);

        assert!(store.add_task(NewTask::new("lost")).await.is_err());
        assert!(store.toggle_task(&task.id).await.is_err());
        assert!(store.update_task(&task.id, TaskPatch::title("X")).await.is_err());
        assert!(store.delete_task(&task.id).await.is_err());
        match store.set_vibration_enabled(false).await.unwrap_err() {
            Error::Storage(msg) => assert!(msg.contains("disk full")),
            e => panic!("Expected Storage error, got: {:?}", e),
        }

        assert_eq!(store.tasks().await, vec![task]);
        assert!(store.vibration_enabled().await);
        assert_eq!(storage.get(TASKS_KEY).await.unwrap(), persisted);
        assert_eq!(haptics.pulses(), vec![ADD_PULSE]);
    }

    #[tokio::test]
    async fn test_malformed_values_load_defaults() {
        let storage = MemoryKeyValueStore::with_entries([
            (TASKS_KEY, "not json"),
            (VIBRATION_KEY, "\"maybe\""),
        ]);

        let store = TaskStore::load(Arc::new(storage), Arc::new(RecordingHaptics::default())).await;

        assert!(store.tasks().await.is_empty());
        assert!(store.vibration_enabled().await);
    }

    #[tokio::test]
    async fn test_loads_stored_values() {
        let tasks = r#"[{"id":"0.5","title":"Legacy","category":"home","completed":true,"createdAt":"2024-05-01T10:00:00.000Z"}]"#;
        let storage = MemoryKeyValueStore::with_entries([(TASKS_KEY, tasks), (VIBRATION_KEY, "false")]);

        let store = TaskStore::load(Arc::new(storage), Arc::new(RecordingHaptics::default())).await;

        let loaded = store.get_task("0.5").await.unwrap();
        assert_eq!(loaded.title, "Legacy");
        assert!(loaded.completed);
        assert!(!store.vibration_enabled().await);
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_not_lost() {
        let (store, storage, _) = create_test_store().await;

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.add_task(NewTask::new(format!("Task {}", i))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.tasks().await.len(), 10);
        let raw = storage.get(TASKS_KEY).await.unwrap().unwrap();
        let persisted: Vec<Task> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted.len(), 10);
    }

    #[tokio::test]
    async fn test_persistence_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let task_id;

        {
            let storage = Arc::new(FileKeyValueStore::new(temp_dir.path()));
            let store = TaskStore::load(storage, Arc::new(RecordingHaptics::default())).await;
            let task = store
                .add_task(NewTask::new("Persistent task").with_category("home"))
                .await
                .unwrap();
            task_id = task.id;
        }

        let storage = Arc::new(FileKeyValueStore::new(temp_dir.path()));
        let store = TaskStore::load(storage, Arc::new(RecordingHaptics::default())).await;
        let task = store.get_task(&task_id).await.unwrap();
        assert_eq!(task.title, "Persistent task");
        assert_eq!(task.category, "home");
        assert!(store.vibration_enabled().await);
    }
}
