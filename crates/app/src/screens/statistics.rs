//! Statistics screen

use todo_core::task::{TaskStatistics, TaskStore};

pub struct StatisticsScreen {
    store: TaskStore,
}

impl StatisticsScreen {
    pub const TITLE: &'static str = "Estatísticas";

    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    pub async fn snapshot(&self) -> TaskStatistics {
        self.store.statistics().await
    }
}
