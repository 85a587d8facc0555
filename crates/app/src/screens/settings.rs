//! Settings screen with the vibration switch

use todo_core::task::TaskStore;

pub struct SettingsScreen {
    store: TaskStore,
}

impl SettingsScreen {
    pub const TITLE: &'static str = "Configurações";

    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    pub async fn vibration_enabled(&self) -> bool {
        self.store.vibration_enabled().await
    }

    pub async fn set_vibration_enabled(&self, enabled: bool) -> todo_core::Result<()> {
        self.store.set_vibration_enabled(enabled).await
    }
}
