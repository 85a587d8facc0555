//! Task module
//!
//! This module contains task-related types and the task store.

mod model;
mod store;

pub use model::*;
pub use store::{TaskStore, TASKS_KEY, VIBRATION_KEY};
