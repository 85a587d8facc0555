//! Presentation layer for the todo app
//!
//! Screen controllers consume a [`todo_core::task::TaskStore`] handed to them
//! at construction.

pub mod config;
pub mod screens;
pub mod snapshot;

pub use config::AppConfig;
pub use snapshot::AppSnapshot;
