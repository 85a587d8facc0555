//! Core library for the todo app
//!
//! This crate contains the core business logic, including:
//! - Task model and the task store
//! - Key-value persistence backends
//! - Haptic feedback collaborators

pub mod error;
pub mod haptics;
pub mod storage;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
