//! Shared type definitions for the `TaskDeck` task API.

pub mod task;
pub mod wire;
