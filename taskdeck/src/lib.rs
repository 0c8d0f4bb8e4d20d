//! `TaskDeck` — task list client library with optimistic remote sync.

pub mod config;
pub mod gateway;
pub mod repl;
pub mod store;
