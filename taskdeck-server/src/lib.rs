//! `TaskDeck` reference server library.
//!
//! Exposes the task API server for use in tests and embedding. The server
//! keeps its task table in memory and speaks the JSON envelope protocol
//! defined in `taskdeck-proto`.

pub mod config;
pub mod server;
pub mod store;
