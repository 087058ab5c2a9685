//! todo - a single-list task tracker
//!
//! # Module Organization
//!
//! - `task`: task record, category and priority
//! - `store`: ordered in-memory task list with change notifications
//! - `status`: row color derived from done/overdue/priority
//! - `storage`: the flat `tasks.csv` line format
//! - `config`: `todo.toml` loading
//! - `cli`: command-line interface using clap
//! - `ui`: terminal front end

pub mod cli;
pub mod config;
pub mod error;
pub mod status;
pub mod storage;
pub mod store;
pub mod task;
pub mod ui;

pub use error::{Error, Result};
pub use status::{derived_color, RowColor};
pub use store::{StoreEvent, TaskStore};
pub use task::{Category, Priority, Task};
