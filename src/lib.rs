//! This crate manages a personal task list.
//!
//! Tasks ([`Todo`]s) are either scheduled on a given day, or belong to an "Anytime" backlog.
//! Pure operations over lists of tasks are provided in the [`task_store`] module.
//!
//! The lists of an application are owned by a [`TaskListState`](state::TaskListState), a reactive container that publishes every change to its subscribers
//! and persists it in the background into a [`KeyValueStore`](traits::KeyValueStore),
//! e.g. a [`FileStore`](cache::FileStore) on disk.

pub mod traits;
pub mod error;
pub use error::TodoError;

mod todo;
pub use todo::{Todo, TodoId};
pub mod task_store;
pub use task_store::{Bucket, ScheduledTodos};
pub mod codec;
pub mod observable;

pub mod state;
pub use state::{Launch, TaskListState, TaskLocation};
pub mod persistence;

pub mod cache;
pub use cache::FileStore;
pub mod memory_store;
pub use memory_store::InMemoryStore;
pub mod mock_behaviour;

pub mod config;
pub mod utils;
