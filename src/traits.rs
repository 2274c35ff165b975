use async_trait::async_trait;

use crate::error::TodoError;

/// A durable key-value store, used to persist the task lists between runs.
///
/// Implementors may be slow (e.g. disk-backed): the state container only calls `set` from a background writer.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if nothing has ever been stored there
    async fn get(&self, key: &str) -> Result<Option<String>, TodoError>;
    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: String) -> Result<(), TodoError>;
}
