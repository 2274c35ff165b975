//! A [`KeyValueStore`] that lives in memory

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::TodoError;
use crate::mock_behaviour::MockBehaviour;
use crate::traits::KeyValueStore;

/// A store that keeps its values in a `HashMap`.
///
/// It is mainly useful for tests. Its [`MockBehaviour`] can make some reads or writes fail.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: Mutex<HashMap<String, String>>,
    mock_behaviour: Mutex<MockBehaviour>,
    n_writes: Mutex<u32>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            values: Mutex::new(values.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn set_mock_behaviour(&self, behaviour: MockBehaviour) {
        *lock(&self.mock_behaviour) = behaviour;
    }

    /// Returns a copy of the value stored under `key`, without going through the mock behaviour
    pub fn value(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    /// Counts the successful writes
    pub fn n_writes(&self) -> u32 {
        *lock(&self.n_writes)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, TodoError> {
        lock(&self.mock_behaviour).can_get(key)?;
        Ok(lock(&self.values).get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), TodoError> {
        lock(&self.mock_behaviour).can_set(key)?;
        lock(&self.values).insert(key.to_string(), value);
        *lock(&self.n_writes) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_and_set() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("Anytime").await.unwrap(), None);

        store.set("Anytime", "[]".to_string()).await.unwrap();
        store.set("Anytime", "[{}]".to_string()).await.unwrap();
        assert_eq!(store.get("Anytime").await.unwrap(), Some("[{}]".to_string()));
        assert_eq!(store.n_writes(), 2);
    }

    #[tokio::test]
    async fn failed_writes_change_nothing() {
        let store = InMemoryStore::with_values(vec![("k".to_string(), "v1".to_string())]);
        store.set_mock_behaviour(MockBehaviour::fail_writes(0, 1));

        assert!(store.set("k", "v2".to_string()).await.is_err());
        assert_eq!(store.value("k"), Some("v1".to_string()));
        assert_eq!(store.n_writes(), 0);

        store.set("k", "v3".to_string()).await.unwrap();
        assert_eq!(store.value("k"), Some("v3".to_string()));
    }
}
