//! This module writes values to a [`KeyValueStore`] in the background
//!
//! Callers never wait for a write to complete. Writes are performed one after the other, in the order they have been enqueued,
//! so that an older value can never overwrite a newer one.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use crate::codec;
use crate::error::TodoError;
use crate::traits::KeyValueStore;

pub mod write_progress;
use write_progress::{FeedbackReceiver, WriteProgress};

enum WriteJob {
    Set{ key: String, value: String },
    /// Acknowledged once every job enqueued before it has been handled
    Flush(oneshot::Sender<()>),
}

/// A handle to the background writer
///
/// The writer stops once this handle is dropped, after it has handled the jobs that are still queued.
#[derive(Debug)]
pub struct Persister {
    jobs: mpsc::UnboundedSender<WriteJob>,
    feedback: FeedbackReceiver,
}

impl std::fmt::Debug for WriteJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteJob::Set{key, value} => write!(f, "Set({:?}, {} bytes)", key, value.len()),
            WriteJob::Flush(_) => write!(f, "Flush"),
        }
    }
}

impl Persister {
    /// Start a background writer for `store`.
    ///
    /// # Panics
    /// Panics if this is not called from within a tokio runtime
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        let (jobs, receiver) = mpsc::unbounded_channel();
        let (feedback_sender, feedback) = write_progress::feedback_channel();
        let progress = WriteProgress::new_with_feedback_channel(feedback_sender);
        tokio::spawn(run_writer(store, receiver, progress));

        Self { jobs, feedback }
    }

    /// Enqueue a write of `value` under `key`
    pub fn enqueue(&self, key: &str, value: String) {
        log::debug!("Enqueuing a write of {:?}", key);
        let job = WriteJob::Set{ key: key.to_string(), value };
        if let Err(err) = self.jobs.send(job) {
            log::error!("The background writer has stopped, {:?} is lost", err.0);
        }
    }

    /// Encode `value`, then enqueue its write under `key`
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        match codec::encode(value) {
            Ok(encoded) => self.enqueue(key, encoded),
            Err(err) => log::error!("Unable to encode {:?}: {}", key, err),
        }
    }

    /// Wait until every write enqueued so far has been attempted (successfully or not)
    pub async fn flush(&self) {
        let (done, acknowledged) = oneshot::channel();
        if self.jobs.send(WriteJob::Flush(done)).is_err() {
            log::error!("The background writer has stopped, there is nothing to flush");
            return;
        }
        let _ = acknowledged.await;
    }

    /// Returns a receiver that holds the outcome of the latest write
    pub fn feedback(&self) -> FeedbackReceiver {
        self.feedback.clone()
    }
}

async fn run_writer(store: Arc<dyn KeyValueStore>, mut jobs: mpsc::UnboundedReceiver<WriteJob>, mut progress: WriteProgress) {
    while let Some(job) = jobs.recv().await {
        match job {
            WriteJob::Set{key, value} => {
                match store.set(&key, value).await {
                    Ok(()) => progress.written(&key),
                    Err(err) => {
                        let err = TodoError::PersistenceWrite{ key: key.clone(), details: err.to_string() };
                        progress.failed(&key, &err.to_string());
                    },
                }
            },
            WriteJob::Flush(done) => {
                let _ = done.send(());
            },
        }
    }
    log::debug!("Background writer stopped after {} write(s) and {} error(s)", progress.n_writes(), progress.n_errors());
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::memory_store::InMemoryStore;
    use crate::mock_behaviour::MockBehaviour;
    use write_progress::WriteEvent;

    #[tokio::test]
    async fn writes_keep_their_order() {
        let store = Arc::new(InMemoryStore::new());
        let persister = Persister::spawn(store.clone());

        for i in 0..100 {
            persister.enqueue("counter", i.to_string());
        }
        persister.enqueue("other", "x".to_string());
        persister.flush().await;

        assert_eq!(store.value("counter"), Some("99".to_string()));
        assert_eq!(store.value("other"), Some("x".to_string()));
        assert_eq!(store.n_writes(), 101);
        assert_eq!(*persister.feedback().borrow(), WriteEvent::Written{ key: "other".to_string() });
    }

    #[tokio::test]
    async fn failures_are_reported() {
        let store = Arc::new(InMemoryStore::new());
        store.set_mock_behaviour(MockBehaviour::fail_writes(0, 1));
        let persister = Persister::spawn(store.clone());

        persister.save("Anytime", &vec![1, 2]);
        persister.flush().await;
        match &*persister.feedback().borrow() {
            WriteEvent::Failed{ key, .. } => assert_eq!(key, "Anytime"),
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(store.value("Anytime"), None);

        persister.save("Anytime", &vec![3]);
        persister.flush().await;
        assert_eq!(store.value("Anytime"), Some("[3]".to_string()));
    }
}
