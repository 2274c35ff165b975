//! Errors reported by this crate

use thiserror::Error;

use crate::todo::TodoId;

#[derive(Debug, Error)]
pub enum TodoError {
    /// A mutator was given a position outside of the current list
    #[error("index {index} is out of range for a list of {len} task(s)")]
    IndexOutOfRange { index: usize, len: usize },
    /// An id-addressed mutator was given an id that no bucket contains
    #[error("no task with id {0}")]
    UnknownTask(TodoId),
    /// A persisted value exists, but it is not the expected structure
    #[error("unable to decode the value stored under {key:?}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unable to write the value of {key:?}: {details}")]
    PersistenceWrite { key: String, details: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
