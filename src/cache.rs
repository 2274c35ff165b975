//! This module provides a local, file-backed store for the task lists

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use crate::error::TodoError;
use crate::traits::KeyValueStore;

/// A [`KeyValueStore`] that stores every value in its own file inside a folder
#[derive(Clone, Debug, PartialEq)]
pub struct FileStore {
    backing_folder: PathBuf,
}

impl FileStore {
    /// Get the path to the default folder. See [`DEFAULT_DATA_FOLDER`](crate::config::DEFAULT_DATA_FOLDER)
    pub fn default_folder() -> PathBuf {
        crate::config::DEFAULT_DATA_FOLDER.clone()
    }

    /// Open a store backed by `folder`, creating the folder if needed
    pub fn new(folder: &Path) -> Result<Self, TodoError> {
        std::fs::create_dir_all(folder)?;
        Ok(Self {
            backing_folder: PathBuf::from(folder),
        })
    }

    pub fn folder(&self) -> &Path {
        &self.backing_folder
    }

    /// The file that holds the value of `key`
    fn value_file(&self, key: &str) -> PathBuf {
        let mut filename = sanitize_filename::sanitize(key);
        if filename.is_empty() {
            filename = String::from("_");
        }
        self.backing_folder.join(format!("{}.json", filename))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, TodoError> {
        let path = self.value_file(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => {
                log::warn!("Unable to read file {:?}: {}", path, err);
                Err(err.into())
            },
        }
    }

    /// Replaces the file atomically, so that a crash never leaves a half-written value
    async fn set(&self, key: &str, value: String) -> Result<(), TodoError> {
        let path = self.value_file(key);
        let mut temp = NamedTempFile::new_in(&self.backing_folder)?;
        temp.write_all(value.as_bytes())?;
        temp.flush()?;
        temp.persist(&path)
            .map_err(|err| TodoError::PersistenceWrite {
                key: key.to_string(),
                details: format!("unable to replace {:?}: {}", path, err),
            })?;
        log::debug!("Saved {:?} into {:?}", key, path);
        Ok(())
    }
}
