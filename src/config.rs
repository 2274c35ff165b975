//! Support for library configuration options

use std::path::PathBuf;

use chrono::NaiveDate;
use once_cell::sync::Lazy;

/// The folder used by [`FileStore::default_folder`](crate::cache::FileStore::default_folder).
/// It can be overridden with the `TODO_LIST_DATA_DIR` environment variable.
pub static DEFAULT_DATA_FOLDER: Lazy<PathBuf> = Lazy::new(|| {
    match std::env::var_os("TODO_LIST_DATA_DIR") {
        Some(folder) => PathBuf::from(folder),
        None => PathBuf::from("todo-list-data"),
    }
});

/// The keys the state container reads and writes in its [`KeyValueStore`](crate::traits::KeyValueStore)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreKeys {
    pub scheduled: String,
    pub anytime: String,
    /// Set once the first launch has been handled (i.e. demo tasks have been created)
    pub first_launch: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            scheduled: String::from("Scheduled"),
            anytime: String::from("Anytime"),
            first_launch: String::from("isFirstLaunch"),
        }
    }
}

/// Options of a [`TaskListState`](crate::state::TaskListState)
#[derive(Clone, Debug)]
pub struct StateConfig {
    pub keys: StoreKeys,
    /// The day used as "today" (initial selected date, date of the demo task).
    /// `None` uses the local date.
    pub today: Option<NaiveDate>,
    /// Whether a mutator given an out-of-range index panics, after logging it.
    /// Set in debug builds. When unset, the mutator returns an error and changes nothing.
    pub panic_on_invalid_index: bool,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            keys: StoreKeys::default(),
            today: None,
            panic_on_invalid_index: cfg!(debug_assertions),
        }
    }
}

impl StateConfig {
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_panic_on_invalid_index(mut self, panic_on_invalid_index: bool) -> Self {
        self.panic_on_invalid_index = panic_on_invalid_index;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
