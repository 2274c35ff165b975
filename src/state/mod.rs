//! The reactive state container of the task lists
//!
//! A [`TaskListState`] owns the "Scheduled" and "Anytime" buckets and the currently selected day.
//! It is the only writer of these values and of their persisted copies: collaborators (e.g. a UI) subscribe to its observables,
//! and change them through its mutators.

use std::sync::{Arc, Mutex, MutexGuard};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;

use crate::codec;
use crate::config::{StateConfig, StoreKeys};
use crate::error::TodoError;
use crate::observable::{Observable, Subscription};
use crate::persistence::Persister;
use crate::persistence::write_progress::FeedbackReceiver;
use crate::task_store::{self, Bucket, ScheduledTodos};
use crate::todo::{Todo, TodoId};
use crate::traits::KeyValueStore;

pub mod seed;

/// How the state has been initialised
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Launch {
    /// The store had never been used: demo tasks have been created
    FirstLaunch,
    /// The buckets have been loaded from the store
    Restored,
}

/// Where a task currently is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskLocation {
    Scheduled{ date: NaiveDate, index: usize },
    Anytime{ index: usize },
}

impl TaskLocation {
    pub fn bucket(&self) -> Bucket {
        match self {
            TaskLocation::Scheduled{ date, .. } => Bucket::Scheduled(*date),
            TaskLocation::Anytime{ .. } => Bucket::Anytime,
        }
    }
}


/// The task lists of the application.
///
/// There should be a single instance, created by [`TaskListState::open`] and shared (usually in an `Arc`) with whatever needs it.
/// Every mutator updates the in-memory value, publishes it to subscribers, then enqueues a background write of the changed bucket(s).
/// Mutators are serialized by an internal lock, so that concurrent callers never lose an update.
pub struct TaskListState {
    scheduled: Observable<ScheduledTodos>,
    anytime: Observable<Vec<Todo>>,
    selected_date: Observable<NaiveDate>,

    store: Arc<dyn KeyValueStore>,
    persister: Persister,
    keys: StoreKeys,
    launch: Launch,
    panic_on_invalid_index: bool,

    write_lock: Mutex<()>,
    /// Incremented by every committed mutation
    generation: AtomicU64,
}

impl std::fmt::Debug for TaskListState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskListState")
            .field("keys", &self.keys)
            .field("launch", &self.launch)
            .field("selected_date", &self.selected_date())
            .field("scheduled_days", &self.scheduled.read(|scheduled| scheduled.len()))
            .field("anytime_tasks", &self.anytime.read(|anytime| anytime.len()))
            .finish()
    }
}

impl TaskListState {
    /// Initialize the state from `store`, using the default keys.
    ///
    /// On the first launch (as told by a marker in the store), the lists are seeded with demo tasks.
    /// Otherwise, they are loaded from the store. This never fails: missing or invalid data produce empty lists.
    ///
    /// # Panics
    /// Panics if this is not called from within a tokio runtime
    pub async fn open(store: Arc<dyn KeyValueStore>) -> Self {
        Self::open_with_config(store, StateConfig::default()).await
    }

    /// Same as [`Self::open`], with custom options
    pub async fn open_with_config(store: Arc<dyn KeyValueStore>, config: StateConfig) -> Self {
        let today = config.today();
        let persister = Persister::spawn(store.clone());

        let mut state = Self {
            scheduled: Observable::new(ScheduledTodos::new()),
            anytime: Observable::new(Vec::new()),
            selected_date: Observable::new(today),
            store,
            persister,
            keys: config.keys,
            launch: Launch::Restored,
            panic_on_invalid_index: config.panic_on_invalid_index,
            write_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        };

        if state.has_run_before().await {
            state.load_all().await;
        } else {
            state.seed(today);
            state.launch = Launch::FirstLaunch;
        }
        log::info!("Task lists are ready ({:?})", state.launch);
        state
    }

    pub fn launch(&self) -> Launch {
        self.launch
    }

    async fn has_run_before(&self) -> bool {
        match self.store.get(&self.keys.first_launch).await {
            Ok(marker) => marker.is_some(),
            Err(err) => {
                // Seeding would replace whatever the store contains
                log::warn!("Unable to read the first launch marker: {}. Assuming it is set", err);
                true
            },
        }
    }

    fn seed(&self, today: NaiveDate) {
        let _guard = self.lock();
        log::info!("First launch, creating demo tasks for {}", today);

        let (scheduled, anytime) = seed::demo_tasks(today);
        self.scheduled.publish(scheduled);
        self.save_scheduled();
        self.anytime.publish(anytime);
        self.save_anytime();
        // Set last, so that an interrupted seeding is started over
        self.persister.enqueue(&self.keys.first_launch, String::from("false"));
    }

    /// Reload both buckets from the store, replacing the in-memory ones.
    ///
    /// Missing or invalid values are loaded as empty buckets.
    /// If a mutation is committed while the store is being read, the buckets are read again, so that the mutation is not lost.
    pub async fn load_all(&self) {
        loop {
            let generation = self.generation.load(Ordering::SeqCst);
            // Mutations committed so far must have reached the store
            self.persister.flush().await;

            let raw_scheduled = self.read_value(&self.keys.scheduled).await;
            let raw_anytime = self.read_value(&self.keys.anytime).await;

            let mut scheduled: ScheduledTodos = codec::decode_or_default(&self.keys.scheduled, raw_scheduled.as_deref());
            scheduled.retain(|_, day| day.is_empty() == false);
            let anytime: Vec<Todo> = codec::decode_or_default(&self.keys.anytime, raw_anytime.as_deref());

            if self.publish_loaded(generation, scheduled, anytime) {
                return;
            }
            log::debug!("The task lists changed while they were loaded, loading them again");
        }
    }

    /// Publish loaded buckets, unless a mutation has been committed since `generation`
    fn publish_loaded(&self, generation: u64, scheduled: ScheduledTodos, anytime: Vec<Todo>) -> bool {
        let _guard = self.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        log::info!("Loaded {} scheduled day(s) and {} anytime task(s)", scheduled.len(), anytime.len());
        self.scheduled.publish(scheduled);
        self.anytime.publish(anytime);
        true
    }

    async fn read_value(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Unable to read {:?}: {}", key, err);
                None
            },
        }
    }

    /// Enqueue a write of both buckets, even if they have not changed
    pub fn save_all(&self) {
        let _guard = self.lock();
        self.save_scheduled();
        self.save_anytime();
    }

    /// Wait until every write enqueued so far has been attempted
    pub async fn flush(&self) {
        self.persister.flush().await
    }

    /// Returns a receiver that holds the outcome of the latest background write
    pub fn persistence_feedback(&self) -> FeedbackReceiver {
        self.persister.feedback()
    }

    fn save_scheduled(&self) {
        self.scheduled.read(|scheduled| self.persister.save(&self.keys.scheduled, scheduled));
    }

    fn save_anytime(&self) {
        self.anytime.read(|anytime| self.persister.save(&self.keys.anytime, anytime));
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }



    pub fn scheduled(&self) -> ScheduledTodos {
        self.scheduled.get()
    }

    pub fn anytime(&self) -> Vec<Todo> {
        self.anytime.get()
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date.get()
    }

    /// The tasks scheduled on `date` (possibly none)
    pub fn tasks_for(&self, date: NaiveDate) -> Vec<Todo> {
        self.scheduled.read(|scheduled| scheduled.get(&date).cloned().unwrap_or_default())
    }

    pub fn tasks_for_selected_date(&self) -> Vec<Todo> {
        self.tasks_for(self.selected_date())
    }

    pub fn subscribe_scheduled(&self) -> Subscription<ScheduledTodos> {
        self.scheduled.subscribe()
    }

    pub fn subscribe_anytime(&self) -> Subscription<Vec<Todo>> {
        self.anytime.subscribe()
    }

    pub fn subscribe_selected_date(&self) -> Subscription<NaiveDate> {
        self.selected_date.subscribe()
    }

    /// Returns the current location of a task
    pub fn locate(&self, id: &TodoId) -> Option<TaskLocation> {
        if let Some(index) = self.anytime.read(|anytime| task_store::position_of(anytime, id)) {
            return Some(TaskLocation::Anytime{ index });
        }
        self.scheduled.read(|scheduled| {
            scheduled.iter()
                .find_map(|(date, day)| {
                    task_store::position_of(day, id).map(|index| TaskLocation::Scheduled{ date: *date, index })
                })
        })
    }



    /// Change the selected day. This is only a view filter: no bucket is changed, nothing is persisted.
    pub fn select_date(&self, date: NaiveDate) {
        let _guard = self.lock();
        self.selected_date.publish(date);
    }

    pub fn toggle_anytime(&self, index: usize) -> Result<(), TodoError> {
        self.mutate(|draft| draft.toggle(TaskLocation::Anytime{ index }))
    }

    pub fn remove_anytime(&self, index: usize) -> Result<(), TodoError> {
        self.mutate(|draft| draft.remove(TaskLocation::Anytime{ index }))
    }

    /// Toggle the completion of a task scheduled on `date`.
    /// Nothing happens if no task is scheduled on that day.
    pub fn toggle_scheduled(&self, date: NaiveDate, index: usize) -> Result<(), TodoError> {
        self.mutate(|draft| {
            if draft.has_day(date) == false {
                log::debug!("No task on {}, nothing to toggle", date);
                return Ok(());
            }
            draft.toggle(TaskLocation::Scheduled{ date, index })
        })
    }

    /// Remove a task scheduled on `date`. A day that has no task left is removed from the map.
    /// Nothing happens if no task is scheduled on that day.
    pub fn remove_scheduled(&self, date: NaiveDate, index: usize) -> Result<(), TodoError> {
        self.mutate(|draft| {
            if draft.has_day(date) == false {
                log::debug!("No task on {}, nothing to remove", date);
                return Ok(());
            }
            draft.remove(TaskLocation::Scheduled{ date, index })
        })
    }

    /// Append a task to the bucket it belongs to (see [`task_store::bucket_for`])
    pub fn add_task(&self, todo: Todo) {
        let _guard = self.lock();
        let mut draft = Draft::new(self);
        draft.add(todo);
        draft.commit();
    }

    /// Replace the task at `old_location` by `new_todo`.
    ///
    /// The new task is appended to the bucket it belongs to, that may differ from the old one.
    pub fn update_task(&self, old_location: TaskLocation, new_todo: Todo) -> Result<(), TodoError> {
        self.mutate(|draft| {
            draft.remove(old_location)?;
            draft.add(new_todo);
            Ok(())
        })
    }

    pub fn toggle_task(&self, id: &TodoId) -> Result<(), TodoError> {
        self.mutate(|draft| {
            let location = draft.locate(id)?;
            draft.toggle(location)
        })
    }

    pub fn remove_task(&self, id: &TodoId) -> Result<(), TodoError> {
        self.mutate(|draft| {
            let location = draft.locate(id)?;
            draft.remove(location)
        })
    }

    /// Same as [`Self::update_task`], for the task that currently has this `id`
    pub fn edit_task(&self, id: &TodoId, new_todo: Todo) -> Result<(), TodoError> {
        self.mutate(|draft| {
            let location = draft.locate(id)?;
            draft.remove(location)?;
            draft.add(new_todo);
            Ok(())
        })
    }

    /// Apply `change` to a draft of the buckets, then commit the draft if the change succeeded
    fn mutate<F>(&self, change: F) -> Result<(), TodoError>
    where
        F: FnOnce(&mut Draft) -> Result<(), TodoError>,
    {
        let _guard = self.lock();
        let mut draft = Draft::new(self);
        match change(&mut draft) {
            Ok(()) => {
                draft.commit();
                Ok(())
            },
            Err(err) => {
                log::warn!("Ignoring an invalid change: {}", err);
                if self.panic_on_invalid_index {
                    if let TodoError::IndexOutOfRange{ .. } = err {
                        panic!("Invalid row: {}", err);
                    }
                }
                Err(err)
            },
        }
    }
}


/// The pending changes of a mutation.
///
/// A bucket is copied the first time it is touched. Only touched buckets are published and persisted on commit.
struct Draft<'a> {
    state: &'a TaskListState,
    scheduled: Option<ScheduledTodos>,
    anytime: Option<Vec<Todo>>,
}

impl<'a> Draft<'a> {
    fn new(state: &'a TaskListState) -> Self {
        Self { state, scheduled: None, anytime: None }
    }

    fn scheduled(&mut self) -> &mut ScheduledTodos {
        let state = self.state;
        self.scheduled.get_or_insert_with(|| state.scheduled.get())
    }

    fn anytime(&mut self) -> &mut Vec<Todo> {
        let state = self.state;
        self.anytime.get_or_insert_with(|| state.anytime.get())
    }

    fn has_day(&self, date: NaiveDate) -> bool {
        match &self.scheduled {
            Some(scheduled) => scheduled.contains_key(&date),
            None => self.state.scheduled.read(|scheduled| scheduled.contains_key(&date)),
        }
    }

    fn locate(&self, id: &TodoId) -> Result<TaskLocation, TodoError> {
        self.state.locate(id).ok_or(TodoError::UnknownTask(*id))
    }

    fn toggle(&mut self, location: TaskLocation) -> Result<(), TodoError> {
        match location {
            TaskLocation::Anytime{ index } => {
                let toggled = task_store::toggle_completion(self.anytime(), index)?;
                *self.anytime() = toggled;
            },
            TaskLocation::Scheduled{ date, index } => {
                let scheduled = self.scheduled();
                let day = scheduled.get(&date).map(Vec::as_slice).unwrap_or(&[]);
                let toggled = task_store::toggle_completion(day, index)?;
                scheduled.insert(date, toggled);
            },
        }
        Ok(())
    }

    fn remove(&mut self, location: TaskLocation) -> Result<(), TodoError> {
        match location {
            TaskLocation::Anytime{ index } => {
                let remaining = task_store::remove_at(self.anytime(), index)?;
                *self.anytime() = remaining;
            },
            TaskLocation::Scheduled{ date, index } => {
                let scheduled = self.scheduled();
                let day = scheduled.get(&date).map(Vec::as_slice).unwrap_or(&[]);
                let remaining = task_store::remove_at(day, index)?;
                if remaining.is_empty() {
                    scheduled.remove(&date);
                } else {
                    scheduled.insert(date, remaining);
                }
            },
        }
        Ok(())
    }

    fn add(&mut self, todo: Todo) {
        match task_store::bucket_for(&todo) {
            Bucket::Scheduled(date) => self.scheduled().entry(date).or_default().push(todo),
            Bucket::Anytime => self.anytime().push(todo),
        }
    }

    fn commit(self) {
        let state = self.state;
        if let Some(scheduled) = self.scheduled {
            state.scheduled.publish(scheduled);
            state.save_scheduled();
        }
        if let Some(anytime) = self.anytime {
            state.anytime.publish(anytime);
            state.save_anytime();
        }
        state.generation.fetch_add(1, Ordering::SeqCst);
    }
}
