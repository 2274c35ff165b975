//! Stateless operations over lists of [`Todo`]s
//!
//! These never mutate their input: they return the new list, that the caller is free to publish (or to drop).

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::TodoError;
use crate::todo::{Todo, TodoId};

/// Scheduled tasks, grouped by day. Each list keeps its insertion order.
pub type ScheduledTodos = BTreeMap<NaiveDate, Vec<Todo>>;

/// The two sections a task can belong to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Tasks planned for a given day
    Scheduled(NaiveDate),
    /// The unordered backlog
    Anytime,
}

/// Tells which bucket a task belongs to
pub fn bucket_for(todo: &Todo) -> Bucket {
    match todo.date() {
        Some(date) => Bucket::Scheduled(date),
        None => Bucket::Anytime,
    }
}

/// Returns a copy of `list`, where the task at `index` has its completion flipped
pub fn toggle_completion(list: &[Todo], index: usize) -> Result<Vec<Todo>, TodoError> {
    check_index(list, index)?;
    Ok(list.iter()
        .enumerate()
        .map(|(i, todo)| {
            let mut todo = todo.clone();
            if i == index {
                todo.toggle_completion();
            }
            todo
        })
        .collect()
    )
}

/// Returns a copy of `list` without the task at `index`
pub fn remove_at(list: &[Todo], index: usize) -> Result<Vec<Todo>, TodoError> {
    check_index(list, index)?;
    Ok(list.iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, todo)| todo.clone())
        .collect()
    )
}

/// Returns the current position of a task in `list`
pub fn position_of(list: &[Todo], id: &TodoId) -> Option<usize> {
    list.iter().position(|todo| todo.id() == id)
}

fn check_index(list: &[Todo], index: usize) -> Result<(), TodoError> {
    if index >= list.len() {
        return Err(TodoError::IndexOutOfRange { index, len: list.len() });
    }
    Ok(())
}
