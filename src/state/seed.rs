//! Demo tasks, created on the very first launch

use chrono::NaiveDate;

use crate::task_store::ScheduledTodos;
use crate::todo::Todo;

pub const SCHEDULED_DEMO_TITLE: &str = "Create new task";
pub const SCHEDULED_DEMO_TIME: &str = "8:00 PM";
pub const SCHEDULED_DEMO_DESCRIPTION: &str = "Click the plus button to add a scheduled task.";

pub const ANYTIME_DEMO_TITLE: &str = "Update your task";
pub const ANYTIME_DEMO_DESCRIPTION: &str = "This task has not yet been scheduled.";

/// One scheduled task on `today`, and one task in the backlog
pub fn demo_tasks(today: NaiveDate) -> (ScheduledTodos, Vec<Todo>) {
    let scheduled_demo = Todo::new_scheduled(SCHEDULED_DEMO_TITLE.to_string(), today)
        .with_time(SCHEDULED_DEMO_TIME.to_string())
        .with_description(SCHEDULED_DEMO_DESCRIPTION.to_string());
    let anytime_demo = Todo::new(ANYTIME_DEMO_TITLE.to_string())
        .with_description(ANYTIME_DEMO_DESCRIPTION.to_string());

    let mut scheduled = ScheduledTodos::new();
    scheduled.insert(today, vec![scheduled_demo]);
    (scheduled, vec![anytime_demo])
}
