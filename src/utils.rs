//! Some utility functions

use crate::task_store::ScheduledTodos;
use crate::Todo;

/// A debug utility that pretty-prints the scheduled tasks, day by day
pub fn print_scheduled(scheduled: &ScheduledTodos) {
    for (date, day) in scheduled {
        println!("DAY {}", date);
        print_todos(day);
    }
}

/// A debug utility that pretty-prints a list of tasks
pub fn print_todos(todos: &[Todo]) {
    for todo in todos {
        print_todo(todo);
    }
}

pub fn print_todo(todo: &Todo) {
    let completion = if todo.completed() { "✓" } else { " " };
    if todo.has_details() {
        println!("    {} {}\t{}\t{}", completion, todo.title(), todo.summary_line(), todo.id());
    } else {
        println!("    {} {}\t{}", completion, todo.title(), todo.id());
    }
}
