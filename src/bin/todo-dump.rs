//! Prints the task lists stored in a folder.
//!
//! Usage: `todo-dump [FOLDER]`. The folder defaults to `$TODO_LIST_DATA_DIR`, or `./todo-list-data`.
//! Opening a folder for the first time creates the demo tasks in it.

use std::path::PathBuf;
use std::sync::Arc;

use todo_list::cache::FileStore;
use todo_list::persistence::write_progress::WriteEvent;
use todo_list::{Launch, TaskListState};


#[tokio::main]
async fn main() {
    env_logger::init();

    let folder = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => FileStore::default_folder(),
    };

    let store = match FileStore::new(&folder) {
        Ok(store) => store,
        Err(err) => {
            log::error!("Unable to open {:?}: {}", folder, err);
            std::process::exit(1);
        }
    };

    let state = TaskListState::open(Arc::new(store)).await;
    if state.launch() == Launch::FirstLaunch {
        println!("(first launch, demo tasks have been created in {:?})", folder);
    }
    println!("You can set the RUST_LOG environment variable to display more info.");

    println!("---- Scheduled -----");
    todo_list::utils::print_scheduled(&state.scheduled());
    println!("---- Anytime -----");
    todo_list::utils::print_todos(&state.anytime());

    state.flush().await;
    if let WriteEvent::Failed{ key, details } = &*state.persistence_feedback().borrow() {
        log::warn!("Latest write ({}) failed: {}", key, details);
    }
}
