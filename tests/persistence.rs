//! Tests of the persistence of the task lists, across restarts and in case of store failures

use std::sync::Arc;

use chrono::NaiveDate;

use todo_list::config::{StateConfig, StoreKeys};
use todo_list::mock_behaviour::MockBehaviour;
use todo_list::persistence::write_progress::WriteEvent;
use todo_list::traits::KeyValueStore;
use todo_list::{FileStore, InMemoryStore, Launch, TaskListState, Todo};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn config() -> StateConfig {
    StateConfig::default().with_today(date("2021-07-29"))
}

#[tokio::test]
async fn file_store_survives_restarts() {
    let _ = env_logger::builder().is_test(true).try_init();

    let folder = tempfile::tempdir().unwrap();
    let day = date("2021-08-01");

    {
        let store = FileStore::new(folder.path()).unwrap();
        let state = TaskListState::open_with_config(Arc::new(store), config()).await;
        assert_eq!(state.launch(), Launch::FirstLaunch);

        state.add_task(Todo::new_scheduled("Dentist".to_string(), day).with_time("9:30 AM".to_string()));
        state.add_task(Todo::new("Read a book".to_string()).with_completed(true));
        state.toggle_anytime(0).unwrap();
        state.flush().await;
    }

    let store = FileStore::new(folder.path()).unwrap();
    let state = TaskListState::open_with_config(Arc::new(store), config()).await;
    assert_eq!(state.launch(), Launch::Restored);

    let anytime = state.anytime();
    assert_eq!(anytime.len(), 2);
    assert_eq!(anytime[0].title(), "Update your task");
    assert!(anytime[0].completed());
    assert_eq!(anytime[1].title(), "Read a book");
    assert!(anytime[1].completed());

    let scheduled = state.scheduled();
    assert_eq!(scheduled.len(), 2);
    assert_eq!(scheduled[&date("2021-07-29")][0].title(), "Create new task");
    assert_eq!(scheduled[&day][0].time(), Some("9:30 AM"));
}

#[tokio::test]
async fn custom_keys_are_used() {
    let _ = env_logger::builder().is_test(true).try_init();

    let store = Arc::new(InMemoryStore::new());
    let keys = StoreKeys {
        scheduled: "work.scheduled".to_string(),
        anytime: "work.anytime".to_string(),
        first_launch: "work.launched".to_string(),
    };
    let config = StateConfig { keys, ..config() };
    let state = TaskListState::open_with_config(store.clone(), config).await;
    state.flush().await;

    assert!(store.value("work.scheduled").is_some());
    assert!(store.value("work.anytime").is_some());
    assert!(store.value("work.launched").is_some());
    assert_eq!(store.value("Anytime"), None);
}

#[tokio::test]
async fn failed_writes_keep_the_in_memory_state() {
    let _ = env_logger::builder().is_test(true).try_init();

    let store = Arc::new(InMemoryStore::with_values(vec![
        ("isFirstLaunch".to_string(), "false".to_string()),
    ]));
    store.set_mock_behaviour(MockBehaviour::fail_writes(0, 1));
    let state = TaskListState::open_with_config(store.clone(), config()).await;

    state.add_task(Todo::new("A".to_string()));
    state.flush().await;
    assert_eq!(state.anytime().len(), 1);
    assert_eq!(store.value("Anytime"), None);
    match &*state.persistence_feedback().borrow() {
        WriteEvent::Failed{ key, .. } => assert_eq!(key, "Anytime"),
        other => panic!("unexpected event {:?}", other),
    }

    // The next write stores the whole current list
    state.add_task(Todo::new("B".to_string()));
    state.flush().await;
    assert_eq!(*state.persistence_feedback().borrow(), WriteEvent::Written{ key: "Anytime".to_string() });
    let stored: Vec<Todo> = todo_list::codec::decode("Anytime", &store.value("Anytime").unwrap()).unwrap();
    assert_eq!(stored, state.anytime());
}

#[tokio::test]
async fn unreadable_store_does_not_seed() {
    let _ = env_logger::builder().is_test(true).try_init();

    let store = Arc::new(InMemoryStore::new());
    store.set_mock_behaviour(MockBehaviour {
        get_behaviour: (0, 3),
        ..MockBehaviour::default()
    });
    let state = TaskListState::open_with_config(store.clone(), config()).await;

    assert_eq!(state.launch(), Launch::Restored);
    assert!(state.anytime().is_empty());
    assert!(state.scheduled().is_empty());
    state.flush().await;
    assert_eq!(store.n_writes(), 0);
}

#[tokio::test]
async fn latest_write_wins_on_disk() {
    let _ = env_logger::builder().is_test(true).try_init();

    let folder = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::new(folder.path()).unwrap());
    let state = TaskListState::open_with_config(store.clone(), config()).await;

    for i in 0..20 {
        state.add_task(Todo::new(format!("task {}", i)));
    }
    state.remove_anytime(0).unwrap();
    state.flush().await;

    let raw = store.get("Anytime").await.unwrap().unwrap();
    let stored: Vec<Todo> = todo_list::codec::decode("Anytime", &raw).unwrap();
    assert_eq!(stored, state.anytime());
    assert_eq!(stored.len(), 20);
    assert_eq!(stored[0].title(), "task 0");
}
