//! To-do tasks

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use chrono::NaiveDate;
use uuid::Uuid;


/// A stable identifier, assigned once when a task is created.
///
/// Rows of a list can move when other tasks are added or removed, this id does not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId {
    content: Uuid,
}

impl TodoId {
    /// Generate a random TodoId.
    pub fn random() -> Self {
        Self { content: Uuid::new_v4() }
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.content
    }
}

impl From<Uuid> for TodoId {
    fn from(content: Uuid) -> Self {
        Self { content }
    }
}

impl FromStr for TodoId {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let content = Uuid::parse_str(s)?;
        Ok(Self { content })
    }
}

impl Display for TodoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content.to_hyphenated())
    }
}



/// A to-do task
///
/// Optional text fields never hold an empty string: `Some("")` is stored as `None`, `None` fields are
/// omitted when serializing, and a missing, `null` or `""` field deserializes as `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Records written before ids existed get a fresh one
    #[serde(default = "TodoId::random")]
    id: TodoId,

    /// The display name of the task
    title: String,

    /// The day this task is scheduled for. `None` for tasks of the "Anytime" backlog.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    date: Option<NaiveDate>,
    /// A free-form display time, e.g. "8:00 PM"
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    description: Option<String>,

    #[serde(default)]
    is_completed: bool,
}

impl Todo {
    /// Create a brand new, uncompleted task of the "Anytime" backlog.
    /// This will pick a new (random) task ID.
    pub fn new(title: String) -> Self {
        Self::new_with_parameters(TodoId::random(), title, None, None, None, false)
    }

    /// Create a brand new, uncompleted task scheduled on `date`.
    /// This will pick a new (random) task ID.
    pub fn new_scheduled(title: String, date: NaiveDate) -> Self {
        Self::new_with_parameters(TodoId::random(), title, Some(date), None, None, false)
    }

    /// Create a new Todo instance, that may already exist elsewhere (e.g. in a persisted list)
    pub fn new_with_parameters(id: TodoId, title: String, date: Option<NaiveDate>,
                               time: Option<String>, description: Option<String>,
                               is_completed: bool,
                            ) -> Self
    {
        Self {
            id,
            title,
            date,
            time: non_empty(time),
            description: non_empty(description),
            is_completed,
        }
    }

    pub fn with_time(mut self, time: String) -> Self {
        self.set_time(Some(time));
        self
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.set_description(Some(description));
        self
    }

    pub fn with_completed(mut self, is_completed: bool) -> Self {
        self.is_completed = is_completed;
        self
    }

    pub fn id(&self) -> &TodoId              { &self.id }
    pub fn title(&self) -> &str              { &self.title }
    pub fn date(&self) -> Option<NaiveDate>  { self.date }
    pub fn time(&self) -> Option<&str>       { self.time.as_deref() }
    pub fn description(&self) -> Option<&str> { self.description.as_deref() }
    pub fn completed(&self) -> bool          { self.is_completed }

    pub fn set_title(&mut self, new_title: String) {
        self.title = new_title;
    }

    /// Change the day of this task. `None` moves it to the "Anytime" backlog.
    ///
    /// A task that is already stored in a list must rather be edited through the state container, so that it ends up in the right bucket.
    pub fn set_date(&mut self, new_date: Option<NaiveDate>) {
        self.date = new_date;
    }

    pub fn set_time(&mut self, new_time: Option<String>) {
        self.time = non_empty(new_time);
    }

    pub fn set_description(&mut self, new_description: Option<String>) {
        self.description = non_empty(new_description);
    }

    pub fn set_completed(&mut self, is_completed: bool) {
        self.is_completed = is_completed;
    }

    pub fn toggle_completion(&mut self) {
        self.is_completed = !self.is_completed;
    }

    /// Whether this task has something to display below its title
    pub fn has_details(&self) -> bool {
        self.time.is_some() || self.description.is_some()
    }

    /// The secondary line of a list row: `"<time> <description>"`, or whichever of them is set
    pub fn summary_line(&self) -> String {
        match (self.time(), self.description()) {
            (Some(time), Some(description)) => format!("{} {}", time, description),
            (Some(time), None) => time.to_string(),
            (None, Some(description)) => description.to_string(),
            (None, None) => String::new(),
        }
    }

    /// Compares everything but the ids
    pub fn has_same_content_as(&self, other: &Todo) -> bool {
           self.title == other.title
        && self.date == other.date
        && self.time == other.time
        && self.description == other.description
        && self.is_completed == other.is_completed
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| s.is_empty() == false)
}

/// Used to support serde: older payloads store "no value" as an empty string
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn empty_strings_are_none() {
        let todo = Todo::new("Buy milk".to_string())
            .with_time(String::new())
            .with_description(String::new());
        assert_eq!(todo.time(), None);
        assert_eq!(todo.description(), None);
        assert_eq!(todo.has_details(), false);
    }

    #[test]
    fn absent_fields_are_omitted() {
        let todo = Todo::new("Buy milk".to_string());
        let json = serde_json::to_value(&todo).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.contains_key("id"));
        assert!(object.contains_key("title"));
        assert!(object.contains_key("isCompleted"));
        assert!(object.contains_key("date") == false);
        assert!(object.contains_key("time") == false);
        assert!(object.contains_key("description") == false);
    }

    #[test]
    fn legacy_record_decodes() {
        let json = r#"{"title":"Update your task","date":"","time":"","description":"Not scheduled yet.","isCompleted":false}"#;
        let todo: Todo = serde_json::from_str(json).unwrap();
        assert_eq!(todo.title(), "Update your task");
        assert_eq!(todo.date(), None);
        assert_eq!(todo.time(), None);
        assert_eq!(todo.description(), Some("Not scheduled yet."));
        assert_eq!(todo.completed(), false);
    }

    #[test]
    fn scheduled_record_decodes() {
        let json = r#"{"title":"Create new task","date":"2020-09-23","time":"8:00 PM"}"#;
        let todo: Todo = serde_json::from_str(json).unwrap();
        assert_eq!(todo.date(), Some(date("2020-09-23")));
        assert_eq!(todo.time(), Some("8:00 PM"));
        assert_eq!(todo.completed(), false);
    }

    #[test]
    fn invalid_date_is_an_error() {
        let json = r#"{"title":"Oops","date":"tomorrow"}"#;
        assert!(serde_json::from_str::<Todo>(json).is_err());
    }

    #[test]
    fn serde_todo() {
        let todo = Todo::new_scheduled("Dentist".to_string(), date("2021-07-29"))
            .with_time("9:30 AM".to_string())
            .with_description("Bring the forms".to_string())
            .with_completed(true);

        let json = serde_json::to_string(&todo).unwrap();
        let retrieved: Todo = serde_json::from_str(&json).unwrap();
        assert_eq!(todo, retrieved);
    }

    #[test]
    fn summary_line() {
        let todo = Todo::new("a".to_string());
        assert_eq!(todo.summary_line(), "");
        let todo = todo.with_description("details".to_string());
        assert_eq!(todo.summary_line(), "details");
        let todo = todo.with_time("8:00 PM".to_string());
        assert_eq!(todo.summary_line(), "8:00 PM details");
        assert!(todo.has_details());
    }

    #[test]
    fn todo_id_round_trips_as_text() {
        let id = TodoId::random();
        let parsed: TodoId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);

        let uuid = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let id = TodoId::from(uuid);
        assert_eq!(id.as_uuid(), &uuid);
        assert_eq!(id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }
}
