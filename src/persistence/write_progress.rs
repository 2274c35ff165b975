//! Utilities to track the outcome of background writes

use std::fmt::{Display, Error, Formatter};

/// The outcome of the latest write of the background writer
#[derive(Clone, Debug, PartialEq)]
pub enum WriteEvent {
    /// Nothing has been written yet
    NotStarted,
    /// A value has been stored successfully
    Written{ key: String },
    /// A value could not be stored. The in-memory state is still valid.
    Failed{ key: String, details: String },
}

impl Display for WriteEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            WriteEvent::NotStarted => write!(f, "Nothing written yet"),
            WriteEvent::Written{key} => write!(f, "[{}] saved", key),
            WriteEvent::Failed{key, details} => write!(f, "[{}] not saved: {}", key, details),
        }
    }
}

impl Default for WriteEvent {
    fn default() -> Self {
        Self::NotStarted
    }
}



/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<WriteEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<WriteEvent>;

/// Create a feeback channel, that can be used to retrieve the outcome of the latest write
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(WriteEvent::default())
}



/// A structure that tracks the writes and the errors that happen in the background writer
pub struct WriteProgress {
    n_writes: u32,
    n_errors: u32,
    feedback_channel: Option<FeedbackSender>
}
impl WriteProgress {
    pub fn new() -> Self {
        Self { n_writes: 0, n_errors: 0, feedback_channel: None }
    }
    pub fn new_with_feedback_channel(channel: FeedbackSender) -> Self {
        Self { n_writes: 0, n_errors: 0, feedback_channel: Some(channel) }
    }

    pub fn n_writes(&self) -> u32 {
        self.n_writes
    }
    pub fn n_errors(&self) -> u32 {
        self.n_errors
    }

    /// Record a successful write
    pub fn written(&mut self, key: &str) {
        log::debug!("Stored {:?}", key);
        self.n_writes += 1;
        self.feedback(WriteEvent::Written{ key: key.to_string() });
    }

    /// Record (and log) a failed write
    pub fn failed(&mut self, key: &str, details: &str) {
        log::error!("Unable to store {:?}: {}", key, details);
        self.n_errors += 1;
        self.feedback(WriteEvent::Failed{ key: key.to_string(), details: details.to_string() });
    }

    /// Send an event as a feedback to the listener (if any).
    fn feedback(&mut self, event: WriteEvent) {
        if let Some(sender) = self.feedback_channel.as_ref() {
            sender.send_replace(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_reports_to_its_channel() {
        let (sender, receiver) = feedback_channel();
        let mut progress = WriteProgress::new_with_feedback_channel(sender);
        assert_eq!(*receiver.borrow(), WriteEvent::NotStarted);

        progress.written("Anytime");
        assert_eq!(*receiver.borrow(), WriteEvent::Written{ key: "Anytime".to_string() });

        progress.failed("Scheduled", "disk full");
        assert_eq!(receiver.borrow().to_string(), "[Scheduled] not saved: disk full");
        assert_eq!(progress.n_writes(), 1);
        assert_eq!(progress.n_errors(), 1);
    }

    #[test]
    fn progress_without_channel() {
        let mut progress = WriteProgress::new();
        progress.failed("Anytime", "oops");
        assert_eq!(progress.n_errors(), 1);
    }
}
