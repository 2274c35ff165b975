//! A value holder that notifies its subscribers whenever it changes

use tokio::sync::watch;

/// Holds the current value of a field, and publishes every new value to its [`Subscription`]s.
///
/// The stored value and the published value are the same thing: a subscriber can never observe a value before it is completely built.
#[derive(Debug)]
pub struct Observable<T> {
    sender: watch::Sender<T>,
}

impl<T: Clone> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _receiver) = watch::channel(initial);
        Self { sender }
    }

    /// Returns a copy of the current value
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Run `f` on the current value, without copying it.
    /// `f` must not publish to this observable.
    pub fn read<R, F: FnOnce(&T) -> R>(&self, f: F) -> R {
        let current = self.sender.borrow();
        f(&*current)
    }

    /// Replace the current value, and notify the subscribers
    pub fn publish(&self, value: T) {
        self.sender.send_replace(value);
    }

    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            receiver: self.sender.subscribe(),
            initial_delivered: false,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}


/// Receives the current value of an [`Observable`], then its latest value after every change.
///
/// A subscriber that does not keep up only gets the most recent value, intermediate values are skipped.
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: watch::Receiver<T>,
    initial_delivered: bool,
}

impl<T: Clone> Subscription<T> {
    /// Returns a copy of the current value, without marking it as seen
    pub fn current(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Wait for the next value.
    ///
    /// The first call returns immediately with the current value.
    /// Returns `None` once the observable has been dropped.
    pub async fn next(&mut self) -> Option<T> {
        if self.initial_delivered == false {
            self.initial_delivered = true;
            return Some(self.receiver.borrow_and_update().clone());
        }

        match self.receiver.changed().await {
            Ok(()) => Some(self.receiver.borrow_and_update().clone()),
            Err(_) => None,
        }
    }

    /// Whether a value has been published since the last one this subscription returned
    pub fn has_changed(&self) -> bool {
        if self.initial_delivered == false {
            return true;
        }
        self.receiver.has_changed().unwrap_or(false)
    }
}
