//! Change notifications emitted by the list models.
//!
//! Observers are shared handles (`Arc<Mutex<_>>`) so a view or a proxy can
//! keep its own state while the model pushes events into it. Events are
//! delivered synchronously, after the model has applied the change, together
//! with the model's current rows.

use std::sync::Arc;

use parking_lot::Mutex;

/// Structural or data change in a list model.
///
/// Row bounds are inclusive, as views expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    RowsInserted { first: usize, last: usize },
    RowsRemoved { first: usize, last: usize },
    DataChanged { first: usize, last: usize },
    /// The whole content was replaced.
    Reset,
}

/// Receives events from a model holding rows of type `T`.
pub trait ModelObserver<T> {
    fn model_changed(&mut self, event: &ModelEvent, rows: &[T]);
}

pub type SharedObserver<T> = Arc<Mutex<dyn ModelObserver<T> + Send>>;

/// Fan-out of model events to registered observers.
pub struct Notifier<T> {
    observers: Vec<SharedObserver<T>>,
}

impl<T> Notifier<T> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: SharedObserver<T>) {
        self.observers.push(observer);
    }

    /// Removes `observer`; returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, observer: &SharedObserver<T>) -> bool {
        let before = self.observers.len();
        self.observers
            .retain(|o| Arc::as_ptr(o) as *const () != Arc::as_ptr(observer) as *const ());
        self.observers.len() != before
    }

    pub fn emit(&self, event: &ModelEvent, rows: &[T]) {
        for observer in &self.observers {
            observer.lock().model_changed(event, rows);
        }
    }
}

impl<T> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::recorder;
    use super::*;

    #[test]
    fn test_emit_reaches_every_observer() {
        let first = recorder();
        let second = recorder();
        let mut notifier: Notifier<u32> = Notifier::new();
        notifier.subscribe(first.clone());
        notifier.subscribe(second.clone());

        notifier.emit(&ModelEvent::RowsInserted { first: 2, last: 2 }, &[1, 2, 3]);

        for r in [&first, &second] {
            let r = r.lock();
            assert_eq!(r.events, vec![ModelEvent::RowsInserted { first: 2, last: 2 }]);
            assert_eq!(r.last_row_count, 3);
        }
    }

    #[test]
    fn test_unsubscribe() {
        let rec = recorder();
        let handle: SharedObserver<u32> = rec.clone();
        let mut notifier: Notifier<u32> = Notifier::new();
        notifier.subscribe(handle.clone());

        assert!(notifier.unsubscribe(&handle));
        assert!(!notifier.unsubscribe(&handle));

        notifier.emit(&ModelEvent::Reset, &[]);
        assert!(rec.lock().events.is_empty());
    }
}
