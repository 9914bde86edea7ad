//! Thread-safe FIFO between the capture side and the frame loop

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use super::event::TimedInputEvent;

/// Unbounded FIFO of [`TimedInputEvent`]s
///
/// Every operation runs under one lock, held only for the length of the
/// operation itself. Share it as `Arc<InputQueue>`.
///
/// `len` and `is_empty` are diagnostic: a concurrent `enqueue` can change the
/// answer before the caller acts on it, so drain with [`InputQueue::try_dequeue`].
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Mutex<VecDeque<TimedInputEvent>>,
}

impl InputQueue {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock means a thread panicked mid-operation; there is no
    // consistent queue to recover.
    fn lock(&self) -> MutexGuard<'_, VecDeque<TimedInputEvent>> {
        self.events.lock().expect("input queue lock poisoned")
    }

    /// Appends an event; never waits on the consumer
    pub fn enqueue(&self, event: TimedInputEvent) {
        self.lock().push_back(event);
    }

    /// Removes and returns the oldest event, or `None` when empty
    pub fn try_dequeue(&self) -> Option<TimedInputEvent> {
        self.lock().pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Discards every queued event, returning how many were dropped
    pub fn clear(&self) -> usize {
        let mut events = self.lock();
        let dropped = events.len();
        events.clear();
        dropped
    }
}
