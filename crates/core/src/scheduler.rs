//! Single-threaded timeline for deferred work.
//!
//! Used for the staggered "reveal all" animation: each reveal is scheduled
//! with a delay and fires once the timeline is advanced past its due time.
//! Nothing here sleeps; the owner decides how time moves (a virtual clock in
//! tests, wall-clock time in the terminal front end).
//!
//! # Implementation
//!
//! A priority queue (min-heap) keyed by due time. Ties fire in the order they
//! were scheduled. Scheduled tasks cannot be cancelled.

use std::collections::BinaryHeap;
use std::time::Duration;

/// A task with its due time and scheduling sequence number.
#[derive(Debug, Clone)]
struct Scheduled<T> {
    due: Duration,
    seq: u64,
    task: T,
}

// Ordering for the heap (min-heap: earliest due first, then FIFO)
impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed so BinaryHeap pops the earliest task
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Timeline of tasks due at offsets from page start.
///
/// # Thread Safety
/// Not thread-safe; owned by the single event loop driving the page.
#[derive(Debug)]
pub struct Timeline<T> {
    queue: BinaryHeap<Scheduled<T>>,
    now: Duration,
    next_seq: u64,
}

impl<T> Timeline<T> {
    /// Create an empty timeline at time zero.
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            now: Duration::ZERO,
            next_seq: 0,
        }
    }

    /// Current time on the timeline.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `task` to fire `delay` after the current time.
    pub fn schedule_after(&mut self, delay: Duration, task: T) {
        let due = self.now + delay;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled { due, seq, task });
    }

    /// Move the clock forward to `now` (never backwards).
    pub fn set_now(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Pop the next task whose due time has arrived.
    ///
    /// # Returns
    /// - `Some(task)` if the earliest task is due at or before the current time
    /// - `None` if nothing is due yet
    pub fn pop_due(&mut self) -> Option<T> {
        match self.queue.peek() {
            Some(scheduled) if scheduled.due <= self.now => {
                self.queue.pop().map(|scheduled| scheduled.task)
            }
            _ => None,
        }
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|scheduled| scheduled.due)
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}
