use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

struct Task<E> {
    id: TaskId,
    due: Instant,
    event: E,
}

/// Delayed one-shot events, polled by the host loop.
///
/// Nothing runs on its own: the owner calls [`Scheduler::drain_due`] each tick
/// and handles the returned events. Dropping the scheduler (or calling
/// [`Scheduler::clear`]) cancels everything still pending.
pub struct Scheduler<E> {
    tasks: Vec<Task<E>>,
    next_id: u64,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self { tasks: Vec::new(), next_id: 0 }
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, event: E) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task { id, due: now + delay, event });
        id
    }

    /// Returns false if the task already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    /// Removes and returns every event whose delay has elapsed, earliest first.
    /// Ties keep scheduling order.
    pub fn drain_due(&mut self, now: Instant) -> Vec<E> {
        let (mut due, pending): (Vec<Task<E>>, Vec<Task<E>>) =
            self.tasks.drain(..).partition(|task| task.due <= now);
        self.tasks = pending;

        due.sort_by_key(|task| (task.due, task.id.0));
        due.into_iter().map(|task| task.event).collect()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}
