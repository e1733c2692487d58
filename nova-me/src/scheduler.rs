//! One-shot and recurring tasks with epoch-based bulk cancellation
//!
//! The scheduler never runs anything itself. The owner polls it: `take_due`
//! hands back one-shot payloads whose time has come, and `recurring` lists the
//! payloads that want to run on every tick until cancelled.

use std::collections::BTreeMap;
use std::time::Duration;

/// Cancellation handle for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle {
    epoch: u64,
    id: u64,
}

impl TaskHandle {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

struct OnceTask<T> {
    due: Duration,
    payload: T,
}

pub struct Scheduler<T> {
    epoch: u64,
    next_id: u64,
    once: BTreeMap<TaskHandle, OnceTask<T>>,
    recurring: BTreeMap<TaskHandle, T>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            epoch: 0,
            next_id: 0,
            once: BTreeMap::new(),
            recurring: BTreeMap::new(),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn next_handle(&mut self) -> TaskHandle {
        let handle = TaskHandle {
            epoch: self.epoch,
            id: self.next_id,
        };
        self.next_id += 1;
        handle
    }

    /// Run `payload` once the clock reaches `at`
    pub fn schedule_once(&mut self, at: Duration, payload: T) -> TaskHandle {
        let handle = self.next_handle();
        self.once.insert(handle, OnceTask { due: at, payload });
        handle
    }

    /// Keep `payload` in the per-tick set until cancelled
    pub fn schedule_recurring(&mut self, payload: T) -> TaskHandle {
        let handle = self.next_handle();
        self.recurring.insert(handle, payload);
        handle
    }

    /// Returns false when the task already ran, was cancelled, or belongs to an old epoch
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        if handle.epoch != self.epoch {
            return false;
        }
        self.once.remove(&handle).is_some() || self.recurring.remove(&handle).is_some()
    }

    /// Drop every task and start a new epoch; outstanding handles go stale
    pub fn cancel_all(&mut self) {
        self.once.clear();
        self.recurring.clear();
        self.epoch += 1;
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        handle.epoch == self.epoch
            && (self.once.contains_key(&handle) || self.recurring.contains_key(&handle))
    }

    /// Remove and return one-shots due at or before `now`, earliest first.
    /// Ties keep scheduling order.
    pub fn take_due(&mut self, now: Duration) -> Vec<(TaskHandle, T)> {
        let due: Vec<TaskHandle> = self
            .once
            .iter()
            .filter(|(_, task)| task.due <= now)
            .map(|(handle, _)| *handle)
            .collect();

        let mut fired: Vec<(Duration, TaskHandle, T)> = due
            .into_iter()
            .filter_map(|handle| {
                self.once
                    .remove(&handle)
                    .map(|task| (task.due, handle, task.payload))
            })
            .collect();
        fired.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        fired
            .into_iter()
            .map(|(_, handle, payload)| (handle, payload))
            .collect()
    }

    /// Recurring tasks in scheduling order
    pub fn recurring(&self) -> impl Iterator<Item = (TaskHandle, &T)> + '_ {
        self.recurring.iter().map(|(handle, payload)| (*handle, payload))
    }

    pub fn pending_once(&self) -> usize {
        self.once.len()
    }

    pub fn recurring_count(&self) -> usize {
        self.recurring.len()
    }

    pub fn is_idle(&self) -> bool {
        self.once.is_empty() && self.recurring.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
