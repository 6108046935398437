//! Cooperative, cancellable timers on the stage clock.
//!
//! Nothing here sleeps. A task is due once the stage clock reaches its
//! deadline, and it fires the next time the stage drains the scheduler at a
//! frame boundary. Tasks are keyed: scheduling a key that is already pending
//! replaces the old deadline, and cancelling a key removes it, so a stale
//! timer can never fire after a newer request superseded it.

/// Keyed one-shot timers.
#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    pending: Vec<(K, f64)>,
}

impl<K: Copy + PartialEq> Scheduler<K> {
    /// An empty scheduler.
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Schedule `key` to fire at time `due_at`, replacing any pending task
    /// with the same key.
    pub fn schedule(&mut self, key: K, due_at: f64) {
        self.cancel(key);
        self.pending.push((key, due_at));
    }

    /// Cancel a pending task. Returns `true` if one was pending.
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(k, _)| *k != key);
        self.pending.len() != before
    }

    /// Whether `key` is scheduled and not yet drained.
    pub fn is_pending(&self, key: K) -> bool {
        self.pending.iter().any(|(k, _)| *k == key)
    }

    /// Deadline of a pending task.
    pub fn due_at(&self, key: K) -> Option<f64> {
        self.pending
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, due)| *due)
    }

    /// Remove and return every task due at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: f64) -> Vec<K> {
        let mut due: Vec<(K, f64)> = Vec::new();
        self.pending.retain(|&(key, at)| {
            if at <= now {
                due.push((key, at));
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.1.total_cmp(&b.1));
        due.into_iter().map(|(key, _)| key).collect()
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// No task is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<K: Copy + PartialEq> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}
