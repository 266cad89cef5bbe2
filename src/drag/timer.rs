//! Virtual clock for the long press and auto-scroll steps.
//!
//! The host owns time: it calls `DragController::advance(now)` and every
//! timer whose deadline has passed fires, in deadline order.

use std::collections::BTreeMap;

/// Handle for a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerTask {
    /// Touch press held long enough to start a drag
    LongPress,
    /// Scroll the container by this many pixels
    ScrollStep(f64),
}

/// Deadline-ordered queue of pending timers
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: u64,
    next_id: u64,
    pending: BTreeMap<(u64, TimerId), TimerTask>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedule `task` to fire `delay_ms` after the current time
    pub fn schedule(&mut self, delay_ms: u64, task: TimerTask) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((self.now + delay_ms, id), task);
        id
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.pending.keys().find(|(_, tid)| *tid == id).copied();
        match key {
            Some(key) => self.pending.remove(&key).is_some(),
            None => false,
        }
    }

    /// Pop the earliest timer due at or before `until`, moving the clock
    /// to its deadline. Returns `None` (and moves the clock to `until`)
    /// once nothing more is due.
    pub fn pop_due(&mut self, until: u64) -> Option<(TimerId, TimerTask)> {
        let first = self.pending.keys().next().copied();
        match first {
            Some((deadline, id)) if deadline <= until => {
                let task = self.pending.remove(&(deadline, id))?;
                self.now = self.now.max(deadline);
                Some((id, task))
            }
            _ => {
                self.now = self.now.max(until);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Timers owned by one drag session, so every exit path can cancel them
#[derive(Debug, Default)]
pub struct TimerSet {
    ids: Vec<TimerId>,
}

impl TimerSet {
    pub fn push(&mut self, id: TimerId) {
        self.ids.push(id);
    }

    /// Forget a timer that has fired
    pub fn forget(&mut self, id: TimerId) {
        self.ids.retain(|t| *t != id);
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Cancel every timer in the set, returning how many were still pending
    pub fn cancel_all(&mut self, queue: &mut TimerQueue) -> usize {
        self.ids.drain(..).filter(|id| queue.cancel(*id)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_order() {
        let mut q = TimerQueue::new();
        let late = q.schedule(10, TimerTask::ScrollStep(1.0));
        let early = q.schedule(5, TimerTask::LongPress);
        let same_time = q.schedule(10, TimerTask::ScrollStep(-1.0));

        assert_eq!(q.pop_due(20), Some((early, TimerTask::LongPress)));
        assert_eq!(q.now(), 5);
        assert_eq!(q.pop_due(20).map(|(id, _)| id), Some(late));
        assert_eq!(q.pop_due(20).map(|(id, _)| id), Some(same_time));
        assert_eq!(q.pop_due(20), None);
        assert_eq!(q.now(), 20);
    }

    #[test]
    fn nothing_fires_before_deadline() {
        let mut q = TimerQueue::new();
        q.schedule(500, TimerTask::LongPress);
        assert!(q.pop_due(499).is_none());
        assert_eq!(q.len(), 1);
        assert!(q.pop_due(500).is_some());
    }

    #[test]
    fn cancel_removes_pending() {
        let mut q = TimerQueue::new();
        let id = q.schedule(5, TimerTask::LongPress);
        assert!(q.cancel(id));
        assert!(!q.cancel(id));
        assert!(q.is_empty());
    }

    #[test]
    fn timer_set_cancels_everything() {
        let mut q = TimerQueue::new();
        let mut set = TimerSet::default();
        for k in 0..4 {
            set.push(q.schedule(k * 5, TimerTask::ScrollStep(1.0)));
        }
        let fired = q.pop_due(0).map(|(id, _)| id).unwrap();
        set.forget(fired);
        assert_eq!(set.cancel_all(&mut q), 3);
        assert!(set.is_empty());
        assert!(q.is_empty());
    }
}
