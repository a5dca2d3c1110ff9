//! Virtual-time event queue
//!
//! Timers are entries in a min-heap keyed by due time. Repeating timers
//! re-arm themselves when popped; cancelling a handle drops it lazily.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

/// Milliseconds since the scheduler was created
pub type Millis = u64;

/// Identifies one armed timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

struct Entry<T> {
    due: Millis,
    seq: u64,
    handle: TimerHandle,
    repeat: Option<Millis>,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Ties fire in scheduling order
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

pub struct Scheduler<T> {
    queue: BinaryHeap<Reverse<Entry<T>>>,
    live: HashSet<TimerHandle>,
    next_seq: u64,
    next_handle: u64,
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            live: HashSet::new(),
            next_seq: 0,
            next_handle: 0,
        }
    }

    /// Fire `task` once at `due`
    pub fn once(&mut self, due: Millis, task: T) -> TimerHandle {
        self.push(due, None, task)
    }

    /// Fire `task` every `interval` ms, first at `now + interval`
    pub fn repeating(&mut self, now: Millis, interval: Millis, task: T) -> TimerHandle {
        let interval = interval.max(1);
        self.push(now + interval, Some(interval), task)
    }

    /// Disarm a timer. Unknown or already-fired handles are ignored.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.live.remove(&handle)
    }

    #[cfg(test)]
    pub fn is_armed(&self, handle: TimerHandle) -> bool {
        self.live.contains(&handle)
    }

    /// Number of armed timers
    #[cfg(test)]
    pub fn armed(&self) -> usize {
        self.live.len()
    }

    /// Pop the earliest task due at or before `now`
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, T)> {
        loop {
            let due = self.queue.peek()?.0.due;
            if due > now {
                return None;
            }
            let Reverse(entry) = self.queue.pop()?;
            if !self.live.contains(&entry.handle) {
                continue;
            }

            match entry.repeat {
                Some(interval) => {
                    let task = entry.task.clone();
                    let seq = self.bump_seq();
                    self.queue.push(Reverse(Entry {
                        due: entry.due + interval,
                        seq,
                        ..entry
                    }));
                    return Some((due, task));
                }
                None => {
                    self.live.remove(&entry.handle);
                    return Some((due, entry.task));
                }
            }
        }
    }

    fn push(&mut self, due: Millis, repeat: Option<Millis>, task: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let seq = self.bump_seq();
        self.live.insert(handle);
        self.queue.push(Reverse(Entry { due, seq, handle, repeat, task }));
        handle
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(sched: &mut Scheduler<&'static str>, now: Millis) -> Vec<(Millis, &'static str)> {
        std::iter::from_fn(|| sched.pop_due(now)).collect()
    }

    #[test]
    fn fires_in_due_order() {
        let mut sched = Scheduler::new();
        sched.once(30, "c");
        sched.once(10, "a");
        sched.once(20, "b");
        assert_eq!(drain(&mut sched, 100), vec![(10, "a"), (20, "b"), (30, "c")]);
        assert_eq!(sched.armed(), 0);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut sched = Scheduler::new();
        sched.once(5, "first");
        sched.once(5, "second");
        assert_eq!(drain(&mut sched, 5), vec![(5, "first"), (5, "second")]);
    }

    #[test]
    fn nothing_fires_early() {
        let mut sched = Scheduler::new();
        sched.once(50, "x");
        assert!(sched.pop_due(49).is_none());
        assert_eq!(sched.pop_due(50), Some((50, "x")));
    }

    #[test]
    fn repeating_rearms() {
        let mut sched = Scheduler::new();
        let handle = sched.repeating(0, 100, "tick");
        assert_eq!(drain(&mut sched, 350).len(), 3);
        assert!(sched.is_armed(handle));
        assert_eq!(sched.pop_due(400), Some((400, "tick")));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut sched = Scheduler::new();
        let handle = sched.repeating(0, 100, "tick");
        assert!(sched.cancel(handle));
        assert!(!sched.cancel(handle));
        assert!(drain(&mut sched, 1000).is_empty());
        assert_eq!(sched.armed(), 0);
    }
}
