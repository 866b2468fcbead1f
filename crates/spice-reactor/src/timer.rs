//! Timer wheel (§4.C "timers hold a deadline and a callback").
//!
//! Backed by a binary heap keyed on deadline. Firing a timer does not
//! preempt message parsing: callers only learn a timer is due by
//! polling [`TimerWheel::next_deadline`]/draining
//! [`TimerWheel::pop_due`] between handler invocations, mirroring "the
//! reactor completes the current handler before re-checking
//! readiness".

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry {
    deadline: Instant,
    id: TimerId,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline
    }
}
impl Eq for Entry {}
impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.deadline.cmp(&other.deadline)
    }
}

#[derive(Debug, Default)]
pub struct TimerWheel {
    heap: BinaryHeap<Reverse<Entry>>,
    cancelled: std::collections::HashSet<TimerId>,
    next_id: u64,
}

impl TimerWheel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, deadline: Instant) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.heap.push(Reverse(Entry { deadline, id }));
        id
    }

    /// Removing a timer also removes its watch: no callback runs for
    /// a cancelled id even if it was already due.
    pub fn cancel(&mut self, id: TimerId) {
        self.cancelled.insert(id);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|Reverse(e)| e.deadline)
    }

    /// Pop every timer due at or before `now`, skipping cancelled ones.
    pub fn pop_due(&mut self, now: Instant) -> Vec<TimerId> {
        let mut fired = Vec::new();
        while let Some(Reverse(entry)) = self.heap.peek() {
            if entry.deadline > now {
                break;
            }
            let Reverse(entry) = self.heap.pop().unwrap();
            if self.cancelled.remove(&entry.id) {
                continue;
            }
            fired.push(entry.id);
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fires_in_deadline_order() {
        let mut wheel = TimerWheel::new();
        let now = Instant::now();
        let later = wheel.register(now + Duration::from_millis(20));
        let sooner = wheel.register(now + Duration::from_millis(5));
        let due = wheel.pop_due(now + Duration::from_millis(10));
        assert_eq!(due, vec![sooner]);
        let due = wheel.pop_due(now + Duration::from_millis(25));
        assert_eq!(due, vec![later]);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut wheel = TimerWheel::new();
        let now = Instant::now();
        let id = wheel.register(now + Duration::from_millis(5));
        wheel.cancel(id);
        let due = wheel.pop_due(now + Duration::from_millis(10));
        assert!(due.is_empty());
    }
}
