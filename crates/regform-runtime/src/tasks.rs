#![forbid(unsafe_code)]

//! Fire-and-forget deferred tasks.
//!
//! Tasks are due relative to the backend clock and cannot be cancelled.
//! Ties on the due time run in scheduling order.

use core::cmp::Ordering;
use core::time::Duration;
use std::collections::BinaryHeap;

use regform_core::document::NodeId;

/// Work to run once its delay has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Deferred {
    /// Detach the node captured at scheduling time. A node that is already
    /// detached is left alone.
    RemoveNode(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Scheduled {
    due: Duration,
    seq: u64,
    task: Deferred,
}

impl Ord for Scheduled {
    // Reversed: BinaryHeap is a max-heap and we want the earliest first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    heap: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl TaskQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to run `delay` after `now`. Returns its due time.
    pub fn schedule(&mut self, now: Duration, delay: Duration, task: Deferred) -> Duration {
        let due = now.saturating_add(delay);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled { due, seq, task });
        due
    }

    /// Remove and return every task due at or before `now`, earliest first.
    pub fn take_due(&mut self, now: Duration) -> Vec<Deferred> {
        let mut due = Vec::new();
        while self.heap.peek().is_some_and(|s| s.due <= now) {
            if let Some(next) = self.heap.pop() {
                due.push(next.task);
            }
        }
        due
    }

    /// Due time of the earliest pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.heap.peek().map(|s| s.due)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regform_core::document::{Document, Tag};

    fn ids(n: usize) -> Vec<NodeId> {
        let mut doc = Document::new();
        (0..n)
            .map(|_| doc.create_element(Tag::Paragraph).unwrap())
            .collect()
    }

    #[test]
    fn tasks_fire_exactly_at_due_time() {
        let a = ids(1)[0];
        let mut q = TaskQueue::new();
        let due = q.schedule(
            Duration::from_millis(100),
            Duration::from_millis(3000),
            Deferred::RemoveNode(a),
        );
        assert_eq!(due, Duration::from_millis(3100));
        assert!(q.take_due(Duration::from_millis(3099)).is_empty());
        assert_eq!(
            q.take_due(Duration::from_millis(3100)),
            vec![Deferred::RemoveNode(a)]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn earliest_first_then_scheduling_order() {
        let nodes = ids(3);
        let mut q = TaskQueue::new();
        q.schedule(Duration::ZERO, Duration::from_millis(20), Deferred::RemoveNode(nodes[0]));
        q.schedule(Duration::ZERO, Duration::from_millis(10), Deferred::RemoveNode(nodes[1]));
        q.schedule(Duration::ZERO, Duration::from_millis(20), Deferred::RemoveNode(nodes[2]));
        assert_eq!(q.next_due(), Some(Duration::from_millis(10)));
        assert_eq!(
            q.take_due(Duration::from_secs(1)),
            vec![
                Deferred::RemoveNode(nodes[1]),
                Deferred::RemoveNode(nodes[0]),
                Deferred::RemoveNode(nodes[2]),
            ]
        );
    }

    #[test]
    fn schedule_saturates_instead_of_overflowing() {
        let a = ids(1)[0];
        let mut q = TaskQueue::new();
        assert_eq!(
            q.schedule(Duration::MAX, Duration::from_secs(1), Deferred::RemoveNode(a)),
            Duration::MAX
        );
        assert_eq!(q.len(), 1);
    }
}
