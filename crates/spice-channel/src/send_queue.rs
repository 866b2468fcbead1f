//! The per-channel outbound FIFO of "pipe items" (§4.B "Send queue").
//!
//! A pipe item holds whatever cache references it needs until it is
//! actually sent; `release` runs exactly once, whether the item was
//! sent or discarded (e.g. on disconnect), mirroring the
//! `item_pushed` flag in §5's cancellation rules.

use std::collections::VecDeque;

use spice_wire::header::SpiceDataHeader;

/// A queued outbound message: a fully marshalled body plus the
/// message type it will be framed with, and an optional release hook
/// run exactly once when the item leaves the queue (sent or
/// discarded).
pub struct PipeItem {
    pub msg_type: u16,
    pub body: Vec<u8>,
    on_release: Option<Box<dyn FnOnce(bool) + Send>>,
}

impl std::fmt::Debug for PipeItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipeItem")
            .field("msg_type", &self.msg_type)
            .field("body_len", &self.body.len())
            .finish()
    }
}

impl PipeItem {
    pub fn new(msg_type: u16, body: Vec<u8>) -> Self {
        Self {
            msg_type,
            body,
            on_release: None,
        }
    }

    /// Attach a release hook, e.g. to decrement a cache entry's
    /// refcount once this item is no longer needed. `item_pushed` is
    /// `true` if the item actually reached the wire.
    pub fn with_release<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(bool) + Send + 'static,
    {
        self.on_release = Some(Box::new(hook));
        self
    }

    fn release(mut self, item_pushed: bool) {
        if let Some(hook) = self.on_release.take() {
            hook(item_pushed);
        }
    }
}

#[derive(Debug, Default)]
pub struct SendQueue {
    items: VecDeque<PipeItem>,
    serial: u64,
    blocked: bool,
}

impl SendQueue {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
            serial: 0,
            blocked: false,
        }
    }

    pub fn push(&mut self, item: PipeItem) {
        self.items.push_back(item);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    /// Pop the head item and frame it, assigning the next outbound
    /// serial. Returns `None` if the queue is empty or blocked.
    pub fn pop_framed(&mut self) -> Option<(SpiceDataHeader, Vec<u8>, PipeItem)> {
        if self.blocked {
            return None;
        }
        let item = self.items.pop_front()?;
        self.serial += 1;
        let header = SpiceDataHeader {
            serial: self.serial,
            msg_type: item.msg_type,
            msg_size: item.body.len() as u32,
            sub_list_offset: 0,
        };
        let body = item.body.clone();
        Some((header, body, item))
    }

    /// Mark an already-popped item as sent, releasing any held
    /// references with `item_pushed = true`.
    pub fn mark_sent(item: PipeItem) {
        item.release(true);
    }

    /// Discard every queued item (e.g. on disconnect), releasing each
    /// with `item_pushed = false`.
    pub fn drain_discard(&mut self) {
        while let Some(item) = self.items.pop_front() {
            item.release(false);
        }
    }

    pub fn current_serial(&self) -> u64 {
        self.serial
    }

    /// Restore a serial counter carried across a migration handover.
    pub fn restore_serial(&mut self, serial: u64) {
        self.serial = serial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn serials_start_at_one_and_increment() {
        let mut q = SendQueue::new();
        q.push(PipeItem::new(1, vec![]));
        q.push(PipeItem::new(2, vec![]));
        let (h1, _, i1) = q.pop_framed().unwrap();
        assert_eq!(h1.serial, 1);
        SendQueue::mark_sent(i1);
        let (h2, _, i2) = q.pop_framed().unwrap();
        assert_eq!(h2.serial, 2);
        SendQueue::mark_sent(i2);
    }

    #[test]
    fn blocked_queue_yields_nothing() {
        let mut q = SendQueue::new();
        q.push(PipeItem::new(1, vec![]));
        q.set_blocked(true);
        assert!(q.pop_framed().is_none());
    }

    #[test]
    fn discard_runs_release_with_false() {
        let pushed = Arc::new(AtomicBool::new(true));
        let pushed_clone = pushed.clone();
        let mut q = SendQueue::new();
        q.push(PipeItem::new(1, vec![]).with_release(move |was_pushed| {
            pushed_clone.store(was_pushed, Ordering::SeqCst);
        }));
        q.drain_discard();
        assert!(!pushed.load(Ordering::SeqCst));
    }
}
