//! Posted-event queue (§4.C "operations that must be asynchronous ...
//! post a typed event to the loop via an event queue and return").
//!
//! A single-producer-many-clone / single-consumer queue: platform
//! callbacks (or any task off the loop) enqueue, and the reactor
//! drains it between I/O cycles.

use tokio::sync::mpsc;

#[derive(Clone)]
pub struct EventPoster<Ev> {
    tx: mpsc::UnboundedSender<Ev>,
}

impl<Ev> EventPoster<Ev> {
    pub fn post(&self, event: Ev) {
        if self.tx.send(event).is_err() {
            tracing::debug!("reactor event queue receiver dropped, discarding posted event");
        }
    }
}

pub struct EventQueue<Ev> {
    tx: mpsc::UnboundedSender<Ev>,
    rx: mpsc::UnboundedReceiver<Ev>,
}

impl<Ev> EventQueue<Ev> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub fn poster(&self) -> EventPoster<Ev> {
        EventPoster { tx: self.tx.clone() }
    }

    /// Await the next posted event. Resolves immediately if one is
    /// already queued.
    pub async fn recv(&mut self) -> Option<Ev> {
        self.rx.recv().await
    }

    /// Drain every event currently queued without waiting.
    pub fn drain(&mut self) -> Vec<Ev> {
        let mut out = Vec::new();
        while let Ok(ev) = self.rx.try_recv() {
            out.push(ev);
        }
        out
    }
}

impl<Ev> Default for EventQueue<Ev> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn posted_events_are_received_in_order() {
        let mut queue = EventQueue::<u32>::new();
        let poster = queue.poster();
        poster.post(1);
        poster.post(2);
        assert_eq!(queue.recv().await, Some(1));
        assert_eq!(queue.recv().await, Some(2));
    }

    #[tokio::test]
    async fn drain_collects_everything_queued() {
        let mut queue = EventQueue::<u32>::new();
        let poster = queue.poster();
        poster.post(1);
        poster.post(2);
        assert_eq!(queue.drain(), vec![1, 2]);
    }
}
