//! The event loop itself (§4.C).
//!
//! Realized as a current-thread `tokio` runtime: every channel's
//! socket read/write, every timer, and every posted application event
//! genuinely execute on one OS thread. `Reactor::next` is the single
//! point callers `select!` against alongside their own per-channel
//! I/O futures, so "the reactor completes the current handler before
//! re-checking readiness" falls out of normal `.await` sequencing
//! rather than an explicit poll loop.

use std::time::Instant;

use tokio::sync::watch;

use crate::event_queue::{EventPoster, EventQueue};
use crate::timer::{TimerId, TimerWheel};

pub enum ReactorTick<Ev> {
    Timer(TimerId),
    Posted(Ev),
    Shutdown,
}

pub struct Reactor<Ev> {
    timers: TimerWheel,
    events: EventQueue<Ev>,
    shutdown_rx: watch::Receiver<bool>,
    shutdown_tx: watch::Sender<bool>,
}

impl<Ev> Reactor<Ev> {
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            timers: TimerWheel::new(),
            events: EventQueue::new(),
            shutdown_rx,
            shutdown_tx,
        }
    }

    pub fn event_poster(&self) -> EventPoster<Ev> {
        self.events.poster()
    }

    pub fn register_timer(&mut self, deadline: Instant) -> TimerId {
        self.timers.register(deadline)
    }

    pub fn cancel_timer(&mut self, id: TimerId) {
        self.timers.cancel(id);
    }

    /// Signal shutdown: no further timer or posted-event callback
    /// runs after this resolves on the next `next()` call.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Wait for the next thing the loop should react to: a due timer,
    /// a posted event, or shutdown. Whichever path fires is the only
    /// one acted on per call, preserving "removing a channel also
    /// removes its watch and timers; no callback runs after removal
    /// returns" for the shutdown case.
    pub async fn next(&mut self) -> ReactorTick<Ev> {
        let mut shutdown_rx = self.shutdown_rx.clone();
        loop {
            let now = Instant::now();
            if let Some(deadline) = self.timers.next_deadline() {
                let sleep = tokio::time::sleep_until(deadline.into());
                tokio::select! {
                    _ = sleep => {
                        let due = self.timers.pop_due(Instant::now());
                        if let Some(id) = due.into_iter().next() {
                            return ReactorTick::Timer(id);
                        }
                        continue;
                    }
                    ev = self.events.recv() => {
                        match ev {
                            Some(ev) => return ReactorTick::Posted(ev),
                            None => return ReactorTick::Shutdown,
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        return ReactorTick::Shutdown;
                    }
                }
            } else {
                tokio::select! {
                    ev = self.events.recv() => {
                        match ev {
                            Some(ev) => return ReactorTick::Posted(ev),
                            None => return ReactorTick::Shutdown,
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        return ReactorTick::Shutdown;
                    }
                }
            }
            let _ = now;
        }
    }
}

impl<Ev> Default for Reactor<Ev> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn fires_timer_before_later_event() {
        let mut reactor = Reactor::<u32>::new();
        reactor.register_timer(Instant::now() + Duration::from_millis(1));
        match reactor.next().await {
            ReactorTick::Timer(_) => {}
            _ => panic!("expected a timer tick"),
        }
    }

    #[tokio::test]
    async fn posted_event_is_delivered() {
        let mut reactor = Reactor::<u32>::new();
        let poster = reactor.event_poster();
        poster.post(7);
        match reactor.next().await {
            ReactorTick::Posted(7) => {}
            _ => panic!("expected the posted event"),
        }
    }

    #[tokio::test]
    async fn shutdown_is_observed() {
        let mut reactor = Reactor::<u32>::new();
        reactor.shutdown();
        assert!(matches!(reactor.next().await, ReactorTick::Shutdown));
    }
}
