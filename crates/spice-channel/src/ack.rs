//! ACK-windowed flow control (§4.B "ACK window").
//!
//! Grounded in `server/red_channel.c`'s `red_channel_client_create`:
//! a freshly linked channel starts with `messages_window = u32::MAX`
//! (blocked, since no window has been negotiated yet) and
//! `client_window = CLIENT_ACK_WINDOW`. The sender only resumes once
//! the client has announced a window via `SET_ACK`; from then on the
//! sender stops once `messages_window > client_window * 2` and resumes
//! when the peer's `ACK_SYNC` brings it back down.

use spice_wire::constants::CLIENT_ACK_WINDOW;

#[derive(Debug)]
pub struct AckWindow {
    /// Messages received (inbound accounting) or sent-unacked
    /// (outbound accounting) since the window was last reset.
    messages_window: u32,
    /// The window size negotiated with the peer; `None` until the
    /// first `SET_ACK`/window negotiation completes.
    client_window: Option<u32>,
    generation: u32,
}

impl AckWindow {
    pub fn new() -> Self {
        Self {
            messages_window: u32::MAX,
            client_window: None,
            generation: 0,
        }
    }

    /// Called when `SET_ACK{generation, window}` is negotiated.
    pub fn negotiate(&mut self, generation: u32, window: u32) {
        self.generation = generation;
        self.client_window = Some(window);
        self.messages_window = 0;
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Record one inbound payload message; returns `true` if an `ACK`
    /// should now be sent (count reached the negotiated window).
    pub fn on_message_received(&mut self) -> bool {
        let window = match self.client_window {
            Some(w) if w > 0 => w,
            _ => CLIENT_ACK_WINDOW,
        };
        self.messages_window = self.messages_window.saturating_add(1);
        if self.messages_window >= window {
            self.messages_window = 0;
            true
        } else {
            false
        }
    }

    /// Record that the peer's `ACK` was received: the outstanding
    /// outbound count is reduced by one window's worth.
    pub fn on_ack_received(&mut self) {
        if let Some(window) = self.client_window {
            self.messages_window = self.messages_window.saturating_sub(window);
        }
    }

    /// Record one outbound payload message sent without an ACK yet.
    pub fn on_message_sent(&mut self) {
        self.messages_window = self.messages_window.saturating_add(1);
    }

    /// Whether the sender must stop producing more messages until the
    /// next `ACK` arrives: blocked-until-negotiated (window unknown),
    /// or over `2 * client_window` unacknowledged messages.
    pub fn is_send_blocked(&self) -> bool {
        match self.client_window {
            None => true,
            Some(window) => self.messages_window > window.saturating_mul(2),
        }
    }
}

impl Default for AckWindow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_until_negotiated() {
        let w = AckWindow::new();
        assert!(w.is_send_blocked());
    }

    #[test]
    fn unblocks_after_negotiation() {
        let mut w = AckWindow::new();
        w.negotiate(1, 20);
        assert!(!w.is_send_blocked());
    }

    #[test]
    fn stops_sender_past_double_window() {
        let mut w = AckWindow::new();
        w.negotiate(1, 20);
        for _ in 0..41 {
            w.on_message_sent();
        }
        assert!(w.is_send_blocked());
        w.on_ack_received();
        assert!(!w.is_send_blocked());
    }

    #[test]
    fn inbound_ack_fires_at_window() {
        let mut w = AckWindow::new();
        w.negotiate(1, 3);
        assert!(!w.on_message_received());
        assert!(!w.on_message_received());
        assert!(w.on_message_received());
    }
}
