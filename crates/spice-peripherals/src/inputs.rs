//! Inputs channel (§4.K): outbound key/mouse events, inbound
//! modifiers and motion acks.

use crate::scancode::{encode_scan_code, KeyCode};

/// Server acks motion packets every `MOUSE_MOTION_ACK_BUNCH`; the
/// channel tracks the outstanding count but never blocks on it since
/// motion is a lossy best-effort stream.
pub const MOUSE_MOTION_ACK_BUNCH: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseMode {
    Server,
    Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outbound {
    KeyDown { scan_code: u32 },
    KeyUp { scan_code: u32 },
    MouseMotion { dx: i32, dy: i32, buttons: u8 },
    MousePosition { x: i32, y: i32, buttons: u8, display_id: u32 },
    MousePress { button: u8, buttons: u8 },
    MouseRelease { button: u8, buttons: u8 },
    KeyModifiers { mask: u16 },
}

pub struct InputsChannel {
    pub channel_id: u8,
    mode: MouseMode,
    outstanding_motion: u32,
    modifiers: u16,
}

impl InputsChannel {
    pub fn new(channel_id: u8, mode: MouseMode) -> Self {
        Self {
            channel_id,
            mode,
            outstanding_motion: 0,
            modifiers: 0,
        }
    }

    pub fn mode(&self) -> MouseMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: MouseMode) {
        self.mode = mode;
    }

    pub fn modifiers(&self) -> u16 {
        self.modifiers
    }

    /// `INIT{modifiers}`: the server's initial lock-key state.
    pub fn on_init(&mut self, modifiers: u16) {
        self.modifiers = modifiers;
    }

    /// `KEY_MODIFIERS` from the server (e.g. the guest toggled caps
    /// lock out of band).
    pub fn on_key_modifiers(&mut self, modifiers: u16) {
        self.modifiers = modifiers;
    }

    pub fn key_down(&self, key: KeyCode) -> Outbound {
        Outbound::KeyDown { scan_code: encode_scan_code(key, false) }
    }

    pub fn key_up(&self, key: KeyCode) -> Outbound {
        Outbound::KeyUp { scan_code: encode_scan_code(key, true) }
    }

    pub fn key_modifiers(&self, mask: u16) -> Outbound {
        Outbound::KeyModifiers { mask }
    }

    /// Queues a motion packet, tracking (but never blocking on) the
    /// outstanding count.
    pub fn mouse_motion(&mut self, dx: i32, dy: i32, buttons: u8) -> Outbound {
        self.outstanding_motion += 1;
        Outbound::MouseMotion { dx, dy, buttons }
    }

    pub fn mouse_position(&mut self, x: i32, y: i32, buttons: u8, display_id: u32) -> Outbound {
        self.outstanding_motion += 1;
        Outbound::MousePosition { x, y, buttons, display_id }
    }

    pub fn mouse_press(&self, button: u8, buttons: u8) -> Outbound {
        Outbound::MousePress { button, buttons }
    }

    pub fn mouse_release(&self, button: u8, buttons: u8) -> Outbound {
        Outbound::MouseRelease { button, buttons }
    }

    /// `MOUSE_MOTION_ACK`: the server has consumed a bunch of motion
    /// packets.
    pub fn on_motion_ack(&mut self) {
        self.outstanding_motion = self.outstanding_motion.saturating_sub(MOUSE_MOTION_ACK_BUNCH);
    }

    pub fn outstanding_motion(&self) -> u32 {
        self.outstanding_motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_packets_track_outstanding_count_without_blocking() {
        let mut channel = InputsChannel::new(0, MouseMode::Server);
        for _ in 0..10 {
            channel.mouse_motion(1, 0, 0);
        }
        assert_eq!(channel.outstanding_motion(), 10);
        channel.on_motion_ack();
        assert_eq!(channel.outstanding_motion(), 6);
    }

    #[test]
    fn client_mode_sends_absolute_position() {
        let mut channel = InputsChannel::new(0, MouseMode::Client);
        let event = channel.mouse_position(100, 200, 0, 0);
        assert_eq!(event, Outbound::MousePosition { x: 100, y: 200, buttons: 0, display_id: 0 });
    }

    #[test]
    fn key_down_encodes_the_scan_code() {
        let channel = InputsChannel::new(0, MouseMode::Server);
        assert_eq!(channel.key_down(KeyCode::A), Outbound::KeyDown { scan_code: 0x1E });
    }
}
