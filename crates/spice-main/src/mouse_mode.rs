//! Mouse-mode arbitration: the client requests client-absolute mode;
//! the server replies with what it actually supports. On a change,
//! every channel is notified so displays can switch pointer handling.

pub const MOUSE_MODE_SERVER: u32 = 1;
pub const MOUSE_MODE_CLIENT: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseMode {
    Server,
    Client,
}

impl MouseMode {
    pub fn from_wire(value: u32) -> Option<Self> {
        match value {
            MOUSE_MODE_SERVER => Some(Self::Server),
            MOUSE_MODE_CLIENT => Some(Self::Client),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct MouseModeArbiter {
    supported: u32,
    current: Option<MouseMode>,
}

impl MouseModeArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<MouseMode> {
        self.current
    }

    pub fn client_absolute_is_supported(&self) -> bool {
        self.supported & MOUSE_MODE_CLIENT != 0
    }

    /// `MOUSE_MODE{supported, current}`: returns `true` if the
    /// effective mode changed, signaling that every channel must be
    /// notified.
    pub fn on_mouse_mode(&mut self, supported: u32, current: u32) -> bool {
        self.supported = supported;
        let new_mode = MouseMode::from_wire(current);
        let changed = new_mode != self.current;
        self.current = new_mode;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_modes_is_reported_as_a_change() {
        let mut arbiter = MouseModeArbiter::new();
        assert!(arbiter.on_mouse_mode(MOUSE_MODE_SERVER | MOUSE_MODE_CLIENT, MOUSE_MODE_SERVER));
        assert!(arbiter.on_mouse_mode(MOUSE_MODE_SERVER | MOUSE_MODE_CLIENT, MOUSE_MODE_CLIENT));
        assert_eq!(arbiter.current(), Some(MouseMode::Client));
    }

    #[test]
    fn repeating_the_same_mode_is_not_a_change() {
        let mut arbiter = MouseModeArbiter::new();
        arbiter.on_mouse_mode(MOUSE_MODE_SERVER, MOUSE_MODE_SERVER);
        assert!(!arbiter.on_mouse_mode(MOUSE_MODE_SERVER, MOUSE_MODE_SERVER));
    }
}
