//! Top-level state holder (§4.M): owns the hot-key set, the sticky-key
//! trace, and the set of currently-pressed keys, and decides for every
//! key event whether it is consumed locally or forwarded to the guest.

use std::collections::HashSet;

use spice_peripherals::KeyCode;

use crate::hotkey::{Command, HotkeySet};
use crate::sticky_key::{KeyDownOutcome, StickyKeyTrace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDownResult {
    /// A hot-key fully matched; dispatch `Command` and do not forward
    /// the key_down to the inputs channel.
    Hotkey(Command),
    /// No hot-key matched; forward to the inputs channel. `arm_timer`
    /// is set when the sticky-key trace just armed and the caller
    /// should schedule a 750ms callback into `on_sticky_timer`.
    Forward { key: KeyCode, arm_timer: bool },
}

/// Per-channel and network failure handling (§4.M "Failure
/// semantics"). The application doesn't perform I/O itself; it
/// classifies a fault into the action the reactor should take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultAction {
    /// A non-main channel faulted: drop just that channel.
    DropChannel,
    /// The main channel faulted, or any channel fault reached a
    /// session with no working main channel: tear down the session.
    TerminateSession,
    /// The network link itself failed: show the splash screen and
    /// wait for reconnect or user exit.
    ShowSplashAndAwaitReconnect,
}

pub struct Application {
    hotkeys: HotkeySet,
    sticky: StickyKeyTrace,
    pressed: HashSet<KeyCode>,
    /// True while the splash screen (no live session) is shown; the
    /// sticky-key trace and hot-keys are both suspended in this mode.
    splash_mode: bool,
}

impl Application {
    pub fn new() -> Self {
        Self {
            hotkeys: HotkeySet::defaults(),
            sticky: StickyKeyTrace::new(),
            pressed: HashSet::new(),
            splash_mode: true,
        }
    }

    pub fn enter_session(&mut self) {
        self.splash_mode = false;
    }

    pub fn enter_splash(&mut self) {
        self.splash_mode = true;
        self.pressed.clear();
    }

    pub fn is_splash(&self) -> bool {
        self.splash_mode
    }

    pub fn is_sticky_mode(&self) -> bool {
        self.sticky.is_sticky_mode()
    }

    fn trace_is_on(&self) -> bool {
        !self.splash_mode
    }

    /// A key went down on the client side. Hot-keys are checked first
    /// against the full post-press key set; only if none match does
    /// the key reach the sticky-key trace and the guest.
    pub fn on_key_down(&mut self, key: KeyCode) -> KeyDownResult {
        let was_pressed = self.pressed.contains(&key);
        self.pressed.insert(key);

        if let Some(command) = self.hotkeys.on_key_down(&self.pressed) {
            return KeyDownResult::Hotkey(command);
        }

        let outcome = self.sticky.on_key_down(key, self.trace_is_on(), self.pressed.len(), was_pressed);
        KeyDownResult::Forward { key, arm_timer: outcome == KeyDownOutcome::StartTimer }
    }

    /// The sticky-key trace's 750ms timer elapsed; returns whether
    /// sticky mode just armed (caller should show the indicator).
    pub fn on_sticky_timer(&mut self) -> bool {
        self.sticky.on_timer_fire()
    }

    /// A key went up. Returns whether it should be forwarded to the
    /// inputs channel, or was swallowed by the sticky-key trace.
    pub fn on_key_up(&mut self, key: KeyCode) -> bool {
        self.pressed.remove(&key);
        self.sticky.on_key_up(key, self.trace_is_on())
    }

    /// Classifies a channel fault per §4.M. `is_main` is whether the
    /// faulted channel was the main channel.
    pub fn on_channel_fault(&self, is_main: bool) -> FaultAction {
        if is_main {
            FaultAction::TerminateSession
        } else {
            FaultAction::DropChannel
        }
    }

    pub fn on_network_fault(&self) -> FaultAction {
        FaultAction::ShowSplashAndAwaitReconnect
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotkey_match_suppresses_forwarding_and_the_trace() {
        let mut app = Application::new();
        app.enter_session();
        assert_eq!(
            app.on_key_down(KeyCode::LeftShift),
            KeyDownResult::Forward { key: KeyCode::LeftShift, arm_timer: false }
        );
        assert_eq!(app.on_key_down(KeyCode::F11), KeyDownResult::Hotkey(Command::ToggleFullscreen));
        assert!(!app.is_sticky_mode());
    }

    #[test]
    fn holding_alt_alone_arms_the_sticky_timer() {
        let mut app = Application::new();
        app.enter_session();
        let result = app.on_key_down(KeyCode::LeftAlt);
        assert_eq!(result, KeyDownResult::Forward { key: KeyCode::LeftAlt, arm_timer: true });
        assert!(app.on_sticky_timer());
        assert!(app.is_sticky_mode());

        // First release after sticky mode arms is swallowed.
        assert!(!app.on_key_up(KeyCode::LeftAlt));
        assert!(!app.is_sticky_mode());
    }

    #[test]
    fn splash_mode_suspends_the_sticky_trace() {
        let mut app = Application::new();
        assert!(app.is_splash());
        let result = app.on_key_down(KeyCode::LeftAlt);
        assert_eq!(result, KeyDownResult::Forward { key: KeyCode::LeftAlt, arm_timer: false });
    }

    #[test]
    fn main_channel_fault_terminates_the_session() {
        let app = Application::new();
        assert_eq!(app.on_channel_fault(true), FaultAction::TerminateSession);
        assert_eq!(app.on_channel_fault(false), FaultAction::DropChannel);
    }
}
