//! Sticky-key trace (§4.M): detects "the user pressed and held Alt
//! alone for ≥ 750 ms", which some guest OSes treat as a sticky
//! modifier. Implemented exactly per the documented pseudocode,
//! including its one quirk noted in the design notes: the trace
//! resets on the first key that doesn't match the armed key, rather
//! than tolerating a second trace arming mid-flight.

use std::time::Duration;

use spice_peripherals::KeyCode;

pub const STICKY_KEY_HOLD: Duration = Duration::from_millis(750);

fn is_sticky_trace_key(key: KeyCode) -> bool {
    matches!(key, KeyCode::LeftAlt | KeyCode::RightAlt)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDownOutcome {
    None,
    /// Arm the 750ms timer; call `on_timer_fire` when it elapses.
    StartTimer,
}

#[derive(Debug, Default)]
pub struct StickyKeyTrace {
    key: Option<KeyCode>,
    down: bool,
    first_down: bool,
    sticky_mode: bool,
}

impl StickyKeyTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sticky_mode(&self) -> bool {
        self.sticky_mode
    }

    fn reset(&mut self) {
        self.key = None;
        self.down = false;
        self.first_down = false;
        self.sticky_mode = false;
    }

    /// `num_keys_pressed` and `was_pressed` describe the broader
    /// keyboard state at the moment of this key_down, tracked outside
    /// this trace by the application's key-state map.
    pub fn on_key_down(
        &mut self,
        key: KeyCode,
        trace_is_on: bool,
        num_keys_pressed: usize,
        was_pressed: bool,
    ) -> KeyDownOutcome {
        if !trace_is_on {
            return KeyDownOutcome::None;
        }
        if Some(key) == self.key {
            self.down = true;
        }
        if self.sticky_mode {
            return KeyDownOutcome::None;
        }
        if self.first_down {
            if Some(key) != self.key {
                self.reset();
            }
            KeyDownOutcome::None
        } else if is_sticky_trace_key(key) && num_keys_pressed == 1 && !was_pressed {
            self.key = Some(key);
            self.first_down = true;
            self.down = true;
            KeyDownOutcome::StartTimer
        } else {
            KeyDownOutcome::None
        }
    }

    /// The 750ms timer fired. Returns `true` (arming sticky mode, the
    /// caller should show the overlay) only if the armed key is still
    /// held down and the trace wasn't reset in the meantime.
    pub fn on_timer_fire(&mut self) -> bool {
        if self.first_down && self.down {
            self.sticky_mode = true;
            true
        } else {
            false
        }
    }

    /// Returns whether `key`'s key-up should be forwarded to the
    /// inputs channel, or swallowed as part of the trace.
    pub fn on_key_up(&mut self, key: KeyCode, trace_is_on: bool) -> bool {
        if trace_is_on {
            if Some(key) == self.key {
                self.down = false;
                if self.first_down {
                    self.first_down = false;
                    if !self.sticky_mode {
                        self.reset();
                    } else {
                        return false;
                    }
                }
            }
            if self.sticky_mode {
                let old = self.key;
                self.reset();
                if Some(key) == old {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_hold_alt_750ms_then_release_swallows_first_up() {
        let mut trace = StickyKeyTrace::new();
        assert_eq!(
            trace.on_key_down(KeyCode::LeftAlt, true, 1, false),
            KeyDownOutcome::StartTimer
        );
        assert!(trace.on_timer_fire());
        assert!(trace.is_sticky_mode());

        // release: first up is swallowed.
        assert!(!trace.on_key_up(KeyCode::LeftAlt, true));
        assert!(!trace.is_sticky_mode());
    }

    #[test]
    fn releasing_before_the_timer_fires_resets_without_arming() {
        let mut trace = StickyKeyTrace::new();
        trace.on_key_down(KeyCode::LeftAlt, true, 1, false);
        assert!(trace.on_key_up(KeyCode::LeftAlt, true));
        assert!(!trace.is_sticky_mode());
    }

    #[test]
    fn a_second_key_before_the_timer_resets_the_trace() {
        let mut trace = StickyKeyTrace::new();
        trace.on_key_down(KeyCode::LeftAlt, true, 1, false);
        trace.on_key_down(KeyCode::Tab, true, 2, false);
        assert!(!trace.on_timer_fire());
    }

    #[test]
    fn non_trace_keys_never_arm_the_timer() {
        let mut trace = StickyKeyTrace::new();
        assert_eq!(trace.on_key_down(KeyCode::A, true, 1, false), KeyDownOutcome::None);
    }

    #[test]
    fn trace_disabled_in_splash_mode_never_arms() {
        let mut trace = StickyKeyTrace::new();
        assert_eq!(
            trace.on_key_down(KeyCode::LeftAlt, false, 1, false),
            KeyDownOutcome::None
        );
    }
}
