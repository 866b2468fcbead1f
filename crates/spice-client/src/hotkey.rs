//! Hotkey dispatch (§4.M): a hotkey is a set of key slots, each slot
//! satisfied by a main key or one of its alternates, all of which must
//! be simultaneously pressed for the bound command to fire.

use std::collections::HashSet;

use spice_peripherals::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleFullscreen,
    ReleaseCursor,
    SendCtrlAltDel,
    SendCtrlAltEnd,
}

#[derive(Debug, Clone)]
pub struct KeySlot {
    pub main: KeyCode,
    pub alternate: Option<KeyCode>,
}

impl KeySlot {
    pub fn single(key: KeyCode) -> Self {
        Self { main: key, alternate: None }
    }

    pub fn either(main: KeyCode, alternate: KeyCode) -> Self {
        Self { main, alternate: Some(alternate) }
    }

    fn is_satisfied(&self, pressed: &HashSet<KeyCode>) -> bool {
        pressed.contains(&self.main) || self.alternate.is_some_and(|alt| pressed.contains(&alt))
    }
}

#[derive(Debug, Clone)]
pub struct Hotkey {
    pub slots: Vec<KeySlot>,
    pub command: Command,
}

#[derive(Debug, Default)]
pub struct HotkeySet {
    bindings: Vec<Hotkey>,
}

impl HotkeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, hotkey: Hotkey) {
        self.bindings.push(hotkey);
    }

    /// Scans the table for a binding every one of whose slots is
    /// satisfied by `pressed` (which already includes the key just
    /// pressed). Returns the first match's command.
    pub fn on_key_down(&self, pressed: &HashSet<KeyCode>) -> Option<Command> {
        self.bindings
            .iter()
            .find(|hotkey| hotkey.slots.iter().all(|slot| slot.is_satisfied(pressed)))
            .map(|hotkey| hotkey.command)
    }

    /// The reference default set: `toggle-fullscreen = Shift+F11`,
    /// `release-cursor = LeftShift+F12`... kept small and extensible
    /// rather than exhaustive.
    pub fn defaults() -> Self {
        let mut set = Self::new();
        set.bind(Hotkey {
            slots: vec![
                KeySlot::either(KeyCode::LeftShift, KeyCode::RightShift),
                KeySlot::single(KeyCode::F11),
            ],
            command: Command::ToggleFullscreen,
        });
        set.bind(Hotkey {
            slots: vec![
                KeySlot::either(KeyCode::LeftShift, KeyCode::RightShift),
                KeySlot::single(KeyCode::F12),
            ],
            command: Command::ReleaseCursor,
        });
        set.bind(Hotkey {
            slots: vec![
                KeySlot::either(KeyCode::LeftCtrl, KeyCode::RightCtrl),
                KeySlot::either(KeyCode::LeftAlt, KeyCode::RightAlt),
                KeySlot::single(KeyCode::Delete),
            ],
            command: Command::SendCtrlAltDel,
        });
        set.bind(Hotkey {
            slots: vec![
                KeySlot::either(KeyCode::LeftCtrl, KeyCode::RightCtrl),
                KeySlot::either(KeyCode::LeftAlt, KeyCode::RightAlt),
                KeySlot::single(KeyCode::End),
            ],
            command: Command::SendCtrlAltEnd,
        });
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_f11_toggles_fullscreen() {
        let hotkeys = HotkeySet::defaults();
        let mut pressed = HashSet::new();
        pressed.insert(KeyCode::LeftShift);
        pressed.insert(KeyCode::F11);
        assert_eq!(hotkeys.on_key_down(&pressed), Some(Command::ToggleFullscreen));
    }

    #[test]
    fn partial_press_does_not_fire() {
        let hotkeys = HotkeySet::defaults();
        let mut pressed = HashSet::new();
        pressed.insert(KeyCode::LeftShift);
        assert_eq!(hotkeys.on_key_down(&pressed), None);
    }

    #[test]
    fn either_alternate_satisfies_a_slot() {
        let hotkeys = HotkeySet::defaults();
        let mut pressed = HashSet::new();
        pressed.insert(KeyCode::RightShift);
        pressed.insert(KeyCode::F11);
        assert_eq!(hotkeys.on_key_down(&pressed), Some(Command::ToggleFullscreen));
    }
}
