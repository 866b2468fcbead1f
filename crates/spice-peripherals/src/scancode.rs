//! Neutral key identity to PS/2 XT scan-code conversion.
//!
//! Mirrors the const-table / plain-function idiom of a PC-scancode
//! keymap rather than a struct with methods: a `KeyCode` is converted
//! to `(code, extended)` by table lookup, and the wire `scan_code`
//! field packs `extended`/`released` into the value the way the PS/2
//! protocol itself does (`0xE0` prefix, bit `0x80` for key-up).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    Digit0,
    Minus,
    Equal,
    Backspace,
    Tab,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Enter,
    LeftCtrl,
    LeftShift,
    RightShift,
    LeftAlt,
    Space,
    CapsLock,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    NumLock,
    ScrollLock,
    Home,
    Up,
    PageUp,
    Left,
    Right,
    End,
    Down,
    PageDown,
    Insert,
    Delete,
    RightCtrl,
    RightAlt,
    LeftSuper,
    RightSuper,
    Menu,
    PrintScreen,
    Pause,
}

/// `(xt_code, extended)` for every [`KeyCode`].
pub fn to_xt(key: KeyCode) -> (u8, bool) {
    use KeyCode::*;
    match key {
        Escape => (0x01, false),
        Digit1 => (0x02, false),
        Digit2 => (0x03, false),
        Digit3 => (0x04, false),
        Digit4 => (0x05, false),
        Digit5 => (0x06, false),
        Digit6 => (0x07, false),
        Digit7 => (0x08, false),
        Digit8 => (0x09, false),
        Digit9 => (0x0A, false),
        Digit0 => (0x0B, false),
        Minus => (0x0C, false),
        Equal => (0x0D, false),
        Backspace => (0x0E, false),
        Tab => (0x0F, false),
        Q => (0x10, false),
        W => (0x11, false),
        E => (0x12, false),
        R => (0x13, false),
        T => (0x14, false),
        Y => (0x15, false),
        U => (0x16, false),
        I => (0x17, false),
        O => (0x18, false),
        P => (0x19, false),
        Enter => (0x1C, false),
        LeftCtrl => (0x1D, false),
        A => (0x1E, false),
        S => (0x1F, false),
        D => (0x20, false),
        F => (0x21, false),
        G => (0x22, false),
        H => (0x23, false),
        J => (0x24, false),
        K => (0x25, false),
        L => (0x26, false),
        LeftShift => (0x2A, false),
        Z => (0x2C, false),
        X => (0x2D, false),
        C => (0x2E, false),
        V => (0x2F, false),
        B => (0x30, false),
        N => (0x31, false),
        M => (0x32, false),
        RightShift => (0x36, false),
        LeftAlt => (0x38, false),
        Space => (0x39, false),
        CapsLock => (0x3A, false),
        F1 => (0x3B, false),
        F2 => (0x3C, false),
        F3 => (0x3D, false),
        F4 => (0x3E, false),
        F5 => (0x3F, false),
        F6 => (0x40, false),
        F7 => (0x41, false),
        F8 => (0x42, false),
        F9 => (0x43, false),
        F10 => (0x44, false),
        NumLock => (0x45, false),
        ScrollLock => (0x46, false),
        F11 => (0x57, false),
        F12 => (0x58, false),
        RightCtrl => (0x1D, true),
        RightAlt => (0x38, true),
        Home => (0x47, true),
        Up => (0x48, true),
        PageUp => (0x49, true),
        Left => (0x4B, true),
        Right => (0x4D, true),
        End => (0x4F, true),
        Down => (0x50, true),
        PageDown => (0x51, true),
        Insert => (0x52, true),
        Delete => (0x53, true),
        LeftSuper => (0x5B, true),
        RightSuper => (0x5C, true),
        Menu => (0x5D, true),
        PrintScreen => (0x37, true),
        Pause => (0x46, true),
    }
}

/// Packs `(code, extended, released)` into the `scan_code` field of
/// `SpiceMsgcKeyDown`/`SpiceMsgcKeyUp`: an `0xE0` high-byte prefix for
/// extended keys, bit `0x80` set on the low byte for a key-up.
pub fn encode_scan_code(key: KeyCode, released: bool) -> u32 {
    let (code, extended) = to_xt(key);
    let low = if released { code as u32 | 0x80 } else { code as u32 };
    if extended {
        0xE000 | low
    } else {
        low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_key_down_has_no_extended_prefix_or_break_bit() {
        assert_eq!(encode_scan_code(KeyCode::A, false), 0x1E);
    }

    #[test]
    fn plain_key_up_sets_the_break_bit() {
        assert_eq!(encode_scan_code(KeyCode::A, true), 0x9E);
    }

    #[test]
    fn extended_key_carries_the_e0_prefix() {
        assert_eq!(encode_scan_code(KeyCode::Delete, false), 0xE053);
        assert_eq!(encode_scan_code(KeyCode::Delete, true), 0xE0D3);
    }
}
