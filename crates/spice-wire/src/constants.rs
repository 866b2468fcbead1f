//! Wire-level constants: magic numbers, protocol version, channel types,
//! and the per-channel message type tables.
//!
//! Grounded in `SpiceDataHeader`/`ChannelType` from the reference SPICE
//! client protocol module and `common/messages.h` in the original C
//! sources. `ChannelType` carries every value the real protocol defines,
//! not just the ones this crate dispatches on, so a `LINK_REPLY` from a
//! real server never collapses onto a wrong variant.

/// "REDQ" in little-endian bytes, the current SPICE link magic.
pub const SPICE_MAGIC: u32 = 0x5144_4552;
/// Legacy magic ("SPIC") some very old servers still send.
pub const SPICE_MAGIC_LEGACY: u32 = 0x5350_4943;

pub const SPICE_VERSION_MAJOR: u32 = 2;
pub const SPICE_VERSION_MINOR: u32 = 2;

/// Default client ACK window (messages between consecutive `ACK`s).
pub const CLIENT_ACK_WINDOW: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChannelType {
    Main = 1,
    Display = 2,
    Inputs = 3,
    Cursor = 4,
    Playback = 5,
    Record = 6,
    Tunnel = 7,
    Smartcard = 8,
    Usbredir = 9,
    Port = 10,
    WebDav = 11,
}

impl ChannelType {
    pub fn from_wire(value: u8) -> Option<Self> {
        Some(match value {
            1 => Self::Main,
            2 => Self::Display,
            3 => Self::Inputs,
            4 => Self::Cursor,
            5 => Self::Playback,
            6 => Self::Record,
            7 => Self::Tunnel,
            8 => Self::Smartcard,
            9 => Self::Usbredir,
            10 => Self::Port,
            11 => Self::WebDav,
            _ => return None,
        })
    }

    pub fn as_wire(self) -> u8 {
        self as u8
    }
}

/// Common capability bits, negotiated on every channel type.
pub mod common_caps {
    pub const AUTH_SELECT: u32 = 0;
    pub const AUTH_SPICE: u32 = 1;
    pub const MINI_HEADER: u32 = 2;
}

/// Main channel message types.
pub mod main_msg {
    pub const MIGRATE_BEGIN: u16 = 101;
    pub const MIGRATE_CANCEL: u16 = 102;
    pub const INIT: u16 = 103;
    pub const CHANNELS_LIST: u16 = 104;
    pub const MOUSE_MODE: u16 = 105;
    pub const MULTI_MEDIA_TIME: u16 = 106;
    pub const AGENT_CONNECTED: u16 = 107;
    pub const AGENT_DISCONNECTED: u16 = 108;
    pub const AGENT_DATA: u16 = 109;
    pub const AGENT_TOKEN: u16 = 110;
    pub const MIGRATE_SWITCH_HOST: u16 = 111;
    pub const MIGRATE_END: u16 = 112;
    pub const NAME: u16 = 113;
    pub const UUID: u16 = 114;
    pub const NOTIFY: u16 = 115;
}

pub mod main_msgc {
    pub const CLIENT_INFO: u16 = 101;
    pub const MOUSE_MODE_REQUEST: u16 = 102;
    pub const AGENT_START: u16 = 103;
    pub const AGENT_DATA: u16 = 104;
    pub const AGENT_TOKEN: u16 = 105;
}

/// Display channel message types.
pub mod display_msg {
    pub const MODE: u16 = 101;
    pub const MARK: u16 = 102;
    pub const RESET: u16 = 103;
    pub const COPY_BITS: u16 = 104;
    pub const INVAL_LIST: u16 = 105;
    pub const INVAL_ALL_PIXMAPS: u16 = 106;
    pub const INVAL_PALETTE: u16 = 107;
    pub const INVAL_ALL_PALETTES: u16 = 108;
    pub const STREAM_CREATE: u16 = 122;
    pub const STREAM_DATA: u16 = 123;
    pub const STREAM_CLIP: u16 = 124;
    pub const STREAM_DESTROY: u16 = 125;
    pub const STREAM_DESTROY_ALL: u16 = 126;
    pub const SURFACE_CREATE: u16 = 127;
    pub const SURFACE_DESTROY: u16 = 128;
    pub const MONITORS_CONFIG: u16 = 129;
    pub const STREAM_DATA_SIZED: u16 = 130;

    pub const DRAW_FILL: u16 = 302;
    pub const DRAW_OPAQUE: u16 = 303;
    pub const DRAW_COPY: u16 = 304;
    pub const DRAW_BLEND: u16 = 305;
    pub const DRAW_BLACKNESS: u16 = 306;
    pub const DRAW_WHITENESS: u16 = 307;
    pub const DRAW_INVERS: u16 = 308;
    pub const DRAW_ROP3: u16 = 309;
    pub const DRAW_STROKE: u16 = 310;
    pub const DRAW_TEXT: u16 = 311;
    pub const DRAW_TRANSPARENT: u16 = 312;
    pub const DRAW_ALPHA_BLEND: u16 = 313;
    pub const DRAW_COMPOSITE: u16 = 314;
}

/// Cursor channel message types.
pub mod cursor_msg {
    pub const INIT: u16 = 101;
    pub const RESET: u16 = 102;
    pub const SET: u16 = 103;
    pub const MOVE: u16 = 104;
    pub const HIDE: u16 = 105;
    pub const TRAIL: u16 = 106;
    pub const INVAL_ONE: u16 = 107;
    pub const INVAL_ALL: u16 = 108;
}

/// Inputs channel message types.
pub mod inputs_msg {
    pub const INIT: u16 = 101;
    pub const KEY_MODIFIERS: u16 = 102;
    pub const MOUSE_MOTION_ACK: u16 = 111;
}

pub mod inputs_msgc {
    pub const KEY_DOWN: u16 = 101;
    pub const KEY_UP: u16 = 102;
    pub const KEY_MODIFIERS: u16 = 103;
    pub const MOUSE_MOTION: u16 = 111;
    pub const MOUSE_POSITION: u16 = 112;
    pub const MOUSE_PRESS: u16 = 113;
    pub const MOUSE_RELEASE: u16 = 114;
}

/// Messages common to every channel type, using the low numeric range.
pub mod common_msg {
    pub const MIGRATE: u16 = 1;
    pub const MIGRATE_DATA: u16 = 2;
    pub const SET_ACK: u16 = 3;
    pub const PING: u16 = 4;
    pub const WAIT_FOR_CHANNELS: u16 = 5;
    pub const DISCONNECTING: u16 = 6;
    pub const NOTIFY: u16 = 7;
}

pub mod common_msgc {
    pub const ACK_SYNC: u16 = 1;
    pub const PONG: u16 = 2;
    pub const DISCONNECTING: u16 = 3;
    /// Empty-body message sent once per negotiated ACK window's worth
    /// of inbound payload messages (§4.B).
    pub const ACK: u16 = 4;
}

/// `SpiceImageDescriptor.type` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ImageType {
    Bitmap = 0,
    Quic = 1,
    Reserved = 2,
    LzPlt = 3,
    LzRgb = 4,
    GlzRgb = 5,
    FromCache = 6,
    Surface = 7,
    Jpeg = 8,
    FromCacheLossless = 9,
    ZlibGlzRgb = 10,
    JpegAlpha = 11,
}

impl ImageType {
    pub fn from_wire(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Bitmap,
            1 => Self::Quic,
            2 => Self::Reserved,
            3 => Self::LzPlt,
            4 => Self::LzRgb,
            5 => Self::GlzRgb,
            6 => Self::FromCache,
            7 => Self::Surface,
            8 => Self::Jpeg,
            9 => Self::FromCacheLossless,
            10 => Self::ZlibGlzRgb,
            11 => Self::JpegAlpha,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_type_round_trips() {
        for (wire, expect) in [
            (1u8, ChannelType::Main),
            (4, ChannelType::Cursor),
            (11, ChannelType::WebDav),
        ] {
            assert_eq!(ChannelType::from_wire(wire), Some(expect));
            assert_eq!(expect.as_wire(), wire);
        }
    }

    #[test]
    fn unknown_channel_type_is_none() {
        assert_eq!(ChannelType::from_wire(200), None);
    }

    #[test]
    fn magic_matches_redq() {
        assert_eq!(&SPICE_MAGIC.to_le_bytes(), b"REDQ");
    }
}
