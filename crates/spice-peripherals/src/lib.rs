//! Cursor channel and inputs channel: shape cache, scan-code tables,
//! and motion flow control.

pub mod cursor;
pub mod inputs;
pub mod scancode;

pub use cursor::{CursorChannel, CursorShape, Hotspot, ShapeCache, TrailState};
pub use inputs::{InputsChannel, MouseMode, Outbound, MOUSE_MOTION_ACK_BUNCH};
pub use scancode::{encode_scan_code, to_xt, KeyCode};
