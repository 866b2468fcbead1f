//! Geometry primitives shared by every draw record.

use byteorder::{ByteOrder, LittleEndian};
use spice_wire::error::ProtocolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const LEN: usize = 16;

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// §8 testable property: the bounding box passed to the canvas
    /// lies within `{0..surface_width} x {0..surface_height}`.
    pub fn within_surface(&self, surface_width: u32, surface_height: u32) -> bool {
        self.left >= 0
            && self.top >= 0
            && self.right <= surface_width as i32
            && self.bottom <= surface_height as i32
            && self.left <= self.right
            && self.top <= self.bottom
    }

    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        if buf.len() < Self::LEN {
            return Err(ProtocolError::Malformed("SpiceRect truncated"));
        }
        Ok(Self {
            left: LittleEndian::read_i32(&buf[0..4]),
            top: LittleEndian::read_i32(&buf[4..8]),
            right: LittleEndian::read_i32(&buf[8..12]),
            bottom: LittleEndian::read_i32(&buf[12..16]),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const LEN: usize = 8;

    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        if buf.len() < Self::LEN {
            return Err(ProtocolError::Malformed("SpicePoint truncated"));
        }
        Ok(Self {
            x: LittleEndian::read_i32(&buf[0..4]),
            y: LittleEndian::read_i32(&buf[4..8]),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const LEN: usize = 8;

    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        if buf.len() < Self::LEN {
            return Err(ProtocolError::Malformed("SpiceSize truncated"));
        }
        Ok(Self {
            width: LittleEndian::read_u32(&buf[0..4]),
            height: LittleEndian::read_u32(&buf[4..8]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_within_surface_accepts_inside_bbox() {
        let r = Rect { left: 0, top: 0, right: 800, bottom: 600 };
        assert!(r.within_surface(800, 600));
    }

    #[test]
    fn rect_within_surface_rejects_overflowing_bbox() {
        let r = Rect { left: 0, top: 0, right: 801, bottom: 600 };
        assert!(!r.within_surface(800, 600));
    }
}
