//! `SpiceBrush`, `SpiceClip` and `SpiceQMask` — the decorations that
//! accompany most draw records.

use byteorder::{ByteOrder, LittleEndian};
use spice_wire::error::ProtocolError;

use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brush {
    None,
    Solid(u32),
    /// A pattern brush references an image by server-address; resolved
    /// separately from fix-up since it shares the same inline-image
    /// machinery as draw sources.
    Pattern { color_offset: u32 },
}

impl Brush {
    pub fn decode(buf: &[u8]) -> Result<(Self, usize), ProtocolError> {
        if buf.is_empty() {
            return Err(ProtocolError::Malformed("SpiceBrush truncated"));
        }
        match buf[0] {
            0 => Ok((Self::None, 1)),
            1 => {
                if buf.len() < 5 {
                    return Err(ProtocolError::Malformed("SpiceBrush solid color truncated"));
                }
                Ok((Self::Solid(LittleEndian::read_u32(&buf[1..5])), 5))
            }
            2 => {
                if buf.len() < 5 {
                    return Err(ProtocolError::Malformed("SpiceBrush pattern truncated"));
                }
                Ok((
                    Self::Pattern {
                        color_offset: LittleEndian::read_u32(&buf[1..5]),
                    },
                    5,
                ))
            }
            _ => Err(ProtocolError::Malformed("unknown SpiceBrush type")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clip {
    None,
    Rects(u32),
}

impl Clip {
    pub fn decode(buf: &[u8]) -> Result<(Self, usize), ProtocolError> {
        if buf.is_empty() {
            return Err(ProtocolError::Malformed("SpiceClip truncated"));
        }
        match buf[0] {
            0 => Ok((Self::None, 1)),
            1 => {
                if buf.len() < 5 {
                    return Err(ProtocolError::Malformed("SpiceClip rects truncated"));
                }
                Ok((Self::Rects(LittleEndian::read_u32(&buf[1..5])), 5))
            }
            _ => Err(ProtocolError::Malformed("unknown SpiceClip type")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QMask {
    pub flags: u8,
    pub pos: Point,
    pub has_bitmap: bool,
}

impl QMask {
    pub fn decode(buf: &[u8]) -> Result<(Self, usize), ProtocolError> {
        if buf.len() < 1 + Point::LEN + 1 {
            return Err(ProtocolError::Malformed("SpiceQMask truncated"));
        }
        let flags = buf[0];
        let pos = Point::decode(&buf[1..1 + Point::LEN])?;
        let has_bitmap = buf[1 + Point::LEN] != 0;
        Ok((
            Self {
                flags,
                pos,
                has_bitmap,
            },
            1 + Point::LEN + 1,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawBase {
    pub surface_id: u32,
    pub bbox: Rect,
    pub clip: Clip,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_brush_decodes_color() {
        let mut buf = vec![1u8];
        buf.extend_from_slice(&0x00FF_00FFu32.to_le_bytes());
        let (brush, consumed) = Brush::decode(&buf).unwrap();
        assert_eq!(brush, Brush::Solid(0x00FF_00FF));
        assert_eq!(consumed, 5);
    }

    #[test]
    fn clip_none_consumes_one_byte() {
        let (clip, consumed) = Clip::decode(&[0]).unwrap();
        assert_eq!(clip, Clip::None);
        assert_eq!(consumed, 1);
    }
}
