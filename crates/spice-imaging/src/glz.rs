//! GLZ dictionary decoder and shared window (§4.E).
//!
//! A GLZ-compressed image carries `(image_id, window_head_id, payload)`.
//! The payload is a stream of opcodes, each either a literal run or a
//! `(image_id, offset, length)` back-reference resolved against a
//! pixel run from an earlier image still inside the window. The
//! window is a FIFO of decoded images; a reference to an id older than
//! the window's current head is a protocol error that surfaces as a
//! [`CodecError::GlzWindowMiss`].
//!
//! One window is shared across every display channel of a session
//! (constructed once, handed to each display), matching the "single
//! GLZ window object... handed to each display constructor" design.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::CodecError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opcode {
    Literal,
    BackRef,
}

impl Opcode {
    fn from_tag(tag: u8) -> Result<Self, CodecError> {
        match tag {
            0 => Ok(Self::Literal),
            1 => Ok(Self::BackRef),
            _ => Err(CodecError::MalformedGlzStream),
        }
    }
}

struct WindowEntry {
    image_id: u64,
    pixels: Arc<Vec<u8>>,
}

struct Inner {
    window: VecDeque<WindowEntry>,
    used_bytes: u64,
    budget_bytes: u64,
    next_image_id: u64,
}

/// Dictionary window shared by every display of one session.
pub struct GlzWindow {
    inner: Mutex<Inner>,
}

impl GlzWindow {
    pub fn new(budget_bytes: u64) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner {
                window: VecDeque::new(),
                used_bytes: 0,
                budget_bytes,
                next_image_id: 1,
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn head_id(&self) -> u64 {
        self.lock()
            .window
            .back()
            .map(|e| e.image_id)
            .unwrap_or(0)
    }

    pub fn earliest_surviving_id(&self) -> u64 {
        self.lock().window.front().map(|e| e.image_id).unwrap_or(0)
    }

    fn find(&self, image_id: u64) -> Option<Arc<Vec<u8>>> {
        self.lock()
            .window
            .iter()
            .find(|e| e.image_id == image_id)
            .map(|e| e.pixels.clone())
    }

    /// Decode one GLZ payload against this window, and append the
    /// result as a new window entry.
    ///
    /// `window_head_id` is the id the encoder claims was the window
    /// head when it encoded this image; if that id has since been
    /// evicted, any back-reference into it would be unresolvable, so
    /// this is checked up front.
    pub fn decode(
        &self,
        window_head_id: u64,
        payload: &[u8],
    ) -> Result<(u64, Arc<Vec<u8>>), CodecError> {
        if window_head_id != 0 && window_head_id < self.earliest_surviving_id() {
            return Err(CodecError::GlzWindowMiss {
                image_id: window_head_id,
                window_head: self.earliest_surviving_id(),
            });
        }

        let mut out = Vec::new();
        let mut cursor = 0usize;
        while cursor < payload.len() {
            let tag = payload[cursor];
            cursor += 1;
            let opcode = Opcode::from_tag(tag)?;
            match opcode {
                Opcode::Literal => {
                    let len = read_u32(payload, &mut cursor)? as usize;
                    if cursor + len > payload.len() {
                        return Err(CodecError::Truncated {
                            needed: cursor + len,
                            got: payload.len(),
                        });
                    }
                    out.extend_from_slice(&payload[cursor..cursor + len]);
                    cursor += len;
                }
                Opcode::BackRef => {
                    let image_id = read_u64(payload, &mut cursor)?;
                    let offset = read_u32(payload, &mut cursor)? as usize;
                    let length = read_u32(payload, &mut cursor)? as usize;
                    let source = self.find(image_id).ok_or(CodecError::GlzWindowMiss {
                        image_id,
                        window_head: self.earliest_surviving_id(),
                    })?;
                    if offset + length > source.len() {
                        return Err(CodecError::Truncated {
                            needed: offset + length,
                            got: source.len(),
                        });
                    }
                    out.extend_from_slice(&source[offset..offset + length]);
                }
            }
        }

        self.append(out)
    }

    fn append(&self, pixels: Vec<u8>) -> Result<(u64, Arc<Vec<u8>>), CodecError> {
        let mut inner = self.lock();
        let image_id = inner.next_image_id;
        inner.next_image_id += 1;
        let pixels = Arc::new(pixels);
        let byte_len = pixels.len() as u64;

        while inner.used_bytes + byte_len > inner.budget_bytes {
            let Some(evicted) = inner.window.pop_front() else {
                return Err(CodecError::MalformedGlzStream);
            };
            inner.used_bytes -= evicted.pixels.len() as u64;
        }

        inner.used_bytes += byte_len;
        inner.window.push_back(WindowEntry {
            image_id,
            pixels: pixels.clone(),
        });
        Ok((image_id, pixels))
    }

    pub fn used_bytes(&self) -> u64 {
        self.lock().used_bytes
    }
}

fn read_u32(buf: &[u8], cursor: &mut usize) -> Result<u32, CodecError> {
    if *cursor + 4 > buf.len() {
        return Err(CodecError::Truncated {
            needed: *cursor + 4,
            got: buf.len(),
        });
    }
    let v = u32::from_le_bytes(buf[*cursor..*cursor + 4].try_into().unwrap());
    *cursor += 4;
    Ok(v)
}

fn read_u64(buf: &[u8], cursor: &mut usize) -> Result<u64, CodecError> {
    if *cursor + 8 > buf.len() {
        return Err(CodecError::Truncated {
            needed: *cursor + 8,
            got: buf.len(),
        });
    }
    let v = u64::from_le_bytes(buf[*cursor..*cursor + 8].try_into().unwrap());
    *cursor += 8;
    Ok(v)
}

fn literal_opcode(data: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8];
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    out
}

fn backref_opcode(image_id: u64, offset: u32, length: u32) -> Vec<u8> {
    let mut out = vec![1u8];
    out.extend_from_slice(&image_id.to_le_bytes());
    out.extend_from_slice(&offset.to_le_bytes());
    out.extend_from_slice(&length.to_le_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_only_image_decodes_verbatim() {
        let window = GlzWindow::new(1024);
        let payload = literal_opcode(b"hello");
        let (id, pixels) = window.decode(0, &payload).unwrap();
        assert_eq!(id, 1);
        assert_eq!(&**pixels, b"hello");
    }

    #[test]
    fn later_image_can_back_reference_earlier_one() {
        let window = GlzWindow::new(1024);
        let (first_id, _) = window.decode(0, &literal_opcode(b"ABCDEF")).unwrap();

        let mut payload = literal_opcode(b"X");
        payload.extend(backref_opcode(first_id, 2, 3)); // "CDE"
        let (_, pixels) = window.decode(0, &payload).unwrap();
        assert_eq!(&**pixels, b"XCDE");
    }

    #[test]
    fn reference_to_evicted_image_is_a_window_miss() {
        let window = GlzWindow::new(6); // tiny budget forces eviction
        let (first_id, _) = window.decode(0, &literal_opcode(b"ABC")).unwrap();
        // This second image's own bytes plus the first push the window
        // over budget and evict the first image.
        window.decode(0, &literal_opcode(b"DEF")).unwrap();
        window.decode(0, &literal_opcode(b"GHI")).unwrap();

        let payload = backref_opcode(first_id, 0, 1);
        let err = window.decode(0, &payload).unwrap_err();
        assert!(matches!(err, CodecError::GlzWindowMiss { .. }));
    }

    #[test]
    fn stale_window_head_id_is_rejected_up_front() {
        let window = GlzWindow::new(6);
        window.decode(0, &literal_opcode(b"ABC")).unwrap();
        window.decode(0, &literal_opcode(b"DEF")).unwrap();
        window.decode(0, &literal_opcode(b"GHI")).unwrap();
        // image_id 1 ("ABC") should have been evicted by now.
        let earliest = window.earliest_surviving_id();
        assert!(earliest > 1);
        let err = window.decode(1, &literal_opcode(b"x")).unwrap_err();
        assert!(matches!(err, CodecError::GlzWindowMiss { .. }));
    }
}
