//! Server-address fix-up.
//!
//! Draw PDUs reference their inline image/brush/mask payloads by a
//! "server address": an offset that the server computed relative to
//! its own copy of the message body. The wire format carries that
//! offset as a plain integer with no length, so resolving it means
//! treating the message body as an immutable byte range and
//! validating the offset falls inside it before handing out a slice.
//! An out-of-range offset is a parser error, not a memory fault.

use spice_wire::error::ProtocolError;

/// A message body, addressed the way the server addressed it.
pub struct MessageBody<'a> {
    bytes: &'a [u8],
}

impl<'a> MessageBody<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Resolves a server address to a slice of at least `min_len`
    /// bytes starting at `offset`. The slice may run past whatever the
    /// field describes (e.g. an image header's declared length); the
    /// caller re-slices further once it has parsed that length.
    pub fn resolve(&self, offset: u32, min_len: usize) -> Result<&'a [u8], ProtocolError> {
        let offset = offset as usize;
        let end = offset
            .checked_add(min_len)
            .ok_or(ProtocolError::AddressOutOfRange {
                offset: offset as u32,
                size: self.bytes.len() as u32,
            })?;
        if end > self.bytes.len() {
            return Err(ProtocolError::AddressOutOfRange {
                offset: offset as u32,
                size: self.bytes.len() as u32,
            });
        }
        Ok(&self.bytes[offset..])
    }

    /// Resolves a server address to an exact-length slice.
    pub fn resolve_exact(&self, offset: u32, len: usize) -> Result<&'a [u8], ProtocolError> {
        let slice = self.resolve(offset, len)?;
        Ok(&slice[..len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_offset_resolves() {
        let body = MessageBody::new(&[0, 1, 2, 3, 4, 5]);
        let slice = body.resolve_exact(2, 3).unwrap();
        assert_eq!(slice, &[2, 3, 4]);
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        let body = MessageBody::new(&[0, 1, 2]);
        let err = body.resolve_exact(2, 5).unwrap_err();
        assert!(matches!(err, ProtocolError::AddressOutOfRange { .. }));
    }

    #[test]
    fn overflowing_offset_plus_len_is_rejected() {
        let body = MessageBody::new(&[0, 1, 2]);
        let err = body.resolve_exact(u32::MAX, 5).unwrap_err();
        assert!(matches!(err, ProtocolError::AddressOutOfRange { .. }));
    }
}
