//! Fixed-layout wire structures: the per-message data header and the
//! link handshake PDUs. Encoded and decoded by hand (not via `serde`)
//! because the SPICE wire format is a raw little-endian C struct dump,
//! not a self-describing format — `serde` would have to lie about the
//! `Vec<u8>` tails anyway.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::ProtocolError;

/// `{serial, type, size, sub_list_offset}`, present on every regular
/// (non-link) message. Exactly `HEADER_LEN` bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpiceDataHeader {
    pub serial: u64,
    pub msg_type: u16,
    pub msg_size: u32,
    pub sub_list_offset: u32,
}

impl SpiceDataHeader {
    pub const LEN: usize = 8 + 2 + 4 + 4;

    pub fn encode(&self, out: &mut [u8; Self::LEN]) {
        LittleEndian::write_u64(&mut out[0..8], self.serial);
        LittleEndian::write_u16(&mut out[8..10], self.msg_type);
        LittleEndian::write_u32(&mut out[10..14], self.msg_size);
        LittleEndian::write_u32(&mut out[14..18], self.sub_list_offset);
    }

    pub fn decode(buf: &[u8; Self::LEN]) -> Self {
        Self {
            serial: LittleEndian::read_u64(&buf[0..8]),
            msg_type: LittleEndian::read_u16(&buf[8..10]),
            msg_size: LittleEndian::read_u32(&buf[10..14]),
            sub_list_offset: LittleEndian::read_u32(&buf[14..18]),
        }
    }
}

/// First PDU the client sends: `{magic, major, minor, size}` followed
/// by a `SpiceLinkMess` of exactly `size` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiceLinkHeader {
    pub magic: u32,
    pub major_version: u32,
    pub minor_version: u32,
    pub size: u32,
}

impl SpiceLinkHeader {
    pub const LEN: usize = 16;

    pub fn new(size: u32) -> Self {
        Self {
            magic: crate::constants::SPICE_MAGIC,
            major_version: crate::constants::SPICE_VERSION_MAJOR,
            minor_version: crate::constants::SPICE_VERSION_MINOR,
            size,
        }
    }

    pub fn encode(&self, out: &mut [u8; Self::LEN]) {
        LittleEndian::write_u32(&mut out[0..4], self.magic);
        LittleEndian::write_u32(&mut out[4..8], self.major_version);
        LittleEndian::write_u32(&mut out[8..12], self.minor_version);
        LittleEndian::write_u32(&mut out[12..16], self.size);
    }

    pub fn decode(buf: &[u8; Self::LEN]) -> Result<Self, ProtocolError> {
        let magic = LittleEndian::read_u32(&buf[0..4]);
        if magic != crate::constants::SPICE_MAGIC && magic != crate::constants::SPICE_MAGIC_LEGACY
        {
            return Err(ProtocolError::BadMagic(magic));
        }
        let major_version = LittleEndian::read_u32(&buf[4..8]);
        let minor_version = LittleEndian::read_u32(&buf[8..12]);
        if major_version != crate::constants::SPICE_VERSION_MAJOR {
            return Err(ProtocolError::UnsupportedVersion {
                major: major_version,
                minor: minor_version,
            });
        }
        Ok(Self {
            magic,
            major_version,
            minor_version,
            size: LittleEndian::read_u32(&buf[12..16]),
        })
    }
}

/// Body that follows a client `SpiceLinkHeader`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpiceLinkMess {
    pub connection_id: u32,
    pub channel_type: u8,
    pub channel_id: u8,
    pub common_caps: Vec<u32>,
    pub channel_caps: Vec<u32>,
}

impl SpiceLinkMess {
    /// Fixed prefix before the two capability arrays: `connection_id(4) +
    /// channel_type(1) + channel_id(1) + num_common_caps(4) +
    /// num_channel_caps(4) + caps_offset(4)`.
    const PREFIX_LEN: usize = 4 + 1 + 1 + 4 + 4 + 4;

    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; Self::PREFIX_LEN];
        LittleEndian::write_u32(&mut out[0..4], self.connection_id);
        out[4] = self.channel_type;
        out[5] = self.channel_id;
        LittleEndian::write_u32(&mut out[6..10], self.common_caps.len() as u32);
        LittleEndian::write_u32(&mut out[10..14], self.channel_caps.len() as u32);
        LittleEndian::write_u32(&mut out[14..18], Self::PREFIX_LEN as u32);
        for cap in &self.common_caps {
            out.extend_from_slice(&cap.to_le_bytes());
        }
        for cap in &self.channel_caps {
            out.extend_from_slice(&cap.to_le_bytes());
        }
        out
    }

    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        if buf.len() < Self::PREFIX_LEN {
            return Err(ProtocolError::Malformed("SpiceLinkMess shorter than prefix"));
        }
        let connection_id = LittleEndian::read_u32(&buf[0..4]);
        let channel_type = buf[4];
        let channel_id = buf[5];
        let num_common = LittleEndian::read_u32(&buf[6..10]) as usize;
        let num_channel = LittleEndian::read_u32(&buf[10..14]) as usize;
        let caps_offset = LittleEndian::read_u32(&buf[14..18]) as usize;
        let needed = caps_offset
            .checked_add((num_common + num_channel) * 4)
            .ok_or(ProtocolError::Malformed("capability count overflow"))?;
        if buf.len() < needed {
            return Err(ProtocolError::Malformed("SpiceLinkMess truncated capability list"));
        }
        let mut common_caps = Vec::with_capacity(num_common);
        let mut off = caps_offset;
        for _ in 0..num_common {
            common_caps.push(LittleEndian::read_u32(&buf[off..off + 4]));
            off += 4;
        }
        let mut channel_caps = Vec::with_capacity(num_channel);
        for _ in 0..num_channel {
            channel_caps.push(LittleEndian::read_u32(&buf[off..off + 4]));
            off += 4;
        }
        Ok(Self {
            connection_id,
            channel_type,
            channel_id,
            common_caps,
            channel_caps,
        })
    }
}

/// Server's link reply header, same shape as `SpiceLinkHeader`.
pub type SpiceLinkReplyHeader = SpiceLinkHeader;

/// Body that follows the server's `SpiceLinkReplyHeader`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpiceLinkReplyData {
    pub error: u32,
    pub pub_key: Vec<u8>,
    pub common_caps: Vec<u32>,
    pub channel_caps: Vec<u32>,
}

impl SpiceLinkReplyData {
    /// RSA-1024 public key, SubjectPublicKeyInfo DER, as used by every
    /// deployed SPICE server.
    pub const PUB_KEY_LEN: usize = 162;
    const PREFIX_LEN: usize = 4 + Self::PUB_KEY_LEN + 4 + 4 + 4;

    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; Self::PREFIX_LEN];
        LittleEndian::write_u32(&mut out[0..4], self.error);
        let key_len = self.pub_key.len().min(Self::PUB_KEY_LEN);
        out[4..4 + key_len].copy_from_slice(&self.pub_key[..key_len]);
        let base = 4 + Self::PUB_KEY_LEN;
        LittleEndian::write_u32(&mut out[base..base + 4], self.common_caps.len() as u32);
        LittleEndian::write_u32(&mut out[base + 4..base + 8], self.channel_caps.len() as u32);
        LittleEndian::write_u32(&mut out[base + 8..base + 12], Self::PREFIX_LEN as u32);
        for cap in &self.common_caps {
            out.extend_from_slice(&cap.to_le_bytes());
        }
        for cap in &self.channel_caps {
            out.extend_from_slice(&cap.to_le_bytes());
        }
        out
    }

    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        if buf.len() < Self::PREFIX_LEN {
            return Err(ProtocolError::Malformed("SpiceLinkReplyData shorter than prefix"));
        }
        let error = LittleEndian::read_u32(&buf[0..4]);
        let pub_key = buf[4..4 + Self::PUB_KEY_LEN].to_vec();
        let base = 4 + Self::PUB_KEY_LEN;
        let num_common = LittleEndian::read_u32(&buf[base..base + 4]) as usize;
        let num_channel = LittleEndian::read_u32(&buf[base + 4..base + 8]) as usize;
        let caps_offset = LittleEndian::read_u32(&buf[base + 8..base + 12]) as usize;
        let needed = caps_offset
            .checked_add((num_common + num_channel) * 4)
            .ok_or(ProtocolError::Malformed("capability count overflow"))?;
        if buf.len() < needed {
            return Err(ProtocolError::Malformed(
                "SpiceLinkReplyData truncated capability list",
            ));
        }
        let mut common_caps = Vec::with_capacity(num_common);
        let mut off = caps_offset;
        for _ in 0..num_common {
            common_caps.push(LittleEndian::read_u32(&buf[off..off + 4]));
            off += 4;
        }
        let mut channel_caps = Vec::with_capacity(num_channel);
        for _ in 0..num_channel {
            channel_caps.push(LittleEndian::read_u32(&buf[off..off + 4]));
            off += 4;
        }
        Ok(Self {
            error,
            pub_key,
            common_caps,
            channel_caps,
        })
    }
}

/// `LINK_REPLY.error` values (a subset the client cares about).
pub mod link_error {
    pub const OK: u32 = 0;
    pub const ERROR: u32 = 1;
    pub const INVALID_MAGIC: u32 = 2;
    pub const INVALID_DATA: u32 = 3;
    pub const VERSION_MISMATCH: u32 = 4;
    pub const NEED_SECURED: u32 = 5;
    pub const NEED_UNSECURED: u32 = 6;
    pub const PERMISSION_DENIED: u32 = 7;
    pub const BAD_CONNECTION_ID: u32 = 8;
    pub const CHANNEL_NOT_AVAILABLE: u32 = 9;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_header_round_trips() {
        let hdr = SpiceDataHeader {
            serial: 42,
            msg_type: 103,
            msg_size: 16,
            sub_list_offset: 0,
        };
        let mut buf = [0u8; SpiceDataHeader::LEN];
        hdr.encode(&mut buf);
        assert_eq!(SpiceDataHeader::decode(&buf), hdr);
    }

    #[test]
    fn link_header_rejects_bad_magic() {
        let mut buf = [0u8; SpiceLinkHeader::LEN];
        LittleEndian::write_u32(&mut buf[0..4], 0xdead_beef);
        assert!(matches!(
            SpiceLinkHeader::decode(&buf),
            Err(ProtocolError::BadMagic(_))
        ));
    }

    #[test]
    fn link_mess_round_trips_with_caps() {
        let mess = SpiceLinkMess {
            connection_id: 7,
            channel_type: 2,
            channel_id: 0,
            common_caps: vec![0b11],
            channel_caps: vec![0b1, 0b10],
        };
        let encoded = mess.encode();
        let decoded = SpiceLinkMess::decode(&encoded).unwrap();
        assert_eq!(decoded, mess);
    }

    #[test]
    fn link_reply_data_round_trips() {
        let data = SpiceLinkReplyData {
            error: link_error::OK,
            pub_key: vec![0xAB; SpiceLinkReplyData::PUB_KEY_LEN],
            common_caps: vec![0b11],
            channel_caps: vec![],
        };
        let encoded = data.encode();
        let decoded = SpiceLinkReplyData::decode(&encoded).unwrap();
        assert_eq!(decoded, data);
    }
}
