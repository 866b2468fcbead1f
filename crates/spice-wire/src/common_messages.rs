//! Message bodies shared by every channel type (the low-numbered
//! "common" message range): `SET_ACK`, `PING`/`PONG`, `MIGRATE`,
//! `MIGRATE_DATA`, `WAIT_FOR_CHANNELS`, `DISCONNECTING`, `NOTIFY`.
//!
//! Grounded field-for-field in `common/messages.h`.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::ProtocolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiceMsgSetAck {
    pub generation: u32,
    pub window: u32,
}

impl SpiceMsgSetAck {
    pub const LEN: usize = 8;

    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        if buf.len() < Self::LEN {
            return Err(ProtocolError::Malformed("SpiceMsgSetAck truncated"));
        }
        Ok(Self {
            generation: LittleEndian::read_u32(&buf[0..4]),
            window: LittleEndian::read_u32(&buf[4..8]),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiceMsgcAckSync {
    pub generation: u32,
}

impl SpiceMsgcAckSync {
    pub fn encode(&self) -> Vec<u8> {
        self.generation.to_le_bytes().to_vec()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpicePing {
    pub id: u32,
    pub timestamp: u64,
}

impl SpicePing {
    pub const LEN: usize = 12;

    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        if buf.len() < Self::LEN {
            return Err(ProtocolError::Malformed("SpiceMsgPing truncated"));
        }
        Ok(Self {
            id: LittleEndian::read_u32(&buf[0..4]),
            timestamp: LittleEndian::read_u64(&buf[4..12]),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpicePong {
    pub id: u32,
    pub timestamp: u64,
}

impl SpicePong {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; 12];
        LittleEndian::write_u32(&mut out[0..4], self.id);
        LittleEndian::write_u64(&mut out[4..12], self.timestamp);
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiceMsgMigrate {
    pub flags: u32,
}

pub mod migrate_flags {
    pub const NEED_FLUSH: u32 = 1 << 0;
    pub const NEED_DATA_TRANSFER: u32 = 1 << 1;
}

impl SpiceMsgMigrate {
    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        if buf.len() < 4 {
            return Err(ProtocolError::Malformed("SpiceMsgMigrate truncated"));
        }
        Ok(Self {
            flags: LittleEndian::read_u32(&buf[0..4]),
        })
    }
}

/// `MIGRATE_DATA` carries an opaque per-channel blob; this crate does
/// not interpret its contents beyond passing them to the owning
/// channel's migration state.
#[derive(Debug, Clone)]
pub struct SpiceMsgcMigrateData {
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiceChannelId {
    pub channel_type: u8,
    pub channel_id: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitEntry {
    pub channel_type: u8,
    pub channel_id: u8,
    pub message_serial: u64,
}

#[derive(Debug, Clone)]
pub struct SpiceMsgWaitForChannels {
    pub wait_list: Vec<WaitEntry>,
}

impl SpiceMsgWaitForChannels {
    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        if buf.is_empty() {
            return Err(ProtocolError::Malformed("SpiceMsgWaitForChannels missing count"));
        }
        let count = buf[0] as usize;
        let mut wait_list = Vec::with_capacity(count);
        let mut off = 1;
        for _ in 0..count {
            if buf.len() < off + 10 {
                return Err(ProtocolError::Malformed(
                    "SpiceMsgWaitForChannels truncated entry",
                ));
            }
            wait_list.push(WaitEntry {
                channel_type: buf[off],
                channel_id: buf[off + 1],
                message_serial: LittleEndian::read_u64(&buf[off + 2..off + 10]),
            });
            off += 10;
        }
        Ok(Self { wait_list })
    }
}

/// `INVAL_LIST` / cache eviction resource list.
#[derive(Debug, Clone)]
pub struct SpiceResourceList {
    pub ids: Vec<u64>,
}

impl SpiceResourceList {
    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        if buf.len() < 4 {
            return Err(ProtocolError::Malformed("SpiceResourceList missing count"));
        }
        let count = LittleEndian::read_u32(&buf[0..4]) as usize;
        let mut ids = Vec::with_capacity(count);
        let mut off = 4;
        for _ in 0..count {
            if buf.len() < off + 8 {
                return Err(ProtocolError::Malformed("SpiceResourceList truncated"));
            }
            ids.push(LittleEndian::read_u64(&buf[off..off + 8]));
            off += 8;
        }
        Ok(Self { ids })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_set_ack() {
        let mut buf = [0u8; 8];
        LittleEndian::write_u32(&mut buf[0..4], 3);
        LittleEndian::write_u32(&mut buf[4..8], 20);
        let ack = SpiceMsgSetAck::decode(&buf).unwrap();
        assert_eq!(ack.generation, 3);
        assert_eq!(ack.window, 20);
    }

    #[test]
    fn decodes_wait_for_channels() {
        let mut buf = vec![1u8];
        buf.push(2); // channel_type
        buf.push(0); // channel_id
        buf.extend_from_slice(&42u64.to_le_bytes());
        let msg = SpiceMsgWaitForChannels::decode(&buf).unwrap();
        assert_eq!(msg.wait_list.len(), 1);
        assert_eq!(msg.wait_list[0].message_serial, 42);
    }

    #[test]
    fn decodes_resource_list() {
        let mut buf = 2u32.to_le_bytes().to_vec();
        buf.extend_from_slice(&1u64.to_le_bytes());
        buf.extend_from_slice(&2u64.to_le_bytes());
        let list = SpiceResourceList::decode(&buf).unwrap();
        assert_eq!(list.ids, vec![1, 2]);
    }
}
