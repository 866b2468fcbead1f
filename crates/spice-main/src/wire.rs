//! Wire decoding for main-channel PDUs. Produces the plain Rust
//! values [`crate::channel::MainChannel`]'s handlers consume, the same
//! split `spice-display` uses between decoding and channel logic.

use byteorder::{ByteOrder, LittleEndian};
use spice_wire::error::ProtocolError;

use crate::migration::MigrationTarget;
use crate::session::ChannelId;

pub struct MainInit {
    pub session_id: u32,
    pub mm_time: u32,
    pub agent_connected: bool,
    pub supported_mouse_modes: u32,
}

pub fn decode_init(buf: &[u8]) -> Result<MainInit, ProtocolError> {
    if buf.len() < 13 {
        return Err(ProtocolError::Malformed("SpiceMsgMainInit truncated"));
    }
    Ok(MainInit {
        session_id: LittleEndian::read_u32(&buf[0..4]),
        mm_time: LittleEndian::read_u32(&buf[4..8]),
        agent_connected: buf[8] != 0,
        supported_mouse_modes: LittleEndian::read_u32(&buf[9..13]),
    })
}

pub fn decode_notify(buf: &[u8]) -> Result<(u32, String), ProtocolError> {
    if buf.len() < 4 {
        return Err(ProtocolError::Malformed("SpiceMsgNotify truncated"));
    }
    let severity = LittleEndian::read_u32(&buf[0..4]);
    let message = String::from_utf8_lossy(&buf[4..]).trim_end_matches('\0').to_string();
    Ok((severity, message))
}

/// `CHANNELS_LIST{[(type,id),...]}`: a `u32` count followed by
/// `(type: u8, id: u8)` pairs.
pub fn decode_channels_list(buf: &[u8]) -> Result<Vec<ChannelId>, ProtocolError> {
    if buf.len() < 4 {
        return Err(ProtocolError::Malformed("SpiceMsgChannels truncated"));
    }
    let count = LittleEndian::read_u32(&buf[0..4]) as usize;
    let mut channels = Vec::with_capacity(count);
    let mut offset = 4;
    for _ in 0..count {
        if offset + 2 > buf.len() {
            return Err(ProtocolError::Malformed("SpiceMsgChannels truncated entry"));
        }
        channels.push(ChannelId { channel_type: buf[offset], channel_id: buf[offset + 1] });
        offset += 2;
    }
    Ok(channels)
}

pub fn decode_mouse_mode(buf: &[u8]) -> Result<(u32, u32), ProtocolError> {
    if buf.len() < 8 {
        return Err(ProtocolError::Malformed("SpiceMsgMainMouseMode truncated"));
    }
    Ok((LittleEndian::read_u32(&buf[0..4]), LittleEndian::read_u32(&buf[4..8])))
}

pub fn decode_multi_media_time(buf: &[u8]) -> Result<u32, ProtocolError> {
    if buf.len() < 4 {
        return Err(ProtocolError::Malformed("SpiceMsgMainMultiMediaTime truncated"));
    }
    Ok(LittleEndian::read_u32(&buf[0..4]))
}

/// `MIGRATE_BEGIN`/`MIGRATE_SWITCH_HOST`: `port: u16`, then
/// null-terminated `host`, then an optional null-terminated cert
/// subject (empty if absent).
pub fn decode_migrate_target(buf: &[u8]) -> Result<MigrationTarget, ProtocolError> {
    if buf.len() < 2 {
        return Err(ProtocolError::Malformed("migrate target truncated"));
    }
    let port = LittleEndian::read_u16(&buf[0..2]);
    let rest = &buf[2..];
    let mut parts = rest.splitn(2, |&b| b == 0);
    let host = parts
        .next()
        .ok_or(ProtocolError::Malformed("migrate target missing host"))?;
    let host = String::from_utf8_lossy(host).to_string();
    let cert_subject = parts.next().and_then(|rest| {
        let trimmed = rest.splitn(2, |&b| b == 0).next().unwrap_or(rest);
        if trimmed.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(trimmed).to_string())
        }
    });
    Ok(MigrationTarget { host, port, cert_subject })
}
