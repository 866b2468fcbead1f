//! Error taxonomy shared by every layer of the channel runtime.
//!
//! Mirrors the kinds named in the protocol design rather than inventing
//! a richer hierarchy: `Protocol` and `Io` are fatal to the owning
//! channel (and to the session if that channel is the main channel);
//! the other kinds are reported upward by higher layers.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("unexpected end of stream mid-message")]
    UnexpectedEof,
    #[error("declared message size {size} exceeds the configured maximum {max}")]
    SizeOverflow { size: u32, max: u32 },
    #[error("bad link magic: {0:#010x}")]
    BadMagic(u32),
    #[error("unsupported protocol version {major}.{minor}")]
    UnsupportedVersion { major: u32, minor: u32 },
    #[error("unknown channel type {0}")]
    UnknownChannelType(u8),
    #[error("server address {offset} out of range for body of size {size}")]
    AddressOutOfRange { offset: u32, size: u32 },
    #[error("missing required capability: {0}")]
    MissingCapability(&'static str),
    #[error("cache miss on required id {0}")]
    CacheMiss(u64),
    #[error("malformed message: {0}")]
    Malformed(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),
}
