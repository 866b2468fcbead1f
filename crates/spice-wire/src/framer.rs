//! Reads and writes length-prefixed SPICE messages over any
//! `AsyncRead + AsyncWrite` stream (plain TCP or a TLS session wrapped
//! by [`crate::tls`]).
//!
//! Read side follows §4.A: read exactly `sizeof(header)` bytes, then
//! exactly `header.msg_size` bytes into a freshly allocated body
//! buffer, bailing with [`ProtocolError::UnexpectedEof`] on a
//! short read and [`ProtocolError::SizeOverflow`] when the declared
//! size exceeds the configured per-channel maximum (mirrors the
//! teacher's `x224::read_connection_request` read-exact-then-validate
//! shape).

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{ProtocolError, WireError};
use crate::header::SpiceDataHeader;

/// Default cap on `msg_size`; generous enough for a bulk-payload ping
/// (~250 KB) or a large draw record, small enough to bound a malicious
/// or corrupted header.
pub const DEFAULT_MAX_MESSAGE_SIZE: u32 = 16 * 1024 * 1024;

pub struct Peer<S> {
    stream: S,
    max_message_size: u32,
}

impl<S> Peer<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }

    pub fn with_max_message_size(mut self, max: u32) -> Self {
        self.max_message_size = max;
        self
    }

    /// Read raw link-handshake bytes of exactly `len`, used before
    /// regular framing begins (the link header/mess/reply are not
    /// `SpiceDataHeader`-framed).
    pub async fn read_exact_bytes(&mut self, len: usize) -> Result<Vec<u8>, WireError> {
        let mut buf = vec![0u8; len];
        self.stream
            .read_exact(&mut buf)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::UnexpectedEof => {
                    WireError::Protocol(ProtocolError::UnexpectedEof)
                }
                _ => WireError::Io(e),
            })?;
        Ok(buf)
    }

    pub async fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), WireError> {
        self.stream.write_all(buf).await?;
        Ok(())
    }

    /// Read one `{header, body}` frame. Returns `Ok(None)` on a clean
    /// EOF at a message boundary (peer closed the connection), and
    /// `Err` on any other failure including a short read mid-message.
    pub async fn read_frame(&mut self) -> Result<Option<(SpiceDataHeader, Vec<u8>)>, WireError> {
        let mut hdr_buf = [0u8; SpiceDataHeader::LEN];
        match self.stream.read_exact(&mut hdr_buf).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Ok(None);
            }
            Err(e) => return Err(WireError::Io(e)),
        }
        let header = SpiceDataHeader::decode(&hdr_buf);
        if header.msg_size > self.max_message_size {
            return Err(WireError::Protocol(ProtocolError::SizeOverflow {
                size: header.msg_size,
                max: self.max_message_size,
            }));
        }
        let mut body = vec![0u8; header.msg_size as usize];
        self.stream
            .read_exact(&mut body)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::UnexpectedEof => {
                    WireError::Protocol(ProtocolError::UnexpectedEof)
                }
                _ => WireError::Io(e),
            })?;
        Ok(Some((header, body)))
    }

    /// Write one `{header, body}` frame as a single vectored write so
    /// the header and body reach the socket in one syscall where the
    /// runtime supports it.
    pub async fn write_frame(&mut self, header: &SpiceDataHeader, body: &[u8]) -> Result<(), WireError> {
        let mut hdr_buf = [0u8; SpiceDataHeader::LEN];
        header.encode(&mut hdr_buf);
        self.stream.write_all(&hdr_buf).await?;
        self.stream.write_all(body).await?;
        Ok(())
    }

    pub async fn flush(&mut self) -> Result<(), WireError> {
        self.stream.flush().await?;
        Ok(())
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;

    #[tokio::test]
    async fn round_trips_a_frame() {
        let (client, mut server) = duplex(4096);
        let mut peer = Peer::new(client);

        let header = SpiceDataHeader {
            serial: 1,
            msg_type: 103,
            msg_size: 5,
            sub_list_offset: 0,
        };
        peer.write_frame(&header, b"hello").await.unwrap();
        drop(peer);

        let mut hdr_buf = [0u8; SpiceDataHeader::LEN];
        server.read_exact(&mut hdr_buf).await.unwrap();
        let decoded = SpiceDataHeader::decode(&hdr_buf);
        assert_eq!(decoded, header);
        let mut body = vec![0u8; 5];
        server.read_exact(&mut body).await.unwrap();
        assert_eq!(&body, b"hello");
    }

    #[tokio::test]
    async fn rejects_oversized_declared_message() {
        let (client, mut server) = duplex(64);
        tokio::spawn(async move {
            let mut buf = [0u8; SpiceDataHeader::LEN];
            let header = SpiceDataHeader {
                serial: 0,
                msg_type: 1,
                msg_size: DEFAULT_MAX_MESSAGE_SIZE + 1,
                sub_list_offset: 0,
            };
            header.encode(&mut buf);
            let _ = server.write_all(&buf).await;
        });
        let mut peer = Peer::new(client);
        let err = peer.read_frame().await.unwrap_err();
        assert!(matches!(
            err,
            WireError::Protocol(ProtocolError::SizeOverflow { .. })
        ));
    }

    #[tokio::test]
    async fn clean_eof_at_boundary_is_none() {
        let (client, server) = duplex(64);
        drop(server);
        let mut peer = Peer::new(client);
        assert!(peer.read_frame().await.unwrap().is_none());
    }
}
