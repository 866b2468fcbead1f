//! Ties the link handshake, ACK window, send queue and migration state
//! together into one per-channel runtime used by every concrete
//! channel (main, display, cursor, inputs, ...).
//!
//! Generalizes the teacher's `EgfxController`/`EgfxBridge` split
//! (`egfx.rs`): the runtime is the "bridge" that owns the wire peer
//! and does the actual send/receive work, while a small `ChannelHandle`
//! (analogous to `EgfxController`) is what the rest of the application
//! holds to push outbound messages without touching the socket
//! directly.

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;

use spice_wire::constants::ChannelType;
use spice_wire::error::WireError;
use spice_wire::framer::Peer;
use spice_wire::header::{
    SpiceLinkHeader, SpiceLinkMess, SpiceLinkReplyData, SpiceLinkReplyHeader,
};

use crate::ack::AckWindow;
use crate::auth::encrypt_password;
use crate::migration::Migration;
use crate::send_queue::{PipeItem, SendQueue};
use crate::state::ConnectionState;

/// What the client advertises in `LINK_MESS` for a given channel.
pub struct LinkConfig {
    pub connection_id: u32,
    pub channel_type: ChannelType,
    pub channel_id: u8,
    pub common_caps: Vec<u32>,
    pub channel_caps: Vec<u32>,
    pub password: Option<String>,
}

/// Perform the client side of the link handshake described in §4.B:
/// send `LINK_MESS`, read `LINK_REPLY`, and if a password is
/// configured, complete `AUTH_SPICE` by RSA-encrypting it with the
/// server's `pub_key`.
pub async fn link_handshake<S>(
    peer: &mut Peer<S>,
    config: &LinkConfig,
) -> Result<SpiceLinkReplyData, WireError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mess = SpiceLinkMess {
        connection_id: config.connection_id,
        channel_type: config.channel_type.as_wire(),
        channel_id: config.channel_id,
        common_caps: config.common_caps.clone(),
        channel_caps: config.channel_caps.clone(),
    };
    let mess_bytes = mess.encode();
    let header = SpiceLinkHeader::new(mess_bytes.len() as u32);
    let mut hdr_buf = [0u8; SpiceLinkHeader::LEN];
    header.encode(&mut hdr_buf);
    peer.write_all_bytes(&hdr_buf).await?;
    peer.write_all_bytes(&mess_bytes).await?;
    peer.flush().await?;

    let reply_hdr_bytes = peer.read_exact_bytes(SpiceLinkReplyHeader::LEN).await?;
    let mut reply_hdr_buf = [0u8; SpiceLinkReplyHeader::LEN];
    reply_hdr_buf.copy_from_slice(&reply_hdr_bytes);
    let reply_header = SpiceLinkReplyHeader::decode(&reply_hdr_buf)?;

    let reply_body = peer
        .read_exact_bytes(reply_header.size as usize)
        .await?;
    let reply_data = SpiceLinkReplyData::decode(&reply_body)?;

    if reply_data.error != spice_wire::header::link_error::OK {
        return Ok(reply_data);
    }

    if let Some(password) = &config.password {
        let ciphertext = encrypt_password(&reply_data.pub_key, password)
            .map_err(WireError::Protocol)?;
        peer.write_all_bytes(&ciphertext).await?;
        peer.flush().await?;
    }

    Ok(reply_data)
}

/// Outbound message posted to a channel's runtime from the rest of
/// the application.
pub struct Outbound {
    pub item: PipeItem,
}

/// Lightweight handle the rest of the application holds to post
/// outbound messages to a channel without touching its socket.
#[derive(Clone)]
pub struct ChannelHandle {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl ChannelHandle {
    pub fn send(&self, item: PipeItem) {
        if self.tx.send(Outbound { item }).is_err() {
            tracing::debug!("channel runtime already shut down, dropping outbound item");
        }
    }
}

/// Owns the wire peer and all per-channel bookkeeping. Concrete
/// channels (main, display, ...) hold one of these plus their own
/// message-specific state, and drive it from within the reactor's
/// event loop.
pub struct ChannelRuntime<S> {
    pub channel_type: ChannelType,
    pub channel_id: u8,
    peer: Peer<S>,
    state: ConnectionState,
    ack: AckWindow,
    queue: SendQueue,
    migration: Migration,
    outbound_rx: mpsc::UnboundedReceiver<Outbound>,
    outbound_tx: mpsc::UnboundedSender<Outbound>,
}

impl<S> ChannelRuntime<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(channel_type: ChannelType, channel_id: u8, stream: S) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        Self {
            channel_type,
            channel_id,
            peer: Peer::new(stream),
            state: ConnectionState::Connecting,
            ack: AckWindow::new(),
            queue: SendQueue::new(),
            migration: Migration::new(),
            outbound_rx,
            outbound_tx,
        }
    }

    pub fn handle(&self) -> ChannelHandle {
        ChannelHandle {
            tx: self.outbound_tx.clone(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn set_state(&mut self, state: ConnectionState) {
        if let Err(e) = crate::state::validate_transition(self.state, state) {
            tracing::warn!(%e, "forcing illegal channel state transition");
        }
        self.state = state;
    }

    pub fn ack_window_mut(&mut self) -> &mut AckWindow {
        &mut self.ack
    }

    pub fn migration_mut(&mut self) -> &mut Migration {
        &mut self.migration
    }

    /// Drain any outbound items posted via a [`ChannelHandle`] onto
    /// the send queue. Call this before draining the queue to the
    /// wire in the reactor loop.
    pub fn absorb_pending_outbound(&mut self) {
        while let Ok(outbound) = self.outbound_rx.try_recv() {
            self.queue.push(outbound.item);
        }
    }

    pub fn enqueue(&mut self, item: PipeItem) {
        self.queue.push(item);
    }

    /// Send as many queued items as the ACK window and socket
    /// currently allow.
    pub async fn flush_send_queue(&mut self) -> Result<(), WireError> {
        self.queue.set_blocked(self.ack.is_send_blocked());
        while let Some((header, body, item)) = self.queue.pop_framed() {
            self.peer.write_frame(&header, &body).await?;
            self.ack.on_message_sent();
            SendQueue::mark_sent(item);
            if self.ack.is_send_blocked() {
                self.queue.set_blocked(true);
                break;
            }
        }
        self.peer.flush().await?;
        Ok(())
    }

    /// Read the next frame off the wire, if any. Returns `Ok(None)` on
    /// a clean peer-initiated disconnect. Accounts the frame against
    /// the inbound ACK window and, once a window's worth of payload
    /// messages has been received, queues the `ACK` reply (§4.B).
    pub async fn read_frame(
        &mut self,
    ) -> Result<Option<(spice_wire::header::SpiceDataHeader, Vec<u8>)>, WireError> {
        let frame = self.peer.read_frame().await?;
        if frame.is_some() && self.ack.on_message_received() {
            self.queue.push(PipeItem::new(spice_wire::constants::common_msgc::ACK, Vec::new()));
        }
        Ok(frame)
    }

    pub fn disconnect(&mut self) {
        self.queue.drain_discard();
        self.set_state(ConnectionState::Disconnected);
    }
}
