//! Frame codec, link handshake PDUs, and channel-type constants for
//! the SPICE protocol wire format.

pub mod common_messages;
pub mod constants;
pub mod error;
pub mod framer;
pub mod header;
pub mod tls;

pub use constants::ChannelType;
pub use error::{ProtocolError, WireError};
pub use framer::Peer;
pub use header::{SpiceDataHeader, SpiceLinkHeader, SpiceLinkMess, SpiceLinkReplyData};
