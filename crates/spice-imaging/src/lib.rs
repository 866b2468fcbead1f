//! Pixmap/palette caches, the GLZ dictionary decoder and shared
//! window, and the stateless Quic/LZ/JPEG codecs.

pub mod codec;
pub mod error;
pub mod glz;
pub mod palette_cache;
pub mod pixmap_cache;

pub use codec::{jpeg_decode, lz_decode, quic_decode, Dimensions};
pub use error::{CodecError, ResourceError};
pub use glz::GlzWindow;
pub use palette_cache::{Palette, PaletteCache};
pub use pixmap_cache::{CachedImage, PixmapCache};

/// The client announces its pixmap cache budget to the server before
/// the server starts sending cacheable images (`SpiceMsgcClientInfo`).
/// Encoded here since every display channel sends it at channel-ready
/// time, but the cache budget itself lives in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientInfo {
    pub cache_size_bytes: u64,
}

impl ClientInfo {
    pub fn encode(&self) -> Vec<u8> {
        self.cache_size_bytes.to_le_bytes().to_vec()
    }
}
