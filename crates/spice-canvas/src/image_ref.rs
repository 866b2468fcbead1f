//! An image referenced by a draw record, resolved after server-address
//! fix-up. `SURFACE`, `BITMAP`, `LZ_PLT`, `LZ_RGB`, `GLZ_RGB`, `QUIC`,
//! `JPEG` carry inline encoded bytes; `FROM_CACHE` is a pixmap cache
//! lookup.

use spice_wire::constants::ImageType;

#[derive(Debug, Clone)]
pub enum ImageRef<'a> {
    Surface(u32),
    Bitmap(&'a [u8]),
    LzPlt(&'a [u8]),
    LzRgb(&'a [u8]),
    GlzRgb(&'a [u8]),
    Quic(&'a [u8]),
    Jpeg(&'a [u8]),
    FromCache(u64),
}

impl<'a> ImageRef<'a> {
    pub fn image_type(&self) -> ImageType {
        match self {
            Self::Surface(_) => ImageType::Surface,
            Self::Bitmap(_) => ImageType::Bitmap,
            Self::LzPlt(_) => ImageType::LzPlt,
            Self::LzRgb(_) => ImageType::LzRgb,
            Self::GlzRgb(_) => ImageType::GlzRgb,
            Self::Quic(_) => ImageType::Quic,
            Self::Jpeg(_) => ImageType::Jpeg,
            Self::FromCache(_) => ImageType::FromCache,
        }
    }
}
