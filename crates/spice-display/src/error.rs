use spice_imaging::{CodecError, ResourceError};
use spice_wire::error::ProtocolError;

#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("surface {0} already exists")]
    SurfaceAlreadyExists(u32),
    #[error("no surface with id {0}")]
    NoSuchSurface(u32),
    #[error("no stream with id {0}")]
    NoSuchStream(u32),
}
