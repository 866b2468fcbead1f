//! Display channel state machine, surface table, and the per-stream
//! video presentation engine.

pub mod channel;
pub mod error;
pub mod state;
pub mod surface;
pub mod video_stream;

pub use channel::{DisplayAction, DisplayChannel, RESET_RECOVERY};
pub use error::DisplayError;
pub use state::DisplayState;
pub use surface::{Surface, SurfaceTable};
pub use video_stream::{MaintenanceAction, VideoStream, MAX_OVER, MAX_UNDER, MAX_VIDEO_FRAMES};
