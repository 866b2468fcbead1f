//! The display channel: state machine, surfaces, streams and draw
//! dispatch tied together. Owns no socket itself — it is driven by a
//! [`spice_channel::ChannelRuntime`] the same way every other concrete
//! channel is, consuming decoded frame bodies and producing actions
//! for the application to carry out against a screen and a canvas.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use spice_canvas::{dispatch, Canvas, DrawRecord};
use spice_imaging::{GlzWindow, PaletteCache, PixmapCache};

use crate::error::DisplayError;
use crate::state::DisplayState;
use crate::surface::{Surface, SurfaceTable};
use crate::video_stream::{MaintenanceAction, VideoStream};

/// The ≈5s window after a `RESET` during which the screen stays
/// detached awaiting a fresh `SURFACE_CREATE`.
pub const RESET_RECOVERY: Duration = Duration::from_secs(5);

/// What the application must do in response to a message handled by
/// [`DisplayChannel`]. Mirrors `VideoStream::MaintenanceAction`'s
/// "describe, don't perform" shape.
#[derive(Debug)]
pub enum DisplayAction {
    None,
    AttachScreen,
    DetachScreen,
    /// Start (or restart) the post-reset recovery timer; if it fires
    /// before a `SURFACE_CREATE`, the caller should call
    /// [`DisplayChannel::on_reset_timeout`].
    ArmResetTimer,
    InvalidateRect {
        surface_id: u32,
        bbox: spice_canvas::Rect,
        urgent: bool,
    },
    VideoStream {
        stream_id: u32,
        action: MaintenanceAction,
    },
}

pub struct DisplayChannel {
    pub channel_id: u8,
    state: DisplayState,
    surfaces: SurfaceTable,
    streams: HashMap<u32, VideoStream>,
    pixmap_cache: Arc<PixmapCache>,
    palette_cache: Arc<PaletteCache>,
    glz_window: Arc<GlzWindow>,
}

impl DisplayChannel {
    pub fn new(
        channel_id: u8,
        pixmap_cache: Arc<PixmapCache>,
        palette_cache: Arc<PaletteCache>,
        glz_window: Arc<GlzWindow>,
    ) -> Self {
        Self {
            channel_id,
            state: DisplayState::default(),
            surfaces: SurfaceTable::new(),
            streams: HashMap::new(),
            pixmap_cache,
            palette_cache,
            glz_window,
        }
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn mark(&mut self) -> DisplayAction {
        let was_attached = self.state.is_attached();
        self.state = self.state.on_mark();
        if !was_attached && self.state.is_attached() {
            DisplayAction::AttachScreen
        } else {
            DisplayAction::None
        }
    }

    /// `RESET`: return to unmarked, clear the canvas's palette cache,
    /// and schedule the recovery timer.
    pub fn reset(&mut self) -> DisplayAction {
        self.state = self.state.on_reset();
        self.surfaces.clear();
        self.streams.clear();
        self.palette_cache.clear();
        DisplayAction::ArmResetTimer
    }

    /// Called if the recovery timer fires without a `SURFACE_CREATE`
    /// having arrived in the meantime: the screen reverts to splash.
    pub fn on_reset_timeout(&mut self) -> DisplayAction {
        if self.surfaces.is_empty() {
            DisplayAction::DetachScreen
        } else {
            DisplayAction::None
        }
    }

    pub fn surface_create(&mut self, surface: Surface) -> Result<(), DisplayError> {
        self.surfaces.create(surface)
    }

    pub fn surface_destroy(&mut self, id: u32) -> Result<(), DisplayError> {
        self.surfaces.destroy(id)?;
        Ok(())
    }

    pub fn inval_list(&mut self, ids: &[u64]) {
        self.pixmap_cache.invalidate(ids);
    }

    pub fn inval_all_pixmaps(&mut self) {
        self.pixmap_cache.clear();
    }

    pub fn inval_palette(&mut self, id: u64) {
        self.palette_cache.remove(id);
    }

    pub fn inval_all_palettes(&mut self) {
        self.palette_cache.clear();
    }

    pub fn stream_create(&mut self, stream_id: u32) {
        self.streams.insert(stream_id, VideoStream::new(stream_id));
    }

    pub fn stream_destroy(&mut self, stream_id: u32) -> Result<(), DisplayError> {
        self.streams
            .remove(&stream_id)
            .map(|_| ())
            .ok_or(DisplayError::NoSuchStream(stream_id))
    }

    pub fn stream_destroy_all(&mut self) {
        self.streams.clear();
    }

    pub fn stream_data(
        &mut self,
        stream_id: u32,
        now: i64,
        mm_time: i64,
        payload: Vec<u8>,
    ) -> Result<DisplayAction, DisplayError> {
        let stream = self
            .streams
            .get_mut(&stream_id)
            .ok_or(DisplayError::NoSuchStream(stream_id))?;
        let action = stream.push(now, mm_time, payload);
        Ok(DisplayAction::VideoStream { stream_id, action })
    }

    pub fn stream_on_timer(&mut self, stream_id: u32, now: i64) -> Result<DisplayAction, DisplayError> {
        let stream = self
            .streams
            .get_mut(&stream_id)
            .ok_or(DisplayError::NoSuchStream(stream_id))?;
        Ok(DisplayAction::VideoStream {
            stream_id,
            action: stream.on_timer(now),
        })
    }

    pub fn stream_on_update_mark(&mut self, stream_id: u32, ack_mark: u64) -> Result<bool, DisplayError> {
        let stream = self
            .streams
            .get_mut(&stream_id)
            .ok_or(DisplayError::NoSuchStream(stream_id))?;
        Ok(stream.on_update_mark(ack_mark))
    }

    pub fn stream_record_pending_mark(&mut self, stream_id: u32, mark: u64) -> Result<(), DisplayError> {
        let stream = self
            .streams
            .get_mut(&stream_id)
            .ok_or(DisplayError::NoSuchStream(stream_id))?;
        stream.record_pending_mark(mark);
        Ok(())
    }

    /// Dispatches a decoded draw record to `canvas` and reports the
    /// invalidation the caller owes the screen.
    ///
    /// A draw against an id torn down by a `SURFACE_DESTROY` that
    /// raced it is a silent nop ("outstanding draws to that id become
    /// nops"). A draw against an id that was never created at all is
    /// fatal to the channel, per the "draw commands addressing an
    /// absent surface are fatal" invariant.
    pub fn draw(&mut self, canvas: &mut dyn Canvas, record: &DrawRecord<'_>) -> Result<DisplayAction, DisplayError> {
        let base = record.base();
        let Some(surface) = self.surfaces.get(base.surface_id) else {
            if self.surfaces.was_destroyed(base.surface_id) {
                return Ok(DisplayAction::None);
            }
            return Err(DisplayError::NoSuchSurface(base.surface_id));
        };
        if !record.bbox_is_valid(surface.width, surface.height) {
            tracing::warn!(surface_id = base.surface_id, "draw record bbox outside surface bounds");
            return Ok(DisplayAction::None);
        }
        let surface_id = base.surface_id;
        let bbox = base.bbox;
        self.state = self.state.on_draw();
        dispatch(canvas, record);
        Ok(DisplayAction::InvalidateRect { surface_id, bbox, urgent: false })
    }

    pub fn pixmap_cache(&self) -> &Arc<PixmapCache> {
        &self.pixmap_cache
    }

    pub fn glz_window(&self) -> &Arc<GlzWindow> {
        &self.glz_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spice_canvas::{Brush, Clip, DrawBase, Point, QMask, Rect};

    fn channel() -> DisplayChannel {
        DisplayChannel::new(
            0,
            PixmapCache::new(16 * 1024 * 1024),
            PaletteCache::new(),
            GlzWindow::new(16 * 1024 * 1024),
        )
    }

    #[test]
    fn mark_attaches_the_screen_exactly_once() {
        let mut channel = channel();
        assert!(matches!(channel.mark(), DisplayAction::AttachScreen));
        assert!(matches!(channel.mark(), DisplayAction::None));
    }

    struct NoCanvas;
    impl Canvas for NoCanvas {
        fn fill(&mut self, _: Rect, _: Brush, _: u16, _: &QMask) {
            panic!("must not be called");
        }
        fn opaque(&mut self, _: Rect, _: Rect, _: &spice_canvas::ImageRef<'_>, _: Brush, _: u16, _: u8, _: &QMask) {}
        fn copy(&mut self, _: Rect, _: Rect, _: &spice_canvas::ImageRef<'_>, _: u16, _: u8, _: &QMask) {}
        fn blend(&mut self, _: Rect, _: Rect, _: &spice_canvas::ImageRef<'_>, _: u16, _: u8, _: &QMask) {}
        fn transparent(&mut self, _: Rect, _: Rect, _: &spice_canvas::ImageRef<'_>, _: u32, _: u32) {}
        fn alpha_blend(&mut self, _: Rect, _: Rect, _: &spice_canvas::ImageRef<'_>, _: u8, _: u8) {}
        fn blackness(&mut self, _: Rect, _: &QMask) {}
        fn whiteness(&mut self, _: Rect, _: &QMask) {}
        fn invers(&mut self, _: Rect, _: &QMask) {}
        fn rop3(&mut self, _: Rect, _: Rect, _: &spice_canvas::ImageRef<'_>, _: Brush, _: u8, _: &QMask) {}
        fn stroke(&mut self, _: Rect, _: &[u8], _: Brush, _: u16, _: u16) {}
        fn text(&mut self, _: Rect, _: &[u8], _: Rect, _: Rect, _: u16, _: u16) {}
        fn copy_bits(&mut self, _: Rect, _: Point) {}
        fn put_image(&mut self, _: u64, _: &spice_canvas::ImageRef<'_>) {}
        fn copy_pixels(&mut self, _: u32, _: Rect, _: Rect) {}
    }

    fn blackness_record(surface_id: u32) -> DrawRecord<'static> {
        DrawRecord::Blackness {
            base: DrawBase {
                surface_id,
                bbox: Rect { left: 0, top: 0, right: 1, bottom: 1 },
                clip: Clip::None,
            },
            mask: QMask { flags: 0, pos: Point { x: 0, y: 0 }, has_bitmap: false },
        }
    }

    #[test]
    fn draw_against_a_surface_that_was_never_created_is_fatal() {
        let mut channel = channel();
        let record = blackness_record(7);
        let err = channel.draw(&mut NoCanvas, &record).unwrap_err();
        assert!(matches!(err, DisplayError::NoSuchSurface(7)));
    }

    #[test]
    fn draw_racing_a_surface_destroy_is_a_silent_nop() {
        let mut channel = channel();
        channel.surface_create(Surface { id: 7, width: 800, height: 600, format: 0 }).unwrap();
        channel.surface_destroy(7).unwrap();
        let record = blackness_record(7);
        let action = channel.draw(&mut NoCanvas, &record).unwrap();
        assert!(matches!(action, DisplayAction::None));
    }

    #[test]
    fn reset_clears_surfaces_and_arms_the_recovery_timer() {
        let mut channel = channel();
        channel
            .surface_create(Surface { id: 0, width: 800, height: 600, format: 0 })
            .unwrap();
        assert!(matches!(channel.reset(), DisplayAction::ArmResetTimer));
        assert!(channel.surfaces.is_empty());
    }
}
