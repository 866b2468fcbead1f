//! Cursor channel (§4.J): shape cache, visibility/position/trail
//! state, and reparenting onto a display's screen coordinates.

use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotspot {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone)]
pub struct CursorShape {
    pub id: u64,
    pub width: u16,
    pub height: u16,
    pub hotspot: Hotspot,
    pub pixels: Arc<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrailState {
    pub length: u16,
    pub frequency: u16,
}

/// Cursor shapes are reference-counted and shared across every cursor
/// channel belonging to the same session (mirrors
/// [`spice_imaging::PixmapCache`]'s ownership model, scaled down: no
/// byte budget, the server drives eviction explicitly via `INVAL_*`).
#[derive(Default)]
pub struct ShapeCache {
    shapes: HashMap<u64, Arc<CursorShape>>,
}

impl ShapeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, shape: CursorShape) -> Arc<CursorShape> {
        let shape = Arc::new(shape);
        self.shapes.insert(shape.id, shape.clone());
        shape
    }

    pub fn get(&self, id: u64) -> Option<Arc<CursorShape>> {
        self.shapes.get(&id).cloned()
    }

    pub fn inval_one(&mut self, id: u64) {
        self.shapes.remove(&id);
    }

    pub fn inval_all(&mut self) {
        self.shapes.clear();
    }
}

pub struct CursorChannel {
    pub channel_id: u8,
    shapes: ShapeCache,
    current: Option<Arc<CursorShape>>,
    visible: bool,
    position: (i32, i32),
    trail: TrailState,
    /// The display id this cursor layer is currently parented to, if
    /// any; position is expressed in that display's screen coordinates.
    attached_display: Option<u32>,
}

impl CursorChannel {
    pub fn new(channel_id: u8) -> Self {
        Self {
            channel_id,
            shapes: ShapeCache::new(),
            current: None,
            visible: false,
            position: (0, 0),
            trail: TrailState::default(),
            attached_display: None,
        }
    }

    pub fn current_shape(&self) -> Option<&Arc<CursorShape>> {
        self.current.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    pub fn set(&mut self, shape: CursorShape, position: (i32, i32), visible: bool) {
        self.current = Some(self.shapes.insert(shape));
        self.position = position;
        self.visible = visible;
    }

    pub fn mov(&mut self, position: (i32, i32)) {
        self.position = position;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn trail(&mut self, trail: TrailState) {
        self.trail = trail;
    }

    pub fn reset(&mut self) {
        self.shapes.inval_all();
        self.current = None;
        self.visible = false;
        self.trail = TrailState::default();
    }

    pub fn inval_one(&mut self, id: u64) {
        self.shapes.inval_one(id);
        if self.current.as_ref().is_some_and(|s| s.id == id) {
            self.current = None;
        }
    }

    pub fn inval_all(&mut self) {
        self.shapes.inval_all();
        self.current = None;
    }

    /// Reparents the cursor layer onto `display_id`'s screen; position
    /// is thereafter expressed in that screen's coordinates.
    pub fn attach_to_display(&mut self, display_id: u32) {
        self.attached_display = Some(display_id);
    }

    pub fn attached_display(&self) -> Option<u32> {
        self.attached_display
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(id: u64) -> CursorShape {
        CursorShape { id, width: 1, height: 1, hotspot: Hotspot { x: 0, y: 0 }, pixels: Arc::new(vec![0]) }
    }

    #[test]
    fn set_then_inval_one_clears_current_if_matching() {
        let mut channel = CursorChannel::new(0);
        channel.set(shape(7), (10, 10), true);
        assert!(channel.current_shape().is_some());
        channel.inval_one(7);
        assert!(channel.current_shape().is_none());
    }

    #[test]
    fn reset_clears_visibility_and_shapes() {
        let mut channel = CursorChannel::new(0);
        channel.set(shape(1), (0, 0), true);
        channel.reset();
        assert!(!channel.is_visible());
        assert!(channel.current_shape().is_none());
    }
}
