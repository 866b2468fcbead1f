//! Server-declared drawable targets. Surface `0` is the primary and is
//! linked to the screen; every other surface is an off-screen render
//! target addressable by `Copy`/`CopyBits` records from other surfaces.

use std::collections::{HashMap, HashSet};

use crate::error::DisplayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    pub format: u32,
}

impl Surface {
    pub const PRIMARY: u32 = 0;

    pub fn is_primary(&self) -> bool {
        self.id == Self::PRIMARY
    }
}

#[derive(Debug, Default)]
pub struct SurfaceTable {
    surfaces: HashMap<u32, Surface>,
    /// Ids torn down since they were last created. A draw racing a
    /// `SURFACE_DESTROY` lands on one of these and is a nop; a draw
    /// against an id that was never created is not, and is fatal.
    recently_destroyed: HashSet<u32>,
}

impl SurfaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, surface: Surface) -> Result<(), DisplayError> {
        if self.surfaces.contains_key(&surface.id) {
            return Err(DisplayError::SurfaceAlreadyExists(surface.id));
        }
        self.recently_destroyed.remove(&surface.id);
        self.surfaces.insert(surface.id, surface);
        Ok(())
    }

    /// Tears a surface down. Draws outstanding against this id become
    /// nops once removed; callers check `get`/`was_destroyed` before
    /// dispatching.
    pub fn destroy(&mut self, id: u32) -> Result<Surface, DisplayError> {
        let surface = self.surfaces.remove(&id).ok_or(DisplayError::NoSuchSurface(id))?;
        self.recently_destroyed.insert(id);
        Ok(surface)
    }

    pub fn get(&self, id: u32) -> Option<&Surface> {
        self.surfaces.get(&id)
    }

    /// Whether `id` was created at some point and has since been torn
    /// down (as opposed to never having existed at all).
    pub fn was_destroyed(&self, id: u32) -> bool {
        self.recently_destroyed.contains(&id)
    }

    pub fn clear(&mut self) {
        self.surfaces.clear();
        self.recently_destroyed.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(id: u32) -> Surface {
        Surface { id, width: 800, height: 600, format: 0 }
    }

    #[test]
    fn creating_a_duplicate_id_is_rejected() {
        let mut table = SurfaceTable::new();
        table.create(surface(0)).unwrap();
        let err = table.create(surface(0)).unwrap_err();
        assert!(matches!(err, DisplayError::SurfaceAlreadyExists(0)));
    }

    #[test]
    fn destroying_an_unknown_id_is_rejected() {
        let mut table = SurfaceTable::new();
        let err = table.destroy(7).unwrap_err();
        assert!(matches!(err, DisplayError::NoSuchSurface(7)));
    }
}
