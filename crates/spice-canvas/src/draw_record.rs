//! The draw record: a decoded `SpiceMsgDisplayDrawXxx` body, ready to
//! be dispatched to a [`crate::canvas::Canvas`].

use crate::brush::{Brush, Clip, DrawBase, QMask};
use crate::geometry::Rect;
use crate::image_ref::ImageRef;

#[derive(Debug, Clone)]
pub enum DrawRecord<'a> {
    Fill {
        base: DrawBase,
        brush: Brush,
        rop_descriptor: u16,
        mask: QMask,
    },
    Opaque {
        base: DrawBase,
        src_area: Rect,
        src: ImageRef<'a>,
        brush: Brush,
        rop_descriptor: u16,
        scale_mode: u8,
        mask: QMask,
    },
    Copy {
        base: DrawBase,
        src_area: Rect,
        src: ImageRef<'a>,
        rop_descriptor: u16,
        scale_mode: u8,
        mask: QMask,
    },
    Blend {
        base: DrawBase,
        src_area: Rect,
        src: ImageRef<'a>,
        rop_descriptor: u16,
        scale_mode: u8,
        mask: QMask,
    },
    Transparent {
        base: DrawBase,
        src_area: Rect,
        src: ImageRef<'a>,
        src_color: u32,
        true_color: u32,
    },
    AlphaBlend {
        base: DrawBase,
        src_area: Rect,
        src: ImageRef<'a>,
        alpha_flags: u8,
        alpha: u8,
    },
    Blackness {
        base: DrawBase,
        mask: QMask,
    },
    Whiteness {
        base: DrawBase,
        mask: QMask,
    },
    Invers {
        base: DrawBase,
        mask: QMask,
    },
    Rop3Op {
        base: DrawBase,
        src_area: Rect,
        src: ImageRef<'a>,
        brush: Brush,
        rop3: u8,
        mask: QMask,
    },
    Stroke {
        base: DrawBase,
        /// Path data is left as an opaque byte slice: a polyline of
        /// points the canvas back-end walks itself.
        path: &'a [u8],
        brush: Brush,
        fore_mode: u16,
        back_mode: u16,
    },
    Text {
        base: DrawBase,
        /// `SpiceString` payload, left undecoded pending a back-end
        /// that needs to render it (raster vs UTF8 vs raw glyph index).
        text: &'a [u8],
        fore_area: Rect,
        back_area: Rect,
        fore_mode: u16,
        back_mode: u16,
    },
    CopyBits {
        base: DrawBase,
        src_pos: crate::geometry::Point,
    },
}

impl<'a> DrawRecord<'a> {
    pub fn base(&self) -> &DrawBase {
        match self {
            Self::Fill { base, .. }
            | Self::Opaque { base, .. }
            | Self::Copy { base, .. }
            | Self::Blend { base, .. }
            | Self::Transparent { base, .. }
            | Self::AlphaBlend { base, .. }
            | Self::Blackness { base, .. }
            | Self::Whiteness { base, .. }
            | Self::Invers { base, .. }
            | Self::Rop3Op { base, .. }
            | Self::Stroke { base, .. }
            | Self::Text { base, .. }
            | Self::CopyBits { base, .. } => base,
        }
    }

    /// §8 testable property: every draw record's bbox lies within its
    /// target surface's extent.
    pub fn bbox_is_valid(&self, surface_width: u32, surface_height: u32) -> bool {
        self.base().bbox.within_surface(surface_width, surface_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> DrawBase {
        DrawBase {
            surface_id: 0,
            bbox: Rect { left: 0, top: 0, right: 10, bottom: 10 },
            clip: Clip::None,
        }
    }

    #[test]
    fn base_accessor_matches_variant() {
        let record = DrawRecord::Blackness {
            base: base(),
            mask: QMask { flags: 0, pos: crate::geometry::Point { x: 0, y: 0 }, has_bitmap: false },
        };
        assert_eq!(record.base().surface_id, 0);
        assert!(record.bbox_is_valid(800, 600));
    }
}
