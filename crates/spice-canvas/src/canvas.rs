//! The `Canvas` trait: the draw operations a back-end (software
//! raster, GPU texture, whatever the host compositor offers) must
//! implement. This crate only decodes records and validates their
//! geometry; rendering is an external collaborator's job.

use crate::brush::{Brush, QMask};
use crate::draw_record::DrawRecord;
use crate::geometry::{Point, Rect};
use crate::image_ref::ImageRef;

pub trait Canvas {
    fn fill(&mut self, bbox: Rect, brush: Brush, rop_descriptor: u16, mask: &QMask);

    fn opaque(
        &mut self,
        bbox: Rect,
        src_area: Rect,
        src: &ImageRef<'_>,
        brush: Brush,
        rop_descriptor: u16,
        scale_mode: u8,
        mask: &QMask,
    );

    fn copy(
        &mut self,
        bbox: Rect,
        src_area: Rect,
        src: &ImageRef<'_>,
        rop_descriptor: u16,
        scale_mode: u8,
        mask: &QMask,
    );

    fn blend(
        &mut self,
        bbox: Rect,
        src_area: Rect,
        src: &ImageRef<'_>,
        rop_descriptor: u16,
        scale_mode: u8,
        mask: &QMask,
    );

    fn transparent(
        &mut self,
        bbox: Rect,
        src_area: Rect,
        src: &ImageRef<'_>,
        src_color: u32,
        true_color: u32,
    );

    fn alpha_blend(
        &mut self,
        bbox: Rect,
        src_area: Rect,
        src: &ImageRef<'_>,
        alpha_flags: u8,
        alpha: u8,
    );

    fn blackness(&mut self, bbox: Rect, mask: &QMask);
    fn whiteness(&mut self, bbox: Rect, mask: &QMask);
    fn invers(&mut self, bbox: Rect, mask: &QMask);

    fn rop3(
        &mut self,
        bbox: Rect,
        src_area: Rect,
        src: &ImageRef<'_>,
        brush: Brush,
        rop3: u8,
        mask: &QMask,
    );

    fn stroke(&mut self, bbox: Rect, path: &[u8], brush: Brush, fore_mode: u16, back_mode: u16);

    fn text(
        &mut self,
        bbox: Rect,
        text: &[u8],
        fore_area: Rect,
        back_area: Rect,
        fore_mode: u16,
        back_mode: u16,
    );

    fn copy_bits(&mut self, bbox: Rect, src_pos: Point);

    /// Decodes and caches an inline image so later `FromCache`
    /// references can resolve it; a no-op for back-ends that decode
    /// lazily at draw time.
    fn put_image(&mut self, image_id: u64, image: &ImageRef<'_>);

    /// Pulls pixels out of `surface_id` for a `Copy`/`CopyBits` whose
    /// source is another surface rather than an inline image.
    fn copy_pixels(&mut self, surface_id: u32, src_area: Rect, dest: Rect);
}

/// Dispatches a decoded record to a [`Canvas`] implementation.
pub fn dispatch(canvas: &mut dyn Canvas, record: &DrawRecord<'_>) {
    let bbox = record.base().bbox;
    match record {
        DrawRecord::Fill { brush, rop_descriptor, mask, .. } => {
            canvas.fill(bbox, *brush, *rop_descriptor, mask);
        }
        DrawRecord::Opaque { src_area, src, brush, rop_descriptor, scale_mode, mask, .. } => {
            canvas.opaque(bbox, *src_area, src, *brush, *rop_descriptor, *scale_mode, mask);
        }
        DrawRecord::Copy { src_area, src, rop_descriptor, scale_mode, mask, .. } => {
            canvas.copy(bbox, *src_area, src, *rop_descriptor, *scale_mode, mask);
        }
        DrawRecord::Blend { src_area, src, rop_descriptor, scale_mode, mask, .. } => {
            canvas.blend(bbox, *src_area, src, *rop_descriptor, *scale_mode, mask);
        }
        DrawRecord::Transparent { src_area, src, src_color, true_color, .. } => {
            canvas.transparent(bbox, *src_area, src, *src_color, *true_color);
        }
        DrawRecord::AlphaBlend { src_area, src, alpha_flags, alpha, .. } => {
            canvas.alpha_blend(bbox, *src_area, src, *alpha_flags, *alpha);
        }
        DrawRecord::Blackness { mask, .. } => canvas.blackness(bbox, mask),
        DrawRecord::Whiteness { mask, .. } => canvas.whiteness(bbox, mask),
        DrawRecord::Invers { mask, .. } => canvas.invers(bbox, mask),
        DrawRecord::Rop3Op { src_area, src, brush, rop3, mask, .. } => {
            canvas.rop3(bbox, *src_area, src, *brush, *rop3, mask);
        }
        DrawRecord::Stroke { path, brush, fore_mode, back_mode, .. } => {
            canvas.stroke(bbox, path, *brush, *fore_mode, *back_mode);
        }
        DrawRecord::Text { text, fore_area, back_area, fore_mode, back_mode, .. } => {
            canvas.text(bbox, text, *fore_area, *back_area, *fore_mode, *back_mode);
        }
        DrawRecord::CopyBits { src_pos, .. } => canvas.copy_bits(bbox, *src_pos),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::{Clip, DrawBase};

    #[derive(Default)]
    struct RecordingCanvas {
        calls: Vec<&'static str>,
    }

    impl Canvas for RecordingCanvas {
        fn fill(&mut self, _bbox: Rect, _brush: Brush, _rop_descriptor: u16, _mask: &QMask) {
            self.calls.push("fill");
        }
        fn opaque(&mut self, _: Rect, _: Rect, _: &ImageRef<'_>, _: Brush, _: u16, _: u8, _: &QMask) {
            self.calls.push("opaque");
        }
        fn copy(&mut self, _: Rect, _: Rect, _: &ImageRef<'_>, _: u16, _: u8, _: &QMask) {
            self.calls.push("copy");
        }
        fn blend(&mut self, _: Rect, _: Rect, _: &ImageRef<'_>, _: u16, _: u8, _: &QMask) {
            self.calls.push("blend");
        }
        fn transparent(&mut self, _: Rect, _: Rect, _: &ImageRef<'_>, _: u32, _: u32) {
            self.calls.push("transparent");
        }
        fn alpha_blend(&mut self, _: Rect, _: Rect, _: &ImageRef<'_>, _: u8, _: u8) {
            self.calls.push("alpha_blend");
        }
        fn blackness(&mut self, _: Rect, _: &QMask) {
            self.calls.push("blackness");
        }
        fn whiteness(&mut self, _: Rect, _: &QMask) {
            self.calls.push("whiteness");
        }
        fn invers(&mut self, _: Rect, _: &QMask) {
            self.calls.push("invers");
        }
        fn rop3(&mut self, _: Rect, _: Rect, _: &ImageRef<'_>, _: Brush, _: u8, _: &QMask) {
            self.calls.push("rop3");
        }
        fn stroke(&mut self, _: Rect, _: &[u8], _: Brush, _: u16, _: u16) {
            self.calls.push("stroke");
        }
        fn text(&mut self, _: Rect, _: &[u8], _: Rect, _: Rect, _: u16, _: u16) {
            self.calls.push("text");
        }
        fn copy_bits(&mut self, _: Rect, _: Point) {
            self.calls.push("copy_bits");
        }
        fn put_image(&mut self, _: u64, _: &ImageRef<'_>) {
            self.calls.push("put_image");
        }
        fn copy_pixels(&mut self, _: u32, _: Rect, _: Rect) {
            self.calls.push("copy_pixels");
        }
    }

    #[test]
    fn dispatch_routes_blackness_to_the_right_method() {
        let mut canvas = RecordingCanvas::default();
        let record = DrawRecord::Blackness {
            base: DrawBase {
                surface_id: 0,
                bbox: Rect { left: 0, top: 0, right: 1, bottom: 1 },
                clip: Clip::None,
            },
            mask: QMask { flags: 0, pos: Point { x: 0, y: 0 }, has_bitmap: false },
        };
        dispatch(&mut canvas, &record);
        assert_eq!(canvas.calls, vec!["blackness"]);
    }
}
