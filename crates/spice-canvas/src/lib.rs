//! Canvas abstraction: geometry primitives, draw record decoding,
//! server-address fix-up, and the [`Canvas`] trait draw back-ends
//! implement.

pub mod brush;
pub mod canvas;
pub mod draw_record;
pub mod fixup;
pub mod geometry;
pub mod image_ref;

pub use brush::{Brush, Clip, DrawBase, QMask};
pub use canvas::{dispatch, Canvas};
pub use draw_record::DrawRecord;
pub use fixup::MessageBody;
pub use geometry::{Point, Rect, Size};
pub use image_ref::ImageRef;
