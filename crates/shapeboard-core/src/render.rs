//! Render seam consumed by host renderers.

use crate::camera::Camera;
use crate::shapes::Shape;

/// Output sink for one frame of shapes.
///
/// Implementations paint the committed shapes first and then the ephemeral
/// previews on top (additive overlay); previews are valid for a single
/// frame only and must never be retained.
pub trait RenderSink {
    fn render(&mut self, shapes: &[Shape], previews: &[Shape], camera: &Camera);
}
