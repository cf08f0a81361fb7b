//! Drawing seam between the kernel and whatever renders it

use glam::Vec2;

use crate::color::Rgba;

/// Something that can fill circles given in canvas pixel coordinates
pub trait Painter {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
}
