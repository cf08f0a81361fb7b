//! GPU vertex format for tessellated balls
//!
//! Shapes emit vertices in canvas pixels; `RenderState` maps them to clip
//! space right before upload.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::color::Rgba;

/// Map a canvas pixel (origin top-left, y down) to normalized device coordinates
#[inline]
pub fn pixel_to_ndc(x: f32, y: f32, width: f32, height: f32) -> (f32, f32) {
    (x / width * 2.0 - 1.0, 1.0 - y / height * 2.0)
}

/// One triangle corner: position plus straight (non-premultiplied) color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    /// Matches `VertexInput` in shader.wgsl
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn new(position: Vec2, color: Rgba) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }

    /// Same vertex with its pixel position moved into clip space
    pub fn to_ndc(self, logical_size: (f32, f32)) -> Self {
        let (w, h) = logical_size;
        let (x, y) = pixel_to_ndc(self.position[0], self.position[1], w, h);
        Self {
            position: [x, y],
            ..self
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_ndc_corners() {
        assert_eq!(pixel_to_ndc(0.0, 0.0, 800.0, 600.0), (-1.0, 1.0));
        assert_eq!(pixel_to_ndc(800.0, 600.0, 800.0, 600.0), (1.0, -1.0));
        assert_eq!(pixel_to_ndc(400.0, 300.0, 800.0, 600.0), (0.0, 0.0));
    }

    #[test]
    fn test_to_ndc_keeps_color() {
        let red = Rgba::from_rgb8(255, 0, 0);
        let v = Vertex::new(Vec2::new(200.0, 150.0), red).to_ndc((800.0, 600.0));
        assert_eq!(v.position, [-0.5, 0.5]);
        assert_eq!(v.color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_layout_matches_struct() {
        let layout = Vertex::desc();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes[1].offset, 8);
        assert_eq!(layout.attributes[1].shader_location, 1);
    }
}
