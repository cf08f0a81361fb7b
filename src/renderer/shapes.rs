//! Circle tessellation and the vertex-collecting painter

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::color::Rgba;
use crate::sim::Painter;

/// Segment count that keeps a circle's rim smooth at its size
pub fn segments_for_radius(radius: f32) -> u32 {
    ((radius * 0.8).ceil() as u32).clamp(12, 64)
}

/// Append a filled circle as a triangle fan flattened to a list
fn push_circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: Rgba, segments: u32) {
    out.reserve((segments * 3) as usize);
    let rim = |i: u32| {
        let theta = (i as f32 / segments as f32) * TAU;
        center + Vec2::from_angle(theta) * radius
    };
    for i in 0..segments {
        out.push(Vertex::new(center, color));
        out.push(Vertex::new(rim(i), color));
        out.push(Vertex::new(rim(i + 1), color));
    }
}

/// Collects one frame of circles as canvas-pixel vertices for the GPU
#[derive(Debug, Default)]
pub struct VertexBatch {
    vertices: Vec<Vertex>,
}

impl VertexBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop last frame's vertices, keeping the allocation
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
}

impl Painter for VertexBatch {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let segments = segments_for_radius(radius);
        push_circle(&mut self.vertices, center, radius, color, segments);
    }
}
