//! Rendering backends for the ball field
//!
//! WebGPU draws tessellated circles in one triangle list; browsers without
//! `navigator.gpu` fall back to Canvas 2D.

#[cfg(target_arch = "wasm32")]
pub mod canvas2d;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

#[cfg(target_arch = "wasm32")]
pub use canvas2d::Canvas2d;
pub use pipeline::RenderState;
pub use shapes::VertexBatch;
pub use vertex::Vertex;
