//! Canvas 2D fallback for browsers without WebGPU

use glam::Vec2;
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::color::Rgba;
use crate::sim::Painter;

/// Draws circles straight onto a `2d` canvas context
pub struct Canvas2d {
    ctx: CanvasRenderingContext2d,
}

impl Canvas2d {
    /// `None` if the canvas already has another context type
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }

    /// Clear to transparent and scale CSS pixels onto the device-pixel backing store
    pub fn begin_frame(&self, logical_size: (f32, f32), dpr: f64) {
        if self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0).is_err() {
            log::warn!("Canvas setTransform failed");
        }
        self.ctx
            .clear_rect(0.0, 0.0, logical_size.0 as f64, logical_size.1 as f64);
    }
}

impl Painter for Canvas2d {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ctx.begin_path();
        if self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .is_err()
        {
            return;
        }
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }
}
