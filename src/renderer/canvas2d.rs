//! Canvas 2D confetti surface

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::ConfettiSurface;
use crate::sim::{Particle, ParticleShape};

pub struct Canvas2dSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2dSurface {
    /// Wrap a canvas; fails if it has no 2D context
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    fn height(&self) -> f64 {
        self.canvas.height() as f64
    }
}

impl ConfettiSurface for Canvas2dSurface {
    fn resize(&mut self, size: Vec2) {
        self.canvas.set_width(size.x.max(0.0) as u32);
        self.canvas.set_height(size.y.max(0.0) as u32);
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width(), self.height());
    }

    fn draw_particle(&mut self, p: &Particle) {
        let size = p.size as f64;
        let ctx = &self.ctx;

        ctx.save();
        ctx.set_global_alpha(p.opacity as f64);
        let _ = ctx.translate(p.pos.x as f64 + size / 2.0, p.pos.y as f64 + size / 2.0);
        let _ = ctx.rotate((p.angle as f64).to_radians());
        ctx.set_fill_style_str(p.color);
        match p.shape {
            ParticleShape::Circle => {
                ctx.begin_path();
                let _ = ctx.arc(0.0, 0.0, size / 2.0, 0.0, std::f64::consts::TAU);
                ctx.fill();
            }
            ParticleShape::Rect { lift, thickness } => {
                ctx.fill_rect(
                    -size / 2.0,
                    -size * lift as f64,
                    size,
                    size * thickness as f64,
                );
            }
        }
        ctx.restore();
    }
}
