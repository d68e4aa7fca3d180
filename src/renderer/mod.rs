//! Confetti rendering
//!
//! The particle engine draws through `ConfettiSurface`; the web build backs
//! it with a Canvas 2D context, the headless build with `RecordingSurface`.

#[cfg(target_arch = "wasm32")]
pub mod canvas2d;
pub mod recording;

#[cfg(target_arch = "wasm32")]
pub use canvas2d::Canvas2dSurface;
pub use recording::RecordingSurface;

use glam::Vec2;

use crate::sim::Particle;

/// Something confetti can be drawn on
pub trait ConfettiSurface {
    /// Match the surface to the viewport (CSS px)
    fn resize(&mut self, size: Vec2);
    fn clear(&mut self);
    /// Draw one particle at its current angle and opacity
    fn draw_particle(&mut self, particle: &Particle);
}
