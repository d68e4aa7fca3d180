//! Headless surface that only counts what would have been drawn

use glam::Vec2;

use super::ConfettiSurface;
use crate::sim::{Particle, ParticleShape};

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub size: Vec2,
    pub clears: usize,
    pub circles: usize,
    pub rects: usize,
    /// Particles drawn since the last clear
    pub drawn_since_clear: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_draws(&self) -> usize {
        self.circles + self.rects
    }
}

impl ConfettiSurface for RecordingSurface {
    fn resize(&mut self, size: Vec2) {
        self.size = size;
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.drawn_since_clear = 0;
    }

    fn draw_particle(&mut self, particle: &Particle) {
        match particle.shape {
            ParticleShape::Circle => self.circles += 1,
            ParticleShape::Rect { .. } => self.rects += 1,
        }
        self.drawn_since_clear += 1;
    }
}
