//! Confetti particle engine
//!
//! One burst at a time: `trigger` replaces the pool and restarts the frame
//! loop, a one-shot timer stops respawning one second before the burst's
//! duration so it thins out, and the loop shuts itself down once nothing
//! is visible.

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::outcome::WinTier;
use crate::consts::*;
use crate::platform::{FrameHandle, Scheduler, TimerHandle};
use crate::renderer::ConfettiSurface;

/// Warm palette shared by jackpot and small-win bursts
pub const BASE_PALETTE: &[&str] = &["#fca311", "#e85d04", "#ffd60a", "#00b4d8", "#48cae4", "#f8f9fa"];
/// Gold/red palette for the super jackpot
pub const SUPER_PALETTE: &[&str] = &["#ffd700", "#ffc300", "#ff0000", "#dc2f02", "#fff1e6"];

/// Per-tier burst parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstProfile {
    pub count: usize,
    pub duration_ms: f64,
    /// Size is `min + r * span`
    pub size_min: f32,
    pub size_span: f32,
    /// Horizontal speed in `[-half, half)`
    pub speed_x_half: f32,
    /// Downward speed is `min + r * span`
    pub speed_y_min: f32,
    pub speed_y_span: f32,
    /// Spin rate in `[-scale/2, scale/2)`
    pub spin_scale: f32,
    /// Lifetime in frames
    pub life: f32,
    pub palette: &'static [&'static str],
}

pub const SUPER_JACKPOT_BURST: BurstProfile = BurstProfile {
    count: 350,
    duration_ms: 5000.0,
    size_min: 6.0,
    size_span: 12.0,
    speed_x_half: 4.0,
    speed_y_min: 3.0,
    speed_y_span: 5.0,
    spin_scale: 0.3,
    life: 250.0,
    palette: SUPER_PALETTE,
};

pub const JACKPOT_BURST: BurstProfile = BurstProfile {
    count: 200,
    duration_ms: 3500.0,
    size_min: 5.0,
    size_span: 10.0,
    speed_x_half: 3.0,
    speed_y_min: 2.0,
    speed_y_span: 3.0,
    spin_scale: 0.2,
    life: 200.0,
    palette: BASE_PALETTE,
};

pub const SMALL_WIN_BURST: BurstProfile = BurstProfile {
    count: 80,
    duration_ms: 2000.0,
    size_min: 4.0,
    size_span: 8.0,
    speed_x_half: 3.0,
    speed_y_min: 2.0,
    speed_y_span: 3.0,
    spin_scale: 0.2,
    life: 150.0,
    palette: BASE_PALETTE,
};

impl BurstProfile {
    /// Burst for a tier; no-win gets none
    pub fn for_tier(tier: WinTier) -> Option<&'static BurstProfile> {
        match tier {
            WinTier::SuperJackpot => Some(&SUPER_JACKPOT_BURST),
            WinTier::Jackpot => Some(&JACKPOT_BURST),
            WinTier::SmallWin => Some(&SMALL_WIN_BURST),
            WinTier::NoWin => None,
        }
    }

    fn velocity<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            rng.random::<f32>() * self.speed_x_half * 2.0 - self.speed_x_half,
            rng.random::<f32>() * self.speed_y_span + self.speed_y_min,
        )
    }
}

/// How a particle is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleShape {
    Circle,
    /// Rectangle `size` wide, offset up by `size * lift`, `size * thickness` tall
    Rect { lift: f32, thickness: f32 },
}

/// A single piece of confetti
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: &'static str,
    pub shape: ParticleShape,
    /// Degrees
    pub angle: f32,
    pub spin: f32,
    /// Frames remaining
    pub life: f32,
    pub initial_life: f32,
    pub opacity: f32,
}

impl Particle {
    /// New particle somewhere in the upper half above the viewport
    pub fn spawn<R: Rng + ?Sized>(profile: &BurstProfile, viewport: Vec2, rng: &mut R) -> Self {
        let size = rng.random::<f32>() * profile.size_span + profile.size_min;
        let color = profile.palette.choose(rng).copied().unwrap_or("#ffffff");
        let pos = Vec2::new(
            rng.random::<f32>() * viewport.x,
            rng.random::<f32>() * -viewport.y * 0.5,
        );
        let vel = profile.velocity(rng);
        let angle = rng.random::<f32>() * 360.0;
        let spin = (rng.random::<f32>() - 0.5) * profile.spin_scale;
        let shape = if rng.random::<f32>() > 0.7 {
            ParticleShape::Circle
        } else {
            ParticleShape::Rect {
                lift: if rng.random_bool(0.5) { 0.5 } else { 1.0 / 3.0 },
                thickness: if rng.random_bool(0.5) { 0.5 } else { 2.0 / 3.0 },
            }
        };

        Self {
            pos,
            vel,
            size,
            color,
            shape,
            angle,
            spin,
            life: profile.life,
            initial_life: profile.life,
            opacity: 1.0,
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    /// Put an expired particle back just above the top edge
    fn relaunch<R: Rng + ?Sized>(&mut self, profile: &BurstProfile, viewport: Vec2, rng: &mut R) {
        self.pos.y = rng.random::<f32>() * -viewport.y * 0.1 - self.size;
        self.pos.x = rng.random::<f32>() * viewport.x;
        self.opacity = 1.0;
        self.life = self.initial_life;
        self.vel = profile.velocity(rng);
    }

    /// One frame of motion. Expired or fallen particles are relaunched
    /// while `respawn` holds, retired (opacity 0) otherwise.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        profile: &BurstProfile,
        viewport: Vec2,
        respawn: bool,
        rng: &mut R,
    ) {
        self.vel.y += CONFETTI_GRAVITY;
        self.vel.x *= CONFETTI_DRAG;
        self.pos += self.vel;
        self.angle += self.spin * CONFETTI_SPIN_SCALE;
        self.life -= 1.0;
        self.opacity = (self.life / self.initial_life).max(0.0);

        let fallen = self.pos.y > viewport.y + self.size * 2.0;
        if fallen || self.life <= 0.0 {
            if respawn {
                self.relaunch(profile, viewport, rng);
            } else {
                self.opacity = 0.0;
            }
        }
    }
}

/// Confetti burst state: pool, respawn flag and the outstanding frame and
/// cutoff handles
pub struct ParticleEngine<H: Scheduler, S: ConfettiSurface> {
    scheduler: H,
    surface: Option<S>,
    rng: Pcg32,
    viewport: Vec2,
    profile: Option<&'static BurstProfile>,
    particles: Vec<Particle>,
    respawn_allowed: bool,
    frame: Option<FrameHandle>,
    cutoff: Option<TimerHandle>,
}

impl<H: Scheduler, S: ConfettiSurface> ParticleEngine<H, S> {
    pub fn new(scheduler: H, seed: u64) -> Self {
        Self {
            scheduler,
            surface: None,
            rng: Pcg32::seed_from_u64(seed),
            viewport: Vec2::ZERO,
            profile: None,
            particles: Vec::new(),
            respawn_allowed: true,
            frame: None,
            cutoff: None,
        }
    }

    /// Attach the drawing surface once it exists
    pub fn attach_surface(&mut self, surface: S) {
        self.surface = Some(surface);
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn scheduler(&self) -> &H {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut H {
        &mut self.scheduler
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Particles with nonzero opacity
    pub fn live_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_visible()).count()
    }

    /// Whether a frame is scheduled
    pub fn is_running(&self) -> bool {
        self.frame.is_some()
    }

    pub fn respawn_allowed(&self) -> bool {
        self.respawn_allowed
    }

    pub fn cutoff_pending(&self) -> bool {
        self.cutoff.is_some()
    }

    /// Track a viewport change
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(viewport);
        }
    }

    /// Start a burst for `tier`, replacing any burst in progress
    pub fn trigger(&mut self, tier: WinTier, viewport: Vec2) {
        let Some(profile) = BurstProfile::for_tier(tier) else {
            return;
        };
        if self.surface.is_none() {
            log::debug!("Confetti surface not mounted, skipping {} burst", tier.as_str());
            return;
        }

        self.resize(viewport);
        self.cancel_pending();

        self.profile = Some(profile);
        self.particles = (0..profile.count)
            .map(|_| Particle::spawn(profile, viewport, &mut self.rng))
            .collect();
        self.respawn_allowed = true;
        self.cutoff = Some(
            self.scheduler
                .set_timeout(profile.duration_ms - CONFETTI_TAPER_MS),
        );
        log::info!(
            "Confetti burst: {} ({} particles, {} ms)",
            tier.as_str(),
            profile.count,
            profile.duration_ms
        );

        self.run_frame();
    }

    /// Cancel the burst and clear the surface
    pub fn stop(&mut self) {
        self.cancel_pending();
        self.particles.clear();
        self.profile = None;
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
        }
    }

    /// Frame callback from the scheduler
    pub fn on_frame(&mut self, handle: FrameHandle) {
        if self.frame != Some(handle) {
            return;
        }
        self.frame = None;
        self.run_frame();
    }

    /// Cutoff timer callback from the scheduler
    pub fn on_respawn_cutoff(&mut self, handle: TimerHandle) {
        if self.cutoff != Some(handle) {
            return;
        }
        self.cutoff = None;
        self.respawn_allowed = false;
        log::debug!("Confetti respawn disabled, {} particles live", self.live_count());
    }

    fn cancel_pending(&mut self) {
        if let Some(frame) = self.frame.take() {
            self.scheduler.cancel_frame(frame);
        }
        if let Some(timer) = self.cutoff.take() {
            self.scheduler.clear_timeout(timer);
        }
    }

    /// Update and draw every particle, then either schedule the next
    /// frame or shut the loop down
    fn run_frame(&mut self) {
        let (Some(surface), Some(profile)) = (self.surface.as_mut(), self.profile) else {
            return;
        };

        surface.clear();
        let mut any_visible = false;
        for particle in &mut self.particles {
            particle.update(profile, self.viewport, self.respawn_allowed, &mut self.rng);
            if particle.is_visible() {
                surface.draw_particle(particle);
                any_visible = true;
            }
        }

        if any_visible {
            self.frame = Some(self.scheduler.request_frame());
        } else {
            surface.clear();
            // Nothing left to taper
            if let Some(timer) = self.cutoff.take() {
                self.scheduler.clear_timeout(timer);
            }
            log::debug!("Confetti finished");
        }
    }
}
