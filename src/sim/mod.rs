//! Slot machine simulation
//!
//! All game logic lives here and is host-independent:
//! - Seeded RNG only (`Pcg32`)
//! - Reel positions are explicit state, never read back from the DOM
//! - Timers and frames go through `platform::Scheduler`

pub mod confetti;
pub mod ease;
pub mod machine;
pub mod outcome;
pub mod reel;
pub mod symbol;

pub use confetti::{BurstProfile, Particle, ParticleEngine, ParticleShape};
pub use ease::{CubicBezier, REEL_EASE};
pub use machine::{SlotMachine, SpinPlan};
pub use outcome::{Feedback, Outcome, ResultStyle, WinTier, classify};
pub use reel::{Reel, ReelMotion, choose_landing, spin_duration_ms};
pub use symbol::{Strip, Symbol, build_strip};
