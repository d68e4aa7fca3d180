//! Lucky Reels - a three-reel slot machine with confetti
//!
//! Core modules:
//! - `sim`: Reel engine, outcome evaluation and the confetti particle engine
//! - `renderer`: Drawing surfaces for confetti (Canvas 2D on web)
//! - `platform`: Frame/timer scheduling and host layout measurements
//! - `settings`: Player preferences persisted in LocalStorage

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;
pub use sim::{Outcome, ParticleEngine, SlotMachine, Symbol, WinTier};

/// Game configuration constants
pub mod consts {
    /// Number of reels on the machine
    pub const REEL_COUNT: usize = 3;
    /// Symbols visible per reel (top/middle/bottom)
    pub const VISIBLE_SYMBOLS: usize = 3;
    /// Symbol height used when the DOM can't be measured (px)
    pub const DEFAULT_SYMBOL_HEIGHT: f32 = 40.0;

    /// Spin duration of the first reel (ms)
    pub const SPIN_DURATION_BASE_MS: f64 = 1800.0;
    /// Extra duration per reel ordinal (ms) - reels stop left to right
    pub const SPIN_DURATION_INCREMENT_MS: f64 = 400.0;
    /// Strip lengths of pre-roll for reel 0 (reel n gets this + n)
    pub const PRE_ROLL_BASE_CYCLES: usize = 3;

    /// Full alphabet shuffles per strip when the page mounts
    pub const MOUNT_STRIP_REPEATS: usize = 5;
    /// Full alphabet shuffles per strip when a spin starts
    pub const SPIN_STRIP_REPEATS: usize = 8;
    /// Independent random symbols appended after the shuffles
    pub const STRIP_TAIL_LEN: usize = 10;

    /// Chance per spin that every reel tries to land on the jackpot symbol
    pub const FORCE_JACKPOT_CHANCE: f64 = 0.9;

    /// Confetti gravity (px/frame²)
    pub const CONFETTI_GRAVITY: f32 = 0.05;
    /// Horizontal drag applied each frame
    pub const CONFETTI_DRAG: f32 = 0.98;
    /// Rotation applied per frame is spin * this
    pub const CONFETTI_SPIN_SCALE: f32 = 10.0;
    /// Respawn stops this long before a burst's duration elapses (ms)
    pub const CONFETTI_TAPER_MS: f64 = 1000.0;

    /// How long the housing shakes/glows on a super jackpot (ms)
    pub const HOUSING_SHAKE_MS: f64 = 1000.0;
}

/// Measured symbol height, or the default when the measurement is unusable
#[inline]
pub fn effective_symbol_height(measured: f32) -> f32 {
    if measured.is_finite() && measured > 0.0 {
        measured
    } else {
        consts::DEFAULT_SYMBOL_HEIGHT
    }
}

/// Half the visible window, i.e. the center row offset from the top row
#[inline]
pub const fn center_row() -> usize {
    consts::VISIBLE_SYMBOLS / 2
}
