//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Animation frames and one-shot timers
//! - Layout measurements (viewport, rendered symbol height)

pub mod manual;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use manual::ManualScheduler;

/// Handle for a requested animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Handle for a pending one-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub i32);

/// Host scheduling primitives.
///
/// The host calls back into the owner with the handle it returned here;
/// owners drop callbacks for handles they no longer hold.
pub trait Scheduler {
    /// Run the owner's frame callback on the next display refresh
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
    /// Run the owner's timer callback once after `delay_ms`
    fn set_timeout(&mut self, delay_ms: f64) -> TimerHandle;
    fn clear_timeout(&mut self, handle: TimerHandle);
}
