//! Manually driven scheduler
//!
//! Nothing fires on its own: the driver pops due frames/timers and hands the
//! handles to the owner. Used by the headless build and by tests.

use super::{FrameHandle, Scheduler, TimerHandle};

#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    next_id: i32,
    now_ms: f64,
    frames: Vec<FrameHandle>,
    /// (handle, due time)
    timers: Vec<(TimerHandle, f64)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Move the clock forward
    pub fn advance(&mut self, dt_ms: f64) {
        self.now_ms += dt_ms;
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Oldest requested frame, removed from the queue
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        if self.frames.is_empty() {
            None
        } else {
            Some(self.frames.remove(0))
        }
    }

    /// Earliest timer whose due time has passed, removed from the queue
    pub fn take_due_timer(&mut self) -> Option<TimerHandle> {
        let (idx, _) = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, (_, due))| *due <= self.now_ms)
            .min_by(|a, b| a.1.1.total_cmp(&b.1.1))?;
        Some(self.timers.remove(idx).0)
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.frames.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.retain(|h| *h != handle);
    }

    fn set_timeout(&mut self, delay_ms: f64) -> TimerHandle {
        let handle = TimerHandle(self.next_id());
        self.timers.push((handle, self.now_ms + delay_ms.max(0.0)));
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.timers.retain(|(h, _)| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_fire_in_order() {
        let mut sched = ManualScheduler::new();
        let a = sched.request_frame();
        let b = sched.request_frame();
        sched.cancel_frame(a);
        assert_eq!(sched.pending_frames(), 1);
        assert_eq!(sched.take_frame(), Some(b));
        assert_eq!(sched.take_frame(), None);
    }

    #[test]
    fn test_timers_wait_for_clock() {
        let mut sched = ManualScheduler::new();
        let late = sched.set_timeout(500.0);
        let early = sched.set_timeout(100.0);
        assert_eq!(sched.take_due_timer(), None);

        sched.advance(600.0);
        assert_eq!(sched.take_due_timer(), Some(early));
        assert_eq!(sched.take_due_timer(), Some(late));
        assert_eq!(sched.pending_timers(), 0);
    }

    #[test]
    fn test_cleared_timer_never_fires() {
        let mut sched = ManualScheduler::new();
        let t = sched.set_timeout(10.0);
        sched.clear_timeout(t);
        sched.advance(20.0);
        assert_eq!(sched.take_due_timer(), None);
    }
}
