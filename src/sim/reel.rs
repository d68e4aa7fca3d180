//! Reel state, landing selection and spin trajectories
//!
//! Offsets follow the CSS convention of the web build: a reel showing strip
//! index `top` in its top row sits at `translateY(-top * symbol_height)`.
//! The offset is tracked here explicitly instead of being read back from
//! the rendered transform.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::ease::REEL_EASE;
use super::symbol::{Strip, Symbol};
use crate::consts::*;
use crate::{center_row, effective_symbol_height};

/// Pick the strip index that will stop in the middle row.
///
/// With `force_jackpot`, any occurrence of the jackpot symbol that can be
/// centered is preferred; otherwise (or when there is none) a uniformly
/// random window is chosen. The result is always a legal center index.
pub fn choose_landing<R: Rng + ?Sized>(strip: &Strip, force_jackpot: bool, rng: &mut R) -> usize {
    let jackpot_centers: Vec<usize> = if force_jackpot {
        strip
            .symbols()
            .iter()
            .enumerate()
            .filter(|(i, sym)| sym.is_jackpot() && strip.is_legal_center(*i))
            .map(|(i, _)| i)
            .collect()
    } else {
        Vec::new()
    };

    let center = match jackpot_centers.choose(rng) {
        Some(&i) => i,
        None => {
            if force_jackpot {
                log::debug!("No centerable jackpot on strip, landing at random");
            }
            rng.random_range(0..=strip.max_top()) + center_row()
        }
    };

    center.clamp(strip.min_center(), strip.max_center())
}

/// Duration of a reel's spin; later reels spin longer
#[inline]
pub fn spin_duration_ms(ordinal: usize) -> f64 {
    SPIN_DURATION_BASE_MS + ordinal as f64 * SPIN_DURATION_INCREMENT_MS
}

/// An in-flight reel animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReelMotion {
    /// Strip index that lands in the middle row
    pub center_index: usize,
    /// Offset the reel jumps to before animating (px)
    pub start_offset_px: f32,
    /// Offset the reel settles on (px)
    pub target_offset_px: f32,
    /// Wall-clock start (ms)
    pub started_at_ms: f64,
    pub duration_ms: f64,
}

impl ReelMotion {
    /// Linear progress in [0, 1]
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.started_at_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    /// Eased offset at `now_ms`
    pub fn offset_at(&self, now_ms: f64) -> f32 {
        let eased = REEL_EASE.sample(self.progress(now_ms)) as f32;
        self.start_offset_px + (self.target_offset_px - self.start_offset_px) * eased
    }
}

/// A single reel: its strip and where it currently sits
#[derive(Debug, Clone)]
pub struct Reel {
    strip: Strip,
    symbol_height: f32,
    /// Rendered translateY (px, <= 0)
    current_offset_px: f32,
    motion: Option<ReelMotion>,
}

impl Reel {
    /// A stationary reel showing `top` in its top row
    pub fn new(strip: Strip, symbol_height: f32, top: usize) -> Self {
        let mut reel = Self {
            strip,
            symbol_height: effective_symbol_height(symbol_height),
            current_offset_px: 0.0,
            motion: None,
        };
        reel.place_top(top);
        reel
    }

    pub fn strip(&self) -> &Strip {
        &self.strip
    }

    pub fn symbol_height(&self) -> f32 {
        self.symbol_height
    }

    pub fn current_offset_px(&self) -> f32 {
        self.current_offset_px
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    /// Swap in a freshly built strip
    pub fn restrip(&mut self, strip: Strip) {
        self.strip = strip;
        let top = self.top_index().min(self.strip.max_top());
        self.place_top(top);
    }

    /// Jump (no animation) so that `top` is the top visible row
    pub fn place_top(&mut self, top: usize) {
        let top = top.min(self.strip.max_top());
        self.current_offset_px = Self::offset_for_top(top, self.symbol_height);
    }

    #[inline]
    fn offset_for_top(top: usize, symbol_height: f32) -> f32 {
        -(top as f32) * symbol_height
    }

    /// Start spinning so that `center_index` lands in the middle row.
    ///
    /// The reel jumps `PRE_ROLL_BASE_CYCLES + ordinal` strip lengths away
    /// from the target and eases back over `spin_duration_ms(ordinal)`.
    pub fn spin(&mut self, center_index: usize, ordinal: usize, now_ms: f64) -> ReelMotion {
        let center = center_index.clamp(self.strip.min_center(), self.strip.max_center());
        let target = Self::offset_for_top(center - center_row(), self.symbol_height);
        let strip_px = self.strip.len() as f32 * self.symbol_height;
        let cycles = (PRE_ROLL_BASE_CYCLES + ordinal) as f32;

        let motion = ReelMotion {
            center_index: center,
            start_offset_px: target - strip_px * cycles,
            target_offset_px: target,
            started_at_ms: now_ms,
            duration_ms: spin_duration_ms(ordinal),
        };
        self.current_offset_px = motion.start_offset_px;
        self.motion = Some(motion);
        motion
    }

    /// Advance the animation; returns true once the reel is at rest
    pub fn advance(&mut self, now_ms: f64) -> bool {
        match self.motion {
            Some(motion) if motion.is_finished(now_ms) => {
                self.settle();
                true
            }
            Some(motion) => {
                self.current_offset_px = motion.offset_at(now_ms);
                false
            }
            None => true,
        }
    }

    /// Snap to the end of the current motion, if any
    pub fn settle(&mut self) {
        if let Some(motion) = self.motion.take() {
            self.current_offset_px = motion.target_offset_px;
        }
    }

    /// Strip index in the top visible row, derived from the offset
    pub fn top_index(&self) -> usize {
        let top = (self.current_offset_px / self.symbol_height).round().abs() as usize;
        top.min(self.strip.max_top())
    }

    /// Strip index in the middle row
    pub fn center_index(&self) -> usize {
        self.top_index() + center_row()
    }

    /// Symbol in the middle row
    pub fn center_symbol(&self) -> Symbol {
        // center_index <= max_center < len, so the lookup always hits
        self.strip
            .get(self.center_index())
            .unwrap_or(Symbol::ALL[0])
    }

    /// The three visible symbols, top to bottom
    pub fn visible(&self) -> [Symbol; VISIBLE_SYMBOLS] {
        let top = self.top_index();
        std::array::from_fn(|row| self.strip.get(top + row).unwrap_or(Symbol::ALL[0]))
    }

    /// Re-derive pixel offsets for a new symbol height, keeping the
    /// same strip index on screen
    pub fn set_symbol_height(&mut self, measured: f32) {
        let height = effective_symbol_height(measured);
        if height == self.symbol_height {
            return;
        }
        let scale = height / self.symbol_height;
        self.current_offset_px *= scale;
        if let Some(motion) = self.motion.as_mut() {
            motion.start_offset_px *= scale;
            motion.target_offset_px *= scale;
        }
        self.symbol_height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::symbol::build_strip;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn strip_of(symbols: &[Symbol]) -> Strip {
        Strip::from_symbols(symbols.to_vec()).unwrap()
    }

    #[test]
    fn test_forced_landing_hits_jackpot() {
        let mut rng = Pcg32::seed_from_u64(2024);
        for _ in 0..50 {
            let strip = build_strip(&mut rng, VISIBLE_SYMBOLS, SPIN_STRIP_REPEATS);
            let center = choose_landing(&strip, true, &mut rng);
            assert_eq!(strip.get(center), Some(Symbol::Seven));
            assert!(strip.is_legal_center(center));
        }
    }

    #[test]
    fn test_forced_landing_falls_back_without_jackpot() {
        use crate::sim::symbol::Symbol::*;
        let strip = strip_of(&[Bell, Star, Lemon, Bar, Cherry]);
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..20 {
            let center = choose_landing(&strip, true, &mut rng);
            assert!((1..=3).contains(&center));
        }
    }

    #[test]
    fn test_forced_landing_ignores_edge_jackpots() {
        use crate::sim::symbol::Symbol::*;
        // Sevens only at the very ends can't be centered
        let strip = strip_of(&[Seven, Bell, Star, Lemon, Seven]);
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..20 {
            let center = choose_landing(&strip, true, &mut rng);
            assert!((1..=3).contains(&center));
            assert_ne!(strip.get(center), Some(Seven));
        }
    }

    #[test]
    fn test_minimal_strip_has_single_landing() {
        use crate::sim::symbol::Symbol::*;
        let strip = strip_of(&[Bell, Seven, Lemon]);
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(choose_landing(&strip, true, &mut rng), 1);
        assert_eq!(choose_landing(&strip, false, &mut rng), 1);
    }

    #[test]
    fn test_spin_durations_increase() {
        assert_eq!(spin_duration_ms(0), 1800.0);
        assert_eq!(spin_duration_ms(1), 2200.0);
        assert_eq!(spin_duration_ms(2), 2600.0);
    }

    #[test]
    fn test_spin_motion_geometry() {
        let mut rng = Pcg32::seed_from_u64(8);
        let strip = build_strip(&mut rng, VISIBLE_SYMBOLS, SPIN_STRIP_REPEATS);
        let len = strip.len() as f32;
        let mut reel = Reel::new(strip, 40.0, 0);

        let motion = reel.spin(10, 2, 1000.0);
        assert_eq!(motion.target_offset_px, -9.0 * 40.0);
        assert_eq!(motion.start_offset_px, -360.0 - len * 40.0 * 5.0);
        assert_eq!(motion.duration_ms, 2600.0);
        assert_eq!(reel.current_offset_px(), motion.start_offset_px);

        // Midway the reel is between start and target
        assert!(!reel.advance(2300.0));
        let mid = reel.current_offset_px();
        assert!(mid > motion.start_offset_px && mid < motion.target_offset_px);

        assert!(reel.advance(3600.0));
        assert!(!reel.is_moving());
        assert_eq!(reel.center_index(), 10);
    }

    #[test]
    fn test_center_symbol_reads_middle_row() {
        use crate::sim::symbol::Symbol::*;
        let strip = strip_of(&[Cherry, Lemon, Watermelon, Star, Bell]);
        let reel = Reel::new(strip, 40.0, 2);
        assert_eq!(reel.top_index(), 2);
        assert_eq!(reel.center_symbol(), Star);
        assert_eq!(reel.visible(), [Watermelon, Star, Bell]);
        // Repeated reads of a stationary reel agree
        assert_eq!(reel.center_symbol(), reel.center_symbol());
    }

    #[test]
    fn test_zero_height_falls_back() {
        use crate::sim::symbol::Symbol::*;
        let strip = strip_of(&[Cherry, Lemon, Watermelon, Star]);
        let reel = Reel::new(strip, 0.0, 1);
        assert_eq!(reel.symbol_height(), DEFAULT_SYMBOL_HEIGHT);
        assert_eq!(reel.center_symbol(), Watermelon);
    }

    #[test]
    fn test_relayout_keeps_symbol_on_screen() {
        let mut rng = Pcg32::seed_from_u64(21);
        let strip = build_strip(&mut rng, VISIBLE_SYMBOLS, MOUNT_STRIP_REPEATS);
        let mut reel = Reel::new(strip, 40.0, 17);
        let before = reel.center_symbol();

        reel.set_symbol_height(64.0);
        assert!((reel.current_offset_px() + 17.0 * 64.0).abs() < 0.01);
        assert_eq!(reel.center_symbol(), before);

        reel.set_symbol_height(f32::NAN);
        assert_eq!(reel.symbol_height(), DEFAULT_SYMBOL_HEIGHT);
        assert_eq!(reel.center_symbol(), before);
    }

    proptest! {
        #[test]
        fn prop_landing_is_always_legal(seed in any::<u64>(), force in any::<bool>(), repeats in 0usize..10) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let strip = build_strip(&mut rng, VISIBLE_SYMBOLS, repeats);
            let center = choose_landing(&strip, force, &mut rng);
            prop_assert!(center >= center_row());
            prop_assert!(center <= strip.len() - 1 - center_row());
        }
    }
}
