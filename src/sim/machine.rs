//! The slot machine: three reels, the busy flag and spin bookkeeping
//!
//! A spin is split in two so the host can await the reel timers in between:
//! `begin_spin` rebuilds strips and plans every reel's motion, `finish_spin`
//! settles the reels and classifies what landed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::outcome::Outcome;
use super::reel::{Reel, ReelMotion, choose_landing};
use super::symbol::{Symbol, build_strip};
use crate::consts::*;

/// Everything the host needs to animate one spin
#[derive(Debug, Clone, PartialEq)]
pub struct SpinPlan {
    /// Whether this spin tried to land the jackpot symbol on every reel
    pub force_jackpot: bool,
    pub motions: [ReelMotion; REEL_COUNT],
}

impl SpinPlan {
    /// Time until the last reel stops (ms)
    pub fn total_duration_ms(&self) -> f64 {
        self.motions
            .iter()
            .map(|m| m.duration_ms)
            .fold(0.0, f64::max)
    }
}

pub struct SlotMachine {
    reels: [Reel; REEL_COUNT],
    spinning: bool,
    spins: u64,
    rng: Pcg32,
}

impl SlotMachine {
    /// Build the machine with fresh strips at random resting positions
    pub fn new(seed: u64, symbol_height: f32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let reels = std::array::from_fn(|_| {
            let strip = build_strip(&mut rng, VISIBLE_SYMBOLS, MOUNT_STRIP_REPEATS);
            let top = rng.random_range(0..=strip.max_top());
            Reel::new(strip, symbol_height, top)
        });
        Self {
            reels,
            spinning: false,
            spins: 0,
            rng,
        }
    }

    pub fn reels(&self) -> &[Reel; REEL_COUNT] {
        &self.reels
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// Completed spins this session
    pub fn spins(&self) -> u64 {
        self.spins
    }

    /// Apply a new measured symbol height to every reel
    pub fn set_symbol_height(&mut self, measured: f32) {
        for reel in &mut self.reels {
            reel.set_symbol_height(measured);
        }
    }

    /// Start a spin. Returns None (and changes nothing) if one is already
    /// in flight.
    pub fn begin_spin(&mut self, now_ms: f64) -> Option<SpinPlan> {
        if self.spinning {
            log::debug!("Spin ignored, reels still moving");
            return None;
        }
        let force_jackpot = self.rng.random_bool(FORCE_JACKPOT_CHANCE);
        Some(self.launch(now_ms, force_jackpot))
    }

    /// Spin with an explicit jackpot decision
    pub(crate) fn launch(&mut self, now_ms: f64, force_jackpot: bool) -> SpinPlan {
        self.spinning = true;
        let rng = &mut self.rng;
        let motions = std::array::from_fn(|ordinal| {
            let reel = &mut self.reels[ordinal];
            reel.restrip(build_strip(rng, VISIBLE_SYMBOLS, SPIN_STRIP_REPEATS));
            let center = choose_landing(reel.strip(), force_jackpot, rng);
            reel.spin(center, ordinal, now_ms)
        });
        log::info!("Spin started (force jackpot: {})", force_jackpot);
        SpinPlan {
            force_jackpot,
            motions,
        }
    }

    /// Animate reels toward their targets; true once all are at rest
    pub fn advance(&mut self, now_ms: f64) -> bool {
        self.reels
            .iter_mut()
            .fold(true, |done, reel| reel.advance(now_ms) && done)
    }

    /// Settle every reel and classify the result. None if no spin was in
    /// flight.
    pub fn finish_spin(&mut self) -> Option<Outcome> {
        if !self.spinning {
            return None;
        }
        for reel in &mut self.reels {
            reel.settle();
        }
        self.spinning = false;
        self.spins += 1;

        let outcome = Outcome::evaluate(self.center_symbols());
        log::info!(
            "Spin #{} landed {} -> {}",
            self.spins,
            outcome.readout(),
            outcome.tier.as_str()
        );
        Some(outcome)
    }

    /// Current middle-row symbols
    pub fn center_symbols(&self) -> [Symbol; REEL_COUNT] {
        std::array::from_fn(|i| self.reels[i].center_symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Symbol, WinTier};

    #[test]
    fn test_mount_layout() {
        let machine = SlotMachine::new(42, 40.0);
        for reel in machine.reels() {
            assert_eq!(reel.strip().len(), MOUNT_STRIP_REPEATS * 8 + STRIP_TAIL_LEN);
            assert!(!reel.is_moving());
            assert!(reel.strip().is_legal_center(reel.center_index()));
        }
        assert!(!machine.is_spinning());
    }

    #[test]
    fn test_reentrant_spin_is_rejected() {
        let mut machine = SlotMachine::new(1, 40.0);
        let plan = machine.begin_spin(0.0);
        assert!(plan.is_some());
        assert!(machine.is_spinning());

        let before: Vec<_> = machine.reels().iter().map(|r| r.strip().clone()).collect();
        assert!(machine.begin_spin(10.0).is_none());
        let after: Vec<_> = machine.reels().iter().map(|r| r.strip().clone()).collect();
        assert_eq!(before, after, "rejected spin must not touch the reels");
    }

    #[test]
    fn test_spin_rebuilds_long_strips() {
        let mut machine = SlotMachine::new(2, 40.0);
        let plan = machine.begin_spin(0.0).unwrap();
        for (ordinal, motion) in plan.motions.iter().enumerate() {
            let strip = machine.reels()[ordinal].strip();
            assert_eq!(strip.len(), SPIN_STRIP_REPEATS * 8 + STRIP_TAIL_LEN);
            assert!(strip.is_legal_center(motion.center_index));
        }
    }

    #[test]
    fn test_reels_stop_in_order() {
        let mut machine = SlotMachine::new(3, 40.0);
        let plan = machine.begin_spin(100.0).unwrap();
        let durations: Vec<f64> = plan.motions.iter().map(|m| m.duration_ms).collect();
        assert_eq!(durations, vec![1800.0, 2200.0, 2600.0]);
        assert_eq!(plan.total_duration_ms(), 2600.0);

        // Later reels pre-roll further
        assert!(plan.motions[1].start_offset_px < plan.motions[0].start_offset_px);

        assert!(!machine.advance(100.0 + 1900.0));
        assert!(!machine.reels()[0].is_moving());
        assert!(machine.reels()[2].is_moving());
        assert!(machine.advance(100.0 + 2600.0));
    }

    #[test]
    fn test_forced_spin_lands_super_jackpot() {
        for seed in 0..20 {
            let mut machine = SlotMachine::new(seed, 40.0);
            let plan = machine.launch(0.0, true);
            assert!(plan.force_jackpot);
            let outcome = machine.finish_spin().unwrap();
            assert_eq!(outcome.symbols, [Symbol::Seven; 3]);
            assert_eq!(outcome.tier, WinTier::SuperJackpot);
        }
    }

    #[test]
    fn test_finish_reads_planned_centers() {
        let mut machine = SlotMachine::new(9, 48.0);
        let plan = machine.launch(0.0, false);
        let outcome = machine.finish_spin().unwrap();
        for (i, motion) in plan.motions.iter().enumerate() {
            let reel = &machine.reels()[i];
            assert_eq!(reel.center_index(), motion.center_index);
            assert_eq!(Some(outcome.symbols[i]), reel.strip().get(motion.center_index));
        }
        assert!(!machine.is_spinning());
        assert_eq!(machine.spins(), 1);
    }

    #[test]
    fn test_relayout_mid_spin_lands_on_planned_centers() {
        let mut machine = SlotMachine::new(10, 40.0);
        let plan = machine.launch(0.0, false);
        assert!(!machine.advance(1000.0));
        machine.set_symbol_height(32.0);
        machine.finish_spin().unwrap();

        for (reel, motion) in machine.reels().iter().zip(&plan.motions) {
            assert_eq!(reel.symbol_height(), 32.0);
            assert_eq!(reel.center_index(), motion.center_index);
            let expected = -((motion.center_index - 1) as f32) * 32.0;
            assert!((reel.current_offset_px() - expected).abs() < 1e-3);
        }

        // Idle relayout back to the stylesheet default keeps the same rows
        let centers = machine.center_symbols();
        machine.set_symbol_height(40.0);
        assert_eq!(machine.center_symbols(), centers);
    }

    #[test]
    fn test_finish_without_spin() {
        let mut machine = SlotMachine::new(4, 40.0);
        assert!(machine.finish_spin().is_none());
    }

    #[test]
    fn test_center_reads_are_stable() {
        let mut machine = SlotMachine::new(5, 40.0);
        machine.begin_spin(0.0);
        machine.finish_spin();
        assert_eq!(machine.center_symbols(), machine.center_symbols());
    }

    #[test]
    fn test_force_rate_is_roughly_ninety_percent() {
        let mut machine = SlotMachine::new(77, 40.0);
        let mut forced = 0;
        for i in 0..2000 {
            let plan = machine.begin_spin(i as f64 * 10_000.0).unwrap();
            if plan.force_jackpot {
                forced += 1;
            }
            machine.finish_spin();
        }
        assert!((1700..=1900).contains(&forced), "forced {forced} of 2000");
    }
}
