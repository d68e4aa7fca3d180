//! CSS-style cubic Bézier timing curves
//!
//! The reels decelerate along `cubic-bezier(0.25, 0.1, 0.2, 1)`, the same
//! curve the web build hands to the CSS transition. Sampling it here keeps
//! headless playback and the browser in agreement.

/// A timing curve through (0,0), (x1,y1), (x2,y2), (1,1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Ease-out curve used for reel stops
pub const REEL_EASE: CubicBezier = CubicBezier::new(0.25, 0.1, 0.2, 1.0);

const NEWTON_ITERATIONS: usize = 8;
const EPSILON: f64 = 1e-7;

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// CSS declaration for this curve
    pub fn css(&self) -> String {
        format!("cubic-bezier({}, {}, {}, {})", self.x1, self.y1, self.x2, self.y2)
    }

    #[inline]
    fn component(t: f64, p1: f64, p2: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    }

    #[inline]
    fn component_slope(t: f64, p1: f64, p2: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
    }

    /// Curve parameter whose x equals `x`
    fn solve_t(&self, x: f64) -> f64 {
        // Newton first, it converges in a couple of steps for sane curves
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = Self::component(t, self.x1, self.x2) - x;
            if err.abs() < EPSILON {
                return t;
            }
            let slope = Self::component_slope(t, self.x1, self.x2);
            if slope.abs() < EPSILON {
                break;
            }
            t -= err / slope;
        }

        // Bisection fallback (x(t) is monotonic for x1, x2 in [0, 1])
        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        while hi - lo > EPSILON {
            let cx = Self::component(t, self.x1, self.x2);
            if (cx - x).abs() < EPSILON {
                break;
            }
            if cx < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    /// Eased progress for linear progress `x` in [0, 1]
    pub fn sample(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        Self::component(self.solve_t(x), self.y1, self.y2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(REEL_EASE.sample(0.0), 0.0);
        assert_eq!(REEL_EASE.sample(1.0), 1.0);
        assert_eq!(REEL_EASE.sample(-3.0), 0.0);
        assert_eq!(REEL_EASE.sample(4.0), 1.0);
    }

    #[test]
    fn test_linear_curve_is_identity() {
        let linear = CubicBezier::new(1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0);
        for i in 1..10 {
            let x = i as f64 / 10.0;
            assert!((linear.sample(x) - x).abs() < 1e-5);
        }
    }

    #[test]
    fn test_reel_ease_is_monotonic_and_decelerates() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let y = REEL_EASE.sample(i as f64 / 100.0);
            assert!(y >= prev - 1e-9, "curve must not go backwards");
            prev = y;
        }
        // Ease-out: well past halfway at the midpoint
        assert!(REEL_EASE.sample(0.5) > 0.7);
    }

    #[test]
    fn test_css_declaration() {
        assert_eq!(REEL_EASE.css(), "cubic-bezier(0.25, 0.1, 0.2, 1)");
    }
}
