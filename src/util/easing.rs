//! Easing functions for weight and exposure ramps.
//!
//! Every curve maps progress `t ∈ [0, 1]` onto `[0, 1]` with `f(0) = 0` and
//! `f(1) = 1`, so a ramp can always compute
//! `start + (end - start) * f(t)`.

use serde::{Deserialize, Serialize};

/// Easing function variants for animation curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-in (slow start, fast end).
    QuadraticIn,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Cubic ease-out: `1 - (1 - t)³`. Used by action crossfades.
    CubicOut,
    /// Cubic ease-in-out: `4t³` below the midpoint, `1 - (-2t + 2)³ / 2`
    /// above it. Used by environment theme transitions.
    CubicInOut,
}

impl EasingFunction {
    /// Curve used for action weight crossfades.
    pub const CROSSFADE: EasingFunction = EasingFunction::CubicOut;

    /// Curve used for exposure theme transitions.
    pub const THEME: EasingFunction = EasingFunction::CubicInOut;

    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0].
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::QuadraticIn => t * t,
            EasingFunction::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            EasingFunction::CubicOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt * omt
            }
            EasingFunction::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::CROSSFADE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingFunction; 5] = [
        EasingFunction::Linear,
        EasingFunction::QuadraticIn,
        EasingFunction::QuadraticOut,
        EasingFunction::CubicOut,
        EasingFunction::CubicInOut,
    ];

    #[test]
    fn test_endpoints() {
        for f in ALL {
            assert_eq!(f.evaluate(0.0), 0.0, "{f:?} at 0");
            assert!((f.evaluate(1.0) - 1.0).abs() < 1e-6, "{f:?} at 1");
        }
    }

    #[test]
    fn test_input_clamping() {
        for f in ALL {
            assert_eq!(f.evaluate(-0.5), 0.0);
            assert!((f.evaluate(1.5) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_cubic_out_front_loaded() {
        let f = EasingFunction::CubicOut;
        // 1 - 0.5³ = 0.875
        assert!((f.evaluate(0.5) - 0.875).abs() < 1e-6);
        assert!(f.evaluate(0.25) > 0.25);
    }

    #[test]
    fn test_cubic_in_out_symmetric() {
        let f = EasingFunction::CubicInOut;
        assert!((f.evaluate(0.5) - 0.5).abs() < 1e-6);
        assert!((f.evaluate(0.25) - 0.0625).abs() < 1e-6);
        let a = f.evaluate(0.2);
        let b = f.evaluate(0.8);
        assert!((a + b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_monotonic() {
        for f in ALL {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = f.evaluate(i as f32 / 100.0);
                assert!(v + 1e-6 >= prev, "{f:?} not monotonic at {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn test_default_is_crossfade_curve() {
        assert_eq!(EasingFunction::default(), EasingFunction::CubicOut);
    }
}
