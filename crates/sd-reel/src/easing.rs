//! Named easing curves reproduced numerically
//!
//! The motion model evaluates these directly in its tick loop; there is no
//! timeline library underneath.

use serde::{Deserialize, Serialize};

/// Easing curve selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// No easing
    Linear,
    /// Cubic ease-out: `1 - (1-p)^3` — the deceleration and seek curve
    CubicOut,
    /// Bounce ease-out — the reveal-drop curve
    BounceOut,
}

impl Easing {
    /// Evaluate the curve at progress `p`, clamped to `[0, 1]`
    pub fn eval(self, p: f64) -> f64 {
        let p = p.clamp(0.0, 1.0);
        match self {
            Self::Linear => p,
            Self::CubicOut => ease_out_cubic(p),
            Self::BounceOut => ease_out_bounce(p),
        }
    }
}

/// `1 - (1-p)^3`, clamped
pub fn ease_out_cubic(p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// Piecewise bounce, four segments
pub fn ease_out_bounce(p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;

    if p < 1.0 / D1 {
        N1 * p * p
    } else if p < 2.0 / D1 {
        let p = p - 1.5 / D1;
        N1 * p * p + 0.75
    } else if p < 2.5 / D1 {
        let p = p - 2.25 / D1;
        N1 * p * p + 0.9375
    } else {
        let p = p - 2.625 / D1;
        N1 * p * p + 0.984375
    }
}
