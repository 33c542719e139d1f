//! Timing profiles for the play sequence

use serde::{Deserialize, Serialize};

/// Timing profile selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceProfile {
    /// Normal gameplay timing
    Normal,
    /// Fast mode
    Turbo,
    /// Near-instant, for tests and tooling
    Studio,
    /// Custom timing (scaled)
    Custom,
}

impl Default for SequenceProfile {
    fn default() -> Self {
        Self::Normal
    }
}

/// Durations governing one play, in wall-clock milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequenceTiming {
    /// Profile type
    pub profile: SequenceProfile,

    /// Animation frame step driven by the orchestrator
    pub tick_interval_ms: f64,

    /// Minimum free-spin time after the allocator answers, before any
    /// stop begins
    pub spin_lead_ms: f64,

    /// Best-effort deceleration ramp (multi-candidate mode)
    pub decel_duration_ms: f64,

    /// Exact-stop animation (single-target mode)
    pub seek_duration_ms: f64,

    /// Pause on the selected card before it lifts
    pub grab_pause_ms: f64,

    /// Card lift toward the reveal
    pub lift_duration_ms: f64,

    /// Delay before the reveal is shown
    pub reveal_delay_ms: f64,

    /// Settle hold before the session resets to idle
    pub settle_delay_ms: f64,
}

impl SequenceTiming {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            profile: SequenceProfile::Normal,
            tick_interval_ms: 16.0,
            spin_lead_ms: 600.0,
            decel_duration_ms: 1400.0,
            seek_duration_ms: 2200.0,
            grab_pause_ms: 350.0,
            lift_duration_ms: 450.0,
            reveal_delay_ms: 250.0,
            settle_delay_ms: 900.0,
        }
    }

    /// Fast mode
    pub fn turbo() -> Self {
        Self {
            profile: SequenceProfile::Turbo,
            tick_interval_ms: 16.0,
            spin_lead_ms: 250.0,
            decel_duration_ms: 700.0,
            seek_duration_ms: 1100.0,
            grab_pause_ms: 150.0,
            lift_duration_ms: 200.0,
            reveal_delay_ms: 100.0,
            settle_delay_ms: 400.0,
        }
    }

    /// Near-instant timing for tests
    pub fn studio() -> Self {
        Self {
            profile: SequenceProfile::Studio,
            tick_interval_ms: 1.0,
            spin_lead_ms: 4.0,
            decel_duration_ms: 10.0,
            seek_duration_ms: 12.0,
            grab_pause_ms: 2.0,
            lift_duration_ms: 2.0,
            reveal_delay_ms: 2.0,
            settle_delay_ms: 4.0,
        }
    }

    /// Scale every duration by `factor` (< 1.0 = faster); the tick step
    /// is left alone
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            profile: SequenceProfile::Custom,
            tick_interval_ms: self.tick_interval_ms,
            spin_lead_ms: self.spin_lead_ms * factor,
            decel_duration_ms: self.decel_duration_ms * factor,
            seek_duration_ms: self.seek_duration_ms * factor,
            grab_pause_ms: self.grab_pause_ms * factor,
            lift_duration_ms: self.lift_duration_ms * factor,
            reveal_delay_ms: self.reveal_delay_ms * factor,
            settle_delay_ms: self.settle_delay_ms * factor,
        }
    }
}

impl Default for SequenceTiming {
    fn default() -> Self {
        Self::normal()
    }
}
