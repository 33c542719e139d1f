//! Engine configuration

use serde::{Deserialize, Serialize};

use sd_reel::RigConfig;

use crate::timing::SequenceTiming;

/// How the stopping point is chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RevealMode {
    /// The allocator dictates the item; one row exact-stops on a future
    /// occurrence at least `min_laps` cycles ahead
    ExactTarget {
        /// Row driven to the precise landing
        row: usize,
        /// Minimum full catalog cycles travelled before the stop
        min_laps: f64,
    },
    /// Best-effort stop, snap, then a weighted draw over the visible
    /// cards picks the cell to grab
    VisibleSample,
}

/// Full orchestrator configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub rig: RigConfig,
    pub timing: SequenceTiming,
    pub mode: RevealMode,
}

impl EngineConfig {
    /// Single-target mode with the observed lap minimum
    pub fn exact_target() -> Self {
        Self {
            rig: RigConfig::standard(),
            timing: SequenceTiming::normal(),
            mode: RevealMode::ExactTarget {
                row: 0,
                min_laps: 1.5,
            },
        }
    }

    /// Multi-candidate mode sampling the visible grid
    pub fn visible_sample() -> Self {
        Self {
            rig: RigConfig::standard(),
            timing: SequenceTiming::normal(),
            mode: RevealMode::VisibleSample,
        }
    }

    /// Builder: swap the timing profile
    pub fn with_timing(mut self, timing: SequenceTiming) -> Self {
        self.timing = timing;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trips_through_json() {
        let config = EngineConfig::exact_target().with_timing(SequenceTiming::turbo());
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
