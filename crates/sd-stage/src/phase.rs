//! PlayPhase — the canonical phases of one play

use serde::{Deserialize, Serialize};

/// Where the user is in the play sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayPhase {
    /// Awaiting input; reels drift
    Idle,
    /// Play requested; reels free-spin while the allocator responds
    Spinning,
    /// Reels ramping to a stop
    Decelerating,
    /// Winning card being selected/grabbed
    Selecting,
    /// Selected card lifting toward the reveal
    Lifting,
    /// Reward shown; claim may be attempted
    Reveal,
    /// Claim stored; play winding down
    Settle,
}

impl PlayPhase {
    /// Stable name for logging and presentation routing
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Spinning => "spinning",
            Self::Decelerating => "decelerating",
            Self::Selecting => "selecting",
            Self::Lifting => "lifting",
            Self::Reveal => "reveal",
            Self::Settle => "settle",
        }
    }

    /// True while a play is in flight (controls disabled)
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl Default for PlayPhase {
    fn default() -> Self {
        Self::Idle
    }
}
