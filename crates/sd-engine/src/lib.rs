//! # sd-engine — SpinDrop sequence engine
//!
//! Composes the reel rig, the play state machine, and the selection
//! algorithms into the full reward-reveal play, driven against external
//! allocator and claim collaborators.
//!
//! ## Architecture
//!
//! ```text
//! SequenceOrchestrator
//!     │
//!     ├── PrizeAllocator (async, external)
//!     ├── select_target / pick_weighted
//!     ├── ReelRig (sd-reel: motion + grid)
//!     ├── PlayMachine (sd-stage: the only sequencing authority)
//!     └── ClaimSink (async, external)
//! ```
//!
//! Motion and selection run as side effects of state-machine transitions;
//! nothing below the orchestrator schedules a transition on its own.

pub mod collab;
pub mod config;
pub mod orchestrator;
pub mod select;
pub mod timing;
pub mod weighted;

pub use collab::*;
pub use config::*;
pub use orchestrator::*;
pub use select::*;
pub use timing::*;
pub use weighted::*;
