//! # sd-stage — SpinDrop play lifecycle
//!
//! Defines the canonical phases a play passes through and the state
//! machine that guards transitions between them.
//!
//! ## Philosophy
//!
//! A phase is the SEMANTIC MEANING of a moment in the play flow, not an
//! animation. Every play passes through the same sequence:
//! spin → decelerate → select → reveal → settle. The machine here is the
//! single source of truth for "where the user is"; motion and selection
//! are invoked as side effects of its transitions, never the reverse.

pub mod machine;
pub mod phase;

pub use machine::*;
pub use phase::*;
