//! # sd-reel — Reel geometry and motion for SpinDrop
//!
//! Converts between logical item indices and physical scroll offsets,
//! animates independently scrolling reels through their motion modes, and
//! derives the visible card grid from reel positions.
//!
//! ## Architecture
//!
//! ```text
//! ReelRig (N rows)
//!     │
//!     ├── GridLayout (container → columns, margins, cells)
//!     ├── ReelGeometry (index ↔ offset conversions)
//!     └── ReelMotion × N (position, velocity, mode, tick rule)
//!           │
//!           v
//!     visible_cards() → Vec<Vec<VisibleCard>>
//! ```
//!
//! Positions are authoritative numeric state owned by `ReelMotion`; the
//! visual transform is a derived projection of them, never the reverse.

pub mod controller;
pub mod easing;
pub mod geometry;
pub mod layout;
pub mod motion;

pub use controller::*;
pub use easing::*;
pub use geometry::*;
pub use layout::*;
pub use motion::*;
