//! Error types for SpinDrop

use thiserror::Error;

/// Core error type
///
/// Contract violations (`InvalidTarget`, `EmptyWeightPool`, `EmptyCatalog`,
/// `NotAligned`) indicate a caller sequencing bug or bad content data and
/// must not be swallowed. `AllocationFailed` and `ClaimFailed` are expected
/// operational failures, caught at the orchestrator boundary.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Target item not in catalog: {id}")]
    InvalidTarget { id: String },

    #[error("Candidate pool has no positive weight")]
    EmptyWeightPool,

    #[error("Catalog is empty")]
    EmptyCatalog,

    #[error("Reel {reel} is not grid-aligned")]
    NotAligned { reel: usize },

    #[error("Prize allocation failed: {0}")]
    AllocationFailed(String),

    #[error("Claim failed: {0}")]
    ClaimFailed(String),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),
}

impl EngineError {
    /// Operational failures may be retried by the user; contract
    /// violations may not.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::AllocationFailed(_) | Self::ClaimFailed(_))
    }
}

/// Result type alias
pub type EngineResult<T> = Result<T, EngineError>;
