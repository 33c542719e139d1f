//! Data shapes exchanged with the external allocator and claim
//! collaborators
//!
//! Only the shapes the engine consumes and produces; transport and
//! persistence belong to the collaborators themselves.

use serde::{Deserialize, Serialize};

use crate::catalog::Item;

/// Allocator response: the prize a play must land on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeGrant {
    /// Allocator-issued play identifier
    pub play_id: String,
    /// The granted item; must exist in the active catalog
    pub item: Item,
    /// Observed allocator latency, for diagnostics
    pub latency_ms: u64,
}

/// Claim response from the redemption collaborator
///
/// `success = false` is a recoverable outcome, not an error: the reveal
/// stays open and the claim may be retried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    pub play_id: String,
    pub item_id: String,
    pub success: bool,
    /// Reward-specific fields passed through untouched
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub extra: serde_json::Value,
}

impl ClaimReceipt {
    /// A successful receipt with no extra fields
    pub fn success(play_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            play_id: play_id.into(),
            item_id: item_id.into(),
            success: true,
            extra: serde_json::Value::Null,
        }
    }

    /// A rejected receipt with no extra fields
    pub fn rejected(play_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            play_id: play_id.into(),
            item_id: item_id.into(),
            success: false,
            extra: serde_json::Value::Null,
        }
    }
}
