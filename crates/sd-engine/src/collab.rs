//! External collaborator boundaries — prize allocation and reward claims
//!
//! The engine owns no wire protocol; it consumes and produces the shapes
//! in `sd_core::reward` and leaves transport to the implementations.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use sd_core::{Catalog, ClaimReceipt, EngineError, EngineResult, Item, PrizeGrant};

use crate::weighted::pick_item;

/// External prize source
///
/// No timeout is imposed by the engine: a stuck allocator keeps the play
/// in its spinning phase. Embedding applications that need one should
/// wrap their implementation with a deadline.
#[allow(async_fn_in_trait)]
pub trait PrizeAllocator {
    /// Request the prize for one play
    async fn play(&mut self) -> EngineResult<PrizeGrant>;
}

/// External reward redemption
#[allow(async_fn_in_trait)]
pub trait ClaimSink {
    /// Redeem a revealed prize
    ///
    /// A `success = false` receipt is a recoverable outcome, not an
    /// error; transport failures map to [`EngineError::ClaimFailed`].
    async fn claim(&mut self, play_id: &str, item: &Item) -> EngineResult<ClaimReceipt>;
}

/// Fixture allocator: weighted draw from the catalog behind simulated
/// network latency
#[derive(Debug)]
pub struct MockAllocator {
    catalog: Catalog,
    rng: StdRng,
    /// Simulated latency band in milliseconds
    latency_band: (u64, u64),
    /// When set, the next call fails once
    fail_next: bool,
}

impl MockAllocator {
    pub fn new(catalog: Catalog) -> Self {
        Self::build(catalog, StdRng::from_os_rng())
    }

    pub fn with_seed(catalog: Catalog, seed: u64) -> Self {
        Self::build(catalog, StdRng::seed_from_u64(seed))
    }

    fn build(catalog: Catalog, rng: StdRng) -> Self {
        Self {
            catalog,
            rng,
            latency_band: (400, 700),
            fail_next: false,
        }
    }

    /// Builder: override the simulated latency band
    pub fn with_latency(mut self, band: (u64, u64)) -> Self {
        self.latency_band = band;
        self
    }

    /// Make the next `play` call fail once
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }
}

impl PrizeAllocator for MockAllocator {
    async fn play(&mut self) -> EngineResult<PrizeGrant> {
        let (lo, hi) = self.latency_band;
        let latency_ms = self.rng.random_range(lo..=hi);
        tokio::time::sleep(Duration::from_millis(latency_ms)).await;

        if self.fail_next {
            self.fail_next = false;
            return Err(EngineError::AllocationFailed(
                "simulated allocator outage".into(),
            ));
        }

        let item = pick_item(&mut self.rng, self.catalog.items())?.clone();
        log::debug!("mock allocator granted {} after {latency_ms}ms", item.id);
        Ok(PrizeGrant {
            play_id: Uuid::new_v4().to_string(),
            item,
            latency_ms,
        })
    }
}

/// Fixture claim sink: records claims, answers after a fixed latency
#[derive(Debug)]
pub struct MockClaimSink {
    /// Answer for subsequent claims
    pub approve: bool,
    /// When set, the next call fails at the transport level once
    fail_next: bool,
    latency_ms: u64,
    claims: Vec<(String, String)>,
}

impl MockClaimSink {
    pub fn new() -> Self {
        Self {
            approve: true,
            fail_next: false,
            latency_ms: 150,
            claims: Vec::new(),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            approve: false,
            ..Self::new()
        }
    }

    /// Make the next `claim` call fail once at the transport level
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }

    /// Every `(play_id, item_id)` pair claimed so far
    pub fn claims(&self) -> &[(String, String)] {
        &self.claims
    }
}

impl Default for MockClaimSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimSink for MockClaimSink {
    async fn claim(&mut self, play_id: &str, item: &Item) -> EngineResult<ClaimReceipt> {
        tokio::time::sleep(Duration::from_millis(self.latency_ms)).await;
        if self.fail_next {
            self.fail_next = false;
            return Err(EngineError::ClaimFailed("simulated claim outage".into()));
        }
        self.claims.push((play_id.to_string(), item.id.clone()));
        let receipt = if self.approve {
            ClaimReceipt::success(play_id, &item.id)
        } else {
            ClaimReceipt::rejected(play_id, &item.id)
        };
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![Item::new("coin", 3.0), Item::new("gem", 1.0)]).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_allocator_grants_catalog_items() {
        let mut allocator = MockAllocator::with_seed(catalog(), 4).with_latency((400, 700));
        let grant = allocator.play().await.unwrap();
        assert!(catalog().position_of(&grant.item.id).is_some());
        assert!((400..=700).contains(&grant.latency_ms));
        assert!(!grant.play_id.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_allocator_fail_next_fails_once() {
        let mut allocator = MockAllocator::with_seed(catalog(), 4);
        allocator.fail_next();
        assert!(allocator.play().await.is_err());
        assert!(allocator.play().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_claim_sink_records_and_answers() {
        let mut sink = MockClaimSink::new();
        let receipt = sink.claim("p-1", &Item::new("gem", 1.0)).await.unwrap();
        assert!(receipt.success);
        assert_eq!(sink.claims(), &[("p-1".to_string(), "gem".to_string())]);

        let mut rejecting = MockClaimSink::rejecting();
        let receipt = rejecting.claim("p-2", &Item::new("gem", 1.0)).await.unwrap();
        assert!(!receipt.success);
    }
}
