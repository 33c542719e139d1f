//! SequenceOrchestrator — one cooperative timeline per play
//!
//! Composes the reel rig, the play machine, the selection algorithms, and
//! the external collaborators. Every suspension point (allocator call,
//! stop animation, claim call) resumes linearly; no overlapping sequences.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use sd_core::{Catalog, ClaimReceipt, EngineError, EngineResult, Item, PrizeGrant};
use sd_reel::{ReelRig, VisibleCard};
use sd_stage::{PlayEvent, PlayMachine, PlayPhase, PlaySession};

use crate::collab::{ClaimSink, PrizeAllocator};
use crate::config::{EngineConfig, RevealMode};
use crate::select::select_target;
use crate::weighted::pick_weighted;

/// Summary of a play that reached its reveal
#[derive(Debug, Clone, PartialEq)]
pub struct PlayOutcome {
    pub play_id: String,
    /// The revealed prize
    pub item: Item,
    /// Cell grabbed in visible-sample mode
    pub grabbed_cell: Option<(usize, usize)>,
    /// Claim answer, when the collaborator answered at all
    pub receipt: Option<ClaimReceipt>,
    /// Transport-level claim failure, surfaced inline; the reveal stays
    /// open for a retry
    pub claim_error: Option<String>,
}

/// Session statistics across plays
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionStats {
    pub plays_started: u64,
    pub reveals: u64,
    pub claims_succeeded: u64,
    pub claims_rejected: u64,
    pub allocation_failures: u64,
    pub dismissals: u64,
}

impl SessionStats {
    /// Fraction of started plays that reached their reveal
    pub fn reveal_rate(&self) -> f64 {
        if self.plays_started > 0 {
            self.reveals as f64 / self.plays_started as f64
        } else {
            0.0
        }
    }
}

/// Dismisses the active play from outside the running timeline
#[derive(Debug, Clone)]
pub struct ResetHandle {
    tx: watch::Sender<bool>,
}

impl ResetHandle {
    /// Kill the active timeline: reels hold their positions, the session
    /// returns to idle
    pub fn reset(&self) {
        let _ = self.tx.send(true);
    }
}

enum StopOutcome {
    Cancelled,
    Landed { grabbed_cell: Option<(usize, usize)> },
}

/// Drives the full play: allocator → stop → reveal → claim → settle
pub struct SequenceOrchestrator<A, C> {
    config: EngineConfig,
    machine: PlayMachine,
    rig: ReelRig,
    rng: StdRng,
    allocator: A,
    claims: C,
    active_play_id: Option<String>,
    stats: SessionStats,
    cancel_tx: watch::Sender<bool>,
    cancel_rx: watch::Receiver<bool>,
}

impl<A, C> SequenceOrchestrator<A, C>
where
    A: PrizeAllocator,
    C: ClaimSink,
{
    pub fn new(catalog: Catalog, config: EngineConfig, allocator: A, claims: C) -> Self {
        let rig = ReelRig::new(catalog, config.rig);
        Self::build(config, rig, StdRng::from_os_rng(), allocator, claims)
    }

    /// Fully reproducible orchestrator: rig starts, spin velocities, and
    /// sampling draws all derive from `seed`
    pub fn with_seed(
        catalog: Catalog,
        config: EngineConfig,
        allocator: A,
        claims: C,
        seed: u64,
    ) -> Self {
        let rig = ReelRig::with_seed(catalog, config.rig, seed);
        Self::build(config, rig, StdRng::seed_from_u64(seed), allocator, claims)
    }

    fn build(config: EngineConfig, rig: ReelRig, rng: StdRng, allocator: A, claims: C) -> Self {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        Self {
            config,
            machine: PlayMachine::new(),
            rig,
            rng,
            allocator,
            claims,
            active_play_id: None,
            stats: SessionStats::default(),
            cancel_tx,
            cancel_rx,
        }
    }

    // ─── Read-only views for presentation ───────────────────────────────

    pub fn phase(&self) -> PlayPhase {
        self.machine.phase()
    }

    pub fn session(&self) -> &PlaySession {
        self.machine.session()
    }

    pub fn rig(&self) -> &ReelRig {
        &self.rig
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
    }

    pub fn allocator_mut(&mut self) -> &mut A {
        &mut self.allocator
    }

    pub fn claims(&self) -> &C {
        &self.claims
    }

    pub fn claims_mut(&mut self) -> &mut C {
        &mut self.claims
    }

    /// Handle for dismissing the play from another task
    pub fn reset_handle(&self) -> ResetHandle {
        ResetHandle {
            tx: self.cancel_tx.clone(),
        }
    }

    /// Synchronous dismissal between awaits: kill the timeline, return to
    /// idle, resume the drift
    pub fn reset(&mut self) {
        self.cancel_tx.send_replace(true);
        self.rig.freeze_all();
        self.machine.apply(PlayEvent::Reset);
        self.active_play_id = None;
        self.rig.resume_idle_drift();
    }

    // ─── The play timeline ──────────────────────────────────────────────

    /// Run one full play
    ///
    /// Returns `Ok(None)` when nothing ran to completion: a play was
    /// already active (re-entrancy guard), or the timeline was dismissed
    /// mid-flight. Operational failures come back as errors after the
    /// machine has been returned to idle; a rejected or transport-failed
    /// claim is NOT an error — the reveal stays open and
    /// [`retry_claim`](Self::retry_claim) may finish the job.
    pub async fn run_play(&mut self) -> EngineResult<Option<PlayOutcome>> {
        if !self.machine.apply(PlayEvent::Play).applied {
            log::debug!("orchestrator: play ignored, session already active");
            return Ok(None);
        }
        self.stats.plays_started += 1;
        self.arm_cancellation();
        self.rig.clear_highlights();
        self.rig.reset_hidden();
        self.rig.start_continuous_spin();

        let grant = match self.await_allocation().await {
            Ok(Some(grant)) => grant,
            Ok(None) => return Ok(self.finish_cancelled()),
            Err(err) => {
                // Abort before any stop sequence begins
                self.stats.allocation_failures += 1;
                self.rig.resume_idle_drift();
                self.machine.apply(PlayEvent::Fail(err.to_string()));
                return Err(err);
            }
        };

        // The result may only attach while spinning; anything later is a
        // stale response racing a dismissal
        if !self
            .machine
            .apply(PlayEvent::AttachResult(grant.item.clone()))
            .applied
        {
            log::info!("orchestrator: allocation resolved after spinning ended; discarded");
            return Ok(None);
        }
        self.active_play_id = Some(grant.play_id.clone());
        log::info!(
            "orchestrator: play {} granted {} ({}ms)",
            grant.play_id,
            grant.item.id,
            grant.latency_ms
        );

        if self.drive_for(self.config.timing.spin_lead_ms).await {
            return Ok(self.finish_cancelled());
        }

        let grabbed_cell = match self.stop_reels(&grant).await {
            Ok(StopOutcome::Landed { grabbed_cell }) => grabbed_cell,
            Ok(StopOutcome::Cancelled) => return Ok(self.finish_cancelled()),
            Err(err) => {
                self.rig.freeze_all();
                self.machine.apply(PlayEvent::Fail(err.to_string()));
                return Err(err);
            }
        };

        self.machine.apply(PlayEvent::Lift);
        if let Some((row, col)) = grabbed_cell {
            self.rig.hide_card(row, col);
        }
        if self.drive_for(self.config.timing.lift_duration_ms).await {
            return Ok(self.finish_cancelled());
        }

        self.machine.apply(PlayEvent::Reveal);
        self.stats.reveals += 1;
        if self.drive_for(self.config.timing.reveal_delay_ms).await {
            return Ok(self.finish_cancelled());
        }

        let receipt = match self.claims.claim(&grant.play_id, &grant.item).await {
            Ok(receipt) => receipt,
            Err(err) => {
                log::warn!("orchestrator: claim transport failed: {err}; reveal stays open");
                return Ok(Some(PlayOutcome {
                    play_id: grant.play_id,
                    item: grant.item,
                    grabbed_cell,
                    receipt: None,
                    claim_error: Some(err.to_string()),
                }));
            }
        };

        if self.cancelled() {
            return Ok(self.finish_cancelled());
        }

        if receipt.success {
            self.stats.claims_succeeded += 1;
            self.machine.apply(PlayEvent::Claim(receipt.clone()));
            self.drive_for(self.config.timing.settle_delay_ms).await;
            self.machine.apply(PlayEvent::Reset);
            self.active_play_id = None;
            self.rig.resume_idle_drift();
        } else {
            self.stats.claims_rejected += 1;
            log::warn!(
                "orchestrator: claim rejected for play {}; reveal stays open",
                grant.play_id
            );
        }

        Ok(Some(PlayOutcome {
            play_id: grant.play_id,
            item: grant.item,
            grabbed_cell,
            receipt: Some(receipt),
            claim_error: None,
        }))
    }

    /// Retry a rejected or transport-failed claim without re-spinning
    ///
    /// Returns `Ok(None)` unless a reveal with a selected item is open.
    pub async fn retry_claim(&mut self) -> EngineResult<Option<ClaimReceipt>> {
        if self.machine.phase() != PlayPhase::Reveal {
            return Ok(None);
        }
        let (play_id, item) = match (
            self.active_play_id.clone(),
            self.machine.session().selected.clone(),
        ) {
            (Some(play_id), Some(item)) => (play_id, item),
            _ => return Ok(None),
        };

        let receipt = self.claims.claim(&play_id, &item).await?;
        if receipt.success {
            self.stats.claims_succeeded += 1;
            self.machine.apply(PlayEvent::Claim(receipt.clone()));
            self.drive_for(self.config.timing.settle_delay_ms).await;
            self.machine.apply(PlayEvent::Reset);
            self.active_play_id = None;
            self.rig.resume_idle_drift();
        } else {
            self.stats.claims_rejected += 1;
        }
        Ok(Some(receipt))
    }

    // ─── Stop strategies ────────────────────────────────────────────────

    async fn stop_reels(&mut self, grant: &PrizeGrant) -> EngineResult<StopOutcome> {
        match self.config.mode {
            RevealMode::ExactTarget { row, min_laps } => {
                self.stop_on_target(grant, row, min_laps).await
            }
            RevealMode::VisibleSample => self.stop_and_sample().await,
        }
    }

    /// Single-target mode: compute the landing offset for a future
    /// occurrence of the granted item and seek exactly onto it
    async fn stop_on_target(
        &mut self,
        grant: &PrizeGrant,
        row: usize,
        min_laps: f64,
    ) -> EngineResult<StopOutcome> {
        let geometry = self.rig.geometry();
        let reel = self
            .rig
            .reel(row)
            .ok_or_else(|| EngineError::InvalidParam(format!("no reel row {row}")))?;
        let from_index = geometry.index_for_offset(reel.position());
        let target_index = select_target(self.rig.catalog(), &grant.item.id, from_index, min_laps)?;
        let target_offset = geometry.offset_for_index(target_index);
        log::debug!(
            "orchestrator: row {row} seeking index {from_index} -> {target_index} (offset {target_offset:.1})"
        );

        self.machine.apply(PlayEvent::Decelerate);
        // Ramp every row out, then override the target row with the
        // precise landing
        self.rig
            .begin_deceleration(self.config.timing.decel_duration_ms);
        self.rig
            .begin_seek(row, target_offset, self.config.timing.seek_duration_ms)?;
        if self.drive_until_frozen().await {
            return Ok(StopOutcome::Cancelled);
        }

        self.machine.apply(PlayEvent::Select);
        if self.drive_for(self.config.timing.grab_pause_ms).await {
            return Ok(StopOutcome::Cancelled);
        }
        Ok(StopOutcome::Landed { grabbed_cell: None })
    }

    /// Multi-candidate mode: best-effort stop, snap to the grid, then a
    /// weighted draw over the visible cards picks the cell to grab
    async fn stop_and_sample(&mut self) -> EngineResult<StopOutcome> {
        self.machine.apply(PlayEvent::Decelerate);
        self.rig
            .begin_deceleration(self.config.timing.decel_duration_ms);
        if self.drive_until_frozen().await {
            return Ok(StopOutcome::Cancelled);
        }
        self.rig.snap_all();

        let cards: Vec<VisibleCard> = self
            .rig
            .visible_cards()?
            .into_iter()
            .flatten()
            .collect();
        let scored: Vec<(VisibleCard, f64)> = cards
            .into_iter()
            .map(|card| {
                let weight = self.rig.catalog().item_at(card.catalog_index as i64).weight;
                (card, weight)
            })
            .collect();
        let (picked, _) = pick_weighted(&mut self.rng, &scored, |(_, weight)| *weight)?;
        let cell = (picked.row, picked.col);
        log::debug!(
            "orchestrator: grabbed ({}, {}) holding {}",
            cell.0,
            cell.1,
            picked.item_id
        );

        self.machine.apply(PlayEvent::Select);
        self.rig.highlight_card(cell.0, cell.1);
        if self.drive_for(self.config.timing.grab_pause_ms).await {
            return Ok(StopOutcome::Cancelled);
        }
        Ok(StopOutcome::Landed {
            grabbed_cell: Some(cell),
        })
    }

    // ─── Timeline plumbing ──────────────────────────────────────────────

    fn arm_cancellation(&mut self) {
        self.cancel_tx.send_replace(false);
        self.cancel_rx.mark_unchanged();
    }

    fn cancelled(&self) -> bool {
        *self.cancel_rx.borrow()
    }

    fn finish_cancelled(&mut self) -> Option<PlayOutcome> {
        log::info!("orchestrator: timeline dismissed");
        self.stats.dismissals += 1;
        self.rig.freeze_all();
        self.machine.apply(PlayEvent::Reset);
        self.active_play_id = None;
        self.rig.resume_idle_drift();
        None
    }

    /// Spin the rig while the allocator answers; `Ok(None)` on dismissal
    async fn await_allocation(&mut self) -> EngineResult<Option<PrizeGrant>> {
        let tick_ms = self.config.timing.tick_interval_ms;
        let mut ticker = time::interval(tick_duration(tick_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let allocation = self.allocator.play();
        tokio::pin!(allocation);
        loop {
            tokio::select! {
                result = &mut allocation => return result.map(Some),
                _ = self.cancel_rx.changed() => return Ok(None),
                _ = ticker.tick() => {
                    self.rig.tick(tick_ms);
                }
            }
        }
    }

    /// Advance the rig until every reel freezes; true on dismissal
    async fn drive_until_frozen(&mut self) -> bool {
        let tick_ms = self.config.timing.tick_interval_ms;
        let mut ticker = time::interval(tick_duration(tick_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = self.cancel_rx.changed() => return true,
                _ = ticker.tick() => {
                    if self.rig.tick(tick_ms) {
                        return false;
                    }
                }
            }
        }
    }

    /// Advance the rig for a wall-clock duration; true on dismissal
    async fn drive_for(&mut self, duration_ms: f64) -> bool {
        if duration_ms <= 0.0 {
            return self.cancelled();
        }
        let tick_ms = self.config.timing.tick_interval_ms;
        let ticks = (duration_ms / tick_ms).ceil().max(1.0) as u64;
        let mut ticker = time::interval(tick_duration(tick_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        for _ in 0..ticks {
            tokio::select! {
                _ = self.cancel_rx.changed() => return true,
                _ = ticker.tick() => {
                    self.rig.tick(tick_ms);
                }
            }
        }
        false
    }
}

fn tick_duration(tick_ms: f64) -> Duration {
    Duration::from_secs_f64((tick_ms / 1000.0).max(0.000_1))
}
