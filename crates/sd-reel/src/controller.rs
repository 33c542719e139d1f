//! Multi-reel rig — owns the row motions and derives the visible grid

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use sd_core::{Catalog, EngineError, EngineResult};

use crate::geometry::ReelGeometry;
use crate::layout::{GridCell, GridLayout};
use crate::motion::ReelMotion;

/// Cards whose edges sit within this many pixels of their column are
/// considered grid-aligned
const ALIGN_EPSILON: f64 = 0.5;

/// The catalog strip is rendered this many times per row for seamless wrap
const RENDER_COPIES: usize = 3;

/// Derived snapshot of one card inside the visible window
///
/// Recomputed on demand from reel positions; never cached across ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibleCard {
    pub row: usize,
    /// 0-indexed, left to right
    pub col: usize,
    /// Position in the catalog (rendered copies collapse onto this)
    pub catalog_index: usize,
    pub item_id: String,
    pub cell: GridCell,
}

/// Rig tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigConfig {
    pub layout: GridLayout,
    /// Free-spin velocity band (px/ms); each row draws independently
    pub spin_velocity_band: (f64, f64),
    /// Between-plays drift velocity (px/ms)
    pub drift_velocity: f64,
}

impl RigConfig {
    pub fn standard() -> Self {
        Self {
            layout: GridLayout::standard(),
            spin_velocity_band: (1.2, 2.4),
            drift_velocity: 0.04,
        }
    }
}

/// N independently animated reels plus the derived grid view
///
/// Reel state is exclusively owned here: presentation layers read derived
/// views (`positions`, `visible_cards`, marker sets) and never write
/// position or velocity directly.
#[derive(Debug)]
pub struct ReelRig {
    catalog: Catalog,
    config: RigConfig,
    reels: Vec<ReelMotion>,
    rng: StdRng,
    highlighted: HashSet<(usize, usize)>,
    hidden: HashSet<(usize, usize)>,
}

impl ReelRig {
    /// Create a rig with OS-seeded randomness
    pub fn new(catalog: Catalog, config: RigConfig) -> Self {
        Self::build(catalog, config, StdRng::from_os_rng())
    }

    /// Create a rig with a fixed seed (reproducible starts and spins)
    pub fn with_seed(catalog: Catalog, config: RigConfig, seed: u64) -> Self {
        Self::build(catalog, config, StdRng::seed_from_u64(seed))
    }

    fn build(catalog: Catalog, config: RigConfig, mut rng: StdRng) -> Self {
        let pitch = config.layout.pitch();
        let cycle = catalog.len() as f64 * pitch;
        let reels = (0..config.layout.rows)
            .map(|row| {
                // Randomized but grid-aligned start, so the first paint is
                // already snapped; even rows scroll right, odd rows left
                let start = rng.random_range(0..catalog.len()) as f64 * pitch;
                let direction = if row % 2 == 0 { 1.0 } else { -1.0 };
                ReelMotion::new(cycle, start, direction)
            })
            .collect();

        Self {
            catalog,
            config,
            reels,
            rng,
            highlighted: HashSet::new(),
            hidden: HashSet::new(),
        }
    }

    /// Geometry for index ↔ offset conversion on these reels
    pub fn geometry(&self) -> ReelGeometry {
        ReelGeometry::new(self.config.layout.container_width, self.config.layout.pitch())
    }

    pub fn layout(&self) -> &GridLayout {
        &self.config.layout
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rows(&self) -> usize {
        self.reels.len()
    }

    /// Read access to one reel's motion state
    pub fn reel(&self, row: usize) -> Option<&ReelMotion> {
        self.reels.get(row)
    }

    /// Current scroll offset per row, for the visual transform
    pub fn positions(&self) -> Vec<f64> {
        self.reels.iter().map(|r| r.position()).collect()
    }

    // ─── Commands ───────────────────────────────────────────────────────

    /// All rows to free spin, each with an independent velocity draw
    pub fn start_continuous_spin(&mut self) {
        let (lo, hi) = self.config.spin_velocity_band;
        for reel in &mut self.reels {
            let velocity = self.rng.random_range(lo..hi);
            reel.start_spin(velocity);
        }
        log::debug!("rig: continuous spin started on {} rows", self.reels.len());
    }

    /// Ramp every non-frozen row to a stop over `duration_ms`
    pub fn begin_deceleration(&mut self, duration_ms: f64) {
        for reel in &mut self.reels {
            reel.begin_deceleration(duration_ms);
        }
    }

    /// Exact-stop one row on a precomputed target offset
    pub fn begin_seek(
        &mut self,
        row: usize,
        target_offset: f64,
        duration_ms: f64,
    ) -> EngineResult<()> {
        let reel = self
            .reels
            .get_mut(row)
            .ok_or_else(|| EngineError::InvalidParam(format!("no reel row {row}")))?;
        reel.begin_seek(target_offset, duration_ms);
        Ok(())
    }

    /// Advance every row one frame; true once all rows are frozen
    pub fn tick(&mut self, dt_ms: f64) -> bool {
        for reel in &mut self.reels {
            reel.tick(dt_ms);
        }
        self.is_all_frozen()
    }

    pub fn is_all_frozen(&self) -> bool {
        self.reels.iter().all(|r| r.is_frozen())
    }

    /// Round every row onto the nearest item boundary
    pub fn snap_all(&mut self) {
        let pitch = self.config.layout.pitch();
        for reel in &mut self.reels {
            reel.snap_to_grid(pitch);
        }
    }

    /// Immediate stop, positions left wherever they were (cancellation)
    pub fn freeze_all(&mut self) {
        for reel in &mut self.reels {
            reel.freeze();
        }
    }

    /// Apply a container resize; cells and margins are derived state and
    /// recompute from the new box
    pub fn resize(&mut self, container_width: f64, container_height: f64) {
        self.config.layout.container_width = container_width;
        self.config.layout.container_height = container_height;
    }

    /// Resume the between-plays drift on every row
    pub fn resume_idle_drift(&mut self) {
        let drift = self.config.drift_velocity;
        for reel in &mut self.reels {
            reel.start_drift(drift);
        }
    }

    // ─── Derived views ──────────────────────────────────────────────────

    /// Cards currently aligned with the visible grid, one list per row
    ///
    /// Walks the catalog rendered [`RENDER_COPIES`] times, keeps cards
    /// fully inside the window, maps centers to columns, and keeps the
    /// first physical copy per column. Every row must fill exactly
    /// `visible_columns` columns; a mid-motion row that cannot yields
    /// [`EngineError::NotAligned`].
    pub fn visible_cards(&self) -> EngineResult<Vec<Vec<VisibleCard>>> {
        (0..self.reels.len())
            .map(|row| self.visible_row(row))
            .collect()
    }

    fn visible_row(&self, row: usize) -> EngineResult<Vec<VisibleCard>> {
        let layout = &self.config.layout;
        let pitch = layout.pitch();
        let half_card = layout.card_width / 2.0;
        let (win_start, win_end) = layout.window();
        let n = self.catalog.len();
        let position = self.reels[row].position();

        // The rendered strip starts at the left margin and is translated
        // left by `position`, so a grid-snapped position puts card left
        // edges exactly on the column cells.
        let mut columns: Vec<Option<VisibleCard>> = vec![None; layout.visible_columns];
        for rendered in 0..(RENDER_COPIES * n) {
            let center = win_start + rendered as f64 * pitch + half_card - position;
            if center - half_card < win_start - ALIGN_EPSILON
                || center + half_card > win_end + ALIGN_EPSILON
            {
                continue;
            }
            let col = ((center - win_start) / pitch).floor() as usize;
            if col >= layout.visible_columns {
                continue;
            }
            if columns[col].is_none() {
                let catalog_index = rendered % n;
                columns[col] = Some(VisibleCard {
                    row,
                    col,
                    catalog_index,
                    item_id: self.catalog.item_at(catalog_index as i64).id.clone(),
                    cell: layout.cell(row, col),
                });
            }
        }

        columns
            .into_iter()
            .map(|card| card.ok_or(EngineError::NotAligned { reel: row }))
            .collect()
    }

    // ─── Presentation markers ───────────────────────────────────────────
    //
    // Keyed by grid coordinate, not by physical position, so they stay
    // correct while idle drift scrolls the strip underneath.

    pub fn highlight_card(&mut self, row: usize, col: usize) {
        self.highlighted.insert((row, col));
    }

    pub fn clear_highlights(&mut self) {
        self.highlighted.clear();
    }

    pub fn hide_card(&mut self, row: usize, col: usize) {
        self.hidden.insert((row, col));
    }

    pub fn reset_hidden(&mut self) {
        self.hidden.clear();
    }

    pub fn highlighted(&self) -> &HashSet<(usize, usize)> {
        &self.highlighted
    }

    pub fn hidden(&self) -> &HashSet<(usize, usize)> {
        &self.hidden
    }
}
