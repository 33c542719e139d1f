//! Target selection — nearest qualifying future occurrence of an item

use sd_core::{Catalog, EngineError, EngineResult, LogicalIndex};

/// Find the stopping index for a target item
///
/// Returns the smallest logical index `i ≥ from_index + ceil(min_laps *
/// len)` whose catalog position holds `target_id`, so the reel travels at
/// least `min_laps` full cycles before stopping.
///
/// A target absent from the catalog is a contract violation
/// ([`EngineError::InvalidTarget`]), not a silent landing on an arbitrary
/// index.
pub fn select_target(
    catalog: &Catalog,
    target_id: &str,
    from_index: LogicalIndex,
    min_laps: f64,
) -> EngineResult<LogicalIndex> {
    if !min_laps.is_finite() || min_laps < 0.0 {
        return Err(EngineError::InvalidParam(format!(
            "min_laps must be a non-negative number, got {min_laps}"
        )));
    }
    let base = catalog
        .position_of(target_id)
        .ok_or_else(|| EngineError::InvalidTarget {
            id: target_id.to_string(),
        })? as LogicalIndex;

    let n = catalog.len() as LogicalIndex;
    let min_index = from_index + (min_laps * n as f64).ceil() as LogicalIndex;

    // The target recurs every `n` steps, so one catalog length past
    // `min_index` always contains it.
    let mut selected = None;
    for candidate in min_index..min_index + n {
        if candidate.rem_euclid(n) == base.rem_euclid(n) {
            selected = Some(candidate);
            break;
        }
    }
    let selected = selected.ok_or_else(|| EngineError::InvalidTarget {
        id: target_id.to_string(),
    })?;

    debug_assert_eq!(
        selected,
        closed_form(base, min_index, n),
        "scan and closed-form selection disagree"
    );
    Ok(selected)
}

/// Closed-form equivalent of the scan: jump `base` forward by whole laps
/// until it clears `min_index`
fn closed_form(base: LogicalIndex, min_index: LogicalIndex, n: LogicalIndex) -> LogicalIndex {
    let delta = min_index - base;
    let laps = delta.div_euclid(n) + if delta.rem_euclid(n) != 0 { 1 } else { 0 };
    base + laps.max(0) * n
}
