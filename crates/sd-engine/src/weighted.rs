//! Weighted random draw over an ordered candidate list

use rand::Rng;

use sd_core::{EngineError, EngineResult, Item};

/// Draw one candidate with probability proportional to its weight
///
/// Walks candidates in their given order, subtracting each weight from a
/// uniform draw in `[0, total)`; reproducible given a seeded RNG and a
/// fixed order. Zero-weight candidates stay in the list (they may appear
/// visually) but can never win. A pool with no positive weight is
/// degenerate content data: [`EngineError::EmptyWeightPool`].
pub fn pick_weighted<'a, T, R>(
    rng: &mut R,
    candidates: &'a [T],
    weight: impl Fn(&T) -> f64,
) -> EngineResult<&'a T>
where
    R: Rng + ?Sized,
{
    let mut total = 0.0;
    for candidate in candidates {
        let w = weight(candidate);
        if !w.is_finite() || w < 0.0 {
            return Err(EngineError::InvalidParam(format!(
                "candidate weight must be a non-negative number, got {w}"
            )));
        }
        total += w;
    }
    if total <= 0.0 {
        return Err(EngineError::EmptyWeightPool);
    }

    let mut remainder = rng.random_range(0.0..total);
    let mut last_drawable = None;
    for candidate in candidates {
        let w = weight(candidate);
        if w <= 0.0 {
            continue;
        }
        last_drawable = Some(candidate);
        remainder -= w;
        if remainder <= 0.0 {
            return Ok(candidate);
        }
    }
    // Float residue can leave a sliver of remainder after the last
    // drawable candidate
    last_drawable.ok_or(EngineError::EmptyWeightPool)
}

/// Convenience wrapper for item lists
pub fn pick_item<'a, R>(rng: &mut R, items: &'a [Item]) -> EngineResult<&'a Item>
where
    R: Rng + ?Sized,
{
    pick_weighted(rng, items, |item| item.weight)
}
