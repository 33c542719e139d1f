//! Index ↔ offset conversions for a single reel
//!
//! One convention throughout: `position` is the non-negative scroll offset
//! of the strip, normalized into `[0, cycle_width)`. A renderer translates
//! the strip by `-position`; that projection is not this crate's concern.

use sd_core::LogicalIndex;

/// Pixel-space conversion parameters for one reel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReelGeometry {
    /// Width of the visible viewport
    pub viewport_width: f64,
    /// One item plus its trailing gap
    pub item_pitch: f64,
}

impl ReelGeometry {
    /// Create a geometry; pitch must be positive
    pub fn new(viewport_width: f64, item_pitch: f64) -> Self {
        debug_assert!(item_pitch > 0.0, "item pitch must be positive");
        Self {
            viewport_width,
            item_pitch,
        }
    }

    /// Fixed reference point items align to when centered
    pub fn center_line(&self) -> f64 {
        self.viewport_width / 2.0
    }

    /// Strip-space position of the center of the item at `index`
    pub fn center_offset(&self, index: LogicalIndex) -> f64 {
        index as f64 * self.item_pitch + self.item_pitch / 2.0
    }

    /// Scroll offset that puts item `index`'s center on the center line
    pub fn offset_for_index(&self, index: LogicalIndex) -> f64 {
        self.center_offset(index) - self.center_line()
    }

    /// Logical index of the item centered at a given scroll offset
    ///
    /// Exact inverse of [`offset_for_index`](Self::offset_for_index) for
    /// all integer indices: the centered item sits half an item past the
    /// column boundary, so the floor never lands on an edge.
    pub fn index_for_offset(&self, offset: f64) -> LogicalIndex {
        ((offset + self.center_line()) / self.item_pitch).floor() as LogicalIndex
    }

    /// Pixel width of one full catalog cycle
    pub fn cycle_width(&self, catalog_len: usize) -> f64 {
        catalog_len as f64 * self.item_pitch
    }

    /// Wrap a position into `[0, cycle_width)`
    ///
    /// Seamless: the cycle width is an exact multiple of the pitch, so
    /// wrapping never splits an item.
    pub fn normalize(&self, position: f64, catalog_len: usize) -> f64 {
        let cycle = self.cycle_width(catalog_len);
        let wrapped = position.rem_euclid(cycle);
        // rem_euclid can return `cycle` itself when position is a tiny
        // negative float
        if wrapped >= cycle { wrapped - cycle } else { wrapped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_offset_index_round_trip() {
        let geometries = [
            ReelGeometry::new(400.0, 140.0),
            ReelGeometry::new(1200.0, 216.0),
            ReelGeometry::new(333.0, 97.5),
        ];
        for geom in geometries {
            for i in -200..200 {
                let offset = geom.offset_for_index(i);
                assert_eq!(
                    geom.index_for_offset(offset),
                    i,
                    "round trip failed for index {i} with pitch {}",
                    geom.item_pitch
                );
            }
        }
    }

    #[test]
    fn test_center_line() {
        let geom = ReelGeometry::new(400.0, 140.0);
        assert_relative_eq!(geom.center_line(), 200.0);
    }

    #[test]
    fn test_known_offsets() {
        // 14-item catalog, pitch 140, viewport 400: item 2 centered at
        // offset 150, item 31 centered at offset 4210.
        let geom = ReelGeometry::new(400.0, 140.0);
        assert_relative_eq!(geom.offset_for_index(2), 150.0);
        assert_relative_eq!(geom.offset_for_index(31), 4210.0);
        assert_eq!(geom.index_for_offset(150.0), 2);
        assert_eq!(geom.index_for_offset(200.0), 2);
    }

    #[test]
    fn test_index_recovery_survives_normalization() {
        let geom = ReelGeometry::new(400.0, 140.0);
        let n = 14;
        let offset = geom.offset_for_index(31);
        let wrapped = geom.normalize(offset, n);
        let recovered = geom.index_for_offset(wrapped);
        assert_eq!(recovered.rem_euclid(n as i64), 31 % n as i64);
    }

    #[test]
    fn test_normalize_range() {
        let geom = ReelGeometry::new(400.0, 140.0);
        let cycle = geom.cycle_width(14);
        for raw in [-5000.0, -0.0001, 0.0, 1959.9, 1960.0, 9999.0] {
            let pos = geom.normalize(raw, 14);
            assert!((0.0..cycle).contains(&pos), "{raw} normalized to {pos}");
        }
    }
}
