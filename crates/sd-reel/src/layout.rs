//! Grid layout — container dimensions to column/cell positions
//!
//! Purely a function of layout parameters; recomputed on resize, never
//! stored as authoritative state.

use serde::{Deserialize, Serialize};

/// Pixel position of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub x: f64,
    pub y: f64,
}

/// Layout parameters for the visible card grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub container_width: f64,
    pub container_height: f64,
    /// Columns the visible window must hold
    pub visible_columns: usize,
    /// Independently animated rows
    pub rows: usize,
    pub card_width: f64,
    pub card_height: f64,
    /// Horizontal gap between cards
    pub gap: f64,
    /// Vertical gap between rows
    pub row_gap: f64,
}

impl GridLayout {
    /// Observed production configuration: 1200px container, 3 rows of 5
    /// visible 200×200 cards with 16px gaps
    pub fn standard() -> Self {
        Self {
            container_width: 1200.0,
            container_height: 700.0,
            visible_columns: 5,
            rows: 3,
            card_width: 200.0,
            card_height: 200.0,
            gap: 16.0,
            row_gap: 16.0,
        }
    }

    /// One card plus its trailing gap — the column stride
    pub fn pitch(&self) -> f64 {
        self.card_width + self.gap
    }

    /// Row stride
    pub fn row_pitch(&self) -> f64 {
        self.card_height + self.row_gap
    }

    /// Left edge of the visible window (the last column has no trailing
    /// gap)
    pub fn left_margin(&self) -> f64 {
        let span = self.visible_columns as f64 * self.pitch() - self.gap;
        (self.container_width - span) / 2.0
    }

    /// Top edge of the first row
    pub fn top_margin(&self) -> f64 {
        let span = self.rows as f64 * self.row_pitch() - self.row_gap;
        (self.container_height - span) / 2.0
    }

    /// Physical window a card center must fall in to be visible
    pub fn window(&self) -> (f64, f64) {
        let start = self.left_margin();
        (start, start + self.visible_columns as f64 * self.pitch())
    }

    /// Pixel position of a grid cell
    pub fn cell(&self, row: usize, col: usize) -> GridCell {
        GridCell {
            x: self.left_margin() + col as f64 * self.pitch(),
            y: self.top_margin() + row as f64 * self.row_pitch(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_standard_margins() {
        let layout = GridLayout::standard();
        assert_relative_eq!(layout.pitch(), 216.0);
        // (1200 - (5*216 - 16)) / 2
        assert_relative_eq!(layout.left_margin(), 68.0);
    }

    #[test]
    fn test_window_span() {
        let layout = GridLayout::standard();
        let (start, end) = layout.window();
        assert_relative_eq!(start, 68.0);
        assert_relative_eq!(end, 68.0 + 5.0 * 216.0);
    }

    #[test]
    fn test_cells_stride_by_pitch() {
        let layout = GridLayout::standard();
        let a = layout.cell(0, 0);
        let b = layout.cell(0, 1);
        let c = layout.cell(1, 0);
        assert_relative_eq!(b.x - a.x, layout.pitch());
        assert_relative_eq!(c.y - a.y, layout.row_pitch());
        assert_relative_eq!(a.x, layout.left_margin());
    }
}
