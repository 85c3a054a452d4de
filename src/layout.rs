//! # Page Tiling
//!
//! Computes how many labels fit on a fixed-size page and assigns each
//! label in a batch to a page and grid cell.
//!
//! The grid floors on integer division but never drops below one column
//! or row: a label larger than the page still occupies a single
//! (overflowing) slot rather than failing. Assignment is strict raster
//! order (row-major, left to right, top to bottom) and is part of the
//! output contract: the same input order always lands on the same slots.

/// A page grid derived from label and page pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    /// Label tile width in pixels.
    pub label_width: u32,
    /// Label tile height in pixels.
    pub label_height: u32,
    /// Grid columns per page (≥ 1).
    pub columns: u32,
    /// Grid rows per page (≥ 1).
    pub rows: u32,
    /// Labels per page (`columns * rows`).
    pub per_page: u32,
    /// Total pages for the batch (≥ 1, even for an empty batch).
    pub page_count: u32,
}

/// One label's assigned page and cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub page: u32,
    pub col: u32,
    pub row: u32,
    /// Pixel offset of the cell's top-left corner within its page.
    pub x_px: u32,
    pub y_px: u32,
}

impl PageLayout {
    /// Derive the grid for `count` labels of the given tile size.
    pub fn tile(
        label_width: u32,
        label_height: u32,
        page_width: u32,
        page_height: u32,
        count: usize,
    ) -> Self {
        let label_width = label_width.max(1);
        let label_height = label_height.max(1);

        let columns = (page_width / label_width).max(1);
        let rows = (page_height / label_height).max(1);
        let per_page = columns * rows;
        let page_count = ((count as u32).div_ceil(per_page)).max(1);

        Self {
            label_width,
            label_height,
            columns,
            rows,
            per_page,
            page_count,
        }
    }

    /// Page and cell of the `i`-th label (0-indexed), raster order.
    pub fn placement(&self, i: usize) -> Placement {
        let i = i as u32;
        let page = i / self.per_page;
        let slot = i % self.per_page;
        let col = slot % self.columns;
        let row = slot / self.columns;

        Placement {
            page,
            col,
            row,
            x_px: col * self.label_width,
            y_px: row * self.label_height,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
