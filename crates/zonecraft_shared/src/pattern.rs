use serde::{Deserialize, Serialize};

use crate::tile::TileId;

/// A cell on the palette grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaletteCell {
    pub row: u32,
    pub column: u32,
}

impl PaletteCell {
    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Clamp into a `rows x columns` grid (both assumed non-zero)
    pub fn clamped(self, rows: u32, columns: u32) -> Self {
        Self {
            row: self.row.min(rows.saturating_sub(1)),
            column: self.column.min(columns.saturating_sub(1)),
        }
    }
}

// ============================================================================
// REGION
// ============================================================================

/// Rectangular block of palette cells, inclusive on both ends.
/// Constructors always normalize so `start <= end` on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub start_row: u32,
    pub end_row: u32,
    pub start_column: u32,
    pub end_column: u32,
}

impl Region {
    pub fn new(start_row: u32, end_row: u32, start_column: u32, end_column: u32) -> Self {
        Self {
            start_row: start_row.min(end_row),
            end_row: start_row.max(end_row),
            start_column: start_column.min(end_column),
            end_column: start_column.max(end_column),
        }
    }

    pub fn single(cell: PaletteCell) -> Self {
        Self::new(cell.row, cell.row, cell.column, cell.column)
    }

    /// Bounding box of two cells, in whatever order they were given
    pub fn spanning(a: PaletteCell, b: PaletteCell) -> Self {
        Self::new(a.row, b.row, a.column, b.column)
    }

    /// Clamp into a `rows x columns` layout. `None` when the layout is empty.
    pub fn clamped(self, rows: u32, columns: u32) -> Option<Self> {
        if rows == 0 || columns == 0 {
            return None;
        }
        let last_row = rows - 1;
        let last_column = columns - 1;
        Some(Self::new(
            self.start_row.min(last_row),
            self.end_row.min(last_row),
            self.start_column.min(last_column),
            self.end_column.min(last_column),
        ))
    }

    pub fn width(&self) -> u32 {
        self.end_column - self.start_column + 1
    }

    pub fn height(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    pub fn is_single_cell(&self) -> bool {
        self.width() == 1 && self.height() == 1
    }

    pub fn contains(&self, cell: PaletteCell) -> bool {
        (self.start_row..=self.end_row).contains(&cell.row)
            && (self.start_column..=self.end_column).contains(&cell.column)
    }

    pub fn top_left(&self) -> PaletteCell {
        PaletteCell::new(self.start_row, self.start_column)
    }
}

// ============================================================================
// TILE PATTERN
// ============================================================================

/// Tile ids read out of a palette region, `height` rows of `width` cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePattern {
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<Vec<Option<TileId>>>,
}

impl TilePattern {
    /// A 1x1 pattern holding one tile
    pub fn single(tile_id: impl Into<TileId>) -> Self {
        Self {
            width: 1,
            height: 1,
            tiles: vec![vec![Some(tile_id.into())]],
        }
    }

    /// True if at least one cell resolves to a tile
    pub fn has_tiles(&self) -> bool {
        self.tiles.iter().flatten().any(Option::is_some)
    }

    /// Tile at offset `(dx, dy)` from the top-left corner
    pub fn get(&self, dx: u32, dy: u32) -> Option<&str> {
        self.tiles
            .get(dy as usize)
            .and_then(|row| row.get(dx as usize))
            .and_then(|cell| cell.as_deref())
    }

    pub fn is_single_cell(&self) -> bool {
        self.width == 1 && self.height == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_normalizes() {
        let region = Region::spanning(PaletteCell::new(3, 4), PaletteCell::new(1, 0));
        assert_eq!(region, Region::new(1, 3, 0, 4));
        assert!(region.start_row <= region.end_row);
        assert!(region.start_column <= region.end_column);
        assert_eq!(region.width(), 5);
        assert_eq!(region.height(), 3);
    }

    #[test]
    fn test_region_clamped_into_layout() {
        let region = Region::new(2, 9, 5, 7).clamped(4, 3).unwrap();
        assert_eq!(region, Region::new(2, 3, 2, 2));
        assert!(Region::new(0, 0, 0, 0).clamped(0, 3).is_none());
    }

    #[test]
    fn test_pattern_has_tiles() {
        let empty = TilePattern {
            width: 2,
            height: 1,
            tiles: vec![vec![None, None]],
        };
        assert!(!empty.has_tiles());

        let single = TilePattern::single("7");
        assert!(single.has_tiles());
        assert_eq!(single.get(0, 0), Some("7"));
        assert_eq!(single.get(1, 0), None);
    }
}
