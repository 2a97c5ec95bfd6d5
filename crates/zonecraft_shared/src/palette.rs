//! Palette model: the master grid of tile definitions.
//!
//! The tile list is the stored truth; the row/column layout is derived from it by
//! [`Palette::rebuild_layout`], which also repairs colliding or out-of-bounds tiles.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::constants::{
    DEFAULT_PALETTE_COLUMNS, DEFAULT_PALETTE_NAME, DEFAULT_PALETTE_ROWS, FALLBACK_TILE_ID,
    MAX_PALETTE_DIMENSION, MIN_PALETTE_DIMENSION,
};
use crate::pattern::{PaletteCell, Region, TilePattern};
use crate::tile::{fill_or_default, TileDefinition, TileId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    /// Catalog id, `None` until the palette has been saved
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_rows")]
    rows: u32,
    #[serde(default = "default_columns")]
    columns: u32,
    #[serde(default)]
    tiles: Vec<TileDefinition>,
    #[serde(skip)]
    layout: Vec<Vec<Option<TileId>>>,
}

fn default_name() -> String {
    DEFAULT_PALETTE_NAME.to_string()
}

fn default_rows() -> u32 {
    DEFAULT_PALETTE_ROWS
}

fn default_columns() -> u32 {
    DEFAULT_PALETTE_COLUMNS
}

fn clamp_dimension(value: u32) -> u32 {
    value.clamp(MIN_PALETTE_DIMENSION, MAX_PALETTE_DIMENSION)
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE_ROWS, DEFAULT_PALETTE_COLUMNS)
    }
}

impl Palette {
    /// Blank palette with clamped dimensions
    pub fn new(rows: u32, columns: u32) -> Self {
        let mut palette = Self {
            id: None,
            name: default_name(),
            description: String::new(),
            rows: clamp_dimension(rows),
            columns: clamp_dimension(columns),
            tiles: Vec::new(),
            layout: Vec::new(),
        };
        palette.rebuild_layout();
        palette
    }

    /// Build a palette from a raw tile list, repairing it into a valid layout
    pub fn from_tiles(rows: u32, columns: u32, tiles: Vec<TileDefinition>) -> Self {
        let mut palette = Self::new(rows, columns);
        palette.tiles = tiles;
        palette.rebuild_layout();
        palette
    }

    /// Repair a palette that came off the wire (catalog response, embedded document)
    pub fn normalized(mut self) -> Self {
        for tile in &mut self.tiles {
            tile.fill = fill_or_default(&tile.fill);
        }
        self.rebuild_layout();
        self
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn tiles(&self) -> &[TileDefinition] {
        &self.tiles
    }

    pub fn layout(&self) -> &[Vec<Option<TileId>>] {
        &self.layout
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile(&self, tile_id: &str) -> Option<&TileDefinition> {
        self.tiles.iter().find(|t| t.tile_id == tile_id)
    }

    pub fn contains(&self, tile_id: &str) -> bool {
        self.tile(tile_id).is_some()
    }

    /// Tile id stored in the layout at a cell
    pub fn tile_id_at(&self, cell: PaletteCell) -> Option<&str> {
        self.layout
            .get(cell.row as usize)
            .and_then(|row| row.get(cell.column as usize))
            .and_then(|id| id.as_deref())
    }

    pub fn tile_at(&self, cell: PaletteCell) -> Option<&TileDefinition> {
        self.tile_id_at(cell).and_then(|id| self.tile(id))
    }

    pub fn in_bounds(&self, cell: PaletteCell) -> bool {
        cell.row < self.rows && cell.column < self.columns
    }

    /// First tile in row-major layout order
    pub fn first_tile_id(&self) -> Option<&str> {
        self.layout.iter().flatten().find_map(|id| id.as_deref())
    }

    /// The tile new zone cells and erased cells get
    pub fn default_tile_id(&self) -> TileId {
        self.first_tile_id().unwrap_or(FALLBACK_TILE_ID).to_string()
    }

    /// Smallest non-negative integer (as a string) not already used as a tile id
    pub fn next_tile_id(&self) -> TileId {
        let used: HashSet<&str> = self.tiles.iter().map(|t| t.tile_id.as_str()).collect();
        (0u32..)
            .map(|n| n.to_string())
            .find(|candidate| !used.contains(candidate.as_str()))
            .unwrap_or_default()
    }

    /// Rows/columns needed to hold every stored tile position
    pub fn bounding_box(&self) -> (u32, u32) {
        self.tiles.iter().fold((0, 0), |(rows, columns), tile| {
            (
                rows.max(tile.row.saturating_add(1)),
                columns.max(tile.column.saturating_add(1)),
            )
        })
    }

    fn first_free_cell(&self) -> Option<PaletteCell> {
        first_free_cell(&self.layout)
    }

    pub fn is_full(&self) -> bool {
        self.first_free_cell().is_none()
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Add a tile at an empty cell. Returns the allocated id.
    pub fn add_tile(
        &mut self,
        cell: PaletteCell,
        sprite: Option<String>,
        walkable: bool,
    ) -> Result<TileId, PaletteError> {
        if !self.in_bounds(cell) {
            return Err(PaletteError::OutOfBounds {
                row: cell.row,
                column: cell.column,
            });
        }
        if let Some(existing) = self.tile_id_at(cell) {
            return Err(PaletteError::CellOccupied(existing.to_string()));
        }

        let tile_id = self.next_tile_id();
        let tile = TileDefinition::new(tile_id.clone(), cell.row, cell.column)
            .with_sprite(sprite)
            .with_walkable(walkable);
        self.tiles.push(tile);
        self.rebuild_layout();
        Ok(tile_id)
    }

    /// Insert a fully specified tile, relocating it to the first free cell if its own
    /// cell is taken. Returns false when the id is already used or the grid is full.
    pub fn insert_tile(&mut self, tile: TileDefinition) -> bool {
        if tile.tile_id.is_empty() || self.contains(&tile.tile_id) || self.is_full() {
            return false;
        }
        self.tiles.push(tile);
        self.rebuild_layout();
        true
    }

    pub fn update_tile(
        &mut self,
        tile_id: &str,
        sprite: Option<String>,
        walkable: bool,
    ) -> Result<(), PaletteError> {
        let tile = self
            .tiles
            .iter_mut()
            .find(|t| t.tile_id == tile_id)
            .ok_or_else(|| PaletteError::UnknownTile(tile_id.to_string()))?;
        tile.sprite = sprite.filter(|s| !s.trim().is_empty());
        tile.walkable = walkable;
        Ok(())
    }

    pub fn set_fill(&mut self, tile_id: &str, fill: &str) -> Result<(), PaletteError> {
        let tile = self
            .tiles
            .iter_mut()
            .find(|t| t.tile_id == tile_id)
            .ok_or_else(|| PaletteError::UnknownTile(tile_id.to_string()))?;
        tile.fill = fill_or_default(fill);
        Ok(())
    }

    pub fn remove_tile(&mut self, tile_id: &str) -> Result<TileDefinition, PaletteError> {
        let index = self
            .tiles
            .iter()
            .position(|t| t.tile_id == tile_id)
            .ok_or_else(|| PaletteError::UnknownTile(tile_id.to_string()))?;
        let removed = self.tiles.remove(index);
        self.rebuild_layout();
        Ok(removed)
    }

    /// Resize the grid. The effective size never drops below the bounding box of the
    /// stored tile positions and is clamped to the palette limits.
    pub fn set_dimensions(&mut self, rows: u32, columns: u32) -> (u32, u32) {
        let (min_rows, min_columns) = self.bounding_box();
        self.rows = clamp_dimension(rows.max(min_rows));
        self.columns = clamp_dimension(columns.max(min_columns));
        self.rebuild_layout();
        (self.rows, self.columns)
    }

    /// Re-derive the layout from the tile list.
    ///
    /// Tiles keep their stored cell when it is in bounds and not already claimed by an
    /// earlier tile; the rest move to the first free cell in row-major order. Tiles that
    /// can't be placed, duplicate ids and blank ids are dropped and returned.
    pub fn rebuild_layout(&mut self) -> Vec<TileDefinition> {
        self.rows = clamp_dimension(self.rows);
        self.columns = clamp_dimension(self.columns);

        let mut layout = vec![vec![None; self.columns as usize]; self.rows as usize];
        let mut seen: HashSet<TileId> = HashSet::new();
        let mut keep = vec![true; self.tiles.len()];
        let mut pending = Vec::new();

        for (index, tile) in self.tiles.iter().enumerate() {
            if tile.tile_id.is_empty() || !seen.insert(tile.tile_id.clone()) {
                keep[index] = false;
                continue;
            }
            let cell = PaletteCell::new(tile.row, tile.column);
            let free = cell.row < self.rows
                && cell.column < self.columns
                && layout[cell.row as usize][cell.column as usize].is_none();
            if free {
                layout[cell.row as usize][cell.column as usize] = Some(tile.tile_id.clone());
            } else {
                pending.push(index);
            }
        }

        for index in pending {
            match first_free_cell(&layout) {
                Some(cell) => {
                    let tile = &mut self.tiles[index];
                    debug!(
                        "Relocating palette tile {} from ({}, {}) to ({}, {})",
                        tile.tile_id, tile.row, tile.column, cell.row, cell.column
                    );
                    tile.row = cell.row;
                    tile.column = cell.column;
                    layout[cell.row as usize][cell.column as usize] = Some(tile.tile_id.clone());
                }
                None => keep[index] = false,
            }
        }

        let mut dropped = Vec::new();
        let mut kept = Vec::with_capacity(self.tiles.len());
        for (tile, keep) in self.tiles.drain(..).zip(keep) {
            if keep {
                kept.push(tile);
            } else {
                dropped.push(tile);
            }
        }
        if !dropped.is_empty() {
            warn!("Dropped {} palette tile(s) that could not be placed", dropped.len());
        }

        self.tiles = kept;
        self.layout = layout;
        dropped
    }

    /// Read the tile ids inside `region` (clamped to the layout)
    pub fn extract_pattern(&self, region: Region) -> Option<(Region, TilePattern)> {
        let region = region.clamped(self.rows, self.columns)?;
        let tiles = (region.start_row..=region.end_row)
            .map(|row| {
                (region.start_column..=region.end_column)
                    .map(|column| {
                        self.tile_id_at(PaletteCell::new(row, column))
                            .map(str::to_string)
                    })
                    .collect()
            })
            .collect();
        let pattern = TilePattern {
            width: region.width(),
            height: region.height(),
            tiles,
        };
        Some((region, pattern))
    }
}

fn first_free_cell(layout: &[Vec<Option<TileId>>]) -> Option<PaletteCell> {
    layout.iter().enumerate().find_map(|(row, cells)| {
        cells
            .iter()
            .position(Option::is_none)
            .map(|column| PaletteCell::new(row as u32, column as u32))
    })
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    OutOfBounds { row: u32, column: u32 },
    CellOccupied(TileId),
    UnknownTile(TileId),
}

impl std::fmt::Display for PaletteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaletteError::OutOfBounds { row, column } => {
                write!(f, "Cell ({}, {}) is outside the palette", row, column)
            }
            PaletteError::CellOccupied(id) => write!(f, "Cell already holds tile {}", id),
            PaletteError::UnknownTile(id) => write!(f, "Unknown tile {}", id),
        }
    }
}

impl std::error::Error for PaletteError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_TILE_FILL;

    fn assert_layout_consistent(palette: &Palette) {
        let mut seen = HashSet::new();
        for tile in palette.tiles() {
            let cell = PaletteCell::new(tile.row, tile.column);
            assert!(palette.in_bounds(cell), "tile {} out of bounds", tile.tile_id);
            assert_eq!(palette.tile_id_at(cell), Some(tile.tile_id.as_str()));
            assert!(seen.insert((tile.row, tile.column)), "two tiles share a cell");
        }
    }

    #[test]
    fn test_next_tile_id_fills_gaps() {
        let mut palette = Palette::new(3, 3);
        let a = palette.add_tile(PaletteCell::new(0, 0), None, true).unwrap();
        let b = palette.add_tile(PaletteCell::new(0, 1), None, true).unwrap();
        let c = palette.add_tile(PaletteCell::new(0, 2), None, true).unwrap();
        assert_eq!((a.as_str(), b.as_str(), c.as_str()), ("0", "1", "2"));

        palette.remove_tile("1").unwrap();
        assert_eq!(palette.next_tile_id(), "1");
    }

    #[test]
    fn test_add_tile_rejects_bad_cells() {
        let mut palette = Palette::new(2, 2);
        palette.add_tile(PaletteCell::new(1, 1), None, false).unwrap();
        assert_eq!(
            palette.add_tile(PaletteCell::new(1, 1), None, true),
            Err(PaletteError::CellOccupied("0".to_string()))
        );
        assert!(matches!(
            palette.add_tile(PaletteCell::new(2, 0), None, true),
            Err(PaletteError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_rebuild_relocates_collisions_and_out_of_bounds() {
        let tiles = vec![
            TileDefinition::new("0", 0, 0),
            TileDefinition::new("1", 0, 0),
            TileDefinition::new("2", 7, 9),
            TileDefinition::new("3", 1, 1),
        ];
        let palette = Palette::from_tiles(2, 2, tiles);

        assert_layout_consistent(&palette);
        assert_eq!(palette.tile("1").map(|t| (t.row, t.column)), Some((0, 1)));
        assert_eq!(palette.tile("2").map(|t| (t.row, t.column)), Some((1, 0)));
        assert_eq!(palette.tile("3").map(|t| (t.row, t.column)), Some((1, 1)));
    }

    #[test]
    fn test_rebuild_drops_when_full_and_dedupes_ids() {
        let tiles = vec![
            TileDefinition::new("a", 0, 0),
            TileDefinition::new("a", 0, 0),
            TileDefinition::new("b", 0, 0),
            TileDefinition::new("c", 0, 0),
        ];
        let mut palette = Palette::from_tiles(1, 2, Vec::new());
        palette.tiles = tiles;
        let dropped = palette.rebuild_layout();

        assert_eq!(dropped.len(), 2);
        assert_eq!(palette.tiles().len(), 2);
        assert!(palette.contains("a"));
        assert!(palette.contains("b"));
        assert!(!palette.contains("c"));
        assert_layout_consistent(&palette);
    }

    #[test]
    fn test_update_tile_and_fill() {
        let mut palette = Palette::new(2, 2);
        let id = palette.add_tile(PaletteCell::new(0, 1), None, true).unwrap();

        palette
            .update_tile(&id, Some("tiles/water.png".to_string()), false)
            .unwrap();
        palette.set_fill(&id, "#0AF").unwrap();
        let tile = palette.tile(&id).unwrap();
        assert_eq!(tile.sprite.as_deref(), Some("tiles/water.png"));
        assert!(!tile.walkable);
        assert_eq!(tile.fill, "#00aaff");
        assert_eq!((tile.row, tile.column), (0, 1));

        palette.update_tile(&id, Some("  ".to_string()), true).unwrap();
        palette.set_fill(&id, "teal").unwrap();
        let tile = palette.tile(&id).unwrap();
        assert_eq!(tile.sprite, None);
        assert!(tile.walkable);
        assert_eq!(tile.fill, DEFAULT_TILE_FILL);
    }

    #[test]
    fn test_unknown_and_duplicate_ids_are_rejected() {
        let mut palette = Palette::new(2, 2);
        palette.add_tile(PaletteCell::new(0, 0), None, true).unwrap();

        assert_eq!(
            palette.update_tile("7", None, true),
            Err(PaletteError::UnknownTile("7".to_string()))
        );
        assert_eq!(
            palette.set_fill("7", "#fff"),
            Err(PaletteError::UnknownTile("7".to_string()))
        );
        assert!(!palette.insert_tile(TileDefinition::new("0", 1, 1)));
        assert!(!palette.insert_tile(TileDefinition::new("", 1, 1)));
        assert_eq!(palette.tiles().len(), 1);

        assert!(palette.insert_tile(TileDefinition::new("grass", 0, 0)));
        assert_eq!(palette.tile("grass").map(|t| (t.row, t.column)), Some((0, 1)));
        assert_layout_consistent(&palette);
    }

    #[test]
    fn test_set_dimensions_respects_bounding_box() {
        let mut palette = Palette::new(5, 5);
        palette.add_tile(PaletteCell::new(3, 4), None, true).unwrap();

        assert_eq!(palette.set_dimensions(1, 1), (4, 5));
        assert_eq!(palette.set_dimensions(30, 0), (20, 5));
        assert_layout_consistent(&palette);
    }

    #[test]
    fn test_extract_pattern_scenario() {
        let tiles = vec![
            TileDefinition::new("0", 0, 0),
            TileDefinition::new("1", 0, 1),
            TileDefinition::new("2", 0, 2),
        ];
        let palette = Palette::from_tiles(3, 3, tiles);
        let (region, pattern) = palette.extract_pattern(Region::new(0, 0, 0, 2)).unwrap();

        assert_eq!(region, Region::new(0, 0, 0, 2));
        assert_eq!(pattern.width, 3);
        assert_eq!(pattern.height, 1);
        assert_eq!(
            pattern.tiles,
            vec![vec![
                Some("0".to_string()),
                Some("1".to_string()),
                Some("2".to_string())
            ]]
        );
    }

    #[test]
    fn test_default_tile_is_row_major_first() {
        let tiles = vec![TileDefinition::new("9", 1, 0), TileDefinition::new("4", 0, 2)];
        let palette = Palette::from_tiles(3, 3, tiles);
        assert_eq!(palette.default_tile_id(), "4");
        assert_eq!(Palette::new(2, 2).default_tile_id(), FALLBACK_TILE_ID);
    }

    #[test]
    fn test_normalized_repairs_wire_palette() {
        let palette: Palette = serde_json::from_value(serde_json::json!({
            "name": "Overworld",
            "rows": 2,
            "columns": 2,
            "tiles": [
                { "tileId": "0", "fill": "#FFF", "row": 0, "column": 0 },
                { "tileId": "1", "fill": "nonsense", "row": 0, "column": 0 }
            ]
        }))
        .unwrap();
        let palette = palette.normalized();

        assert_eq!(palette.tile("0").unwrap().fill, "#ffffff");
        assert_eq!(palette.tile("1").unwrap().fill, "#808080");
        assert_layout_consistent(&palette);
    }
}
