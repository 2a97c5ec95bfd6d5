//! Palette region selection
//! Turns pointer drags (or single clicks) over the palette grid into a committed
//! tile or pattern selection.

use zonecraft_shared::{Palette, PaletteCell, Region, TileId, TilePattern};

/// Pointer drag progress over the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Pressed on a cell, not moved yet
    Anchored { anchor: PaletteCell },
    Dragging {
        anchor: PaletteCell,
        current: PaletteCell,
    },
}

impl DragState {
    fn provisional_region(&self) -> Option<Region> {
        match *self {
            DragState::Idle => None,
            DragState::Anchored { anchor } => Some(Region::single(anchor)),
            DragState::Dragging { anchor, current } => Some(Region::spanning(anchor, current)),
        }
    }
}

/// The committed palette selection used by the brush
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaletteSelection {
    #[default]
    None,
    Tile { tile_id: TileId, cell: PaletteCell },
    Pattern { region: Region, pattern: TilePattern },
}

impl PaletteSelection {
    pub fn region(&self) -> Option<Region> {
        match self {
            PaletteSelection::None => None,
            PaletteSelection::Tile { cell, .. } => Some(Region::single(*cell)),
            PaletteSelection::Pattern { region, .. } => Some(*region),
        }
    }

    /// Resolve a region against the palette. Regions without any tile yield `None`.
    fn from_region(palette: &Palette, region: Region) -> Self {
        let Some((region, pattern)) = palette.extract_pattern(region) else {
            return PaletteSelection::None;
        };
        if !pattern.has_tiles() {
            return PaletteSelection::None;
        }
        if region.is_single_cell() {
            match pattern.get(0, 0) {
                Some(tile_id) => PaletteSelection::Tile {
                    tile_id: tile_id.to_string(),
                    cell: region.top_left(),
                },
                None => PaletteSelection::None,
            }
        } else {
            PaletteSelection::Pattern { region, pattern }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegionSelector {
    drag: DragState,
    selection: PaletteSelection,
}

impl RegionSelector {
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn selection(&self) -> &PaletteSelection {
        &self.selection
    }

    pub fn selected_tile_id(&self) -> Option<&str> {
        match &self.selection {
            PaletteSelection::Tile { tile_id, .. } => Some(tile_id),
            _ => None,
        }
    }

    /// Brush size only applies to single-tile selections
    pub fn brush_size_enabled(&self) -> bool {
        !matches!(self.selection, PaletteSelection::Pattern { .. })
    }

    /// Region to highlight: the live drag while one is in progress, else the committed one
    pub fn highlight(&self) -> Option<Region> {
        self.drag
            .provisional_region()
            .or_else(|| self.selection.region())
    }

    /// Start a drag. Presses outside the layout or on an empty cell are ignored.
    pub fn press(&mut self, palette: &Palette, cell: PaletteCell) -> bool {
        if palette.tile_id_at(cell).is_none() {
            return false;
        }
        self.drag = DragState::Anchored { anchor: cell };
        true
    }

    /// Update the live region. The pointer is clamped into the layout.
    pub fn move_to(&mut self, palette: &Palette, cell: PaletteCell) {
        let current = cell.clamped(palette.rows(), palette.columns());
        self.drag = match self.drag {
            DragState::Idle => return,
            DragState::Anchored { anchor } if anchor == current => return,
            DragState::Anchored { anchor } | DragState::Dragging { anchor, .. } => {
                DragState::Dragging { anchor, current }
            }
        };
    }

    /// Commit the live region. Returns false when no drag was in progress.
    pub fn release(&mut self, palette: &Palette) -> bool {
        let Some(region) = self.drag.provisional_region() else {
            return false;
        };
        self.drag = DragState::Idle;
        self.commit(palette, region);
        true
    }

    /// Press and release on the same cell
    pub fn click(&mut self, palette: &Palette, cell: PaletteCell) -> bool {
        self.press(palette, cell) && self.release(palette)
    }

    /// Drop the live drag; the committed selection is untouched
    pub fn cancel(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn commit(&mut self, palette: &Palette, region: Region) -> &PaletteSelection {
        self.selection = PaletteSelection::from_region(palette, region);
        &self.selection
    }

    /// Select a tile by id wherever it currently sits
    pub fn select_tile(&mut self, palette: &Palette, tile_id: &str) -> bool {
        match palette.tile(tile_id) {
            Some(tile) => {
                self.selection = PaletteSelection::Tile {
                    tile_id: tile.tile_id.clone(),
                    cell: PaletteCell::new(tile.row, tile.column),
                };
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.drag = DragState::Idle;
        self.selection = PaletteSelection::None;
    }

    /// Re-check the selection after the palette layout was rebuilt.
    /// Returns true when the selection changed.
    pub fn revalidate(&mut self, palette: &Palette) -> bool {
        let drag_valid = match self.drag {
            DragState::Idle => true,
            DragState::Anchored { anchor } | DragState::Dragging { anchor, .. } => {
                palette.in_bounds(anchor)
            }
        };
        if !drag_valid {
            self.drag = DragState::Idle;
        }

        let revalidated = match &self.selection {
            PaletteSelection::None => PaletteSelection::None,
            PaletteSelection::Tile { tile_id, .. } => match palette.tile(tile_id) {
                Some(tile) => PaletteSelection::Tile {
                    tile_id: tile.tile_id.clone(),
                    cell: PaletteCell::new(tile.row, tile.column),
                },
                None => PaletteSelection::None,
            },
            PaletteSelection::Pattern { region, .. } => {
                PaletteSelection::from_region(palette, *region)
            }
        };

        let changed = revalidated != self.selection;
        self.selection = revalidated;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonecraft_shared::TileDefinition;

    fn three_by_three() -> Palette {
        Palette::from_tiles(
            3,
            3,
            vec![
                TileDefinition::new("0", 0, 0),
                TileDefinition::new("1", 0, 1),
                TileDefinition::new("2", 0, 2),
            ],
        )
    }

    #[test]
    fn test_drag_across_row_yields_pattern() {
        let palette = three_by_three();
        let mut selector = RegionSelector::default();

        assert!(selector.press(&palette, PaletteCell::new(0, 0)));
        selector.move_to(&palette, PaletteCell::new(0, 2));
        assert_eq!(selector.highlight(), Some(Region::new(0, 0, 0, 2)));
        assert!(selector.release(&palette));

        match selector.selection() {
            PaletteSelection::Pattern { region, pattern } => {
                assert_eq!(*region, Region::new(0, 0, 0, 2));
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
            other => panic!("expected a pattern, got {:?}", other),
        }
        assert!(!selector.brush_size_enabled());
        assert_eq!(selector.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_click_selects_single_tile() {
        let palette = three_by_three();
        let mut selector = RegionSelector::default();

        assert!(selector.click(&palette, PaletteCell::new(0, 1)));
        assert_eq!(selector.selected_tile_id(), Some("1"));
        assert!(selector.brush_size_enabled());
    }

    #[test]
    fn test_press_on_empty_cell_is_ignored() {
        let palette = three_by_three();
        let mut selector = RegionSelector::default();

        assert!(!selector.press(&palette, PaletteCell::new(2, 2)));
        assert!(!selector.press(&palette, PaletteCell::new(7, 7)));
        assert_eq!(selector.drag_state(), DragState::Idle);
        assert!(!selector.release(&palette));
    }

    #[test]
    fn test_reverse_drag_is_normalized_and_clamped() {
        let palette = three_by_three();
        let mut selector = RegionSelector::default();

        selector.press(&palette, PaletteCell::new(0, 2));
        selector.move_to(&palette, PaletteCell::new(9, 0));
        let region = selector.highlight().unwrap();
        assert_eq!(region, Region::new(0, 2, 0, 2));
        assert!(region.start_row <= region.end_row);
        assert!(region.start_column <= region.end_column);
    }

    #[test]
    fn test_region_without_tiles_clears_selection() {
        let palette = three_by_three();
        let mut selector = RegionSelector::default();
        selector.click(&palette, PaletteCell::new(0, 0));

        selector.commit(&palette, Region::new(1, 2, 0, 2));
        assert_eq!(*selector.selection(), PaletteSelection::None);
        assert!(selector.highlight().is_none());
    }

    #[test]
    fn test_cancel_restores_committed_highlight() {
        let palette = three_by_three();
        let mut selector = RegionSelector::default();
        selector.click(&palette, PaletteCell::new(0, 1));

        selector.press(&palette, PaletteCell::new(0, 0));
        selector.move_to(&palette, PaletteCell::new(0, 2));
        selector.cancel();

        assert_eq!(selector.selected_tile_id(), Some("1"));
        assert_eq!(selector.highlight(), Some(Region::single(PaletteCell::new(0, 1))));
    }

    #[test]
    fn test_revalidate_clears_removed_tile() {
        let mut palette = three_by_three();
        let mut selector = RegionSelector::default();
        selector.click(&palette, PaletteCell::new(0, 2));

        palette.remove_tile("2").unwrap();
        assert!(selector.revalidate(&palette));
        assert_eq!(*selector.selection(), PaletteSelection::None);
    }

    #[test]
    fn test_revalidate_reclamps_pattern() {
        let mut palette = three_by_three();
        let mut selector = RegionSelector::default();
        selector.commit(&palette, Region::new(0, 0, 0, 2));

        palette.remove_tile("1").unwrap();
        palette.remove_tile("2").unwrap();
        selector.revalidate(&palette);

        match selector.selection() {
            PaletteSelection::Pattern { pattern, .. } => {
                assert_eq!(pattern.get(0, 0), Some("0"));
                assert_eq!(pattern.get(1, 0), None);
            }
            other => panic!("expected a pattern, got {:?}", other),
        }
    }
}
