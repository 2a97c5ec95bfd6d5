//! Brush dispatch onto zone grids

use zonecraft_shared::constants::{MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
use zonecraft_shared::{TileId, World, WorldError};

use crate::selection::PaletteSelection;

/// Square brush used for single-tile painting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    size: u32,
}

impl Default for Brush {
    fn default() -> Self {
        Self { size: MIN_BRUSH_SIZE }
    }
}

impl Brush {
    pub fn new(size: u32) -> Self {
        Self {
            size: size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE),
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn set_size(&mut self, size: u32) -> u32 {
        self.size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
        self.size
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintError {
    NoTileSelected,
    UnknownZone(String),
    OutOfBounds { x: u32, y: u32 },
}

impl std::fmt::Display for PaintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaintError::NoTileSelected => write!(f, "No tile selected"),
            PaintError::UnknownZone(id) => write!(f, "Unknown zone: {}", id),
            PaintError::OutOfBounds { x, y } => write!(f, "Cell ({}, {}) is outside the zone", x, y),
        }
    }
}

impl std::error::Error for PaintError {}

fn paint_error(error: WorldError, x: u32, y: u32) -> PaintError {
    match error {
        WorldError::UnknownZone(id) => PaintError::UnknownZone(id),
        _ => PaintError::OutOfBounds { x, y },
    }
}

/// Paint the active selection at `(x, y)`. Returns the number of cells written.
///
/// A single tile paints a centered square of the brush size; a pattern stamps its
/// top-left corner at the clicked cell and ignores the brush size.
pub fn apply_brush(
    world: &mut World,
    selection: &PaletteSelection,
    brush: Brush,
    zone_id: &str,
    x: u32,
    y: u32,
) -> Result<usize, PaintError> {
    let result = match selection {
        PaletteSelection::None => return Err(PaintError::NoTileSelected),
        PaletteSelection::Tile { tile_id, .. } => {
            world.paint_square(zone_id, x, y, brush.size(), tile_id)
        }
        PaletteSelection::Pattern { pattern, .. } => world.stamp_pattern(zone_id, x, y, pattern),
    };
    result.map_err(|e| paint_error(e, x, y))
}

/// Reset one cell to the palette's default tile, whatever the brush size
pub fn erase(world: &mut World, zone_id: &str, x: u32, y: u32) -> Result<TileId, PaintError> {
    world
        .reset_cell(zone_id, x, y)
        .map_err(|e| paint_error(e, x, y))
}
