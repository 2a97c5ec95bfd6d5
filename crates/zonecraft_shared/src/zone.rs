use serde::{Deserialize, Serialize};

use crate::constants::{MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
use crate::pattern::TilePattern;
use crate::tile::TileId;

// ============================================================================
// PLACEMENT TYPES
// ============================================================================

/// A cell inside a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: u32,
    pub y: u32,
}

impl GridPoint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Directed link from a cell of the owning zone to a cell of `to_zone_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transport {
    pub from: GridPoint,
    pub to_zone_id: String,
    pub to: GridPoint,
}

impl Transport {
    /// The reverse edge that would exactly mirror this one, given the zone that owns it.
    /// The returned edge belongs on zone `to_zone_id`.
    pub fn mirrored(&self, owner_zone_id: &str) -> Transport {
        Transport {
            from: self.to,
            to_zone_id: owner_zone_id.to_string(),
            to: self.from,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyPlacement {
    pub x: u32,
    pub y: u32,
    pub template_id: String,
}

// ============================================================================
// ZONE
// ============================================================================

/// One rectangular map area: a tile grid plus its placement layers.
/// NPC occupancy lives on the NPCs themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub id: String,
    pub name: String,
    width: u32,
    height: u32,
    tiles: Vec<Vec<TileId>>,
    transports: Vec<Transport>,
    enemy_placements: Vec<EnemyPlacement>,
    spawn: Option<GridPoint>,
}

impl Zone {
    /// Create a zone filled with `fill_tile`. Callers validate the dimensions.
    pub fn new(id: String, name: String, width: u32, height: u32, fill_tile: &str) -> Self {
        Self {
            id,
            name,
            width,
            height,
            tiles: vec![vec![fill_tile.to_string(); width as usize]; height as usize],
            transports: Vec::new(),
            enemy_placements: Vec::new(),
            spawn: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tiles(&self) -> &[Vec<TileId>] {
        &self.tiles
    }

    pub fn transports(&self) -> &[Transport] {
        &self.transports
    }

    pub fn enemy_placements(&self) -> &[EnemyPlacement] {
        &self.enemy_placements
    }

    pub fn spawn(&self) -> Option<GridPoint> {
        self.spawn
    }

    pub fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Clamp a possibly negative coordinate pair into the zone
    pub fn clamp_point(&self, x: i64, y: i64) -> GridPoint {
        GridPoint {
            x: x.clamp(0, self.width as i64 - 1) as u32,
            y: y.clamp(0, self.height as i64 - 1) as u32,
        }
    }

    // ========================================================================
    // TILES
    // ========================================================================

    pub fn tile(&self, x: u32, y: u32) -> Option<&str> {
        self.tiles
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .map(String::as_str)
    }

    /// Set one cell. Returns false when the cell is outside the zone.
    pub fn set_tile(&mut self, x: u32, y: u32, tile_id: &str) -> bool {
        match self
            .tiles
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            Some(cell) => {
                *cell = tile_id.to_string();
                true
            }
            None => false,
        }
    }

    /// Paint a square brush of side `size` centred on `(x, y)`, clipped to the zone.
    /// The square starts `floor((size - 1) / 2)` cells up/left of the clicked cell.
    /// Returns the number of cells written.
    pub fn paint_square(&mut self, x: u32, y: u32, size: u32, tile_id: &str) -> usize {
        let size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE) as i64;
        let offset = (size - 1) / 2;
        let left = x as i64 - offset;
        let top = y as i64 - offset;

        let x_start = left.max(0);
        let x_end = (left + size - 1).min(self.width as i64 - 1);
        let y_start = top.max(0);
        let y_end = (top + size - 1).min(self.height as i64 - 1);

        let mut written = 0;
        for cy in y_start..=y_end {
            for cx in x_start..=x_end {
                if self.set_tile(cx as u32, cy as u32, tile_id) {
                    written += 1;
                }
            }
        }
        written
    }

    /// Stamp a pattern with its top-left corner at `(x, y)`.
    /// Only cells where the pattern defines a tile are written.
    pub fn stamp_pattern(&mut self, x: u32, y: u32, pattern: &TilePattern) -> usize {
        let mut written = 0;
        for dy in 0..pattern.height {
            for dx in 0..pattern.width {
                let Some(tile_id) = pattern.get(dx, dy) else {
                    continue;
                };
                let (Some(cx), Some(cy)) = (x.checked_add(dx), y.checked_add(dy)) else {
                    continue;
                };
                if self.set_tile(cx, cy, tile_id) {
                    written += 1;
                }
            }
        }
        written
    }

    /// Replace every cell whose tile fails `keep` with `replacement`
    pub fn replace_tiles(&mut self, keep: impl Fn(&str) -> bool, replacement: &str) -> usize {
        let mut replaced = 0;
        for cell in self.tiles.iter_mut().flatten() {
            if !keep(cell) {
                *cell = replacement.to_string();
                replaced += 1;
            }
        }
        replaced
    }

    // ========================================================================
    // PLACEMENT LAYERS
    // ========================================================================

    pub fn set_spawn(&mut self, spawn: Option<GridPoint>) -> bool {
        if let Some(point) = spawn {
            if !self.in_bounds(point.x, point.y) {
                return false;
            }
        }
        self.spawn = spawn;
        true
    }

    pub fn transport_at(&self, x: u32, y: u32) -> Option<&Transport> {
        self.transports
            .iter()
            .find(|t| t.from.x == x && t.from.y == y)
    }

    /// Store an edge, replacing any edge already leaving the same cell
    pub fn set_transport(&mut self, transport: Transport) -> Option<Transport> {
        let previous = self.remove_transport_at(transport.from.x, transport.from.y);
        self.transports.push(transport);
        previous
    }

    pub fn remove_transport_at(&mut self, x: u32, y: u32) -> Option<Transport> {
        let index = self
            .transports
            .iter()
            .position(|t| t.from.x == x && t.from.y == y)?;
        Some(self.transports.remove(index))
    }

    pub fn enemy_at(&self, x: u32, y: u32) -> Option<&EnemyPlacement> {
        self.enemy_placements.iter().find(|p| p.x == x && p.y == y)
    }

    /// Place an enemy, replacing whatever was placed on the same cell
    pub fn place_enemy(&mut self, placement: EnemyPlacement) -> Option<EnemyPlacement> {
        let previous = self.remove_enemy_at(placement.x, placement.y);
        self.enemy_placements.push(placement);
        previous
    }

    pub fn remove_enemy_at(&mut self, x: u32, y: u32) -> Option<EnemyPlacement> {
        let index = self
            .enemy_placements
            .iter()
            .position(|p| p.x == x && p.y == y)?;
        Some(self.enemy_placements.remove(index))
    }

    /// Resize in place. The overlapping top-left block is kept, new cells get
    /// `fill_tile`, and placements that fall outside are dropped.
    pub fn resize(&mut self, width: u32, height: u32, fill_tile: &str) {
        self.tiles.truncate(height as usize);
        for row in &mut self.tiles {
            row.resize(width as usize, fill_tile.to_string());
        }
        while self.tiles.len() < height as usize {
            self.tiles.push(vec![fill_tile.to_string(); width as usize]);
        }
        self.width = width;
        self.height = height;

        self.transports.retain(|t| t.from.x < width && t.from.y < height);
        self.enemy_placements.retain(|p| p.x < width && p.y < height);
        if let Some(spawn) = self.spawn {
            if !self.in_bounds(spawn.x, spawn.y) {
                self.spawn = None;
            }
        }
    }
}
