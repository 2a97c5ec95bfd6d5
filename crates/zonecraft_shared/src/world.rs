//! The world aggregate: palette, zones, enemy templates and NPCs.
//!
//! Every mutation that can break a reference between entities goes through here,
//! so palette <-> zone cell, zone <-> NPC and transport mirror bookkeeping stay in
//! one place.

use tracing::{debug, info};

use crate::constants::{MAX_ZONE_DIMENSION, MIN_ZONE_DIMENSION};
use crate::enemy::EnemyTemplate;
use crate::ids::unique_slug;
use crate::npc::{Dialog, Facing, Npc, NpcPlacement, NpcService};
use crate::palette::{Palette, PaletteError};
use crate::pattern::{PaletteCell, TilePattern};
use crate::tile::TileId;
use crate::zone::{EnemyPlacement, GridPoint, Transport, Zone};

/// Label shown for placements whose template no longer exists
pub const UNKNOWN_TEMPLATE_LABEL: &str = "unknown";

/// A cell addressed across zones
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneCell {
    pub zone_id: String,
    pub x: u32,
    pub y: u32,
}

impl ZoneCell {
    pub fn new(zone_id: impl Into<String>, x: u32, y: u32) -> Self {
        Self {
            zone_id: zone_id.into(),
            x,
            y,
        }
    }

    pub fn point(&self) -> GridPoint {
        GridPoint::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct World {
    palette: Palette,
    zones: Vec<Zone>,
    enemy_templates: Vec<EnemyTemplate>,
    npcs: Vec<Npc>,
}

impl World {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            ..Default::default()
        }
    }

    /// Assemble an already repaired world (used by the document importer)
    pub(crate) fn from_parts(
        palette: Palette,
        zones: Vec<Zone>,
        enemy_templates: Vec<EnemyTemplate>,
        npcs: Vec<Npc>,
    ) -> Self {
        Self {
            palette,
            zones,
            enemy_templates,
            npcs,
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, zone_id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == zone_id)
    }

    pub fn enemy_templates(&self) -> &[EnemyTemplate] {
        &self.enemy_templates
    }

    pub fn enemy_template(&self, template_id: &str) -> Option<&EnemyTemplate> {
        self.enemy_templates.iter().find(|t| t.id == template_id)
    }

    /// Display name for a placement's template, `"unknown"` when it dangles
    pub fn template_label(&self, template_id: &str) -> &str {
        self.enemy_template(template_id)
            .map(|t| t.name.as_str())
            .unwrap_or(UNKNOWN_TEMPLATE_LABEL)
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn npc(&self, npc_id: &str) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.id == npc_id)
    }

    pub fn npc_at(&self, zone_id: &str, x: u32, y: u32) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.occupies(zone_id, x, y))
    }

    pub fn transport_at(&self, zone_id: &str, x: u32, y: u32) -> Option<&Transport> {
        self.zone(zone_id).and_then(|z| z.transport_at(x, y))
    }

    /// True when the destination zone holds the exact reverse of `transport`
    pub fn has_mirror(&self, owner_zone_id: &str, transport: &Transport) -> bool {
        let mirror = transport.mirrored(owner_zone_id);
        self.transport_at(&transport.to_zone_id, mirror.from.x, mirror.from.y)
            == Some(&mirror)
    }

    /// Edges pointing at zones that no longer exist, with the id of the owning zone
    pub fn dangling_transports(&self) -> Vec<(&str, &Transport)> {
        self.zones
            .iter()
            .flat_map(|zone| zone.transports().iter().map(move |t| (zone.id.as_str(), t)))
            .filter(|(_, t)| self.zone(&t.to_zone_id).is_none())
            .collect()
    }

    fn zone_mut(&mut self, zone_id: &str) -> Result<&mut Zone, WorldError> {
        self.zones
            .iter_mut()
            .find(|z| z.id == zone_id)
            .ok_or_else(|| WorldError::UnknownZone(zone_id.to_string()))
    }

    fn zone_in_bounds(&mut self, zone_id: &str, x: u32, y: u32) -> Result<&mut Zone, WorldError> {
        let zone = self.zone_mut(zone_id)?;
        if !zone.in_bounds(x, y) {
            return Err(WorldError::CellOutOfBounds {
                zone_id: zone_id.to_string(),
                x,
                y,
            });
        }
        Ok(zone)
    }

    fn npc_mut(&mut self, npc_id: &str) -> Result<&mut Npc, WorldError> {
        self.npcs
            .iter_mut()
            .find(|n| n.id == npc_id)
            .ok_or_else(|| WorldError::UnknownNpc(npc_id.to_string()))
    }

    // ========================================================================
    // PALETTE
    // ========================================================================

    pub fn add_palette_tile(
        &mut self,
        cell: PaletteCell,
        sprite: Option<String>,
        walkable: bool,
    ) -> Result<TileId, PaletteError> {
        let tile_id = self.palette.add_tile(cell, sprite, walkable)?;
        // The first tile can change the default tile that empty palettes fell back to
        self.repair_zone_tiles();
        Ok(tile_id)
    }

    pub fn update_palette_tile(
        &mut self,
        tile_id: &str,
        sprite: Option<String>,
        walkable: bool,
    ) -> Result<(), PaletteError> {
        self.palette.update_tile(tile_id, sprite, walkable)
    }

    pub fn set_tile_fill(&mut self, tile_id: &str, fill: &str) -> Result<(), PaletteError> {
        self.palette.set_fill(tile_id, fill)
    }

    /// Remove a tile and reset zone cells that used it to the default tile
    pub fn remove_palette_tile(&mut self, tile_id: &str) -> Result<usize, PaletteError> {
        self.palette.remove_tile(tile_id)?;
        Ok(self.repair_zone_tiles())
    }

    /// Resize the palette grid. Returns the effective size and the number of zone
    /// cells reset.
    pub fn set_palette_dimensions(&mut self, rows: u32, columns: u32) -> ((u32, u32), usize) {
        let size = self.palette.set_dimensions(rows, columns);
        (size, self.repair_zone_tiles())
    }

    pub fn set_palette_info(&mut self, name: &str, description: &str) {
        self.palette.name = name.to_string();
        self.palette.description = description.to_string();
    }

    pub fn set_palette_id(&mut self, id: Option<String>) {
        self.palette.id = id;
    }

    /// Swap in a whole palette (loaded from the catalog). Returns the number of
    /// zone cells reset because their tile no longer exists.
    pub fn replace_palette(&mut self, palette: Palette) -> usize {
        self.palette = palette;
        let repaired = self.repair_zone_tiles();
        info!(
            "Palette replaced ({} tiles), {} zone cells reset",
            self.palette.tiles().len(),
            repaired
        );
        repaired
    }

    /// Reset every zone cell that references an undefined tile
    pub fn repair_zone_tiles(&mut self) -> usize {
        let default_tile = self.palette.default_tile_id();
        let palette = &self.palette;
        let keep = |id: &str| id == default_tile || palette.contains(id);
        let repaired: usize = self
            .zones
            .iter_mut()
            .map(|zone| zone.replace_tiles(keep, &default_tile))
            .sum();
        if repaired > 0 {
            debug!("Reset {} zone cells to tile {}", repaired, default_tile);
        }
        repaired
    }

    // ========================================================================
    // ZONES
    // ========================================================================

    /// Create a zone filled with the default tile. Returns its id.
    pub fn create_zone(&mut self, name: &str, width: u32, height: u32) -> Result<String, WorldError> {
        validate_zone_size(width, height)?;
        let id = unique_slug(name, "zone", |candidate| self.zone(candidate).is_some());
        let display_name = if name.trim().is_empty() {
            id.clone()
        } else {
            name.trim().to_string()
        };
        let zone = Zone::new(
            id.clone(),
            display_name,
            width,
            height,
            &self.palette.default_tile_id(),
        );
        self.zones.push(zone);
        info!("Created zone {} ({}x{})", id, width, height);
        Ok(id)
    }

    pub fn rename_zone(&mut self, zone_id: &str, name: &str) -> Result<(), WorldError> {
        let zone = self.zone_mut(zone_id)?;
        zone.name = name.trim().to_string();
        Ok(())
    }

    /// Resize a zone and unplace NPCs left standing outside it
    pub fn resize_zone(&mut self, zone_id: &str, width: u32, height: u32) -> Result<(), WorldError> {
        validate_zone_size(width, height)?;
        let fill = self.palette.default_tile_id();
        self.zone_mut(zone_id)?.resize(width, height, &fill);

        for npc in &mut self.npcs {
            let outside = matches!(
                &npc.placement,
                Some(p) if p.zone_id == zone_id && (p.x >= width || p.y >= height)
            );
            if outside {
                debug!("Unplacing NPC {} after resize of {}", npc.id, zone_id);
                npc.placement = None;
            }
        }
        Ok(())
    }

    /// Delete a zone and unplace its NPCs.
    ///
    /// Edges in other zones that point at the deleted zone are left in place and
    /// reported by [`World::dangling_transports`].
    pub fn delete_zone(&mut self, zone_id: &str) -> Result<Zone, WorldError> {
        let index = self
            .zones
            .iter()
            .position(|z| z.id == zone_id)
            .ok_or_else(|| WorldError::UnknownZone(zone_id.to_string()))?;
        let zone = self.zones.remove(index);

        let mut unplaced = 0;
        for npc in &mut self.npcs {
            if matches!(&npc.placement, Some(p) if p.zone_id == zone_id) {
                npc.placement = None;
                unplaced += 1;
            }
        }
        info!("Deleted zone {} ({} NPCs unplaced)", zone_id, unplaced);
        Ok(zone)
    }

    // ========================================================================
    // PAINTING
    // ========================================================================

    pub fn paint_square(
        &mut self,
        zone_id: &str,
        x: u32,
        y: u32,
        size: u32,
        tile_id: &str,
    ) -> Result<usize, WorldError> {
        Ok(self.zone_in_bounds(zone_id, x, y)?.paint_square(x, y, size, tile_id))
    }

    pub fn stamp_pattern(
        &mut self,
        zone_id: &str,
        x: u32,
        y: u32,
        pattern: &TilePattern,
    ) -> Result<usize, WorldError> {
        Ok(self.zone_in_bounds(zone_id, x, y)?.stamp_pattern(x, y, pattern))
    }

    /// Reset one cell to the palette's default tile
    pub fn reset_cell(&mut self, zone_id: &str, x: u32, y: u32) -> Result<TileId, WorldError> {
        let default_tile = self.palette.default_tile_id();
        self.zone_in_bounds(zone_id, x, y)?.set_tile(x, y, &default_tile);
        Ok(default_tile)
    }

    // ========================================================================
    // SPAWN & ENEMIES
    // ========================================================================

    pub fn set_spawn(&mut self, zone_id: &str, spawn: Option<GridPoint>) -> Result<(), WorldError> {
        match spawn {
            Some(point) => {
                self.zone_in_bounds(zone_id, point.x, point.y)?.set_spawn(spawn);
            }
            None => {
                self.zone_mut(zone_id)?.set_spawn(None);
            }
        }
        Ok(())
    }

    /// Place a template on a cell, replacing the placement already there
    pub fn place_enemy(
        &mut self,
        zone_id: &str,
        x: u32,
        y: u32,
        template_id: &str,
    ) -> Result<Option<EnemyPlacement>, WorldError> {
        if self.enemy_template(template_id).is_none() {
            return Err(WorldError::UnknownTemplate(template_id.to_string()));
        }
        let zone = self.zone_in_bounds(zone_id, x, y)?;
        Ok(zone.place_enemy(EnemyPlacement {
            x,
            y,
            template_id: template_id.to_string(),
        }))
    }

    pub fn remove_enemy(
        &mut self,
        zone_id: &str,
        x: u32,
        y: u32,
    ) -> Result<Option<EnemyPlacement>, WorldError> {
        Ok(self.zone_mut(zone_id)?.remove_enemy_at(x, y))
    }

    // ========================================================================
    // TRANSPORTS
    // ========================================================================

    /// Write the edge `source -> destination`, keeping the optional mirror in sync.
    ///
    /// With `two_way` the reverse edge is written at the destination cell, replacing
    /// whatever left that cell. Without it, an exact mirror at the destination is
    /// removed and anything else there is left alone. Re-targeting an existing edge
    /// removes the exact mirror it had at its old destination.
    pub fn link_transport(
        &mut self,
        source: &ZoneCell,
        destination: &ZoneCell,
        two_way: bool,
    ) -> Result<Transport, WorldError> {
        if source == destination {
            return Err(WorldError::SameCell);
        }
        self.zone_in_bounds(&destination.zone_id, destination.x, destination.y)?;
        self.zone_in_bounds(&source.zone_id, source.x, source.y)?;

        let edge = Transport {
            from: source.point(),
            to_zone_id: destination.zone_id.clone(),
            to: destination.point(),
        };
        let previous = self
            .zone_mut(&source.zone_id)?
            .set_transport(edge.clone());

        if let Some(old) = previous.filter(|old| *old != edge) {
            self.remove_exact_mirror(&source.zone_id, &old);
        }

        let mirror = edge.mirrored(&source.zone_id);
        if two_way {
            self.zone_mut(&destination.zone_id)?.set_transport(mirror);
        } else {
            self.remove_exact_mirror(&source.zone_id, &edge);
        }

        debug!(
            "Linked {} ({}, {}) -> {} ({}, {}) two_way={}",
            source.zone_id,
            source.x,
            source.y,
            destination.zone_id,
            destination.x,
            destination.y,
            two_way
        );
        Ok(edge)
    }

    /// Remove the edge leaving a cell, together with its exact mirror
    pub fn remove_transport(
        &mut self,
        zone_id: &str,
        x: u32,
        y: u32,
    ) -> Result<Option<Transport>, WorldError> {
        let removed = self.zone_mut(zone_id)?.remove_transport_at(x, y);
        if let Some(edge) = &removed {
            self.remove_exact_mirror(zone_id, edge);
        }
        Ok(removed)
    }

    fn remove_exact_mirror(&mut self, owner_zone_id: &str, edge: &Transport) -> bool {
        if !self.has_mirror(owner_zone_id, edge) {
            return false;
        }
        let mirror = edge.mirrored(owner_zone_id);
        match self.zone_mut(&edge.to_zone_id) {
            Ok(zone) => zone.remove_transport_at(mirror.from.x, mirror.from.y).is_some(),
            Err(_) => false,
        }
    }

    // ========================================================================
    // ENEMY TEMPLATES
    // ========================================================================

    /// Create a template with default stats. Returns its id.
    pub fn create_enemy_template(&mut self, name: &str) -> String {
        let id = unique_slug(name, "enemy", |candidate| {
            self.enemy_template(candidate).is_some()
        });
        let display_name = if name.trim().is_empty() {
            id.clone()
        } else {
            name.trim().to_string()
        };
        self.enemy_templates
            .push(EnemyTemplate::new(id.clone(), display_name));
        id
    }

    /// Insert or replace a template by id. Returns true when it replaced one.
    pub fn upsert_enemy_template(&mut self, mut template: EnemyTemplate) -> bool {
        template.normalize();
        match self
            .enemy_templates
            .iter_mut()
            .find(|t| t.id == template.id)
        {
            Some(existing) => {
                *existing = template;
                true
            }
            None => {
                self.enemy_templates.push(template);
                false
            }
        }
    }

    /// Delete a template. Placements referencing it are kept and render as unknown.
    pub fn delete_enemy_template(&mut self, template_id: &str) -> Result<EnemyTemplate, WorldError> {
        let index = self
            .enemy_templates
            .iter()
            .position(|t| t.id == template_id)
            .ok_or_else(|| WorldError::UnknownTemplate(template_id.to_string()))?;
        Ok(self.enemy_templates.remove(index))
    }

    // ========================================================================
    // NPCS
    // ========================================================================

    /// Create an unplaced NPC. Returns its id.
    pub fn create_npc(&mut self, name: &str) -> String {
        let id = unique_slug(name, "npc", |candidate| self.npc(candidate).is_some());
        let display_name = if name.trim().is_empty() {
            id.clone()
        } else {
            name.trim().to_string()
        };
        self.npcs.push(Npc::new(id.clone(), display_name));
        id
    }

    pub fn update_npc(
        &mut self,
        npc_id: &str,
        name: &str,
        sprite: Option<String>,
        facing: Facing,
    ) -> Result<(), WorldError> {
        let npc = self.npc_mut(npc_id)?;
        npc.name = name.trim().to_string();
        npc.sprite = sprite.filter(|s| !s.trim().is_empty());
        npc.facing = facing;
        Ok(())
    }

    pub fn set_npc_dialog(&mut self, npc_id: &str, dialog: Dialog) -> Result<(), WorldError> {
        self.npc_mut(npc_id)?.dialog = dialog;
        Ok(())
    }

    pub fn set_npc_service(
        &mut self,
        npc_id: &str,
        service: Option<NpcService>,
    ) -> Result<(), WorldError> {
        self.npc_mut(npc_id)?.service = service;
        Ok(())
    }

    /// Place an NPC on a cell. Whoever stood there is unplaced and returned.
    pub fn place_npc(
        &mut self,
        npc_id: &str,
        zone_id: &str,
        x: u32,
        y: u32,
    ) -> Result<Option<String>, WorldError> {
        if self.npc(npc_id).is_none() {
            return Err(WorldError::UnknownNpc(npc_id.to_string()));
        }
        self.zone_in_bounds(zone_id, x, y)?;

        let displaced = self.unplace_npc_at(zone_id, x, y).filter(|id| id != npc_id);
        self.npc_mut(npc_id)?.placement = Some(NpcPlacement {
            zone_id: zone_id.to_string(),
            x,
            y,
        });
        Ok(displaced)
    }

    pub fn unplace_npc(&mut self, npc_id: &str) -> Result<(), WorldError> {
        self.npc_mut(npc_id)?.placement = None;
        Ok(())
    }

    /// Unplace whichever NPC stands on a cell, returning its id
    pub fn unplace_npc_at(&mut self, zone_id: &str, x: u32, y: u32) -> Option<String> {
        let npc = self.npcs.iter_mut().find(|n| n.occupies(zone_id, x, y))?;
        npc.placement = None;
        Some(npc.id.clone())
    }

    pub fn delete_npc(&mut self, npc_id: &str) -> Result<Npc, WorldError> {
        let index = self
            .npcs
            .iter()
            .position(|n| n.id == npc_id)
            .ok_or_else(|| WorldError::UnknownNpc(npc_id.to_string()))?;
        Ok(self.npcs.remove(index))
    }
}

fn validate_zone_size(width: u32, height: u32) -> Result<(), WorldError> {
    let range = MIN_ZONE_DIMENSION..=MAX_ZONE_DIMENSION;
    if range.contains(&width) && range.contains(&height) {
        Ok(())
    } else {
        Err(WorldError::InvalidDimensions { width, height })
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    InvalidDimensions { width: u32, height: u32 },
    UnknownZone(String),
    UnknownNpc(String),
    UnknownTemplate(String),
    CellOutOfBounds { zone_id: String, x: u32, y: u32 },
    SameCell,
}

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorldError::InvalidDimensions { width, height } => write!(
                f,
                "Zone size {}x{} is outside {}..={}",
                width, height, MIN_ZONE_DIMENSION, MAX_ZONE_DIMENSION
            ),
            WorldError::UnknownZone(id) => write!(f, "Unknown zone: {}", id),
            WorldError::UnknownNpc(id) => write!(f, "Unknown NPC: {}", id),
            WorldError::UnknownTemplate(id) => write!(f, "Unknown enemy template: {}", id),
            WorldError::CellOutOfBounds { zone_id, x, y } => {
                write!(f, "Cell ({}, {}) is outside zone {}", x, y, zone_id)
            }
            WorldError::SameCell => write!(f, "Source and destination are the same cell"),
        }
    }
}

impl std::error::Error for WorldError {}
