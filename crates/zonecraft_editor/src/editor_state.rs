//! Editor state management
//!
//! [`EditorState`] owns the world being edited plus every piece of interaction state
//! (palette selection, brush, zone tool, transport linking). All edits go through its
//! methods so each one records an [`EditorChange`] and reports problems through
//! `status_message` (rejected edits) or `alert` (failed catalog round-trips).

use bevy::prelude::*;
use serde_json::Value;

use zonecraft_shared::document::{export_world, import_world};
use zonecraft_shared::{
    Dialog, DocumentError, EnemyTemplate, Facing, GridPoint, NpcService, Palette, PaletteCell,
    PaletteError, World, WorldError, ZoneCell,
};

use crate::config::EditorConfig;
use crate::events::EditorChange;
use crate::painting::{self, Brush};
use crate::selection::RegionSelector;
use crate::transport_links::{LinkOutcome, TransportLinkManager};

/// What a click on a zone cell does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoneTool {
    #[default]
    Tiles,
    Spawn,
    Enemies,
    Transports,
    Npcs,
}

impl ZoneTool {
    pub fn label(&self) -> &'static str {
        match self {
            ZoneTool::Tiles => "Tiles",
            ZoneTool::Spawn => "Spawn",
            ZoneTool::Enemies => "Enemies",
            ZoneTool::Transports => "Transports",
            ZoneTool::Npcs => "NPCs",
        }
    }

    pub fn all() -> &'static [ZoneTool] {
        &[
            ZoneTool::Tiles,
            ZoneTool::Spawn,
            ZoneTool::Enemies,
            ZoneTool::Transports,
            ZoneTool::Npcs,
        ]
    }
}

/// Primary (left) or alternate (right) click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    Primary,
    Alternate,
}

/// Global editor state resource
#[derive(Resource)]
pub struct EditorState {
    /// API base URL
    pub api_url: String,

    world: World,
    selector: RegionSelector,
    brush: Brush,
    links: TransportLinkManager,

    pub zone_tool: ZoneTool,
    pub active_zone: Option<String>,
    pub selected_template: Option<String>,
    pub selected_npc: Option<String>,

    /// Status message displayed in status bar
    pub status_message: String,
    /// Blocking notification, set when a catalog request fails
    pub alert: Option<String>,
    /// Whether the editor has unsaved changes
    pub has_unsaved_changes: bool,

    zone_size: (u32, u32),
    pending_changes: Vec<EditorChange>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl EditorState {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            api_url: config.api.base_url.clone(),
            world: World::new(Palette::new(config.palette.rows, config.palette.columns)),
            selector: RegionSelector::default(),
            brush: Brush::new(config.brush.size),
            links: TransportLinkManager::default(),
            zone_tool: ZoneTool::default(),
            active_zone: None,
            selected_template: None,
            selected_npc: None,
            status_message: "Ready".to_string(),
            alert: None,
            has_unsaved_changes: false,
            zone_size: (config.zone.width, config.zone.height),
            pending_changes: Vec::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn selector(&self) -> &RegionSelector {
        &self.selector
    }

    pub fn links(&self) -> &TransportLinkManager {
        &self.links
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    // ========================================================================
    // CHANGE TRACKING
    // ========================================================================

    fn record(&mut self, change: EditorChange) {
        if change.is_document_edit() {
            self.has_unsaved_changes = true;
        }
        if !self.pending_changes.contains(&change) {
            self.pending_changes.push(change);
        }
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending_changes.is_empty()
    }

    pub fn take_changes(&mut self) -> Vec<EditorChange> {
        std::mem::take(&mut self.pending_changes)
    }

    pub fn record_catalog_change(&mut self) {
        self.record(EditorChange::Catalog);
    }

    pub fn mark_saved(&mut self) {
        self.has_unsaved_changes = false;
    }

    fn reject(&mut self, error: impl std::fmt::Display) -> bool {
        self.status_message = error.to_string();
        false
    }

    /// Raise a blocking notification for a failed catalog request
    pub fn raise_alert(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!("{}", message);
        self.status_message = message.clone();
        self.alert = Some(message);
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    // ========================================================================
    // PALETTE
    // ========================================================================

    /// Layout may have been rebuilt: revalidate the selection and notify views
    fn palette_changed(&mut self, zones_repaired: usize) {
        self.record(EditorChange::Palette);
        if self.selector.revalidate(self.world.palette()) {
            self.record(EditorChange::PaletteSelection);
        }
        if zones_repaired > 0 {
            let zone_ids: Vec<String> = self.world.zones().iter().map(|z| z.id.clone()).collect();
            for zone_id in zone_ids {
                self.record(EditorChange::Zone(zone_id));
            }
        }
    }

    fn palette_result<T>(&mut self, result: Result<T, PaletteError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.reject(e);
                None
            }
        }
    }

    pub fn add_palette_tile(&mut self, cell: PaletteCell, sprite: Option<String>, walkable: bool) -> Option<String> {
        let result = self.world.add_palette_tile(cell, sprite, walkable);
        let tile_id = self.palette_result(result)?;
        self.status_message = format!("Added tile {}", tile_id);
        self.palette_changed(0);
        Some(tile_id)
    }

    pub fn update_palette_tile(&mut self, tile_id: &str, sprite: Option<String>, walkable: bool) -> bool {
        let result = self.world.update_palette_tile(tile_id, sprite, walkable);
        if self.palette_result(result).is_none() {
            return false;
        }
        self.palette_changed(0);
        true
    }

    pub fn set_tile_fill(&mut self, tile_id: &str, fill: &str) -> bool {
        let result = self.world.set_tile_fill(tile_id, fill);
        if self.palette_result(result).is_none() {
            return false;
        }
        self.palette_changed(0);
        true
    }

    pub fn remove_palette_tile(&mut self, tile_id: &str) -> bool {
        let result = self.world.remove_palette_tile(tile_id);
        let Some(repaired) = self.palette_result(result) else {
            return false;
        };
        self.status_message = format!("Removed tile {} ({} cells reset)", tile_id, repaired);
        self.palette_changed(repaired);
        true
    }

    pub fn set_palette_dimensions(&mut self, rows: u32, columns: u32) -> (u32, u32) {
        let (size, repaired) = self.world.set_palette_dimensions(rows, columns);
        if size != (rows, columns) {
            self.status_message = format!("Palette resized to {}x{}", size.0, size.1);
        }
        self.palette_changed(repaired);
        size
    }

    pub fn set_palette_info(&mut self, name: &str, description: &str) {
        self.world.set_palette_info(name, description);
        self.record(EditorChange::Palette);
    }

    pub fn replace_palette(&mut self, palette: Palette) {
        let repaired = self.world.replace_palette(palette);
        self.status_message = format!("Loaded palette {}", self.world.palette().name);
        self.palette_changed(repaired);
    }

    pub fn set_palette_id(&mut self, palette_id: Option<String>) {
        self.world.set_palette_id(palette_id);
        self.record(EditorChange::Palette);
    }

    // ========================================================================
    // PALETTE POINTER
    // ========================================================================

    pub fn palette_press(&mut self, cell: PaletteCell) -> bool {
        self.selector.press(self.world.palette(), cell)
    }

    pub fn palette_move(&mut self, cell: PaletteCell) {
        self.selector.move_to(self.world.palette(), cell);
    }

    pub fn palette_release(&mut self) {
        if self.selector.release(self.world.palette()) {
            self.record(EditorChange::PaletteSelection);
        }
    }

    pub fn palette_cancel(&mut self) {
        self.selector.cancel();
    }

    pub fn select_tile(&mut self, tile_id: &str) -> bool {
        let selected = self.selector.select_tile(self.world.palette(), tile_id);
        if selected {
            self.record(EditorChange::PaletteSelection);
        }
        selected
    }

    pub fn brush_size_enabled(&self) -> bool {
        self.selector.brush_size_enabled()
    }

    pub fn set_brush_size(&mut self, size: u32) -> u32 {
        self.brush.set_size(size)
    }

    // ========================================================================
    // ZONES
    // ========================================================================

    /// Create a zone (configured default size when none is given) and make it active
    pub fn create_zone(&mut self, name: &str, size: Option<(u32, u32)>) -> Option<String> {
        let (width, height) = size.unwrap_or(self.zone_size);
        match self.world.create_zone(name, width, height) {
            Ok(zone_id) => {
                self.status_message = format!("Created zone {}", zone_id);
                self.active_zone = Some(zone_id.clone());
                self.record(EditorChange::ZoneList);
                Some(zone_id)
            }
            Err(e) => {
                self.reject(e);
                None
            }
        }
    }

    pub fn rename_zone(&mut self, zone_id: &str, name: &str) -> bool {
        match self.world.rename_zone(zone_id, name) {
            Ok(()) => {
                self.record(EditorChange::ZoneList);
                true
            }
            Err(e) => self.reject(e),
        }
    }

    pub fn resize_zone(&mut self, zone_id: &str, width: u32, height: u32) -> bool {
        match self.world.resize_zone(zone_id, width, height) {
            Ok(()) => {
                self.record(EditorChange::ZoneList);
                self.record(EditorChange::Zone(zone_id.to_string()));
                self.record(EditorChange::Npcs);
                true
            }
            Err(e) => self.reject(e),
        }
    }

    pub fn delete_zone(&mut self, zone_id: &str) -> bool {
        if let Err(e) = self.world.delete_zone(zone_id) {
            return self.reject(e);
        }
        self.links.on_zone_deleted(zone_id);
        if self.active_zone.as_deref() == Some(zone_id) {
            self.active_zone = self.world.zones().first().map(|z| z.id.clone());
        }
        let dangling = self.world.dangling_transports().len();
        self.status_message = if dangling > 0 {
            format!("Deleted zone {} ({} transports now point nowhere)", zone_id, dangling)
        } else {
            format!("Deleted zone {}", zone_id)
        };
        self.record(EditorChange::ZoneList);
        self.record(EditorChange::Transports);
        self.record(EditorChange::Npcs);
        true
    }

    pub fn select_zone(&mut self, zone_id: &str) -> bool {
        if self.world.zone(zone_id).is_none() {
            return self.reject(WorldError::UnknownZone(zone_id.to_string()));
        }
        self.active_zone = Some(zone_id.to_string());
        true
    }

    // ========================================================================
    // ZONE CLICKS
    // ========================================================================

    /// Dispatch a click on a cell of the active zone to the active tool.
    /// Returns false when the edit was rejected (see `status_message`).
    pub fn click_zone_cell(&mut self, x: u32, y: u32, action: ClickAction) -> bool {
        let Some(zone_id) = self.active_zone.clone() else {
            return self.reject("No zone selected");
        };

        match (self.zone_tool, action) {
            (ZoneTool::Tiles, ClickAction::Primary) => self.paint(&zone_id, x, y),
            (ZoneTool::Tiles, ClickAction::Alternate) => self.erase(&zone_id, x, y),
            (ZoneTool::Spawn, ClickAction::Primary) => {
                self.set_spawn(&zone_id, Some(GridPoint::new(x, y)))
            }
            (ZoneTool::Spawn, ClickAction::Alternate) => self.set_spawn(&zone_id, None),
            (ZoneTool::Enemies, ClickAction::Primary) => self.place_enemy(&zone_id, x, y),
            (ZoneTool::Enemies, ClickAction::Alternate) => self.remove_enemy(&zone_id, x, y),
            (ZoneTool::Transports, ClickAction::Primary) => {
                self.select_transport_cell(ZoneCell::new(zone_id, x, y))
            }
            (ZoneTool::Transports, ClickAction::Alternate) => self.remove_transport(&zone_id, x, y),
            (ZoneTool::Npcs, ClickAction::Primary) => self.place_selected_npc(&zone_id, x, y),
            (ZoneTool::Npcs, ClickAction::Alternate) => self.unplace_npc_at(&zone_id, x, y),
        }
    }

    fn paint(&mut self, zone_id: &str, x: u32, y: u32) -> bool {
        let result = painting::apply_brush(
            &mut self.world,
            self.selector.selection(),
            self.brush,
            zone_id,
            x,
            y,
        );
        match result {
            Ok(_) => {
                self.record(EditorChange::Zone(zone_id.to_string()));
                true
            }
            Err(e) => self.reject(e),
        }
    }

    fn erase(&mut self, zone_id: &str, x: u32, y: u32) -> bool {
        match painting::erase(&mut self.world, zone_id, x, y) {
            Ok(_) => {
                self.record(EditorChange::Zone(zone_id.to_string()));
                true
            }
            Err(e) => self.reject(e),
        }
    }

    fn set_spawn(&mut self, zone_id: &str, spawn: Option<GridPoint>) -> bool {
        match self.world.set_spawn(zone_id, spawn) {
            Ok(()) => {
                self.record(EditorChange::Zone(zone_id.to_string()));
                true
            }
            Err(e) => self.reject(e),
        }
    }

    fn place_enemy(&mut self, zone_id: &str, x: u32, y: u32) -> bool {
        let Some(template_id) = self.selected_template.clone() else {
            return self.reject("No enemy template selected");
        };
        match self.world.place_enemy(zone_id, x, y, &template_id) {
            Ok(_) => {
                self.record(EditorChange::Zone(zone_id.to_string()));
                true
            }
            Err(e) => self.reject(e),
        }
    }

    fn remove_enemy(&mut self, zone_id: &str, x: u32, y: u32) -> bool {
        match self.world.remove_enemy(zone_id, x, y) {
            Ok(Some(_)) => {
                self.record(EditorChange::Zone(zone_id.to_string()));
                true
            }
            Ok(None) => false,
            Err(e) => self.reject(e),
        }
    }

    // ========================================================================
    // TRANSPORTS
    // ========================================================================

    fn select_transport_cell(&mut self, cell: ZoneCell) -> bool {
        match self.links.select_cell(&mut self.world, cell) {
            Ok(LinkOutcome::SourceSelected { existing }) => {
                self.status_message = match existing {
                    Some(edge) => format!("Editing transport to {}", edge.to_zone_id),
                    None => "Select a destination cell".to_string(),
                };
                true
            }
            Ok(LinkOutcome::Linked(edge)) => {
                self.status_message = format!("Linked transport to {}", edge.to_zone_id);
                self.record(EditorChange::Transports);
                true
            }
            Err(e) => self.reject(e),
        }
    }

    pub fn set_transport_two_way(&mut self, two_way: bool) {
        self.links.set_two_way(two_way);
    }

    /// Re-save the transport being edited
    pub fn save_transport(&mut self) -> bool {
        match self.links.save(&mut self.world) {
            Ok(_) => {
                self.record(EditorChange::Transports);
                true
            }
            Err(e) => self.reject(e),
        }
    }

    pub fn cancel_transport(&mut self) {
        self.links.cancel();
    }

    pub fn remove_transport(&mut self, zone_id: &str, x: u32, y: u32) -> bool {
        match self.world.remove_transport(zone_id, x, y) {
            Ok(Some(_)) => {
                self.links.on_transport_deleted(&ZoneCell::new(zone_id, x, y));
                self.record(EditorChange::Transports);
                true
            }
            Ok(None) => false,
            Err(e) => self.reject(e),
        }
    }

    // ========================================================================
    // ENEMY TEMPLATES
    // ========================================================================

    pub fn create_enemy_template(&mut self, name: &str) -> String {
        let template_id = self.world.create_enemy_template(name);
        self.selected_template = Some(template_id.clone());
        self.record(EditorChange::EnemyTemplates);
        template_id
    }

    pub fn upsert_enemy_template(&mut self, template: EnemyTemplate) {
        self.world.upsert_enemy_template(template);
        self.record(EditorChange::EnemyTemplates);
    }

    /// Placements of a deleted template stay and render as unknown
    pub fn delete_enemy_template(&mut self, template_id: &str) -> bool {
        if let Err(e) = self.world.delete_enemy_template(template_id) {
            return self.reject(e);
        }
        if self.selected_template.as_deref() == Some(template_id) {
            self.selected_template = None;
        }
        self.record(EditorChange::EnemyTemplates);
        true
    }

    // ========================================================================
    // NPCS
    // ========================================================================

    pub fn create_npc(&mut self, name: &str) -> String {
        let npc_id = self.world.create_npc(name);
        self.selected_npc = Some(npc_id.clone());
        self.record(EditorChange::Npcs);
        npc_id
    }

    pub fn update_npc(&mut self, npc_id: &str, name: &str, sprite: Option<String>, facing: Facing) -> bool {
        match self.world.update_npc(npc_id, name, sprite, facing) {
            Ok(()) => {
                self.record(EditorChange::Npcs);
                true
            }
            Err(e) => self.reject(e),
        }
    }

    pub fn set_npc_dialog(&mut self, npc_id: &str, dialog: Dialog) -> bool {
        match self.world.set_npc_dialog(npc_id, dialog) {
            Ok(()) => {
                self.record(EditorChange::Npcs);
                true
            }
            Err(e) => self.reject(e),
        }
    }

    pub fn set_npc_service(&mut self, npc_id: &str, service: Option<NpcService>) -> bool {
        match self.world.set_npc_service(npc_id, service) {
            Ok(()) => {
                self.record(EditorChange::Npcs);
                true
            }
            Err(e) => self.reject(e),
        }
    }

    fn place_selected_npc(&mut self, zone_id: &str, x: u32, y: u32) -> bool {
        let Some(npc_id) = self.selected_npc.clone() else {
            return self.reject("No NPC selected");
        };
        match self.world.place_npc(&npc_id, zone_id, x, y) {
            Ok(displaced) => {
                if let Some(other) = displaced {
                    self.status_message = format!("{} replaced {} at ({}, {})", npc_id, other, x, y);
                }
                self.record(EditorChange::Npcs);
                true
            }
            Err(e) => self.reject(e),
        }
    }

    fn unplace_npc_at(&mut self, zone_id: &str, x: u32, y: u32) -> bool {
        match self.world.unplace_npc_at(zone_id, x, y) {
            Some(_) => {
                self.record(EditorChange::Npcs);
                true
            }
            None => false,
        }
    }

    pub fn delete_npc(&mut self, npc_id: &str) -> bool {
        if let Err(e) = self.world.delete_npc(npc_id) {
            return self.reject(e);
        }
        if self.selected_npc.as_deref() == Some(npc_id) {
            self.selected_npc = None;
        }
        self.record(EditorChange::Npcs);
        true
    }

    // ========================================================================
    // DOCUMENT
    // ========================================================================

    /// Replace the world with an imported document. A malformed document leaves
    /// the current world untouched.
    pub fn import_document(&mut self, document: &Value) -> Result<(), DocumentError> {
        let world = import_world(document)?;
        self.world = world;
        self.selector.clear();
        self.links.cancel();
        self.active_zone = self.world.zones().first().map(|z| z.id.clone());
        self.selected_template = None;
        self.selected_npc = None;
        self.status_message = format!("Imported {} zones", self.world.zones().len());
        self.record(EditorChange::World);
        self.has_unsaved_changes = false;
        Ok(())
    }

    pub fn export_document(&self) -> Result<Value, DocumentError> {
        export_world(&self.world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use zonecraft_shared::{Region, TileDefinition};

    fn editor() -> EditorState {
        let mut state = EditorState::default();
        state.replace_palette(Palette::from_tiles(
            2,
            2,
            vec![TileDefinition::new("0", 0, 0), TileDefinition::new("1", 0, 1)],
        ));
        state.create_zone("Town", Some((5, 5)));
        state.take_changes();
        state
    }

    #[test]
    fn test_paint_without_selection_sets_status() {
        let mut state = editor();
        assert!(!state.click_zone_cell(1, 1, ClickAction::Primary));
        assert_eq!(state.status_message, "No tile selected");
        assert!(!state.has_pending_changes());
    }

    #[test]
    fn test_paint_and_erase_through_tool() {
        let mut state = editor();
        assert!(state.palette_press(PaletteCell::new(0, 1)));
        state.palette_release();
        state.set_brush_size(3);

        assert!(state.click_zone_cell(2, 2, ClickAction::Primary));
        assert!(state.click_zone_cell(2, 2, ClickAction::Alternate));

        let zone = state.world().zone("town").unwrap();
        assert_eq!(zone.tile(2, 2), Some("0"));
        assert_eq!(zone.tile(1, 1), Some("1"));
        assert_eq!(
            state.take_changes(),
            vec![EditorChange::PaletteSelection, EditorChange::Zone("town".to_string())]
        );
        assert!(state.has_unsaved_changes);
    }

    #[test]
    fn test_removing_selected_tile_clears_selection() {
        let mut state = editor();
        state.select_tile("1");
        assert!(state.remove_palette_tile("1"));
        assert!(state.selector().selected_tile_id().is_none());
        assert!(state.take_changes().contains(&EditorChange::PaletteSelection));
    }

    #[test]
    fn test_transport_tool_links_cells() {
        let mut state = editor();
        state.create_zone("Cave", Some((3, 3)));
        state.active_zone = Some("town".to_string());
        state.zone_tool = ZoneTool::Transports;
        state.set_transport_two_way(true);

        assert!(state.click_zone_cell(0, 0, ClickAction::Primary));
        state.active_zone = Some("cave".to_string());
        assert!(state.click_zone_cell(2, 2, ClickAction::Primary));
        assert!(state.world().transport_at("cave", 2, 2).is_some());

        state.active_zone = Some("town".to_string());
        assert!(state.click_zone_cell(0, 0, ClickAction::Alternate));
        assert!(state.world().transport_at("town", 0, 0).is_none());
        assert!(state.world().transport_at("cave", 2, 2).is_none());
    }

    #[test]
    fn test_deleting_zone_resets_link_selection() {
        let mut state = editor();
        state.create_zone("Cave", Some((3, 3)));
        state.zone_tool = ZoneTool::Transports;
        state.click_zone_cell(1, 1, ClickAction::Primary);
        assert!(state.links().source().is_some());

        assert!(state.delete_zone("cave"));
        assert!(state.links().source().is_none());
        assert_eq!(state.active_zone.as_deref(), Some("town"));
    }

    #[test]
    fn test_enemy_and_npc_tools() {
        let mut state = editor();
        state.zone_tool = ZoneTool::Enemies;
        assert!(!state.click_zone_cell(0, 0, ClickAction::Primary));

        state.create_enemy_template("Slime");
        assert!(state.click_zone_cell(0, 0, ClickAction::Primary));
        assert!(state.delete_enemy_template("slime"));
        let world = state.world();
        assert_eq!(world.zone("town").unwrap().enemy_placements().len(), 1);
        assert_eq!(world.template_label("slime"), "unknown");

        state.zone_tool = ZoneTool::Npcs;
        let bob = state.create_npc("Bob");
        assert!(state.click_zone_cell(3, 4, ClickAction::Primary));
        assert_eq!(state.world().npc(&bob).unwrap().location_label(), "town (3, 4)");
        assert!(state.click_zone_cell(3, 4, ClickAction::Alternate));
        assert_eq!(state.world().npc(&bob).unwrap().location_label(), "Unplaced");
    }

    #[test]
    fn test_bad_import_keeps_world() {
        let mut state = editor();
        let before = state.world().clone();

        assert_eq!(state.import_document(&json!([])), Err(DocumentError::EmptyArray));
        assert_eq!(*state.world(), before);

        state
            .import_document(&json!({ "tiles": [["0", "1"], ["1", "0"]], "spawn": { "x": 1, "y": 0 } }))
            .unwrap();
        assert_eq!(state.world().zones().len(), 1);
        assert_eq!(state.active_zone, Some(state.world().zones()[0].id.clone()));
        assert!(!state.has_unsaved_changes);
    }

    #[test]
    fn test_shrinking_palette_narrows_pattern_selection() {
        let mut state = editor();
        state.replace_palette(Palette::from_tiles(
            4,
            4,
            vec![TileDefinition::new("0", 0, 0), TileDefinition::new("1", 0, 1)],
        ));
        assert!(state.palette_press(PaletteCell::new(0, 0)));
        state.palette_move(PaletteCell::new(3, 3));
        state.palette_release();
        assert_eq!(state.selector().selection().region(), Some(Region::new(0, 3, 0, 3)));
        state.take_changes();

        assert_eq!(state.set_palette_dimensions(1, 1), (1, 2));
        assert_eq!(state.status_message, "Palette resized to 1x2");
        assert_eq!(state.selector().selection().region(), Some(Region::new(0, 0, 0, 1)));
        assert!(!state.brush_size_enabled());

        let changes = state.take_changes();
        assert!(changes.contains(&EditorChange::Palette));
        assert!(changes.contains(&EditorChange::PaletteSelection));
        assert!(!changes.contains(&EditorChange::Zone("town".to_string())));
    }

    #[test]
    fn test_palette_resize_with_stray_zone_tiles_records_zone() {
        let mut state = editor();
        state.world.paint_square("town", 0, 0, 1, "ghost").unwrap();
        state.take_changes();

        state.set_palette_dimensions(3, 3);
        let changes = state.take_changes();
        assert!(changes.contains(&EditorChange::Zone("town".to_string())));
        assert_eq!(state.world().zone("town").unwrap().tile(0, 0), Some("0"));
    }

    #[test]
    fn test_alert() {
        let mut state = EditorState::default();
        state.raise_alert("Failed to save palette: offline");
        assert_eq!(state.alert.as_deref(), Some("Failed to save palette: offline"));
        state.dismiss_alert();
        assert!(state.alert.is_none());
    }
}
