//! Lenient world document import.
//!
//! Bad fragments are repaired or dropped one by one; only a document that isn't an
//! object (or a non-empty array of them) aborts the import.

use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use super::fields::{
    as_bool, as_f64, as_i64, as_id, as_point, as_text, as_u32, clamp_to_grid, field, in_grid,
};
use super::DocumentError;
use crate::constants::{
    DEFAULT_PALETTE_COLUMNS, DEFAULT_PALETTE_NAME, DEFAULT_PALETTE_ROWS, DEFAULT_TILE_FILL,
    MAX_PALETTE_DIMENSION, MAX_ZONE_DIMENSION, MIN_PALETTE_DIMENSION, MIN_ZONE_DIMENSION,
};
use crate::enemy::EnemyTemplate;
use crate::ids::{dedupe_id, slugify};
use crate::npc::{Dialog, Facing, Npc, NpcPlacement, NpcService};
use crate::palette::Palette;
use crate::tile::{TileDefinition, TileId};
use crate::world::World;
use crate::zone::{EnemyPlacement, GridPoint, Transport, Zone};

/// Parse JSON text and import it
pub fn import_str(text: &str) -> Result<World, DocumentError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DocumentError::Parse(e.to_string()))?;
    import_world(&value)
}

/// Import a world document (or the first of an array of them)
pub fn import_world(document: &Value) -> Result<World, DocumentError> {
    let root = root_object(document)?;

    let drafts = read_zone_drafts(root);
    let referenced = referenced_tile_ids(&drafts);
    let palette = read_palette(root, &referenced);

    let zone_sizes: HashMap<&str, (u32, u32)> = drafts
        .iter()
        .map(|d| (d.id.as_str(), (d.width, d.height)))
        .collect();
    let zones: Vec<Zone> = drafts
        .iter()
        .map(|draft| build_zone(draft, &palette, &zone_sizes))
        .collect();

    let templates = read_enemy_templates(root);
    let npcs = read_npcs(root, &zones);

    info!(
        "Imported world: {} palette tiles, {} zones, {} enemy templates, {} NPCs",
        palette.tiles().len(),
        zones.len(),
        templates.len(),
        npcs.len()
    );
    Ok(World::from_parts(palette, zones, templates, npcs))
}

fn root_object(document: &Value) -> Result<&Map<String, Value>, DocumentError> {
    let root = match document {
        Value::Array(items) => {
            let first = items.first().ok_or(DocumentError::EmptyArray)?;
            if items.len() > 1 {
                warn!(
                    "Document array holds {} worlds, importing the first",
                    items.len()
                );
            }
            first
        }
        other => other,
    };
    root.as_object().ok_or(DocumentError::NotAnObject)
}

fn slug_or(name: Option<&str>, fallback: &str) -> String {
    let slug = slugify(name.unwrap_or_default());
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}

fn non_negative(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

// ============================================================================
// ZONES
// ============================================================================

struct ZoneDraft<'a> {
    id: String,
    name: String,
    width: u32,
    height: u32,
    grid: Vec<Vec<Option<TileId>>>,
    source: &'a Map<String, Value>,
}

fn read_grid(value: Option<&Value>) -> Vec<Vec<Option<TileId>>> {
    let Some(rows) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    rows.iter()
        .map(|row| match row.as_array() {
            Some(cells) => cells.iter().map(as_id).collect(),
            None => Vec::new(),
        })
        .collect()
}

fn read_zone_drafts(root: &Map<String, Value>) -> Vec<ZoneDraft<'_>> {
    let sources: Vec<&Map<String, Value>> = match root.get("zones").and_then(Value::as_array) {
        Some(zones) => zones
            .iter()
            .filter_map(|zone| {
                let object = zone.as_object();
                if object.is_none() {
                    warn!("Skipping zone entry that is not an object");
                }
                object
            })
            .collect(),
        None if root.get("tiles").is_some_and(Value::is_array) => {
            debug!("No zones array, reading the root tile grid as a single zone");
            vec![root]
        }
        None => Vec::new(),
    };

    let mut taken: HashSet<String> = HashSet::new();
    let mut drafts = Vec::with_capacity(sources.len());

    for (index, source) in sources.into_iter().enumerate() {
        let grid = read_grid(source.get("tiles"));
        let width = field(source, &["width"])
            .and_then(as_u32)
            .unwrap_or_else(|| grid.iter().map(Vec::len).max().unwrap_or(0) as u32)
            .min(MAX_ZONE_DIMENSION);
        let height = field(source, &["height"])
            .and_then(as_u32)
            .unwrap_or(grid.len() as u32)
            .min(MAX_ZONE_DIMENSION);
        if width < MIN_ZONE_DIMENSION || height < MIN_ZONE_DIMENSION {
            warn!("Skipping zone #{} without a usable size", index);
            continue;
        }

        let name = field(source, &["name"]).and_then(as_text);
        let raw_id = field(source, &["id"])
            .and_then(as_id)
            .unwrap_or_else(|| slug_or(name, "zone"));
        let id = dedupe_id(&raw_id, |candidate| taken.contains(candidate));
        if id != raw_id {
            debug!("Renamed duplicate zone id {} to {}", raw_id, id);
        }
        taken.insert(id.clone());

        drafts.push(ZoneDraft {
            name: name.map(str::to_string).unwrap_or_else(|| id.clone()),
            id,
            width,
            height,
            grid,
            source,
        });
    }
    drafts
}

/// Tile ids used by the visible part of every zone grid, in first-seen order
fn referenced_tile_ids(drafts: &[ZoneDraft]) -> Vec<TileId> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for draft in drafts {
        for row in draft.grid.iter().take(draft.height as usize) {
            for id in row.iter().take(draft.width as usize).flatten() {
                if seen.insert(id.as_str()) {
                    ids.push(id.clone());
                }
            }
        }
    }
    ids
}

fn build_zone(draft: &ZoneDraft, palette: &Palette, zone_sizes: &HashMap<&str, (u32, u32)>) -> Zone {
    let default_tile = palette.default_tile_id();
    let mut zone = Zone::new(
        draft.id.clone(),
        draft.name.clone(),
        draft.width,
        draft.height,
        &default_tile,
    );

    for (y, row) in draft.grid.iter().take(draft.height as usize).enumerate() {
        for (x, cell) in row.iter().take(draft.width as usize).enumerate() {
            match cell {
                Some(id) if palette.contains(id) => {
                    zone.set_tile(x as u32, y as u32, id);
                }
                Some(id) => debug!("Zone {} cell ({}, {}): unknown tile {}", draft.id, x, y, id),
                None => {}
            }
        }
    }

    let source = draft.source;
    for entry in field(source, &["transports"]).and_then(Value::as_array).into_iter().flatten() {
        match read_transport(entry, draft, zone_sizes) {
            Some(transport) => {
                zone.set_transport(transport);
            }
            None => warn!("Dropping transport in zone {}: bad or out-of-bounds endpoint", draft.id),
        }
    }

    let placements = field(source, &["enemyPlacements", "enemies"]).and_then(Value::as_array);
    for entry in placements.into_iter().flatten() {
        match read_enemy_placement(entry, draft) {
            Some(placement) => {
                zone.place_enemy(placement);
            }
            None => warn!("Dropping enemy placement in zone {}", draft.id),
        }
    }

    if let Some(point) = field(source, &["spawn"]).and_then(as_point) {
        let (x, y) = clamp_to_grid(point, draft.width, draft.height);
        zone.set_spawn(Some(GridPoint::new(x, y)));
    }

    zone
}

fn read_transport(
    entry: &Value,
    draft: &ZoneDraft,
    zone_sizes: &HashMap<&str, (u32, u32)>,
) -> Option<Transport> {
    let object = entry.as_object()?;
    let (from_x, from_y) = object
        .get("from")
        .and_then(as_point)
        .and_then(|p| in_grid(p, draft.width, draft.height))?;
    let to_zone_id = field(object, &["toZoneId", "zoneId"]).and_then(as_id)?;
    let to = object.get("to").and_then(as_point)?;

    let (to_x, to_y) = match zone_sizes.get(to_zone_id.as_str()) {
        Some(&(width, height)) => clamp_to_grid(to, width, height),
        None => {
            debug!(
                "Transport in zone {} points at missing zone {}",
                draft.id, to_zone_id
            );
            (non_negative(to.0), non_negative(to.1))
        }
    };

    if to_zone_id == draft.id && (to_x, to_y) == (from_x, from_y) {
        debug!(
            "Dropping transport in zone {} that leads back to ({}, {})",
            draft.id, from_x, from_y
        );
        return None;
    }

    Some(Transport {
        from: GridPoint::new(from_x, from_y),
        to_zone_id,
        to: GridPoint::new(to_x, to_y),
    })
}

fn read_enemy_placement(entry: &Value, draft: &ZoneDraft) -> Option<EnemyPlacement> {
    let object = entry.as_object()?;
    let x = field(object, &["x"]).and_then(as_i64)?;
    let y = field(object, &["y"]).and_then(as_i64)?;
    let (x, y) = in_grid((x, y), draft.width, draft.height)?;
    let template_id = field(object, &["templateId", "template"]).and_then(as_id)?;
    Some(EnemyPlacement { x, y, template_id })
}

// ============================================================================
// PALETTE
// ============================================================================

#[derive(Default)]
struct TileDraft {
    id: TileId,
    fill: Option<String>,
    sprite: Option<String>,
    walkable: Option<bool>,
    position: Option<(u32, u32)>,
}

impl TileDraft {
    fn merge_fields(&mut self, object: &Map<String, Value>) {
        if let Some(fill) = field(object, &["fill", "color"]).and_then(Value::as_str) {
            self.fill = Some(fill.to_string());
        }
        if let Some(sprite) = field(object, &["sprite"]).and_then(as_text) {
            self.sprite = Some(sprite.to_string());
        }
        if let Some(walkable) = field(object, &["walkable"]).and_then(as_bool) {
            self.walkable = Some(walkable);
        }
    }
}

/// Collects tile facts from every palette source before a single rebuild
#[derive(Default)]
struct PaletteDraft {
    tiles: Vec<TileDraft>,
    index: HashMap<TileId, usize>,
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    rows: Option<u32>,
    columns: Option<u32>,
    matrix_shape: Option<(u32, u32)>,
}

impl PaletteDraft {
    fn entry(&mut self, id: TileId) -> &mut TileDraft {
        let index = match self.index.get(&id) {
            Some(&index) => index,
            None => {
                self.index.insert(id.clone(), self.tiles.len());
                self.tiles.push(TileDraft {
                    id,
                    ..Default::default()
                });
                self.tiles.len() - 1
            }
        };
        &mut self.tiles[index]
    }

    fn read_info(&mut self, object: &Map<String, Value>) {
        if let Some(id) = field(object, &["id"]).and_then(as_id) {
            self.id = Some(id);
        }
        if let Some(name) = field(object, &["name"]).and_then(as_text) {
            self.name = Some(name.to_string());
        }
        if let Some(description) = field(object, &["description"]).and_then(Value::as_str) {
            self.description = Some(description.to_string());
        }
        if let Some(rows) = field(object, &["rows"]).and_then(as_u32) {
            self.rows = Some(rows);
        }
        if let Some(columns) = field(object, &["columns", "cols"]).and_then(as_u32) {
            self.columns = Some(columns);
        }
    }

    /// `[{tileId, row, column, ...}]`; the first stated position wins
    fn read_tile_list(&mut self, list: &[Value]) {
        for entry in list {
            let Some(object) = entry.as_object() else {
                warn!("Skipping palette tile that is not an object");
                continue;
            };
            let Some(id) = field(object, &["tileId", "id"]).and_then(as_id) else {
                warn!("Skipping palette tile without an id");
                continue;
            };
            let row = field(object, &["row"]).and_then(as_u32);
            let column = field(object, &["column", "col"]).and_then(as_u32);

            let tile = self.entry(id);
            tile.merge_fields(object);
            if tile.position.is_none() {
                tile.position = row.zip(column);
            }
        }
    }

    /// `{tileId: color}` or `{tileId: {fill, sprite, walkable}}`
    fn read_tile_map(&mut self, map: &Map<String, Value>) {
        for (key, value) in map {
            let id = key.trim();
            if id.is_empty() {
                continue;
            }
            match value {
                Value::String(color) => {
                    self.entry(id.to_string()).fill = Some(color.clone());
                }
                Value::Object(object) => self.entry(id.to_string()).merge_fields(object),
                _ => warn!("Skipping palette entry {} with unusable value", id),
            }
        }
    }

    /// Row/column matrix of tile ids; positions only for tiles that have none yet
    fn read_matrix(&mut self, rows: &[Value]) {
        let mut width = 0;
        for (row_index, row) in rows.iter().enumerate() {
            let Some(cells) = row.as_array() else {
                continue;
            };
            width = width.max(cells.len());
            for (column_index, cell) in cells.iter().enumerate() {
                if let Some(id) = as_id(cell) {
                    let tile = self.entry(id);
                    if tile.position.is_none() {
                        tile.position = Some((row_index as u32, column_index as u32));
                    }
                }
            }
        }
        self.matrix_shape = Some((rows.len() as u32, width as u32));
    }

    fn add_referenced(&mut self, ids: &[TileId]) {
        for id in ids {
            if !self.index.contains_key(id) {
                debug!("Adding palette tile {} referenced by a zone", id);
                self.entry(id.clone());
            }
        }
    }

    fn build(self) -> Palette {
        let count = self.tiles.len() as u32;
        let (square_rows, square_columns) = near_square(count);
        let (mut rows, mut columns) = match self.matrix_shape {
            Some((r, c)) => (self.rows.unwrap_or(r), self.columns.unwrap_or(c)),
            None => (
                self.rows.unwrap_or(square_rows),
                self.columns.unwrap_or(square_columns),
            ),
        };

        for (row, column) in self.tiles.iter().filter_map(|t| t.position) {
            rows = rows.max(row.saturating_add(1));
            columns = columns.max(column.saturating_add(1));
        }
        rows = rows.clamp(MIN_PALETTE_DIMENSION, MAX_PALETTE_DIMENSION);
        columns = columns.clamp(MIN_PALETTE_DIMENSION, MAX_PALETTE_DIMENSION);
        while rows * columns < count && rows < MAX_PALETTE_DIMENSION {
            rows += 1;
        }
        while rows * columns < count && columns < MAX_PALETTE_DIMENSION {
            columns += 1;
        }

        let tiles = self
            .tiles
            .into_iter()
            .map(|draft| {
                // Unpositioned tiles start out of bounds so the rebuild fills them in row-major order
                let (row, column) = draft.position.unwrap_or((u32::MAX, u32::MAX));
                TileDefinition::new(draft.id, row, column)
                    .with_fill(draft.fill.as_deref().unwrap_or(DEFAULT_TILE_FILL))
                    .with_sprite(draft.sprite)
                    .with_walkable(draft.walkable.unwrap_or(true))
            })
            .collect();

        let mut palette = Palette::from_tiles(rows, columns, tiles);
        palette.id = self.id;
        palette.name = self
            .name
            .unwrap_or_else(|| DEFAULT_PALETTE_NAME.to_string());
        palette.description = self.description.unwrap_or_default();
        palette
    }
}

/// Smallest roughly square grid holding `count` tiles
fn near_square(count: u32) -> (u32, u32) {
    if count == 0 {
        return (DEFAULT_PALETTE_ROWS, DEFAULT_PALETTE_COLUMNS);
    }
    let mut columns = 1;
    while columns * columns < count {
        columns += 1;
    }
    (count.div_ceil(columns), columns)
}

fn read_palette(root: &Map<String, Value>, referenced: &[TileId]) -> Palette {
    let mut draft = PaletteDraft::default();

    let palette_object = root.get("palette").and_then(Value::as_object);
    // A full palette record stored under "palette" instead of a color map
    let palette_record =
        palette_object.filter(|object| object.get("tiles").is_some_and(Value::is_array));
    let color_map = palette_object.filter(|_| palette_record.is_none());

    let layout = field(root, &["paletteLayout", "layout"]);
    let layout_object = layout.and_then(Value::as_object);

    for object in palette_record.into_iter().chain(layout_object) {
        draft.read_info(object);
        if let Some(list) = object.get("tiles").and_then(Value::as_array) {
            draft.read_tile_list(list);
        }
    }
    if let Some(map) = color_map {
        draft.read_tile_map(map);
    }

    let matrix = match layout {
        Some(Value::Array(rows)) => Some(rows),
        Some(Value::Object(object)) => object.get("layout").and_then(Value::as_array),
        _ => palette_record.and_then(|object| object.get("layout").and_then(Value::as_array)),
    };
    if let Some(rows) = matrix {
        draft.read_matrix(rows);
    }

    if let Some(config) = root.get("tileConfig").and_then(Value::as_object) {
        draft.read_tile_map(config);
    }
    draft.add_referenced(referenced);
    draft.build()
}

/// Read a palette record (catalog response shape)
pub fn parse_palette(value: &Value) -> Option<Palette> {
    let object = value.as_object()?;
    let mut draft = PaletteDraft::default();
    draft.read_info(object);
    if let Some(list) = object.get("tiles").and_then(Value::as_array) {
        draft.read_tile_list(list);
    }
    if let Some(rows) = object.get("layout").and_then(Value::as_array) {
        draft.read_matrix(rows);
    }
    Some(draft.build())
}

// ============================================================================
// ENEMY TEMPLATES
// ============================================================================

/// Read one enemy template. `None` for non-objects and entries without an id.
pub fn parse_enemy_template(value: &Value) -> Option<EnemyTemplate> {
    let object = value.as_object()?;
    let id = field(object, &["id"]).and_then(as_id)?;
    let name = field(object, &["name"])
        .and_then(as_text)
        .map(str::to_string)
        .unwrap_or_else(|| id.clone());
    let mut template = EnemyTemplate::new(id, name);

    if let Some(basic_type) = field(object, &["basicType", "type"]).and_then(as_text) {
        template.basic_type = basic_type.to_string();
    }
    if let Some(level) = field(object, &["level"]).and_then(as_u32) {
        template.level = level;
    }
    if let Some(attributes) = field(object, &["attributes"]).and_then(Value::as_object) {
        let stats = &mut template.attributes;
        stats.strength = read_attribute(attributes, &["STR", "str", "strength"], stats.strength);
        stats.stamina = read_attribute(attributes, &["STA", "sta", "stamina"], stats.stamina);
        stats.agility = read_attribute(attributes, &["AGI", "agi", "agility"], stats.agility);
        stats.intellect = read_attribute(attributes, &["INT", "int", "intellect"], stats.intellect);
        stats.wisdom = read_attribute(attributes, &["WIS", "wis", "wisdom"], stats.wisdom);
    }
    if let Some(rotation) = field(object, &["rotation"]).and_then(Value::as_array) {
        template.rotation = rotation.iter().filter_map(as_id).collect();
    }
    if let Some(equipment) = field(object, &["equipment"]).and_then(Value::as_object) {
        template.equipment = equipment
            .iter()
            .filter_map(|(slot, item)| as_id(item).map(|item| (slot.clone(), item)))
            .collect();
    }
    if let Some(xp_pct) = field(object, &["xpPct", "xp_pct"]).and_then(as_u32) {
        template.xp_pct = xp_pct;
    }
    if let Some(gold) = field(object, &["gold"]).and_then(as_u32) {
        template.gold = gold;
    }
    if let Some(chance) = field(object, &["spawnChance", "spawn_chance"]).and_then(as_f64) {
        template.spawn_chance = chance;
    }
    template.sprite = field(object, &["sprite"]).and_then(as_text).map(str::to_string);

    template.normalize();
    Some(template)
}

fn read_attribute(attributes: &Map<String, Value>, keys: &[&str], current: i32) -> i32 {
    field(attributes, keys)
        .and_then(as_i64)
        .map(|v| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
        .unwrap_or(current)
}

fn read_enemy_templates(root: &Map<String, Value>) -> Vec<EnemyTemplate> {
    let mut templates: Vec<EnemyTemplate> = Vec::new();
    let entries = field(root, &["enemyTemplates"]).and_then(Value::as_array);
    for entry in entries.into_iter().flatten() {
        let Some(template) = parse_enemy_template(entry) else {
            warn!("Skipping malformed enemy template");
            continue;
        };
        if templates.iter().any(|t| t.id == template.id) {
            warn!("Skipping duplicate enemy template {}", template.id);
            continue;
        }
        templates.push(template);
    }
    templates
}

// ============================================================================
// NPCS
// ============================================================================

fn parse_dialog_entries(items: &[Value]) -> Vec<Vec<String>> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::Array(lines) => {
                let lines: Vec<String> = lines
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect();
                (!lines.is_empty()).then_some(lines)
            }
            Value::String(line) => Some(vec![line.clone()]),
            _ => None,
        })
        .collect()
}

/// Accepts `{entries, loopTo}`, an array of line groups, or an array of lines
fn parse_dialog(value: &Value) -> Dialog {
    match value {
        Value::Object(object) => {
            let entries = field(object, &["entries"])
                .and_then(Value::as_array)
                .map(|items| parse_dialog_entries(items))
                .unwrap_or_default();
            let loop_to = field(object, &["loopTo", "loop_to"])
                .and_then(as_i64)
                .and_then(|index| usize::try_from(index).ok());
            Dialog::new(entries, loop_to)
        }
        Value::Array(items) => Dialog::new(parse_dialog_entries(items), None),
        Value::String(line) => Dialog::new(vec![vec![line.clone()]], None),
        _ => Dialog::default(),
    }
}

fn parse_service(value: &Value) -> Option<NpcService> {
    let object = value.as_object()?;
    let kind = field(object, &["type"]).and_then(Value::as_str)?;
    match kind.trim().to_ascii_lowercase().as_str() {
        "shop" => {
            let shop_id = field(object, &["shopId", "shop_id"]).and_then(as_id)?;
            Some(NpcService::Shop { shop_id })
        }
        other => {
            debug!("Dropping unknown NPC service type {}", other);
            None
        }
    }
}

fn read_npc_placement(
    object: &Map<String, Value>,
    npc_id: &str,
    zones: &[Zone],
    placed: &[Npc],
) -> Option<NpcPlacement> {
    let zone_id = field(object, &["zoneId", "zone"]).and_then(as_id)?;
    let Some(zone) = zones.iter().find(|z| z.id == zone_id) else {
        debug!("NPC {} points at missing zone {}, unplacing", npc_id, zone_id);
        return None;
    };

    let x = field(object, &["x"]).and_then(as_i64).unwrap_or(0);
    let y = field(object, &["y"]).and_then(as_i64).unwrap_or(0);
    let (x, y) = clamp_to_grid((x, y), zone.width(), zone.height());

    if placed.iter().any(|npc| npc.occupies(&zone_id, x, y)) {
        warn!(
            "NPC {} shares cell ({}, {}) in {} with another NPC, unplacing",
            npc_id, x, y, zone_id
        );
        return None;
    }
    Some(NpcPlacement { zone_id, x, y })
}

fn read_npcs(root: &Map<String, Value>, zones: &[Zone]) -> Vec<Npc> {
    let mut npcs: Vec<Npc> = Vec::new();
    let entries = field(root, &["npcs"]).and_then(Value::as_array);

    for entry in entries.into_iter().flatten() {
        let Some(object) = entry.as_object() else {
            warn!("Skipping NPC entry that is not an object");
            continue;
        };

        let name = field(object, &["name"]).and_then(as_text);
        let raw_id = field(object, &["id"])
            .and_then(as_id)
            .unwrap_or_else(|| slug_or(name, "npc"));
        let id = dedupe_id(&raw_id, |candidate| npcs.iter().any(|n| n.id == candidate));
        if id != raw_id {
            debug!("Renamed duplicate NPC id {} to {}", raw_id, id);
        }

        let mut npc = Npc::new(id.clone(), name.map(str::to_string).unwrap_or(id));
        npc.sprite = field(object, &["sprite"]).and_then(as_text).map(str::to_string);
        npc.facing = field(object, &["facing"])
            .and_then(Value::as_str)
            .and_then(Facing::parse)
            .unwrap_or_default();
        npc.dialog = object.get("dialog").map(parse_dialog).unwrap_or_default();
        npc.service = object.get("service").and_then(parse_service);
        npc.placement = read_npc_placement(object, &npc.id, zones, &npcs);
        npcs.push(npc);
    }
    npcs
}
