use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::DocumentError;
use crate::constants::DOCUMENT_VERSION;
use crate::enemy::EnemyTemplate;
use crate::ids::as_canonical_number;
use crate::npc::{Dialog, Facing, NpcService};
use crate::world::World;
use crate::zone::{EnemyPlacement, GridPoint, Transport, Zone};

// ============================================================================
// WIRE SHAPES
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WorldDocument<'a> {
    version: u32,
    palette: BTreeMap<&'a str, &'a str>,
    tile_config: BTreeMap<&'a str, TileConfigEntry<'a>>,
    palette_layout: PaletteLayout<'a>,
    zones: Vec<ZoneEntry<'a>>,
    enemy_templates: &'a [EnemyTemplate],
    npcs: Vec<NpcEntry<'a>>,
    /// First zone's grid, for single-zone consumers
    #[serde(skip_serializing_if = "Option::is_none")]
    tiles: Option<Vec<Vec<Value>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    spawn: Option<Option<GridPoint>>,
}

#[derive(Serialize)]
struct TileConfigEntry<'a> {
    fill: &'a str,
    sprite: Option<&'a str>,
    walkable: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaletteLayout<'a> {
    id: Option<&'a str>,
    name: &'a str,
    description: &'a str,
    rows: u32,
    columns: u32,
    layout: &'a [Vec<Option<String>>],
    tiles: Vec<TilePosition<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TilePosition<'a> {
    tile_id: &'a str,
    row: u32,
    column: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ZoneEntry<'a> {
    id: &'a str,
    name: &'a str,
    width: u32,
    height: u32,
    tiles: Vec<Vec<Value>>,
    transports: &'a [Transport],
    enemy_placements: &'a [EnemyPlacement],
    spawn: Option<GridPoint>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NpcEntry<'a> {
    id: &'a str,
    name: &'a str,
    sprite: Option<&'a str>,
    facing: Facing,
    zone_id: Option<&'a str>,
    x: Option<u32>,
    y: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dialog: Option<&'a Dialog>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service: Option<&'a NpcService>,
}

// ============================================================================
// EXPORT
// ============================================================================

/// Tile ids that are canonical decimal numbers go out as JSON numbers
fn export_tile_id(id: &str) -> Value {
    match as_canonical_number(id) {
        Some(n) => Value::from(n),
        None => Value::String(id.to_string()),
    }
}

fn export_grid(zone: &Zone) -> Vec<Vec<Value>> {
    zone.tiles()
        .iter()
        .map(|row| row.iter().map(|id| export_tile_id(id)).collect())
        .collect()
}

fn build_document(world: &World) -> WorldDocument<'_> {
    let palette = world.palette();

    let fills = palette
        .tiles()
        .iter()
        .map(|t| (t.tile_id.as_str(), t.fill.as_str()))
        .collect();
    let tile_config = palette
        .tiles()
        .iter()
        .map(|t| {
            (
                t.tile_id.as_str(),
                TileConfigEntry {
                    fill: &t.fill,
                    sprite: t.sprite.as_deref(),
                    walkable: t.walkable,
                },
            )
        })
        .collect();
    let palette_layout = PaletteLayout {
        id: palette.id.as_deref(),
        name: &palette.name,
        description: &palette.description,
        rows: palette.rows(),
        columns: palette.columns(),
        layout: palette.layout(),
        tiles: palette
            .tiles()
            .iter()
            .map(|t| TilePosition {
                tile_id: &t.tile_id,
                row: t.row,
                column: t.column,
            })
            .collect(),
    };

    let zones: Vec<ZoneEntry> = world
        .zones()
        .iter()
        .map(|zone| ZoneEntry {
            id: &zone.id,
            name: &zone.name,
            width: zone.width(),
            height: zone.height(),
            tiles: export_grid(zone),
            transports: zone.transports(),
            enemy_placements: zone.enemy_placements(),
            spawn: zone.spawn(),
        })
        .collect();

    let npcs = world
        .npcs()
        .iter()
        .map(|npc| NpcEntry {
            id: &npc.id,
            name: &npc.name,
            sprite: npc.sprite.as_deref(),
            facing: npc.facing,
            zone_id: npc.placement.as_ref().map(|p| p.zone_id.as_str()),
            x: npc.placement.as_ref().map(|p| p.x),
            y: npc.placement.as_ref().map(|p| p.y),
            dialog: Some(&npc.dialog).filter(|d| !d.is_empty()),
            service: npc.service.as_ref(),
        })
        .collect();

    let first_zone = world.zones().first();
    WorldDocument {
        version: DOCUMENT_VERSION,
        palette: fills,
        tile_config,
        palette_layout,
        tiles: zones.first().map(|z| z.tiles.clone()),
        spawn: first_zone.map(Zone::spawn),
        zones,
        enemy_templates: world.enemy_templates(),
        npcs,
    }
}

/// Canonical JSON value for a world
pub fn export_world(world: &World) -> Result<Value, DocumentError> {
    serde_json::to_value(build_document(world)).map_err(|e| DocumentError::Serialize(e.to_string()))
}

/// Canonical, pretty-printed JSON text for a world
pub fn to_json_string(world: &World) -> Result<String, DocumentError> {
    serde_json::to_string_pretty(&build_document(world))
        .map_err(|e| DocumentError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;
    use crate::pattern::PaletteCell;
    use crate::world::ZoneCell;
    use serde_json::json;

    fn sample_world() -> World {
        let mut world = World::new(Palette::new(2, 2));
        world.add_palette_tile(PaletteCell::new(0, 0), None, true).unwrap();
        world.add_palette_tile(PaletteCell::new(0, 1), None, false).unwrap();
        world.create_zone("Town", 2, 2).unwrap();
        world.paint_square("town", 1, 1, 1, "1").unwrap();
        world
    }

    #[test]
    fn test_numeric_ids_are_coerced() {
        assert_eq!(export_tile_id("12"), json!(12));
        assert_eq!(export_tile_id("012"), json!("012"));
        assert_eq!(export_tile_id("grass"), json!("grass"));
    }

    #[test]
    fn test_export_shape() {
        let mut world = sample_world();
        world.create_zone("Cave", 3, 3).unwrap();
        world
            .link_transport(&ZoneCell::new("town", 0, 0), &ZoneCell::new("cave", 2, 2), true)
            .unwrap();
        world.create_npc("Bob");

        let doc = export_world(&world).unwrap();

        assert_eq!(doc["version"], json!(1));
        assert_eq!(doc["palette"], json!({ "0": "#808080", "1": "#808080" }));
        assert_eq!(doc["tileConfig"]["1"]["walkable"], json!(false));
        assert_eq!(doc["paletteLayout"]["layout"], json!([["0", "1"], [null, null]]));
        assert_eq!(doc["zones"][0]["tiles"], json!([[0, 0], [0, 1]]));
        assert_eq!(doc["zones"][1]["transports"][0]["toZoneId"], json!("town"));
        assert_eq!(doc["tiles"], doc["zones"][0]["tiles"]);
        assert_eq!(doc["spawn"], json!(null));

        let npc = &doc["npcs"][0];
        assert_eq!(npc["zoneId"], json!(null));
        assert_eq!(npc["facing"], json!("down"));
        assert!(npc.get("dialog").is_none());
        assert!(npc.get("service").is_none());
    }

    #[test]
    fn test_empty_world_has_no_legacy_grid() {
        let doc = export_world(&World::default()).unwrap();
        assert!(doc.get("tiles").is_none());
        assert!(doc.get("spawn").is_none());
        assert_eq!(doc["zones"], json!([]));
    }
}
