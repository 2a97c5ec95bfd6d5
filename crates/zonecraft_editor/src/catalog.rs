//! Catalog data served by the content API: abilities, equipment, sprites and saved
//! palettes. Payloads are read leniently; fields the editor doesn't use are ignored.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use zonecraft_shared::Palette;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilitySummary {
    pub id: u32,
    pub name: String,
    pub school: Option<String>,
    pub mana_cost: f32,
    pub cooldown: f32,
    pub scaling: Option<serde_json::Value>,
    pub effects: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentItem {
    pub id: u32,
    pub name: String,
    pub slot: String,
    pub rarity: Option<String>,
    pub bonuses: BTreeMap<String, f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteAsset {
    pub id: String,
    pub url: String,
    pub name: String,
}

/// Catalog contents loaded so far
#[derive(Resource, Debug, Clone, Default)]
pub struct Catalog {
    pub abilities: Vec<AbilitySummary>,
    /// Equipment keyed by category
    pub equipment: BTreeMap<String, Vec<EquipmentItem>>,
    pub sprites: Vec<SpriteAsset>,
    pub palettes: Vec<Palette>,
}

impl Catalog {
    /// Look up an ability by the string id enemy rotations store
    pub fn ability(&self, id: &str) -> Option<&AbilitySummary> {
        self.abilities.iter().find(|a| a.id.to_string() == id)
    }

    /// Rotation entries whose ability is missing render as unknown
    pub fn ability_label(&self, id: &str) -> &str {
        self.ability(id).map(|a| a.name.as_str()).unwrap_or("unknown")
    }

    /// Items that fit an equipment slot, across all categories
    pub fn equipment_for_slot(&self, slot: &str) -> Vec<&EquipmentItem> {
        self.equipment
            .values()
            .flatten()
            .filter(|item| item.slot.eq_ignore_ascii_case(slot))
            .collect()
    }

    pub fn sprite(&self, id: &str) -> Option<&SpriteAsset> {
        self.sprites.iter().find(|s| s.id == id)
    }

    /// Insert or replace a saved palette by id
    pub fn upsert_palette(&mut self, palette: Palette) {
        match self
            .palettes
            .iter_mut()
            .find(|p| p.id.is_some() && p.id == palette.id)
        {
            Some(existing) => *existing = palette,
            None => self.palettes.push(palette),
        }
    }

    pub fn remove_palette(&mut self, palette_id: &str) -> bool {
        let before = self.palettes.len();
        self.palettes.retain(|p| p.id.as_deref() != Some(palette_id));
        self.palettes.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_ability_payload() {
        let ability: AbilitySummary = serde_json::from_value(json!({
            "id": 7,
            "name": "Fireball",
            "school": "fire",
            "unexpected": true
        }))
        .unwrap();
        assert_eq!(ability.id, 7);
        assert_eq!(ability.cooldown, 0.0);
        assert!(ability.effects.is_empty());
    }

    #[test]
    fn test_equipment_lookup_by_slot() {
        let equipment: BTreeMap<String, Vec<EquipmentItem>> = serde_json::from_value(json!({
            "weapons": [{ "id": 1, "name": "Sword", "slot": "MainHand" }],
            "armor": [{ "id": 2, "name": "Cap", "slot": "head", "bonuses": { "armor": 2.0 } }]
        }))
        .unwrap();
        let catalog = Catalog {
            equipment,
            ..Default::default()
        };

        let head = catalog.equipment_for_slot("Head");
        assert_eq!(head.len(), 1);
        assert_eq!(head[0].name, "Cap");
        assert_eq!(catalog.equipment_for_slot("mainhand")[0].id, 1);
    }

    #[test]
    fn test_missing_ability_label() {
        let catalog = Catalog {
            abilities: vec![AbilitySummary {
                id: 4,
                name: "Slash".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(catalog.ability_label("4"), "Slash");
        assert_eq!(catalog.ability_label("3"), "unknown");
    }

    #[test]
    fn test_palette_upsert_and_remove() {
        let mut catalog = Catalog::default();
        let mut palette = Palette::new(2, 2);
        palette.id = Some("forest".to_string());
        catalog.upsert_palette(palette.clone());

        palette.name = "Forest".to_string();
        catalog.upsert_palette(palette);
        assert_eq!(catalog.palettes.len(), 1);
        assert_eq!(catalog.palettes[0].name, "Forest");

        assert!(catalog.remove_palette("forest"));
        assert!(catalog.palettes.is_empty());
    }
}
