use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{DEFAULT_ATTRIBUTE_VALUE, DEFAULT_ENEMY_TYPE, DEFAULT_XP_PCT};

/// Primary attributes, serialized under their short uppercase names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(rename = "STR", default = "default_attribute")]
    pub strength: i32,
    #[serde(rename = "STA", default = "default_attribute")]
    pub stamina: i32,
    #[serde(rename = "AGI", default = "default_attribute")]
    pub agility: i32,
    #[serde(rename = "INT", default = "default_attribute")]
    pub intellect: i32,
    #[serde(rename = "WIS", default = "default_attribute")]
    pub wisdom: i32,
}

fn default_attribute() -> i32 {
    DEFAULT_ATTRIBUTE_VALUE
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            strength: DEFAULT_ATTRIBUTE_VALUE,
            stamina: DEFAULT_ATTRIBUTE_VALUE,
            agility: DEFAULT_ATTRIBUTE_VALUE,
            intellect: DEFAULT_ATTRIBUTE_VALUE,
            wisdom: DEFAULT_ATTRIBUTE_VALUE,
        }
    }
}

/// Reusable enemy definition, referenced by zone placements through `id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub basic_type: String,
    pub level: u32,
    pub attributes: Attributes,
    /// Ability ids, cast in order
    pub rotation: Vec<String>,
    /// Slot name -> item id
    pub equipment: BTreeMap<String, String>,
    pub xp_pct: u32,
    pub gold: u32,
    pub spawn_chance: f64,
    pub sprite: Option<String>,
}

impl EnemyTemplate {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            basic_type: DEFAULT_ENEMY_TYPE.to_string(),
            level: 1,
            attributes: Attributes::default(),
            rotation: Vec::new(),
            equipment: BTreeMap::new(),
            xp_pct: DEFAULT_XP_PCT,
            gold: 0,
            spawn_chance: 1.0,
            sprite: None,
        }
    }

    /// Clamp level and spawn chance into their valid ranges
    pub fn normalize(&mut self) {
        self.level = self.level.max(1);
        self.spawn_chance = if self.spawn_chance.is_finite() {
            self.spawn_chance.clamp(0.0, 1.0)
        } else {
            1.0
        };
        if self.basic_type.trim().is_empty() {
            self.basic_type = DEFAULT_ENEMY_TYPE.to_string();
        }
        self.rotation.retain(|id| !id.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_clamps() {
        let mut template = EnemyTemplate::new("wolf".to_string(), "Wolf".to_string());
        template.level = 0;
        template.spawn_chance = 3.5;
        template.basic_type = " ".to_string();
        template.normalize();

        assert_eq!(template.level, 1);
        assert_eq!(template.spawn_chance, 1.0);
        assert_eq!(template.basic_type, DEFAULT_ENEMY_TYPE);
    }

    #[test]
    fn test_attribute_names_on_the_wire() {
        let json = serde_json::to_value(Attributes::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "STR": 10, "STA": 10, "AGI": 10, "INT": 10, "WIS": 10 })
        );
    }
}
