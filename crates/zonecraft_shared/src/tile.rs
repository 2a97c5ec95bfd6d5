use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TILE_FILL;

/// Tile ids are canonical strings everywhere inside the model.
/// Numeric coercion only happens when a zone grid is exported.
pub type TileId = String;

// ============================================================================
// TILE DEFINITION
// ============================================================================

/// A single palette entry: how a tile looks and whether it can be walked on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileDefinition {
    pub tile_id: TileId,
    #[serde(default)]
    pub sprite: Option<String>,
    #[serde(default = "default_fill")]
    pub fill: String,
    #[serde(default = "default_walkable")]
    pub walkable: bool,
    #[serde(default)]
    pub row: u32,
    #[serde(default)]
    pub column: u32,
}

impl TileDefinition {
    pub fn new(tile_id: impl Into<TileId>, row: u32, column: u32) -> Self {
        Self {
            tile_id: tile_id.into(),
            sprite: None,
            fill: default_fill(),
            walkable: true,
            row,
            column,
        }
    }

    pub fn with_fill(mut self, fill: &str) -> Self {
        self.fill = fill_or_default(fill);
        self
    }

    pub fn with_sprite(mut self, sprite: Option<String>) -> Self {
        self.sprite = sprite.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_walkable(mut self, walkable: bool) -> Self {
        self.walkable = walkable;
        self
    }
}

fn default_fill() -> String {
    DEFAULT_TILE_FILL.to_string()
}

fn default_walkable() -> bool {
    true
}

// ============================================================================
// COLORS
// ============================================================================

/// Normalize a hex color to lowercase `#rrggbb`.
/// Accepts `#rgb` and `#rrggbb`, with or without the leading `#`.
pub fn normalize_color(input: &str) -> Option<String> {
    let hex = input.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        3 => {
            let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
            Some(format!("#{}", expanded.to_ascii_lowercase()))
        }
        6 => Some(format!("#{}", hex.to_ascii_lowercase())),
        _ => None,
    }
}

/// Normalize a color, falling back to the default fill when it can't be parsed
pub fn fill_or_default(input: &str) -> String {
    normalize_color(input).unwrap_or_else(default_fill)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_color_forms() {
        assert_eq!(normalize_color("#ABCDEF"), Some("#abcdef".to_string()));
        assert_eq!(normalize_color("abc"), Some("#aabbcc".to_string()));
        assert_eq!(normalize_color("  #123456 "), Some("#123456".to_string()));
        assert_eq!(normalize_color("#12345"), None);
        assert_eq!(normalize_color("red"), None);
        assert_eq!(normalize_color(""), None);
    }

    #[test]
    fn test_fill_or_default() {
        assert_eq!(fill_or_default("not a color"), DEFAULT_TILE_FILL);
        assert_eq!(fill_or_default("#0F0"), "#00ff00");
    }

    #[test]
    fn test_blank_sprite_is_dropped() {
        let tile = TileDefinition::new("3", 0, 0).with_sprite(Some("   ".to_string()));
        assert_eq!(tile.sprite, None);
        assert!(tile.walkable);
    }
}
