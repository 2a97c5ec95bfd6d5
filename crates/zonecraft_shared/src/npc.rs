use serde::{Deserialize, Serialize};

/// Direction an NPC faces when idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Facing::Up),
            "down" => Some(Facing::Down),
            "left" => Some(Facing::Left),
            "right" => Some(Facing::Right),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Facing::Up => "up",
            Facing::Down => "down",
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }

    pub fn all() -> &'static [Facing] {
        &[Facing::Up, Facing::Down, Facing::Left, Facing::Right]
    }
}

// ============================================================================
// DIALOG
// ============================================================================

/// Ordered dialog entries, each a group of lines shown together.
///
/// After the last entry the conversation jumps back to `loop_to`, or holds on
/// the final entry when `loop_to` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dialog {
    entries: Vec<Vec<String>>,
    loop_to: Option<usize>,
}

impl Dialog {
    pub fn new(entries: Vec<Vec<String>>, loop_to: Option<usize>) -> Self {
        let mut dialog = Self { entries, loop_to };
        dialog.clamp_loop();
        dialog
    }

    pub fn entries(&self) -> &[Vec<String>] {
        &self.entries
    }

    pub fn loop_to(&self) -> Option<usize> {
        self.loop_to
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set_loop_to(&mut self, loop_to: Option<usize>) {
        self.loop_to = loop_to;
        self.clamp_loop();
    }

    fn clamp_loop(&mut self) {
        self.loop_to = match (self.loop_to, self.entries.len()) {
            (_, 0) => None,
            (Some(index), len) => Some(index.min(len - 1)),
            (None, _) => None,
        };
    }

    /// Entry shown after `current`
    pub fn next_entry(&self, current: usize) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        if current < last {
            Some(current + 1)
        } else {
            Some(self.loop_to.unwrap_or(last))
        }
    }
}

// ============================================================================
// SERVICES
// ============================================================================

/// What an NPC offers beyond dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NpcService {
    Shop {
        #[serde(rename = "shopId")]
        shop_id: String,
    },
}

// ============================================================================
// NPC
// ============================================================================

/// Where an NPC stands. Zone and coordinates are set together or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NpcPlacement {
    pub zone_id: String,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Npc {
    pub id: String,
    pub name: String,
    pub sprite: Option<String>,
    pub facing: Facing,
    pub placement: Option<NpcPlacement>,
    pub dialog: Dialog,
    pub service: Option<NpcService>,
}

impl Npc {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            sprite: None,
            facing: Facing::default(),
            placement: None,
            dialog: Dialog::default(),
            service: None,
        }
    }

    pub fn occupies(&self, zone_id: &str, x: u32, y: u32) -> bool {
        matches!(&self.placement, Some(p) if p.zone_id == zone_id && p.x == x && p.y == y)
    }

    pub fn location_label(&self) -> String {
        match &self.placement {
            Some(p) => format!("{} ({}, {})", p.zone_id, p.x, p.y),
            None => "Unplaced".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(groups: &[&[&str]]) -> Vec<Vec<String>> {
        groups
            .iter()
            .map(|g| g.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_dialog_loop_is_clamped() {
        let dialog = Dialog::new(lines(&[&["Hi"], &["Bye"]]), Some(7));
        assert_eq!(dialog.loop_to(), Some(1));

        let empty = Dialog::new(Vec::new(), Some(0));
        assert_eq!(empty.loop_to(), None);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_dialog_progression() {
        let holding = Dialog::new(lines(&[&["a"], &["b"], &["c"]]), None);
        assert_eq!(holding.next_entry(0), Some(1));
        assert_eq!(holding.next_entry(2), Some(2));

        let looping = Dialog::new(lines(&[&["a"], &["b"], &["c"]]), Some(1));
        assert_eq!(looping.next_entry(2), Some(1));
    }

    #[test]
    fn test_service_wire_shape() {
        let service = NpcService::Shop {
            shop_id: "general".to_string(),
        };
        let json = serde_json::to_value(&service).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "shop", "shopId": "general" }));
    }

    #[test]
    fn test_facing_parse() {
        assert_eq!(Facing::parse(" LEFT "), Some(Facing::Left));
        assert_eq!(Facing::parse("north"), None);
    }

    #[test]
    fn test_location_label() {
        let mut npc = Npc::new("bob".to_string(), "Bob".to_string());
        assert_eq!(npc.location_label(), "Unplaced");
        npc.placement = Some(NpcPlacement {
            zone_id: "town".to_string(),
            x: 3,
            y: 4,
        });
        assert!(npc.occupies("town", 3, 4));
        assert_eq!(npc.location_label(), "town (3, 4)");
    }
}
