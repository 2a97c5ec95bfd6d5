pub mod constants;
pub mod document;
pub mod enemy;
pub mod ids;
pub mod npc;
pub mod palette;
pub mod pattern;
pub mod tile;
pub mod world;
pub mod zone;

pub use document::DocumentError;
pub use enemy::{Attributes, EnemyTemplate};
pub use npc::{Dialog, Facing, Npc, NpcPlacement, NpcService};
pub use palette::{Palette, PaletteError};
pub use pattern::{PaletteCell, Region, TilePattern};
pub use tile::{TileDefinition, TileId};
pub use world::{World, WorldError, ZoneCell};
pub use zone::{EnemyPlacement, GridPoint, Transport, Zone};
