// ============================================================================
// PALETTE CONSTANTS
// ============================================================================

/// Smallest palette edge, in cells
pub const MIN_PALETTE_DIMENSION: u32 = 1;
/// Largest palette edge, in cells
pub const MAX_PALETTE_DIMENSION: u32 = 20;

pub const DEFAULT_PALETTE_ROWS: u32 = 4;
pub const DEFAULT_PALETTE_COLUMNS: u32 = 4;
pub const DEFAULT_PALETTE_NAME: &str = "Untitled Palette";

/// Fill used for tiles created without an explicit color, and for unparseable colors
pub const DEFAULT_TILE_FILL: &str = "#808080";

/// Tile id used for zone cells when the palette defines no tiles at all
pub const FALLBACK_TILE_ID: &str = "0";

// ============================================================================
// ZONE CONSTANTS
// ============================================================================

pub const MIN_ZONE_DIMENSION: u32 = 1;
pub const MAX_ZONE_DIMENSION: u32 = 256;

pub const DEFAULT_ZONE_WIDTH: u32 = 16;
pub const DEFAULT_ZONE_HEIGHT: u32 = 16;

// ============================================================================
// BRUSH CONSTANTS
// ============================================================================

pub const MIN_BRUSH_SIZE: u32 = 1;
pub const MAX_BRUSH_SIZE: u32 = 25;

// ============================================================================
// ENTITY DEFAULTS
// ============================================================================

pub const DEFAULT_ENEMY_TYPE: &str = "melee";
pub const DEFAULT_ATTRIBUTE_VALUE: i32 = 10;
pub const DEFAULT_XP_PCT: u32 = 100;

/// Version stamped into exported world documents
pub const DOCUMENT_VERSION: u32 = 1;
