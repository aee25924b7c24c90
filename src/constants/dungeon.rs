//! Dungeon generation constants.

/// Default dungeon width
pub const DUNGEON_DEFAULT_WIDTH: i32 = 100;
/// Default dungeon height
pub const DUNGEON_DEFAULT_HEIGHT: i32 = 100;
/// Default number of BSP split levels
pub const DUNGEON_MAX_DEPTH: u32 = 4;
/// Minimum size of a BSP leaf node
pub const DUNGEON_MIN_LEAF_SIZE: i32 = 10;
/// Aspect ratio at which a region is forced to split across its long side
pub const DUNGEON_SPLIT_ASPECT_LIMIT: f32 = 1.25;
/// Minimum room width within a leaf
pub const DUNGEON_MIN_ROOM_WIDTH: i32 = 4;
/// Minimum room height within a leaf
pub const DUNGEON_MIN_ROOM_HEIGHT: i32 = 4;
/// Maximum room width within a leaf
pub const DUNGEON_MAX_ROOM_WIDTH: i32 = 12;
/// Maximum room height within a leaf
pub const DUNGEON_MAX_ROOM_HEIGHT: i32 = 12;
/// Margin around rooms within their leaf
pub const DUNGEON_ROOM_PADDING: i32 = 2;
/// Number of floors generated per run
pub const DUNGEON_DEFAULT_FLOORS: u32 = 1;
