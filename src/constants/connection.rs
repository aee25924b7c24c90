//! Room connection and corridor constants.

/// Neighbors considered per room by the nearest-neighbor strategy
pub const CONNECTION_DEFAULT_NEIGHBORS: usize = 3;
/// Lower clamp for the neighbor count
pub const CONNECTION_MIN_NEIGHBORS: usize = 1;
/// Upper clamp for the neighbor count
pub const CONNECTION_MAX_NEIGHBORS: usize = 5;
/// Fraction of spanning edges re-added as loop edges
pub const CONNECTION_DEFAULT_EXTRA_CHANCE: f32 = 0.2;
/// Corridor segments shorter than this are dropped
pub const CORRIDOR_MIN_SEGMENT_LENGTH: f32 = 0.1;
