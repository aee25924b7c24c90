//! Interior shaping constants.

/// Noise sample spacing (larger = smoother blobs)
pub const SHAPING_NOISE_SCALE: f64 = 5.0;
/// Cells with remapped noise above this stay solid
pub const SHAPING_NOISE_THRESHOLD: f64 = 0.1;
/// Fixed X offset added to every noise sample
pub const SHAPING_OFFSET_X: f64 = 100.0;
/// Fixed Y offset added to every noise sample
pub const SHAPING_OFFSET_Y: f64 = 100.0;
/// Upper bound of the random per-room offset drawn on top of the fixed one
pub const SHAPING_RANDOM_OFFSET_RANGE: f64 = 9999.0;
