use std::path::PathBuf;

use thiserror::Error;

/// Configuration rejected before any generation starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("domain must be at least 1x1, got {width}x{height}")]
    EmptyDomain { width: i32, height: i32 },

    #[error("minimum leaf size must be positive and at most i32::MAX / 2, got {0}")]
    InvalidLeafSize(i32),

    #[error("room {dimension} bounds are invalid: min {min}, max {max}")]
    InvalidRoomBounds {
        dimension: &'static str,
        min: i32,
        max: i32,
    },

    #[error("room padding cannot be negative, got {0}")]
    NegativePadding(i32),

    #[error("room padding must be at most i32::MAX / 2, got {0}")]
    PaddingTooLarge(i32),

    #[error("at least one floor is required")]
    NoFloors,

    #[error("noise scale must be a positive finite number, got {0}")]
    InvalidNoiseScale(f64),

    #[error("noise threshold must be finite, got {0}")]
    InvalidNoiseThreshold(f64),

    #[error("noise offsets must be finite")]
    InvalidNoiseOffset,

    #[error("extra connection chance must be finite, got {0}")]
    InvalidExtraChance(f32),

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Why a generation run produced no layout
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("generation cancelled after {stage}")]
    Cancelled { stage: &'static str },
}
