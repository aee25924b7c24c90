//! Generator configuration.
//!
//! Every field has a default from [`crate::constants`], so a JSON document only
//! needs to name what it changes. Validation happens once, up front; the
//! algorithms assume a validated config.

use std::path::Path;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::connection::Strategy;
use crate::constants::*;
use crate::error::ConfigError;
use crate::geometry::Rect;
use crate::room::RoomBounds;
use crate::shaper::NoiseParams;

/// Where a run's seed comes from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedSource {
    /// Reproducible run from a known seed
    Fixed(u64),
    /// No seed chosen: one is drawn from the OS per run and reported in the
    /// output so the run can be replayed with [`SeedSource::Fixed`]
    #[default]
    Entropy,
}

impl SeedSource {
    pub fn resolve(self) -> u64 {
        match self {
            SeedSource::Fixed(seed) => seed,
            SeedSource::Entropy => OsRng.next_u64(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub width: i32,
    pub height: i32,
    /// Split levels below the root
    pub max_depth: u32,
    pub min_leaf_size: i32,
    pub min_room_width: i32,
    pub min_room_height: i32,
    pub max_room_width: i32,
    pub max_room_height: i32,
    /// Clear cells between a room and its leaf edge
    pub padding: i32,
    pub seed: SeedSource,
    pub strategy: Strategy,
    /// Noise-carve room interiors when set
    pub shaping: Option<NoiseParams>,
    pub floors: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: DUNGEON_DEFAULT_WIDTH,
            height: DUNGEON_DEFAULT_HEIGHT,
            max_depth: DUNGEON_MAX_DEPTH,
            min_leaf_size: DUNGEON_MIN_LEAF_SIZE,
            min_room_width: DUNGEON_MIN_ROOM_WIDTH,
            min_room_height: DUNGEON_MIN_ROOM_HEIGHT,
            max_room_width: DUNGEON_MAX_ROOM_WIDTH,
            max_room_height: DUNGEON_MAX_ROOM_HEIGHT,
            padding: DUNGEON_ROOM_PADDING,
            seed: SeedSource::default(),
            strategy: Strategy::default(),
            shaping: None,
            floors: DUNGEON_DEFAULT_FLOORS,
        }
    }
}

impl GeneratorConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = SeedSource::Fixed(seed);
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_shaping(mut self, shaping: NoiseParams) -> Self {
        self.shaping = Some(shaping);
        self
    }

    pub fn domain(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub fn room_bounds(&self) -> RoomBounds {
        RoomBounds {
            min_width: self.min_room_width,
            min_height: self.min_room_height,
            max_width: self.max_room_width,
            max_height: self.max_room_height,
            padding: self.padding,
        }
    }

    /// Reject configurations the generator cannot honor.
    ///
    /// The neighbor count and extra-connection fraction are clamped by the
    /// nearest-neighbor strategy itself and are only checked for being finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::EmptyDomain {
                width: self.width,
                height: self.height,
            });
        }
        if self.min_leaf_size <= 0 || self.min_leaf_size.checked_mul(2).is_none() {
            return Err(ConfigError::InvalidLeafSize(self.min_leaf_size));
        }
        if self.min_room_width <= 0 || self.min_room_width > self.max_room_width {
            return Err(ConfigError::InvalidRoomBounds {
                dimension: "width",
                min: self.min_room_width,
                max: self.max_room_width,
            });
        }
        if self.min_room_height <= 0 || self.min_room_height > self.max_room_height {
            return Err(ConfigError::InvalidRoomBounds {
                dimension: "height",
                min: self.min_room_height,
                max: self.max_room_height,
            });
        }
        if self.padding < 0 {
            return Err(ConfigError::NegativePadding(self.padding));
        }
        if self.padding.checked_mul(2).is_none() {
            return Err(ConfigError::PaddingTooLarge(self.padding));
        }
        if self.floors == 0 {
            return Err(ConfigError::NoFloors);
        }

        if let Some(shaping) = &self.shaping {
            if !shaping.scale.is_finite() || shaping.scale <= 0.0 {
                return Err(ConfigError::InvalidNoiseScale(shaping.scale));
            }
            if !shaping.threshold.is_finite() {
                return Err(ConfigError::InvalidNoiseThreshold(shaping.threshold));
            }
            if !shaping.offset_x.is_finite() || !shaping.offset_y.is_finite() {
                return Err(ConfigError::InvalidNoiseOffset);
            }
        }

        if let Strategy::KNearestMst {
            extra_connection_chance,
            ..
        } = self.strategy
        {
            if !extra_connection_chance.is_finite() {
                return Err(ConfigError::InvalidExtraChance(extra_connection_chance));
            }
        }

        Ok(())
    }

    /// Parse a JSON document and validate it
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_domain() {
        let config = GeneratorConfig {
            width: 0,
            ..GeneratorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyDomain { .. })));

        let config = GeneratorConfig {
            height: -5,
            ..GeneratorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyDomain { .. })));
    }

    #[test]
    fn test_rejects_min_above_max() {
        let config = GeneratorConfig {
            min_room_width: 10,
            max_room_width: 6,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRoomBounds { dimension: "width", .. })
        ));

        let config = GeneratorConfig {
            min_room_height: 0,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRoomBounds { dimension: "height", .. })
        ));
    }

    #[test]
    fn test_rejects_bad_scalars() {
        let cases = [
            GeneratorConfig { min_leaf_size: 0, ..GeneratorConfig::default() },
            GeneratorConfig { padding: -1, ..GeneratorConfig::default() },
            GeneratorConfig { floors: 0, ..GeneratorConfig::default() },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn test_rejects_sizes_that_overflow_when_doubled() {
        let config = GeneratorConfig {
            min_leaf_size: 1_500_000_000,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLeafSize(1_500_000_000))
        ));

        let config = GeneratorConfig {
            padding: 1_500_000_000,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PaddingTooLarge(1_500_000_000))
        ));

        let config = GeneratorConfig {
            min_leaf_size: i32::MAX / 2,
            padding: i32::MAX / 2,
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_noise() {
        let bad_scale = GeneratorConfig::default().with_shaping(NoiseParams {
            scale: 0.0,
            ..NoiseParams::default()
        });
        assert!(matches!(bad_scale.validate(), Err(ConfigError::InvalidNoiseScale(_))));

        let bad_threshold = GeneratorConfig::default().with_shaping(NoiseParams {
            threshold: f64::NAN,
            ..NoiseParams::default()
        });
        assert!(matches!(
            bad_threshold.validate(),
            Err(ConfigError::InvalidNoiseThreshold(_))
        ));
    }

    #[test]
    fn test_out_of_range_neighbor_settings_are_not_errors() {
        let config = GeneratorConfig::default().with_strategy(Strategy::KNearestMst {
            neighbors: 40,
            extra_connection_chance: 3.5,
        });
        assert!(config.validate().is_ok());

        let config = GeneratorConfig::default().with_strategy(Strategy::KNearestMst {
            neighbors: 3,
            extra_connection_chance: f32::INFINITY,
        });
        assert!(matches!(config.validate(), Err(ConfigError::InvalidExtraChance(_))));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = GeneratorConfig::from_json_str(
            r#"{
                "width": 64,
                "seed": { "fixed": 42 },
                "strategy": { "kind": "k_nearest_mst", "neighbors": 2 },
                "shaping": { "threshold": 0.3 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.width, 64);
        assert_eq!(config.height, DUNGEON_DEFAULT_HEIGHT);
        assert_eq!(config.seed, SeedSource::Fixed(42));
        assert_eq!(
            config.strategy,
            Strategy::KNearestMst {
                neighbors: 2,
                extra_connection_chance: CONNECTION_DEFAULT_EXTRA_CHANCE,
            }
        );
        let shaping = config.shaping.unwrap();
        assert_eq!(shaping.threshold, 0.3);
        assert_eq!(shaping.scale, SHAPING_NOISE_SCALE);
    }

    #[test]
    fn test_json_is_validated() {
        let result = GeneratorConfig::from_json_str(r#"{ "floors": 0 }"#);
        assert!(matches!(result, Err(ConfigError::NoFloors)));

        let result = GeneratorConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_entropy_seed_is_explicit_sentinel() {
        let json = serde_json::to_string(&SeedSource::Entropy).unwrap();
        assert_eq!(json, r#""entropy""#);
        assert_eq!(SeedSource::Fixed(9).resolve(), 9);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = GeneratorConfig::from_path(Path::new("/nonexistent/dungeon.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
