//! Procedural dungeon floor layouts.
//!
//! A rectangular domain is split by binary space partitioning, a room is
//! placed in each leaf (optionally carved by Perlin noise), rooms are linked
//! by one of several connection strategies, and every link becomes an
//! L-shaped corridor. [`DungeonGenerator`] runs the whole pipeline.

pub mod bsp;
pub mod config;
pub mod connection;
pub mod constants;
pub mod corridor;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod raster;
pub mod room;
pub mod shaper;
pub mod sink;

pub use config::{GeneratorConfig, SeedSource};
pub use connection::{Connection, ConnectionSet, Strategy};
pub use error::{ConfigError, GenerateError};
pub use generator::{CorridorPath, DungeonGenerator, DungeonLayout, FloorLayout, StairLink};
pub use geometry::Rect;
pub use raster::{Tile, TileMap};
pub use room::{Room, RoomRole};
pub use shaper::{NoiseParams, OccupancyGrid};
pub use sink::{LayoutSink, NullSink};
