//! Noise-carved room interiors.
//!
//! A room's occupancy grid marks which of its cells stay walkable. The border
//! ring is always solid so a corridor arriving at any edge cell lands on floor.

use std::fmt;

use noise::{NoiseFn, Perlin};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::geometry::Rect;

/// Tunables for interior shaping
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Sample spacing; larger values give broader, smoother blobs
    pub scale: f64,
    /// Cells whose remapped noise (0..1) is above this stay solid
    pub threshold: f64,
    /// Permutation seed for the Perlin generator
    pub seed: u32,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: SHAPING_NOISE_SCALE,
            threshold: SHAPING_NOISE_THRESHOLD,
            seed: 0,
            offset_x: SHAPING_OFFSET_X,
            offset_y: SHAPING_OFFSET_Y,
        }
    }
}

/// Sample-space offset for one room, fixed before shaping
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseOffsets {
    pub x: f64,
    pub y: f64,
}

impl NoiseOffsets {
    /// The configured offsets with no per-room jitter
    pub fn fixed(params: &NoiseParams) -> Self {
        Self {
            x: params.offset_x,
            y: params.offset_y,
        }
    }

    /// Configured offsets plus a random shift so rooms don't share a pattern
    pub fn sample(params: &NoiseParams, rng: &mut impl Rng) -> Self {
        Self {
            x: params.offset_x + rng.gen_range(0.0..SHAPING_RANDOM_OFFSET_RANGE),
            y: params.offset_y + rng.gen_range(0.0..SHAPING_RANDOM_OFFSET_RANGE),
        }
    }
}

/// Per-cell walkability of a room, indexed `[x][y]` relative to the room origin
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    pub fn new(width: usize, height: usize, fill: bool) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        x * self.height + y
    }

    /// Cell value; anything outside the grid counts as cut out
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.cells[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, solid: bool) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.cells[idx] = solid;
        }
    }

    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

impl fmt::Display for OccupancyGrid {
    /// Top row first: `#` solid, `.` cut out
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                f.write_str(if self.get(x, y) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Carve a room's interior from 2D Perlin noise.
///
/// Pure in its inputs: the same room size, params and offsets always give the
/// same grid.
pub fn shape_room(room: &Rect, params: &NoiseParams, offsets: NoiseOffsets) -> OccupancyGrid {
    puffin::profile_function!();

    let width = room.width.max(0) as usize;
    let height = room.height.max(0) as usize;
    let perlin = Perlin::new(params.seed);
    let mut grid = OccupancyGrid::new(width, height, true);

    for x in 0..width {
        for y in 0..height {
            if grid.is_border(x, y) {
                continue;
            }
            let sample = perlin.get([
                (x as f64 + offsets.x) / params.scale,
                (y as f64 + offsets.y) / params.scale,
            ]);
            // Perlin is centered on zero; remap to 0..1 so the threshold reads as a fraction
            let value = (sample + 1.0) * 0.5;
            grid.set(x, y, value > params.threshold);
        }
    }

    grid
}
