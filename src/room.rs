use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bsp::{NodeId, PartitionTree};
use crate::geometry::Rect;
use crate::shaper::OccupancyGrid;

/// What a room is used for once the floor is connected
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomRole {
    #[default]
    Normal,
    /// Where the player enters the floor
    Start,
    /// The room furthest (in corridor hops) from the start
    End,
}

/// Size limits for rooms carved inside leaves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomBounds {
    pub min_width: i32,
    pub min_height: i32,
    pub max_width: i32,
    pub max_height: i32,
    /// Cells kept clear between the room and its leaf edge, on every side
    pub padding: i32,
}

/// A room carved inside one BSP leaf
#[derive(Clone, Debug, PartialEq)]
pub struct Room {
    pub rect: Rect,
    /// Leaf that hosts this room
    pub leaf: NodeId,
    pub role: RoomRole,
    /// Noise-shaped interior, when shaping is enabled
    pub grid: Option<OccupancyGrid>,
}

impl Room {
    pub fn new(rect: Rect, leaf: NodeId) -> Self {
        Self {
            rect,
            leaf,
            role: RoomRole::Normal,
            grid: None,
        }
    }

    pub fn center(&self) -> (i32, i32) {
        self.rect.center()
    }

    /// Whether the cell at absolute coordinates is walkable floor of this room
    pub fn is_floor(&self, x: i32, y: i32) -> bool {
        if !self.rect.contains(x, y) {
            return false;
        }
        match &self.grid {
            Some(grid) => grid.get((x - self.rect.x) as usize, (y - self.rect.y) as usize),
            None => true,
        }
    }
}

/// Create a room within a leaf, with padding on every side.
///
/// Returns `None` when the leaf is too small to fit the minimum room size;
/// that leaf simply stays empty.
pub fn place_room(
    tree: &PartitionTree,
    leaf: NodeId,
    bounds: &RoomBounds,
    rng: &mut impl Rng,
) -> Option<Room> {
    let area = tree.node(leaf).area;

    let inset = bounds.padding.saturating_mul(2);
    let max_width = (area.width - inset).min(bounds.max_width);
    let max_height = (area.height - inset).min(bounds.max_height);

    if max_width < bounds.min_width || max_height < bounds.min_height {
        return None; // Region too small for a room
    }

    let room_width = rng.gen_range(bounds.min_width..=max_width);
    let room_height = rng.gen_range(bounds.min_height..=max_height);

    // Random position within the padded interior
    let slack_x = area.width - inset - room_width;
    let slack_y = area.height - inset - room_height;
    let room_x = area.x + bounds.padding + rng.gen_range(0..=slack_x);
    let room_y = area.y + bounds.padding + rng.gen_range(0..=slack_y);

    Some(Room::new(
        Rect::new(room_x, room_y, room_width, room_height),
        leaf,
    ))
}
