//! Rasterize a floor layout into a tile grid for text output and
//! reachability checks.

use std::collections::VecDeque;

use crate::corridor::Segment;
use crate::generator::FloorLayout;
use crate::geometry::Rect;
use crate::room::Room;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Floor,
    Corridor,
}

impl Tile {
    pub fn is_walkable(self) -> bool {
        matches!(self, Tile::Floor | Tile::Corridor)
    }
}

/// Row-major tile grid, row 0 first
#[derive(Clone, Debug)]
pub struct TileMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    rooms: Vec<Rect>,
}

impl TileMap {
    /// Solid rock everywhere
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::Wall; width * height],
            rooms: Vec::new(),
        }
    }

    /// Rooms first, then corridors over whatever is still wall.
    pub fn from_floor(floor: &FloorLayout, width: usize, height: usize) -> Self {
        puffin::profile_function!();

        let mut map = Self::new(width, height);
        for room in &floor.rooms {
            map.carve_room(room);
        }
        for segment in floor.segments() {
            map.carve_segment(segment);
        }
        map
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn get_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Tile> {
        self.get_index(x, y).map(|idx| self.tiles[idx])
    }

    fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(idx) = self.get_index(x, y) {
            self.tiles[idx] = tile;
        }
    }

    /// Carve the room's floor cells; shaped cut-outs stay wall
    pub fn carve_room(&mut self, room: &Room) {
        let rect = room.rect;
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                if room.is_floor(x, y) {
                    self.set_tile(x, y, Tile::Floor);
                }
            }
        }
        self.rooms.push(rect);
    }

    /// Carve corridor cells, leaving room floor untouched
    pub fn carve_segment(&mut self, segment: &Segment) {
        for (x, y) in segment.cells() {
            if self.get(x, y) == Some(Tile::Wall) {
                self.set_tile(x, y, Tile::Corridor);
            }
        }
    }

    pub fn walkable_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_walkable()).count()
    }

    /// Number of walkable tiles reachable from `(x, y)` in four directions
    pub fn reachable_from(&self, x: i32, y: i32) -> usize {
        let Some(start) = self.get_index(x, y) else {
            return 0;
        };
        if !self.tiles[start].is_walkable() {
            return 0;
        }

        let mut seen = vec![false; self.tiles.len()];
        seen[start] = true;
        let mut queue = VecDeque::from([(x, y)]);
        let mut count = 0;

        while let Some((cx, cy)) = queue.pop_front() {
            count += 1;
            for (nx, ny) in [(cx + 1, cy), (cx - 1, cy), (cx, cy + 1), (cx, cy - 1)] {
                let Some(idx) = self.get_index(nx, ny) else {
                    continue;
                };
                if !seen[idx] && self.tiles[idx].is_walkable() {
                    seen[idx] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
        count
    }

    /// Corridor cells just outside a room edge that form a chokepoint.
    pub fn door_positions(&self) -> Vec<(i32, i32)> {
        let mut doors = Vec::new();

        for room in &self.rooms {
            let outside_rows = [room.y - 1, room.bottom()];
            for y in outside_rows {
                for x in room.x..room.right() {
                    if self.is_door_candidate(x, y) {
                        doors.push((x, y));
                    }
                }
            }

            let outside_columns = [room.x - 1, room.right()];
            for x in outside_columns {
                for y in room.y..room.bottom() {
                    if self.is_door_candidate(x, y) {
                        doors.push((x, y));
                    }
                }
            }
        }

        doors.sort_unstable();
        doors.dedup();
        doors
    }

    /// Walls on two opposite sides, open on the other two
    fn is_door_candidate(&self, x: i32, y: i32) -> bool {
        if self.get(x, y) != Some(Tile::Corridor) {
            return false;
        }

        let is_wall = |x, y| self.get(x, y).map_or(true, |tile| !tile.is_walkable());
        let (north, south) = (is_wall(x, y - 1), is_wall(x, y + 1));
        let (east, west) = (is_wall(x + 1, y), is_wall(x - 1, y));

        let h_doorway = north && south && !east && !west;
        let v_doorway = east && west && !north && !south;
        h_doorway || v_doorway
    }

    /// `#` wall, `.` floor, `,` corridor, `+` door; one line per row
    pub fn to_ascii(&self) -> String {
        let doors = self.door_positions();
        let mut out = String::with_capacity((self.width + 1) * self.height);

        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let glyph = match self.get(x, y) {
                    _ if doors.binary_search(&(x, y)).is_ok() => '+',
                    Some(Tile::Floor) => '.',
                    Some(Tile::Corridor) => ',',
                    Some(Tile::Wall) | None => '#',
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}
