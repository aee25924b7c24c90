use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned integer rectangle: a partition region or a room
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Exclusive right edge
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Integer center, rounding toward the top-left like the cell grid does
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Center as a float point, for distance ranking and corridor endpoints
    pub fn center_point(&self) -> Vec2 {
        let (x, y) = self.center();
        Vec2::new(x as f32, y as f32)
    }

    /// Check if a point is inside this rectangle
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// True when `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// True when the two rectangles share at least one cell
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Shrink by `margin` on every side. `None` when nothing is left.
    pub fn inset(&self, margin: i32) -> Option<Rect> {
        let width = self.width - margin * 2;
        let height = self.height - margin * 2;
        if width <= 0 || height <= 0 {
            return None;
        }
        Some(Rect::new(self.x + margin, self.y + margin, width, height))
    }

    /// Distance between the integer centers of two rectangles
    pub fn center_distance(&self, other: &Rect) -> f32 {
        self.center_point().distance(other.center_point())
    }

    /// Longer side divided by shorter side
    pub fn aspect_ratio(&self) -> f32 {
        let (long, short) = if self.width >= self.height {
            (self.width, self.height)
        } else {
            (self.height, self.width)
        };
        long as f32 / short.max(1) as f32
    }
}
