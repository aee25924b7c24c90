use glam::Vec2;
use rand::Rng;

use crate::constants::CORRIDOR_MIN_SEGMENT_LENGTH;
use crate::geometry::Rect;

/// Dominant direction of a corridor segment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Which leg of the L-shaped corridor comes first
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Elbow {
    /// Horizontal first: the corner sits at `(b.x, a.y)`
    HorizontalFirst,
    /// Vertical first: the corner sits at `(a.x, b.y)`
    VerticalFirst,
}

/// A straight corridor piece between two points
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    /// `None` when the segment is too short to produce any geometry
    pub fn new(start: Vec2, end: Vec2) -> Option<Self> {
        if start.distance(end) < CORRIDOR_MIN_SEGMENT_LENGTH {
            return None;
        }
        Some(Self { start, end })
    }

    pub fn axis(&self) -> Axis {
        let delta = self.end - self.start;
        if delta.x.abs() > delta.y.abs() {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Where a renderer places the corridor piece
    pub fn midpoint(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }

    /// Integer cells covered by the segment, both endpoints included
    pub fn cells(&self) -> Vec<(i32, i32)> {
        let (x1, y1) = (self.start.x.round() as i32, self.start.y.round() as i32);
        let (x2, y2) = (self.end.x.round() as i32, self.end.y.round() as i32);

        match self.axis() {
            Axis::Horizontal => (x1.min(x2)..=x1.max(x2)).map(|x| (x, y1)).collect(),
            Axis::Vertical => (y1.min(y2)..=y1.max(y2)).map(|y| (x1, y)).collect(),
        }
    }
}

/// Connect two rooms with an L-shaped corridor, picking the elbow at random.
pub fn route(a: &Rect, b: &Rect, rng: &mut impl Rng) -> Vec<Segment> {
    // Randomly choose to go horizontal-then-vertical or vertical-then-horizontal
    let elbow = if rng.gen_bool(0.5) {
        Elbow::HorizontalFirst
    } else {
        Elbow::VerticalFirst
    };
    route_with(a, b, elbow)
}

/// Connect two room centers through the given elbow.
///
/// Degenerate legs are dropped, so aligned centers give a single segment.
pub fn route_with(a: &Rect, b: &Rect, elbow: Elbow) -> Vec<Segment> {
    let start = a.center_point();
    let end = b.center_point();

    let corner = match elbow {
        Elbow::HorizontalFirst => Vec2::new(end.x, start.y),
        Elbow::VerticalFirst => Vec2::new(start.x, end.y),
    };

    [Segment::new(start, corner), Segment::new(corner, end)]
        .into_iter()
        .flatten()
        .collect()
}
