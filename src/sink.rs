//! Hooks for whatever turns a layout into visible geometry.
//!
//! The generator never depends on a sink: it hands over finished data and
//! ignores what the sink does with it.

use crate::corridor::Segment;
use crate::generator::StairLink;
use crate::geometry::Rect;

pub trait LayoutSink {
    /// Discard everything spawned by the previous generation
    fn clear(&mut self) {}

    fn spawn_room(&mut self, _rect: &Rect, _floor: u32) {}

    fn spawn_corridor(&mut self, _segment: &Segment, _floor: u32) {}

    fn spawn_stair(&mut self, _stair: &StairLink) {}
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LayoutSink for NullSink {}
