//! The generation pipeline: partition, place rooms, shape interiors, connect,
//! route corridors, then link floors with stairs.
//!
//! Every floor gets its own RNG derived from the run seed, so floors are
//! independently reproducible and never share generator state.

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::bsp::PartitionTree;
use crate::config::GeneratorConfig;
use crate::connection::{connect, hop_distances, Connection, ConnectionSet};
use crate::corridor::{route, Segment};
use crate::error::{ConfigError, GenerateError};
use crate::room::{place_room, Room, RoomRole};
use crate::shaper::{shape_room, NoiseOffsets};
use crate::sink::LayoutSink;

/// Corridor pieces for one connection
#[derive(Clone, Debug, PartialEq)]
pub struct CorridorPath {
    pub connection: Connection,
    pub segments: Vec<Segment>,
}

/// Stairs joining a room on one floor to a room on the floor below
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StairLink {
    pub from_floor: u32,
    pub from_room: usize,
    pub to_room: usize,
    /// Center of the upper room, where the stair sits
    pub position: (i32, i32),
}

/// Result of generating one floor
#[derive(Clone, Debug, PartialEq)]
pub struct FloorLayout {
    pub index: u32,
    /// Seed this floor's RNG was built from
    pub seed: u64,
    pub tree: PartitionTree,
    pub rooms: Vec<Room>,
    pub connections: ConnectionSet,
    pub corridors: Vec<CorridorPath>,
}

impl FloorLayout {
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.corridors.iter().flat_map(|path| path.segments.iter())
    }

    pub fn room_with_role(&self, role: RoomRole) -> Option<usize> {
        self.rooms.iter().position(|room| room.role == role)
    }
}

/// Result of a generation run
#[derive(Clone, Debug, PartialEq)]
pub struct DungeonLayout {
    /// Resolved run seed; replaying it reproduces this layout
    pub seed: u64,
    pub floors: Vec<FloorLayout>,
    pub stairs: Vec<StairLink>,
}

pub struct DungeonGenerator {
    config: GeneratorConfig,
}

impl DungeonGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate every configured floor.
    pub fn generate(&self) -> DungeonLayout {
        match self.run(|_| Ok::<(), Infallible>(())) {
            Ok(layout) => layout,
            Err(never) => match never {},
        }
    }

    /// Generate, giving up at the next stage boundary once `cancel` is set.
    ///
    /// A cancelled run returns no partial floors.
    pub fn generate_with_cancel(&self, cancel: &AtomicBool) -> Result<DungeonLayout, GenerateError> {
        self.run(|stage| {
            if cancel.load(Ordering::Relaxed) {
                Err(GenerateError::Cancelled { stage })
            } else {
                Ok(())
            }
        })
    }

    /// Generate and hand the result to a renderer.
    ///
    /// The sink is cleared once before generation starts, then receives
    /// every room, corridor segment and stair. The returned layout does not
    /// depend on the sink.
    pub fn generate_into(&self, sink: &mut dyn LayoutSink) -> DungeonLayout {
        sink.clear();
        let layout = self.generate();

        for floor in &layout.floors {
            for room in &floor.rooms {
                sink.spawn_room(&room.rect, floor.index);
            }
            for segment in floor.segments() {
                sink.spawn_corridor(segment, floor.index);
            }
        }
        for stair in &layout.stairs {
            sink.spawn_stair(stair);
        }

        layout
    }

    fn run<E>(
        &self,
        mut checkpoint: impl FnMut(&'static str) -> Result<(), E>,
    ) -> Result<DungeonLayout, E> {
        puffin::profile_function!();

        let seed = self.config.seed.resolve();
        tracing::debug!(seed, floors = self.config.floors, "starting generation");

        let mut floors = Vec::with_capacity(self.config.floors as usize);
        for index in 0..self.config.floors {
            let floor_seed = seed.wrapping_add(index as u64);
            floors.push(self.generate_floor(index, floor_seed, &mut checkpoint)?);
        }

        let stairs = link_floors(&floors, seed);

        Ok(DungeonLayout {
            seed,
            floors,
            stairs,
        })
    }

    fn generate_floor<E>(
        &self,
        index: u32,
        seed: u64,
        checkpoint: &mut impl FnMut(&'static str) -> Result<(), E>,
    ) -> Result<FloorLayout, E> {
        puffin::profile_function!();

        let config = &self.config;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut tree = PartitionTree::build(
            config.domain(),
            config.max_depth,
            config.min_leaf_size,
            &mut rng,
        );
        checkpoint("partition")?;

        let mut rooms = self.furnish(&mut tree, &mut rng);
        checkpoint("room placement")?;

        let connections = connect(&rooms, Some(&tree), &config.strategy, &mut rng);
        checkpoint("connection")?;

        assign_roles(&mut rooms, connections.mandatory_edges());

        let corridors: Vec<CorridorPath> = {
            puffin::profile_scope!("route_corridors");
            connections
                .iter()
                .map(|&connection| CorridorPath {
                    connection,
                    segments: route(&rooms[connection.a].rect, &rooms[connection.b].rect, &mut rng),
                })
                .collect()
        };

        if rooms.len() < 2 {
            tracing::warn!(floor = index, rooms = rooms.len(), "floor has too few rooms to connect");
        }
        tracing::info!(
            floor = index,
            leaves = tree.leaves().count(),
            rooms = rooms.len(),
            connections = connections.len(),
            extras = connections.extras().len(),
            strategy = config.strategy.name(),
            "floor generated"
        );

        Ok(FloorLayout {
            index,
            seed,
            tree,
            rooms,
            connections,
            corridors,
        })
    }

    /// Place a room in each leaf that can hold one, shaping it if enabled.
    fn furnish(&self, tree: &mut PartitionTree, rng: &mut impl Rng) -> Vec<Room> {
        puffin::profile_function!();

        let bounds = self.config.room_bounds();
        let leaves: Vec<_> = tree.leaves().collect();
        let mut rooms = Vec::with_capacity(leaves.len());

        for leaf in leaves {
            let Some(mut room) = place_room(tree, leaf, &bounds, rng) else {
                continue;
            };

            if let Some(params) = &self.config.shaping {
                let offsets = NoiseOffsets::sample(params, rng);
                room.grid = Some(shape_room(&room.rect, params, offsets));
            }

            tree.assign_room(leaf, rooms.len());
            rooms.push(room);
        }

        tracing::debug!(rooms = rooms.len(), "rooms placed");
        rooms
    }
}

/// First room is the start; the room the most corridor hops away is the end.
fn assign_roles(rooms: &mut [Room], mandatory: &[Connection]) {
    let Some(first) = rooms.first_mut() else {
        return;
    };
    first.role = RoomRole::Start;

    let hops = hop_distances(rooms.len(), mandatory, 0);
    let mut end: Option<(usize, usize)> = None;
    for (index, hop) in hops.iter().enumerate().skip(1) {
        if let Some(hop) = *hop {
            if end.map_or(true, |(_, best)| hop > best) {
                end = Some((index, hop));
            }
        }
    }

    if let Some((index, _)) = end {
        rooms[index].role = RoomRole::End;
    }
}

/// Pick one room on each floor and one on the floor below to join with stairs.
fn link_floors(floors: &[FloorLayout], seed: u64) -> Vec<StairLink> {
    // A separate stream keeps stair picks from disturbing any floor's sequence
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(1);

    floors
        .windows(2)
        .filter(|pair| !pair[0].rooms.is_empty() && !pair[1].rooms.is_empty())
        .map(|pair| {
            let (upper, lower) = (&pair[0], &pair[1]);
            let from_room = rng.gen_range(0..upper.rooms.len());
            let to_room = rng.gen_range(0..lower.rooms.len());
            StairLink {
                from_floor: upper.index,
                from_room,
                to_room,
                position: upper.rooms[from_room].center(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeedSource;
    use crate::connection::{is_connected, Strategy};
    use crate::geometry::Rect;
    use crate::shaper::NoiseParams;

    fn scenario_config(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            width: 100,
            height: 100,
            max_depth: 3,
            min_leaf_size: 10,
            min_room_width: 4,
            min_room_height: 4,
            max_room_width: 12,
            max_room_height: 12,
            padding: 2,
            seed: SeedSource::Fixed(seed),
            strategy: Strategy::Mst,
            shaping: None,
            floors: 1,
        }
    }

    fn generate(config: GeneratorConfig) -> DungeonLayout {
        DungeonGenerator::new(config).unwrap().generate()
    }

    #[test]
    fn test_reference_scenario() {
        let layout = generate(scenario_config(1234));
        let floor = &layout.floors[0];

        let leaves: Vec<Rect> = floor.tree.leaves().map(|id| floor.tree.node(id).area).collect();
        assert_eq!(
            leaves,
            vec![
                Rect::new(0, 0, 46, 14),
                Rect::new(46, 0, 35, 14),
                Rect::new(81, 0, 19, 14),
                Rect::new(0, 14, 84, 44),
                Rect::new(84, 14, 16, 44),
                Rect::new(0, 58, 49, 42),
                Rect::new(49, 58, 51, 42),
            ]
        );

        let rooms: Vec<Rect> = floor.rooms.iter().map(|room| room.rect).collect();
        assert_eq!(
            rooms,
            vec![
                Rect::new(29, 2, 5, 9),
                Rect::new(68, 3, 10, 4),
                Rect::new(83, 2, 11, 7),
                Rect::new(34, 30, 8, 4),
                Rect::new(87, 32, 5, 5),
                Rect::new(27, 85, 5, 8),
                Rect::new(68, 81, 6, 7),
            ]
        );

        assert_eq!(floor.connections.len(), 6);
        assert!(is_connected(floor.rooms.len(), floor.connections.edges()));
    }

    #[test]
    fn test_reference_scenario_shape_over_many_seeds() {
        for seed in 0..50 {
            let layout = generate(scenario_config(seed));
            let floor = &layout.floors[0];
            let leaves = floor.tree.leaves().count();
            assert!((7..=8).contains(&leaves), "seed {seed}");
            // Every leaf is at least 10x10, which always fits a padded 4x4 room
            assert_eq!(floor.rooms.len(), leaves);
            assert_eq!(floor.connections.len(), floor.rooms.len() - 1);
        }
    }

    #[test]
    fn test_largest_valid_sizes_generate_empty_floor() {
        let config = GeneratorConfig {
            min_leaf_size: i32::MAX / 2,
            padding: i32::MAX / 2,
            ..scenario_config(6)
        };
        let layout = generate(config);
        assert_eq!(layout.floors[0].tree.len(), 1);
        assert!(layout.floors[0].rooms.is_empty());
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = generate(scenario_config(77));
        let b = generate(scenario_config(77));
        assert_eq!(a, b);

        let rects = |layout: &DungeonLayout| -> Vec<Rect> {
            layout.floors[0].rooms.iter().map(|r| r.rect).collect()
        };
        let c = generate(scenario_config(78));
        assert_ne!(rects(&a), rects(&c));
    }

    #[test]
    fn test_rooms_stay_in_padded_leaves_and_never_overlap() {
        for seed in 0..40 {
            let config = GeneratorConfig {
                max_depth: 5,
                min_leaf_size: 8,
                ..scenario_config(seed)
            };
            let layout = generate(config);
            let floor = &layout.floors[0];

            for room in &floor.rooms {
                let leaf = floor.tree.node(room.leaf);
                assert!(leaf.is_leaf());
                let padded = leaf.area.inset(2).unwrap();
                assert!(padded.contains_rect(&room.rect), "seed {seed}");
            }
            for (i, a) in floor.rooms.iter().enumerate() {
                for b in &floor.rooms[i + 1..] {
                    assert!(!a.rect.intersects(&b.rect), "seed {seed}");
                }
            }
        }
    }

    #[test]
    fn test_tree_rooms_match_room_list() {
        let layout = generate(scenario_config(5));
        let floor = &layout.floors[0];
        for (index, room) in floor.rooms.iter().enumerate() {
            assert_eq!(floor.tree.node(room.leaf).room(), Some(index));
        }
    }

    #[test]
    fn test_every_strategy_connects_all_rooms() {
        let strategies = [
            Strategy::BspSibling,
            Strategy::Mst,
            Strategy::KNearestMst {
                neighbors: 2,
                extra_connection_chance: 0.5,
            },
        ];
        for strategy in strategies {
            for seed in 0..15 {
                let config = GeneratorConfig {
                    max_depth: 4,
                    ..scenario_config(seed)
                }
                .with_strategy(strategy);
                let layout = generate(config);
                let floor = &layout.floors[0];
                assert!(
                    is_connected(floor.rooms.len(), floor.connections.mandatory_edges()),
                    "{} seed {seed}",
                    strategy.name()
                );
            }
        }
    }

    #[test]
    fn test_corridors_follow_connections() {
        let config = scenario_config(9).with_strategy(Strategy::k_nearest());
        let layout = generate(config);
        let floor = &layout.floors[0];

        assert_eq!(floor.corridors.len(), floor.connections.len());
        for path in &floor.corridors {
            let start = floor.rooms[path.connection.a].rect.center_point();
            let end = floor.rooms[path.connection.b].rect.center_point();
            assert!(!path.segments.is_empty());
            assert!(path.segments.len() <= 2);
            assert_eq!(path.segments.first().unwrap().start, start);
            assert_eq!(path.segments.last().unwrap().end, end);
        }
    }

    #[test]
    fn test_shaping_attaches_grids() {
        let config = scenario_config(3).with_shaping(NoiseParams {
            threshold: 0.5,
            seed: 11,
            ..NoiseParams::default()
        });
        let layout = generate(config);
        for room in &layout.floors[0].rooms {
            let grid = room.grid.as_ref().unwrap();
            assert_eq!(grid.width(), room.rect.width as usize);
            assert_eq!(grid.height(), room.rect.height as usize);
            for x in 0..grid.width() {
                assert!(grid.get(x, 0) && grid.get(x, grid.height() - 1));
            }
        }

        let plain = generate(scenario_config(3));
        assert!(plain.floors[0].rooms.iter().all(|room| room.grid.is_none()));
    }

    #[test]
    fn test_roles() {
        let layout = generate(scenario_config(42));
        let floor = &layout.floors[0];
        assert_eq!(floor.room_with_role(RoomRole::Start), Some(0));

        let end = floor.room_with_role(RoomRole::End).unwrap();
        let hops = hop_distances(floor.rooms.len(), floor.connections.mandatory_edges(), 0);
        let furthest = hops.iter().flatten().max().copied().unwrap();
        assert_eq!(hops[end], Some(furthest));
        assert_eq!(
            floor.rooms.iter().filter(|r| r.role == RoomRole::End).count(),
            1
        );
    }

    #[test]
    fn test_single_room_floor() {
        let config = GeneratorConfig {
            width: 12,
            height: 12,
            ..scenario_config(1)
        };
        let layout = generate(config);
        let floor = &layout.floors[0];
        assert_eq!(floor.rooms.len(), 1);
        assert!(floor.connections.is_empty());
        assert!(floor.corridors.is_empty());
        assert_eq!(floor.rooms[0].role, RoomRole::Start);
    }

    #[test]
    fn test_domain_too_small_for_any_room() {
        let config = GeneratorConfig {
            width: 6,
            height: 6,
            ..scenario_config(1)
        };
        let layout = generate(config);
        assert!(layout.floors[0].rooms.is_empty());
        assert!(layout.floors[0].connections.is_empty());
    }

    #[test]
    fn test_multiple_floors_with_stairs() {
        let config = GeneratorConfig {
            floors: 3,
            ..scenario_config(500)
        };
        let layout = generate(config);

        assert_eq!(layout.floors.len(), 3);
        assert_eq!(layout.stairs.len(), 2);
        for (i, floor) in layout.floors.iter().enumerate() {
            assert_eq!(floor.index, i as u32);
            assert_eq!(floor.seed, 500 + i as u64);
        }
        for stair in &layout.stairs {
            let upper = &layout.floors[stair.from_floor as usize];
            let lower = &layout.floors[stair.from_floor as usize + 1];
            assert!(stair.from_room < upper.rooms.len());
            assert!(stair.to_room < lower.rooms.len());
            assert_eq!(stair.position, upper.rooms[stair.from_room].center());
        }
        assert_ne!(layout.floors[0].rooms, layout.floors[1].rooms);
    }

    #[test]
    fn test_floor_is_reproducible_alone() {
        let multi = generate(GeneratorConfig {
            floors: 3,
            ..scenario_config(10)
        });
        let single = generate(scenario_config(12));
        assert_eq!(multi.floors[2].rooms, single.floors[0].rooms);
    }

    #[test]
    fn test_entropy_seed_is_reported_and_replayable() {
        let config = GeneratorConfig {
            seed: SeedSource::Entropy,
            ..scenario_config(0)
        };
        let first = generate(config);
        let replay = generate(scenario_config(first.seed));
        assert_eq!(first.floors, replay.floors);
    }

    #[test]
    fn test_cancel_before_start() {
        let generator = DungeonGenerator::new(scenario_config(1)).unwrap();
        let cancel = AtomicBool::new(true);
        let result = generator.generate_with_cancel(&cancel);
        assert!(matches!(
            result,
            Err(GenerateError::Cancelled { stage: "partition" })
        ));

        let cancel = AtomicBool::new(false);
        let layout = generator.generate_with_cancel(&cancel).unwrap();
        assert_eq!(layout, generator.generate());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GeneratorConfig {
            min_room_width: 20,
            ..scenario_config(1)
        };
        assert!(DungeonGenerator::new(config).is_err());
    }

    #[derive(Default)]
    struct RecordingSink {
        clears: usize,
        rooms: Vec<(Rect, u32)>,
        segments: usize,
        stairs: usize,
        calls: Vec<&'static str>,
    }

    impl LayoutSink for RecordingSink {
        fn clear(&mut self) {
            self.clears += 1;
            self.rooms.clear();
            self.calls.push("clear");
        }

        fn spawn_room(&mut self, rect: &Rect, floor: u32) {
            self.rooms.push((*rect, floor));
            self.calls.push("room");
        }

        fn spawn_corridor(&mut self, _segment: &Segment, _floor: u32) {
            self.segments += 1;
            self.calls.push("corridor");
        }

        fn spawn_stair(&mut self, _stair: &StairLink) {
            self.stairs += 1;
            self.calls.push("stair");
        }
    }

    #[test]
    fn test_sink_receives_everything() {
        let generator = DungeonGenerator::new(GeneratorConfig {
            floors: 2,
            ..scenario_config(31)
        })
        .unwrap();
        let mut sink = RecordingSink::default();
        let layout = generator.generate_into(&mut sink);

        assert_eq!(sink.clears, 1);
        assert_eq!(sink.calls.first(), Some(&"clear"));
        assert_eq!(sink.calls.iter().filter(|&&call| call == "clear").count(), 1);
        let room_count: usize = layout.floors.iter().map(|f| f.rooms.len()).sum();
        assert_eq!(sink.rooms.len(), room_count);
        assert!(sink.rooms.iter().any(|&(_, floor)| floor == 1));
        let segment_count: usize = layout.floors.iter().map(|f| f.segments().count()).sum();
        assert_eq!(sink.segments, segment_count);
        assert_eq!(sink.stairs, layout.stairs.len());

        // Regenerating through the sink replaces, never accumulates
        generator.generate_into(&mut sink);
        assert_eq!(sink.clears, 2);
        assert_eq!(sink.rooms.len(), room_count);
    }

    #[test]
    fn test_null_sink_matches_plain_generate() {
        let generator = DungeonGenerator::new(scenario_config(8)).unwrap();
        let mut sink = crate::sink::NullSink;
        assert_eq!(generator.generate_into(&mut sink), generator.generate());
    }
}
