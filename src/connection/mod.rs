//! Room connectivity: which rooms get a corridor between them.
//!
//! Three strategies share one entry point, [`connect`]:
//! - [`Strategy::BspSibling`] links the closest pair across every split of the partition tree
//! - [`Strategy::Mst`] takes the minimum spanning tree of the complete distance graph
//! - [`Strategy::KNearestMst`] spans a k-nearest-neighbor graph, then adds back
//!   a fraction of the unused neighbor edges to create loops
//!
//! Every strategy's mandatory edges connect all rooms into one component.

mod mst;
mod nearest;
mod sibling;
pub mod union_find;

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bsp::PartitionTree;
use crate::constants::*;
use crate::room::Room;

pub use mst::minimum_spanning_tree;
pub use nearest::{connect_nearest, neighbor_graph};
pub use sibling::connect_siblings;
use union_find::UnionFind;

/// An undirected link between two rooms, by index into the room list
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    /// Center-to-center distance
    pub distance: f32,
}

impl Connection {
    pub fn between(a: usize, b: usize, centers: &[Vec2]) -> Self {
        Self {
            a,
            b,
            distance: centers[a].distance(centers[b]),
        }
    }

    /// Order-independent identity of the pair
    pub fn key(&self) -> (usize, usize) {
        (self.a.min(self.b), self.a.max(self.b))
    }

    pub fn involves(&self, room: usize) -> bool {
        self.a == room || self.b == room
    }
}

/// How rooms are linked together
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    /// Closest pair across each internal partition node
    BspSibling,
    /// Minimum spanning tree over all room pairs
    #[default]
    Mst,
    /// Nearest-neighbor graph reduced to a spanning tree plus loop edges
    KNearestMst {
        /// Neighbors per room, clamped to 1..=5
        #[serde(default = "default_neighbors")]
        neighbors: usize,
        /// Extra edges as a fraction of spanning edges, clamped to 0..=1
        #[serde(default = "default_extra_chance")]
        extra_connection_chance: f32,
    },
}

fn default_neighbors() -> usize {
    CONNECTION_DEFAULT_NEIGHBORS
}

fn default_extra_chance() -> f32 {
    CONNECTION_DEFAULT_EXTRA_CHANCE
}

impl Strategy {
    pub fn k_nearest() -> Self {
        Strategy::KNearestMst {
            neighbors: CONNECTION_DEFAULT_NEIGHBORS,
            extra_connection_chance: CONNECTION_DEFAULT_EXTRA_CHANCE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::BspSibling => "bsp-sibling",
            Strategy::Mst => "mst",
            Strategy::KNearestMst { .. } => "k-nearest-mst",
        }
    }
}

/// Edges chosen by a strategy. Spanning edges come first, loop extras after.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConnectionSet {
    edges: Vec<Connection>,
    mandatory: usize,
}

impl ConnectionSet {
    pub fn new(mandatory: Vec<Connection>, extras: Vec<Connection>) -> Self {
        let count = mandatory.len();
        let mut edges = mandatory;
        edges.extend(extras);
        Self {
            edges,
            mandatory: count,
        }
    }

    pub fn edges(&self) -> &[Connection] {
        &self.edges
    }

    pub fn mandatory_edges(&self) -> &[Connection] {
        &self.edges[..self.mandatory]
    }

    pub fn extras(&self) -> &[Connection] {
        &self.edges[self.mandatory..]
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.edges.iter()
    }
}

/// Choose which rooms to link.
///
/// `tree` is only consulted by [`Strategy::BspSibling`]; without it that
/// strategy yields no edges. Randomness is only drawn for loop extras.
pub fn connect(
    rooms: &[Room],
    tree: Option<&PartitionTree>,
    strategy: &Strategy,
    rng: &mut impl Rng,
) -> ConnectionSet {
    puffin::profile_function!();

    if rooms.len() <= 1 {
        return ConnectionSet::default();
    }

    let centers: Vec<Vec2> = rooms.iter().map(|room| room.rect.center_point()).collect();

    match *strategy {
        Strategy::BspSibling => match tree {
            Some(tree) => ConnectionSet::new(connect_siblings(tree, &centers), Vec::new()),
            None => {
                tracing::warn!("bsp-sibling connections requested without a partition tree");
                ConnectionSet::default()
            }
        },
        Strategy::Mst => ConnectionSet::new(minimum_spanning_tree(&centers), Vec::new()),
        Strategy::KNearestMst {
            neighbors,
            extra_connection_chance,
        } => connect_nearest(&centers, neighbors, extra_connection_chance, rng),
    }
}

/// True when `edges` join all `room_count` rooms into a single component
pub fn is_connected(room_count: usize, edges: &[Connection]) -> bool {
    if room_count <= 1 {
        return true;
    }
    let mut sets = UnionFind::new(room_count);
    for edge in edges {
        sets.union(edge.a, edge.b);
    }
    sets.set_count() == 1
}

/// Breadth-first hop count from `start` to every room; `None` if unreachable
pub fn hop_distances(room_count: usize, edges: &[Connection], start: usize) -> Vec<Option<usize>> {
    let mut adjacency = vec![Vec::new(); room_count];
    for edge in edges {
        adjacency[edge.a].push(edge.b);
        adjacency[edge.b].push(edge.a);
    }

    let mut hops = vec![None; room_count];
    if start >= room_count {
        return hops;
    }
    hops[start] = Some(0);

    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        let next_hop = hops[current].map(|h| h + 1);
        for &neighbor in &adjacency[current] {
            if hops[neighbor].is_none() {
                hops[neighbor] = next_hop;
                queue.push_back(neighbor);
            }
        }
    }
    hops
}
