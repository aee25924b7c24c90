use std::collections::HashSet;

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;

use super::mst::{complete_graph, Kruskal};
use super::{Connection, ConnectionSet};
use crate::constants::{CONNECTION_MAX_NEIGHBORS, CONNECTION_MIN_NEIGHBORS};

/// Link every room to its `k` closest rooms, skipping pairs already linked.
///
/// Approximates a triangulation: short edges only, no long cross-map links.
pub fn neighbor_graph(centers: &[Vec2], k: usize) -> Vec<Connection> {
    let mut edges = Vec::new();
    let mut seen = HashSet::new();

    for i in 0..centers.len() {
        let mut by_distance: Vec<Connection> = (0..centers.len())
            .filter(|&j| j != i)
            .map(|j| Connection::between(i, j, centers))
            .collect();
        by_distance.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        for edge in by_distance.into_iter().take(k) {
            if seen.insert(edge.key()) {
                edges.push(edge);
            }
        }
    }

    edges
}

/// Span the nearest-neighbor graph, then add back a shuffled share of its
/// unused edges as loops.
///
/// `k` is clamped to 1..=5 and `extra_connection_chance` to 0..=1. If the
/// neighbor graph falls apart into clusters, the shortest bridges from the
/// complete graph join them so the spanning part always reaches every room.
pub fn connect_nearest(
    centers: &[Vec2],
    k: usize,
    extra_connection_chance: f32,
    rng: &mut impl Rng,
) -> ConnectionSet {
    if centers.len() <= 1 {
        return ConnectionSet::default();
    }

    let k = k.clamp(CONNECTION_MIN_NEIGHBORS, CONNECTION_MAX_NEIGHBORS);
    let chance = if extra_connection_chance.is_nan() {
        0.0
    } else {
        extra_connection_chance.clamp(0.0, 1.0)
    };

    let mut kruskal = Kruskal::new(centers.len());
    let mut unused = kruskal.offer(neighbor_graph(centers, k));

    if !kruskal.is_spanning() {
        let bridges = kruskal.offer(complete_graph(centers)).len();
        tracing::debug!(k, bridges, "neighbor graph disconnected, bridged with shortest edges");
    }

    let mandatory = kruskal.into_edges();

    unused.shuffle(rng);
    let extra_count = ((mandatory.len() as f32 * chance).floor() as usize).min(unused.len());
    unused.truncate(extra_count);

    ConnectionSet::new(mandatory, unused)
}
