use glam::Vec2;

use super::Connection;
use crate::bsp::{NodeId, PartitionTree};

/// Connect rooms by traversing the BSP tree and linking sibling subtrees.
///
/// Each internal node contributes the single closest pair between a room under
/// its left child and a room under its right child. Nodes with an empty side
/// contribute nothing. The result mirrors the tree shape and has no loops.
pub fn connect_siblings(tree: &PartitionTree, centers: &[Vec2]) -> Vec<Connection> {
    let mut connections = Vec::new();

    for id in tree.internal_nodes() {
        let Some((left, right)) = tree.node(id).children() else {
            continue;
        };

        let left_rooms = rooms_under(tree, left, centers.len());
        let right_rooms = rooms_under(tree, right, centers.len());

        if let Some(edge) = closest_pair(&left_rooms, &right_rooms, centers) {
            connections.push(edge);
        }
    }

    connections
}

fn rooms_under(tree: &PartitionTree, id: NodeId, room_count: usize) -> Vec<usize> {
    let mut rooms = tree.rooms_in_subtree(id);
    rooms.retain(|&index| index < room_count);
    rooms
}

/// Closest pair across two groups; the first pair found wins ties
fn closest_pair(group_a: &[usize], group_b: &[usize], centers: &[Vec2]) -> Option<Connection> {
    let mut best: Option<Connection> = None;
    for &a in group_a {
        for &b in group_b {
            let candidate = Connection::between(a, b, centers);
            if best.map_or(true, |current| candidate.distance < current.distance) {
                best = Some(candidate);
            }
        }
    }
    best
}
