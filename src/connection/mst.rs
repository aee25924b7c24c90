use glam::Vec2;

use super::union_find::UnionFind;
use super::Connection;

/// Incremental Kruskal: edges are offered in ascending order and kept only
/// if they join two separate components.
pub(super) struct Kruskal {
    sets: UnionFind,
    selected: Vec<Connection>,
}

impl Kruskal {
    pub(super) fn new(room_count: usize) -> Self {
        Self {
            sets: UnionFind::new(room_count),
            selected: Vec::with_capacity(room_count.saturating_sub(1)),
        }
    }

    /// Offer candidate edges; returns the ones that would have closed a cycle.
    ///
    /// The sort is stable, so equal distances keep their enumeration order.
    pub(super) fn offer(&mut self, mut candidates: Vec<Connection>) -> Vec<Connection> {
        candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        let mut rejected = Vec::new();
        for edge in candidates {
            if self.sets.union(edge.a, edge.b) {
                self.selected.push(edge);
            } else {
                rejected.push(edge);
            }
        }
        rejected
    }

    pub(super) fn is_spanning(&self) -> bool {
        self.sets.set_count() <= 1
    }

    pub(super) fn into_edges(self) -> Vec<Connection> {
        self.selected
    }
}

/// Every pair `(i, j)` with `i < j`, in lexicographic order
pub(super) fn complete_graph(centers: &[Vec2]) -> Vec<Connection> {
    let n = centers.len();
    let mut edges = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in i + 1..n {
            edges.push(Connection::between(i, j, centers));
        }
    }
    edges
}

/// Minimum spanning tree over the complete center-distance graph.
///
/// Yields exactly `n - 1` edges for `n` rooms, in the order Kruskal accepted them.
pub fn minimum_spanning_tree(centers: &[Vec2]) -> Vec<Connection> {
    if centers.len() <= 1 {
        return Vec::new();
    }
    let mut kruskal = Kruskal::new(centers.len());
    kruskal.offer(complete_graph(centers));
    kruskal.into_edges()
}
