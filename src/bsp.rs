//! Binary space partition of the dungeon domain.
//!
//! The tree lives in a flat arena: nodes refer to their children by
//! [`NodeId`], so a whole regeneration is a single `Vec` allocation and the
//! tree can be dropped wholesale when the next floor replaces it.

use rand::Rng;

use crate::constants::DUNGEON_SPLIT_ASPECT_LIMIT;
use crate::geometry::Rect;
use crate::room::Room;

/// Index of a node inside a [`PartitionTree`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which way a region is cut
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitAxis {
    /// Cut along a vertical line: left/right children, width is divided
    Vertical,
    /// Cut along a horizontal line: top/bottom children, height is divided
    Horizontal,
}

/// A node in the BSP tree. Either a leaf (may host a room) or an internal node (has two children).
#[derive(Clone, Debug, PartialEq)]
pub struct PartitionNode {
    /// The region this node covers
    pub area: Rect,
    /// Distance from the root (root is 0)
    pub depth: u32,
    /// Left/top and right/bottom children after a split
    children: Option<(NodeId, NodeId)>,
    /// Index into the floor's room list (only for leaves)
    room: Option<usize>,
}

impl PartitionNode {
    fn new(area: Rect, depth: u32) -> Self {
        Self {
            area,
            depth,
            children: None,
            room: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        self.children
    }

    /// Room hosted by this leaf, as an index into the room list
    pub fn room(&self) -> Option<usize> {
        self.room
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PartitionTree {
    nodes: Vec<PartitionNode>,
}

impl PartitionTree {
    /// Recursively split `domain` until `max_depth` levels are used up or
    /// a region is too small to split further.
    pub fn build(domain: Rect, max_depth: u32, min_leaf_size: i32, rng: &mut impl Rng) -> Self {
        puffin::profile_function!();

        let mut tree = Self {
            nodes: vec![PartitionNode::new(domain, 0)],
        };
        tree.split(tree.root(), max_depth, min_leaf_size, rng);
        tree
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &PartitionNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id.0].is_leaf()
    }

    /// All childless nodes, left subtree before right subtree.
    /// Calling it again restarts the walk.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            tree: self,
            stack: vec![self.root()],
        }
    }

    /// Internal nodes in pre-order (parent before children, left before right)
    pub fn internal_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            if let Some((left, right)) = self.nodes[id.0].children {
                out.push(id);
                stack.push(right);
                stack.push(left);
            }
        }
        out
    }

    /// Attach a room index to a leaf. Internal nodes never host rooms.
    pub fn assign_room(&mut self, leaf: NodeId, room_index: usize) -> bool {
        let node = &mut self.nodes[leaf.0];
        if !node.is_leaf() {
            return false;
        }
        node.room = Some(room_index);
        true
    }

    /// Collect the room indices hosted anywhere under `id`, in leaf order.
    pub fn rooms_in_subtree(&self, id: NodeId) -> Vec<usize> {
        let mut rooms = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &self.nodes[current.0];
            match node.children {
                Some((left, right)) => {
                    stack.push(right);
                    stack.push(left);
                }
                None => rooms.extend(node.room),
            }
        }
        rooms
    }

    /// Center of the first room under `id`, or the center of its area when the
    /// subtree hosts no room.
    pub fn subtree_center(&self, id: NodeId, rooms: &[Room]) -> (i32, i32) {
        self.rooms_in_subtree(id)
            .first()
            .and_then(|&index| rooms.get(index))
            .map(|room| room.rect.center())
            .unwrap_or_else(|| self.nodes[id.0].area.center())
    }

    fn push(&mut self, area: Rect, depth: u32) -> NodeId {
        self.nodes.push(PartitionNode::new(area, depth));
        NodeId(self.nodes.len() - 1)
    }

    fn split(&mut self, id: NodeId, depth_left: u32, min_leaf_size: i32, rng: &mut impl Rng) {
        if depth_left == 0 {
            return;
        }

        let area = self.nodes[id.0].area;
        let depth = self.nodes[id.0].depth;

        // Don't split if already too small
        let split_floor = min_leaf_size.saturating_mul(2);
        if area.width < split_floor && area.height < split_floor {
            return;
        }

        let axis = choose_split_axis(&area, rng);
        let axis_len = match axis {
            SplitAxis::Vertical => area.width,
            SplitAxis::Horizontal => area.height,
        };

        // Keep both children at least min_leaf_size along the cut axis
        let max_split = axis_len - min_leaf_size;
        if max_split <= min_leaf_size {
            return;
        }
        let split_pos = rng.gen_range(min_leaf_size..max_split);

        let (first, second) = match axis {
            SplitAxis::Vertical => (
                Rect::new(area.x, area.y, split_pos, area.height),
                Rect::new(area.x + split_pos, area.y, area.width - split_pos, area.height),
            ),
            SplitAxis::Horizontal => (
                Rect::new(area.x, area.y, area.width, split_pos),
                Rect::new(area.x, area.y + split_pos, area.width, area.height - split_pos),
            ),
        };

        let left = self.push(first, depth + 1);
        let right = self.push(second, depth + 1);
        self.nodes[id.0].children = Some((left, right));

        self.split(left, depth_left - 1, min_leaf_size, rng);
        self.split(right, depth_left - 1, min_leaf_size, rng);
    }
}

/// Decide split direction based on aspect ratio, falling back to a coin flip
/// for roughly square regions.
fn choose_split_axis(area: &Rect, rng: &mut impl Rng) -> SplitAxis {
    let width = area.width as f32;
    let height = area.height as f32;

    if width / height >= DUNGEON_SPLIT_ASPECT_LIMIT {
        SplitAxis::Vertical // Too wide
    } else if height / width >= DUNGEON_SPLIT_ASPECT_LIMIT {
        SplitAxis::Horizontal // Too tall
    } else if rng.gen_bool(0.5) {
        SplitAxis::Horizontal
    } else {
        SplitAxis::Vertical
    }
}

/// Depth-first iterator over the leaves of a [`PartitionTree`]
pub struct Leaves<'a> {
    tree: &'a PartitionTree,
    stack: Vec<NodeId>,
}

impl Iterator for Leaves<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some(id) = self.stack.pop() {
            match self.tree.nodes[id.0].children {
                Some((left, right)) => {
                    self.stack.push(right);
                    self.stack.push(left);
                }
                None => return Some(id),
            }
        }
        None
    }
}
